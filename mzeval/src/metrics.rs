use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};

use crate::matching::PeptideMatch;

/// Running totals over a batch of matched peptide pairs.
///
/// A plain value accumulator: tallies for disjoint shards of a batch can be
/// built in any order, in parallel, and combined with `+`, which gives the
/// same result as tallying the whole batch in one pass.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct MatchTally {
    /// Residues judged correct across all pairs.
    pub matched: usize,
    /// Predicted residues across all pairs.
    pub pred_residues: usize,
    /// Ground-truth residues across all pairs.
    pub truth_residues: usize,
    /// Pairs whose prediction matched the truth completely.
    pub complete_peptides: usize,
    /// The number of pairs consumed.
    pub peptides: usize,
}

impl MatchTally {
    /// The tally of a single matched pair.
    pub fn single(result: &PeptideMatch) -> Self {
        let mut tally = Self::default();
        tally.add_peptide(result);
        tally
    }

    /// Fold one matched pair into the running totals.
    pub fn add_peptide(&mut self, result: &PeptideMatch) {
        self.matched += result.matched();
        self.pred_residues += result.pred_residues;
        self.truth_residues += result.truth_residues;
        self.complete_peptides += usize::from(result.is_complete());
        self.peptides += 1;
    }

    /// The corpus level quality numbers for everything tallied so far.
    ///
    /// All three are 0 when their denominator is 0, an empty batch is not an
    /// error.
    pub fn metrics(&self) -> Metrics {
        fn fraction(numerator: usize, denominator: usize) -> f64 {
            if denominator == 0 {
                0.0
            } else {
                numerator as f64 / denominator as f64
            }
        }
        Metrics {
            aa_precision: fraction(self.matched, self.pred_residues),
            aa_recall: fraction(self.matched, self.truth_residues),
            peptide_precision: fraction(self.complete_peptides, self.peptides),
        }
    }
}

impl Add for MatchTally {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            matched: self.matched + other.matched,
            pred_residues: self.pred_residues + other.pred_residues,
            truth_residues: self.truth_residues + other.truth_residues,
            complete_peptides: self.complete_peptides + other.complete_peptides,
            peptides: self.peptides + other.peptides,
        }
    }
}

impl AddAssign for MatchTally {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for MatchTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl FromIterator<PeptideMatch> for MatchTally {
    fn from_iter<I: IntoIterator<Item = PeptideMatch>>(iter: I) -> Self {
        let mut tally = Self::default();
        for result in iter {
            tally.add_peptide(&result);
        }
        tally
    }
}

impl<'a> FromIterator<&'a PeptideMatch> for MatchTally {
    fn from_iter<I: IntoIterator<Item = &'a PeptideMatch>>(iter: I) -> Self {
        let mut tally = Self::default();
        for result in iter {
            tally.add_peptide(result);
        }
        tally
    }
}

/// The corpus level quality numbers of a batch of predictions.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Metrics {
    /// The fraction of predicted residues judged correct.
    pub aa_precision: f64,
    /// The fraction of ground-truth residues recovered by the predictions.
    pub aa_recall: f64,
    /// The fraction of peptides predicted completely correctly.
    pub peptide_precision: f64,
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aa precision {:.4}, aa recall {:.4}, peptide precision {:.4}",
            self.aa_precision, self.aa_recall, self.peptide_precision
        )
    }
}
