use std::{fmt, str::FromStr};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    chemistry::MassTable, error::EvalError, quantities::MatchTolerances, sequence::tokenize,
};

/// How the two scan directions are combined for a pair of sequences.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Scan from the N terminus only. Positions the scan does not reach stay
    /// unmatched. Useful when the caller knows the predictions are anchored
    /// at the N terminus.
    Forward,
    /// Scan from the C terminus only, the forward scan run on reversed
    /// copies of both sequences with the verdicts mapped back.
    Backward,
    /// Scan from the N terminus, then rescue the C-terminal side: a second
    /// scan runs from the ends inward, stopping at the first position the
    /// forward scan could not match, and overrides the verdicts it reaches.
    /// This credits residues that only one of the two termini can anchor.
    #[default]
    Best,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Forward => "forward",
                Self::Backward => "backward",
                Self::Best => "best",
            }
        )
    }
}

impl FromStr for MatchMode {
    type Err = EvalError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "best" => Ok(Self::Best),
            other => Err(EvalError::UnknownMode(other.to_string())),
        }
    }
}

/// The per-position verdicts for one (prediction, truth) pair.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PeptideMatch {
    /// One verdict per aligned position. The vector is as long as the longer
    /// of the two sequences, `true` meaning the predicted residue at that
    /// position is judged equivalent to the true residue.
    pub positions: Vec<bool>,
    /// The number of residues in the prediction.
    pub pred_residues: usize,
    /// The number of residues in the ground truth.
    pub truth_residues: usize,
}

impl PeptideMatch {
    /// The number of residues judged correct.
    pub fn matched(&self) -> usize {
        self.positions.iter().filter(|&&position| position).count()
    }

    /// Whether the prediction matches the truth completely: every aligned
    /// position matched and both sequences have the same number of residues.
    pub fn is_complete(&self) -> bool {
        self.pred_residues == self.truth_residues
            && self.positions.iter().all(|&position| position)
    }
}

/// A cumulatively converged step: the cursor into each sequence at the
/// moment of convergence, and whether the individual residue masses at those
/// cursors also agree.
type ScanStep = (usize, usize, bool);

/// One monotonic pass over two resolved mass sequences.
///
/// Walks both sequences front to back keeping a running mass total per side.
/// When the totals converge within the cumulative tolerance the step consumes
/// a residue from both sides and yields a verdict: `true` if the individual
/// residue masses also lie within the residue tolerance, `false` for a
/// compensated substitution whose masses only agree in total. When the
/// totals diverge the side that is behind in mass consumes one residue
/// without a verdict. Never backtracks, so it runs in linear time.
///
/// Returns the converged steps and the final cursor of each sequence.
fn cumulative_scan(
    pred: &[f64],
    truth: &[f64],
    tolerances: MatchTolerances,
) -> (Vec<ScanStep>, usize, usize) {
    let mut steps = Vec::new();
    let (mut i, mut j) = (0, 0);
    let (mut cum_pred, mut cum_truth) = (0.0, 0.0);
    while i < pred.len() && j < truth.len() {
        let (mass_pred, mass_truth) = (pred[i], truth[j]);
        if tolerances
            .cumulative
            .within(cum_pred + mass_pred, cum_truth + mass_truth)
        {
            steps.push((i, j, tolerances.residue.within(mass_pred, mass_truth)));
            cum_pred += mass_pred;
            cum_truth += mass_truth;
            i += 1;
            j += 1;
        } else if cum_truth + mass_truth > cum_pred + mass_pred {
            cum_pred += mass_pred;
            i += 1;
        } else {
            cum_truth += mass_truth;
            j += 1;
        }
    }
    (steps, i, j)
}

/// Build the match vector for two resolved mass sequences.
fn match_masses(
    pred: &[f64],
    truth: &[f64],
    tolerances: MatchTolerances,
    mode: MatchMode,
) -> Vec<bool> {
    let length = pred.len().max(truth.len());
    let mut positions = vec![false; length];
    match mode {
        MatchMode::Forward => {
            let (steps, _, _) = cumulative_scan(pred, truth, tolerances);
            for (i, j, matched) in steps {
                positions[i.max(j)] = matched;
            }
        }
        MatchMode::Backward => {
            let reversed_pred: Vec<f64> = pred.iter().rev().copied().collect();
            let reversed_truth: Vec<f64> = truth.iter().rev().copied().collect();
            let (steps, _, _) = cumulative_scan(&reversed_pred, &reversed_truth, tolerances);
            for (i, j, matched) in steps {
                positions[length - 1 - i.max(j)] = matched;
            }
        }
        MatchMode::Best => {
            let (steps, _, _) = cumulative_scan(pred, truth, tolerances);
            for (i, j, matched) in steps {
                positions[i.max(j)] = matched;
            }
            // The forward scan anchors at the N terminus, so a single early
            // error poisons everything after it. Rescue the tail with a scan
            // from the C terminus, bounded at the first position the forward
            // scan failed so the two scans cannot double count a residue.
            if let Some(stop) = positions.iter().position(|&matched| !matched) {
                let reversed_pred: Vec<f64> = pred[stop.min(pred.len())..]
                    .iter()
                    .rev()
                    .copied()
                    .collect();
                let reversed_truth: Vec<f64> = truth[stop.min(truth.len())..]
                    .iter()
                    .rev()
                    .copied()
                    .collect();
                let (steps, _, _) = cumulative_scan(&reversed_pred, &reversed_truth, tolerances);
                for (i, j, matched) in steps {
                    let from_pred = pred.len() - 1 - i;
                    let from_truth = truth.len() - 1 - j;
                    positions[from_pred.max(from_truth)] = matched;
                }
            }
        }
    }
    positions
}

/// Match a predicted residue sequence against its ground truth.
///
/// Every token is resolved through the mass table up front, so an unknown
/// residue in either sequence fails the whole pair before any scanning
/// happens. Empty sequences are valid and give an empty match vector.
///
/// # Errors
/// [`EvalError::UnknownResidue`] if any token lacks a mass.
pub fn match_tokens<A: AsRef<str>, B: AsRef<str>>(
    predicted: &[A],
    truth: &[B],
    masses: &MassTable,
    tolerances: MatchTolerances,
    mode: MatchMode,
) -> Result<PeptideMatch, EvalError> {
    let predicted_masses = masses.sequence_masses(predicted)?;
    let truth_masses = masses.sequence_masses(truth)?;
    Ok(PeptideMatch {
        positions: match_masses(&predicted_masses, &truth_masses, tolerances, mode),
        pred_residues: predicted.len(),
        truth_residues: truth.len(),
    })
}

/// Match two peptides given as plain strings, split into residue tokens with
/// [`tokenize`] first.
///
/// # Errors
/// [`EvalError::UnknownResidue`] if any token lacks a mass.
pub fn match_peptides(
    predicted: &str,
    truth: &str,
    masses: &MassTable,
    tolerances: MatchTolerances,
    mode: MatchMode,
) -> Result<PeptideMatch, EvalError> {
    match_tokens(&tokenize(predicted), &tokenize(truth), masses, tolerances, mode)
}

/// Match a whole batch of (prediction, truth) peptide pairs.
///
/// Every pair yields its own result, so the caller decides whether an
/// unknown residue skips the offending pair or aborts the run, for instance
/// by collecting into `Result<MatchTally, _>` or with `filter_map(Result::ok)`.
pub fn match_batch<A: AsRef<str>, B: AsRef<str>>(
    pairs: impl IntoIterator<Item = (A, B)>,
    masses: &MassTable,
    tolerances: MatchTolerances,
    mode: MatchMode,
) -> impl Iterator<Item = Result<PeptideMatch, EvalError>> {
    pairs.into_iter().map(move |(predicted, truth)| {
        match_peptides(predicted.as_ref(), truth.as_ref(), masses, tolerances, mode)
    })
}

#[cfg(feature = "rayon")]
/// Match a whole batch of (prediction, truth) peptide pairs in parallel.
///
/// Pairs are independent and the mass table is read-only, so the batch
/// shards across the rayon pool without any locking.
pub fn par_match_batch<A, B>(
    pairs: impl IntoParallelIterator<Item = (A, B)>,
    masses: &MassTable,
    tolerances: MatchTolerances,
    mode: MatchMode,
) -> impl ParallelIterator<Item = Result<PeptideMatch, EvalError>>
where
    A: AsRef<str> + Send,
    B: AsRef<str> + Send,
{
    pairs.into_par_iter().map(move |(predicted, truth)| {
        match_peptides(predicted.as_ref(), truth.as_ref(), masses, tolerances, mode)
    })
}
