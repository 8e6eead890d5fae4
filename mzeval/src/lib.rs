#![doc = include_str!("../README.md")]

/// All things related to residue masses.
pub mod chemistry;
mod error;
/// The mass-tolerant matching engine itself.
pub mod matching;
/// Streaming aggregation of per-pair results into corpus level metrics.
pub mod metrics;
/// Tolerances for mass comparisons.
pub mod quantities;
/// Residue token handling for peptide strings.
pub mod sequence;

pub use error::EvalError;

/// A subset of the types and traits that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    #[cfg(feature = "rayon")]
    pub use crate::matching::par_match_batch;
    #[cfg(feature = "rayon")]
    pub use rayon::iter::ParallelIterator;
    pub use crate::{
        chemistry::MassTable,
        error::EvalError,
        matching::{MatchMode, PeptideMatch, match_batch, match_peptides, match_tokens},
        metrics::{MatchTally, Metrics},
        quantities::{MatchTolerances, Tolerance},
        sequence::tokenize,
    };
}
