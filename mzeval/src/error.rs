use std::{error, fmt};

/// The errors that can surface while evaluating predictions.
///
/// Matching itself performs no IO and never panics, so these are the only two
/// failure kinds: a residue without a known mass, or a selector mode string
/// that does not name one of the supported modes.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EvalError {
    /// A residue token that has no entry in the mass table in use. The caller
    /// decides whether this skips the offending pair or aborts the batch.
    UnknownResidue(String),
    /// A match mode other than `best`, `forward`, or `backward`. Raised
    /// before any matching work is done.
    UnknownMode(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownResidue(token) => {
                write!(f, "residue '{token}' has no known mass")
            }
            Self::UnknownMode(mode) => {
                write!(
                    f,
                    "unknown match mode '{mode}', expected one of 'best', 'forward', or 'backward'"
                )
            }
        }
    }
}

impl error::Error for EvalError {}
