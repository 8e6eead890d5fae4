use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// The monoisotopic masses of the canonical residue vocabulary: the standard
/// proteinogenic amino acids (cysteine always carbamidomethylated) plus the
/// variable modifications commonly produced by de novo models.
const CANONICAL_RESIDUES: &[(&str, f64)] = &[
    ("G", 57.021464),
    ("A", 71.037114),
    ("S", 87.032028),
    ("P", 97.052764),
    ("V", 99.068414),
    ("T", 101.047670),
    ("C+57.02146", 160.030649),
    ("L", 113.084064),
    ("I", 113.084064),
    ("N", 114.042927),
    ("D", 115.026943),
    ("Q", 128.058578),
    ("K", 128.094963),
    ("E", 129.042593),
    ("M", 131.040485),
    ("H", 137.058912),
    ("F", 147.068414),
    ("R", 156.101111),
    ("Y", 163.063329),
    ("W", 186.079313),
    // Amino acid modifications
    ("M+15.995", 147.035400),  // Met oxidation
    ("N+0.984", 115.026943),   // Asn deamidation
    ("Q+0.984", 129.042594),   // Gln deamidation
    // N-terminal modifications
    ("+42.011", 42.010565),          // Acetylation
    ("+43.006", 43.005814),          // Carbamylation
    ("-17.027", -17.026549),         // NH3 loss
    ("+43.006-17.027", 25.980265),   // Carbamylation and NH3 loss
];

/// An immutable mapping from residue token to monoisotopic mass in dalton.
///
/// Tokens are opaque keys: `"K"` and `"M+15.995"` are both single residues,
/// and two different tokens can carry the same or nearly the same mass. That
/// ambiguity is exactly what the matching engine resolves, the table itself
/// only answers lookups. A lookup for a token without an entry is an error,
/// never a default mass.
///
/// The table is built once, from configuration or from [`Self::canonical`],
/// and is read-only afterwards, so one instance can be shared freely across
/// worker threads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MassTable {
    masses: HashMap<String, f64>,
}

impl MassTable {
    /// The canonical residue vocabulary of a de novo sequencing pipeline.
    pub fn canonical() -> Self {
        CANONICAL_RESIDUES.iter().copied().collect()
    }

    /// The monoisotopic mass of the given residue token.
    ///
    /// # Errors
    /// [`EvalError::UnknownResidue`] if the token has no entry.
    pub fn mass(&self, token: &str) -> Result<f64, EvalError> {
        self.masses
            .get(token)
            .copied()
            .ok_or_else(|| EvalError::UnknownResidue(token.to_string()))
    }

    /// Resolve all tokens of a sequence in order.
    ///
    /// # Errors
    /// [`EvalError::UnknownResidue`] on the first token without an entry.
    pub fn sequence_masses<T: AsRef<str>>(&self, tokens: &[T]) -> Result<Vec<f64>, EvalError> {
        tokens.iter().map(|token| self.mass(token.as_ref())).collect()
    }

    /// Check whether the given token has a known mass.
    pub fn contains(&self, token: &str) -> bool {
        self.masses.contains_key(token)
    }

    /// The number of known residue tokens.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Check whether the table has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for MassTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            masses: iter
                .into_iter()
                .map(|(token, mass)| (token.into(), mass))
                .collect(),
        }
    }
}
