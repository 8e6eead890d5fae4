use std::{fmt, str::FromStr};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A tolerance around a mass, in dalton or parts per million.
///
/// All mass comparisons in this crate go through [`Tolerance::within`]. The
/// comparison is strict, so a distance exactly equal to the tolerance does
/// not count as within it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Tolerance {
    /// A fixed maximal distance in dalton.
    Absolute(OrderedFloat<f64>),
    /// A maximal distance relative to the reference mass, in parts per million.
    Relative(OrderedFloat<f64>),
}

impl Tolerance {
    /// Create a tolerance of the given number of dalton.
    pub fn new_absolute(value: f64) -> Self {
        Self::Absolute(OrderedFloat(value))
    }

    /// Create a tolerance of the given number of parts per million.
    pub fn new_ppm(value: f64) -> Self {
        Self::Relative(OrderedFloat(value))
    }

    /// The interval of masses accepted around the given reference mass.
    pub fn bounds(self, reference: f64) -> (f64, f64) {
        match self {
            Self::Absolute(tolerance) => (reference - tolerance.0, reference + tolerance.0),
            Self::Relative(ppm) => (
                reference * (1.0 - ppm.0 * 1e-6),
                reference * (1.0 + ppm.0 * 1e-6),
            ),
        }
    }

    /// Check whether two masses are within this tolerance of each other. For
    /// a relative tolerance the distance is measured against `b`.
    pub fn within(self, a: f64, b: f64) -> bool {
        match self {
            Self::Absolute(tolerance) => (a - b).abs() < tolerance.0,
            Self::Relative(ppm) => (a - b).abs() < b.abs() * ppm.0 * 1e-6,
        }
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(value) => write!(f, "{value} da"),
            Self::Relative(value) => write!(f, "{value} ppm"),
        }
    }
}

impl FromStr for Tolerance {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, unit) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| format!("missing unit in tolerance '{s}'"))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| format!("invalid number in tolerance '{s}'"))?;
        match unit.trim().to_ascii_lowercase().as_str() {
            "da" | "dalton" => Ok(Self::new_absolute(value)),
            "ppm" => Ok(Self::new_ppm(value)),
            unit => Err(format!("unknown tolerance unit '{unit}'")),
        }
    }
}

/// The two tolerances steering residue matching.
///
/// The cumulative tolerance decides when the running mass totals of the two
/// sequences have converged again after an insertion or substitution; the
/// residue tolerance is the tighter check certifying that two individual
/// residues are really the same.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchTolerances {
    /// Maximal distance between two individual residue masses to call them
    /// the same residue.
    pub residue: Tolerance,
    /// Maximal distance between the running cumulative masses to consider
    /// the two sequences converged at a step.
    pub cumulative: Tolerance,
}

impl Default for MatchTolerances {
    fn default() -> Self {
        Self {
            residue: Tolerance::new_absolute(0.1),
            cumulative: Tolerance::new_absolute(0.5),
        }
    }
}
