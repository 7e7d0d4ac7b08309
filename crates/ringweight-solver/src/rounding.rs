//! Rounding policies applied to solved weights.

/// Scale applied before truncation when under-assigning, in hundredths.
///
/// `99.9` hundredths = 0.999 of the value, expressed at two-decimal precision.
const UNDER_ASSIGN_SCALE: f64 = 99.9;

/// Scale for plain two-decimal truncation.
const TRUNCATE_SCALE: f64 = 100.0;

/// How a solved weight is turned into the value written to the ring.
///
/// Both policies round toward zero at two decimal places, so the result never
/// exceeds the exact solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// `floor(w * 100) / 100`.
    Truncate,
    /// `floor(w * 99.9) / 100`: a 0.999 safety factor on top of truncation,
    /// so new devices land slightly under their slot target rather than over.
    UnderAssign,
}

impl Rounding {
    /// Round `weight` according to this policy.
    pub fn apply(self, weight: f64) -> f64 {
        let scale = match self {
            Rounding::Truncate => TRUNCATE_SCALE,
            Rounding::UnderAssign => UNDER_ASSIGN_SCALE,
        };
        (weight * scale).floor() / 100.0
    }
}
