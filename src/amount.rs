use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed-point decimal with 4 decimal places, stored as a scaled integer.
///
/// Used for both liters and money so ledger arithmetic never drifts the way
/// repeated `f64` accumulation would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 10_000;

    pub const ZERO: Amount = Amount(0);

    pub fn from_float(value: f64) -> Self {
        Amount((value * Self::SCALE as f64).round() as i64)
    }

    pub fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Derive a per-unit rate from a total and a quantity, in fixed point.
    ///
    /// Returns `Amount::ZERO` when `quantity` is zero; callers validate
    /// positive quantities before deriving rates.
    pub fn per_unit(total: Amount, quantity: Amount) -> Amount {
        if quantity.0 == 0 {
            return Amount::ZERO;
        }
        let scaled = (total.0 as i128 * Self::SCALE as i128) / quantity.0 as i128;
        Amount(scaled as i64)
    }

    /// This amount as a percentage of `whole`, e.g. tank level over capacity.
    ///
    /// A zero `whole` yields 0.0 rather than dividing by zero.
    pub fn percent_of(&self, whole: Amount) -> f64 {
        if whole.0 == 0 {
            return 0.0;
        }
        (self.0 as f64 / whole.0 as f64) * 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::SCALE;
        let frac = abs % Self::SCALE;
        write!(f, "{sign}{whole}.{frac:04}")
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
