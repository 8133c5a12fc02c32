//! Monetary amounts in integer paise (1 rupee = 100 paise).
//!
//! All order math happens in paise so "round to 2 decimals" is exact:
//! the only rounding point is the percentage division, which rounds
//! half-up to the nearest paisa.

use serde::{Deserialize, Serialize};

/// An INR amount in paise. Never negative in practice; operations saturate
/// at zero rather than going negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Amount from whole rupees.
    pub fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    pub fn paise(self) -> i64 {
        self.0
    }

    /// `self * percent / 100`, rounded half-up to the nearest paisa.
    pub fn percent(self, percent: i64) -> Money {
        Money((self.0 * percent + 50).div_euclid(100))
    }

    /// The smaller of the two amounts.
    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Money {
    /// Renders as rupees with two decimals, e.g. `₹1234.50`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}
