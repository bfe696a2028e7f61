//! Money in integer minor units.

use serde::{Deserialize, Serialize};

/// Currency used for all prices and payments.
pub const CURRENCY: &str = "INR";

/// Non-negative amount in minor units (paise).
///
/// # Examples
/// ```
/// use courtside::domain::Money;
///
/// let hourly = Money::from_minor(45_000).expect("non-negative");
/// let total = hourly.times(2).expect("no overflow");
/// assert_eq!(total.minor(), 90_000);
/// assert_eq!(total.percent(50).minor(), 45_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Wrap a minor-unit amount, rejecting negatives.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Option<Self> {
        if minor < 0 { None } else { Some(Self(minor)) }
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Multiply by a count (hours, seats), `None` on overflow.
    #[must_use]
    pub fn times(self, count: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(count)).map(Self)
    }

    /// Sum two amounts, saturating.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// `pct` percent of the amount, rounded down to whole minor units.
    #[must_use]
    pub fn percent(self, pct: u8) -> Self {
        let pct = i64::from(pct.min(100));
        Self(self.0.saturating_mul(pct) / 100)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{CURRENCY} {}.{:02}", self.0 / 100, self.0 % 100)
    }
}
