use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// State of charge as a fraction of the full charge, `0.0..=1.0`.
///
/// Percentages only appear at the boundaries, see [`StateOfCharge::from_percent`]
/// and [`StateOfCharge::percent`].
#[must_use]
#[derive(Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct StateOfCharge(pub f64);

impl StateOfCharge {
    pub const EMPTY: Self = Self(0.0);
    pub const HALF: Self = Self(0.5);
    pub const FULL: Self = Self(1.0);

    pub const fn from_percent(percent: f64) -> Self {
        Self(0.01 * percent)
    }

    pub const fn percent(self) -> f64 {
        100.0 * self.0
    }

    /// Clamp into `0.0..=1.0`.
    pub fn clamped(self) -> Self {
        Self(self.0.clamp(0.0, 1.0))
    }

    pub const fn is_valid(self) -> bool {
        self.0.is_finite() && (0.0 <= self.0) && (self.0 <= 1.0)
    }
}

impl Display for StateOfCharge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.percent())
    }
}

impl Debug for StateOfCharge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}%", self.percent())
    }
}

/// Fraction of the original capacity that is still usable, always within `0.0..=1.0`.
#[must_use]
#[derive(Copy, Clone, PartialEq, PartialOrd, Serialize)]
pub struct Retention(f64);

impl Retention {
    pub const FULL: Self = Self(1.0);

    /// Create a retention clamped into `0.0..=1.0`, `NaN` is treated as a complete loss.
    pub fn new(value: f64) -> Self {
        if value.is_nan() { Self(0.0) } else { Self(value.clamp(0.0, 1.0)) }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for Retention {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", 100.0 * self.0)
    }
}

impl Debug for Retention {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
