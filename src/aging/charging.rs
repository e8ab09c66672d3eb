use std::fmt::{Display, Formatter};

use crate::quantity::{power::Watts, ratio::Retention, temperature::Kelvin};

#[derive(Debug, clap::ValueEnum, enumset::EnumSetType)]
pub enum ChargingStrategy {
    /// 5 W trickle charger.
    Slow,

    /// 18 W charger.
    Standard,

    /// 30 W fast charger.
    Fast,

    /// 65 W charger.
    UltraFast,
}

impl Display for ChargingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Slow => write!(f, "Slow"),
            Self::Standard => write!(f, "Standard"),
            Self::Fast => write!(f, "Fast"),
            Self::UltraFast => write!(f, "Ultra-fast"),
        }
    }
}

impl ChargingStrategy {
    /// Average cell temperature without charging heat.
    pub const AMBIENT_TEMPERATURE: Kelvin = Kelvin(303.15);

    pub const fn charger_power(self) -> Watts {
        match self {
            Self::Slow => Watts(5.0),
            Self::Standard => Watts(18.0),
            Self::Fast => Watts(30.0),
            Self::UltraFast => Watts(65.0),
        }
    }

    /// Charging current relative to the capacity.
    #[must_use]
    pub const fn c_rate(self) -> f64 {
        match self {
            Self::Slow => 0.3,
            Self::Standard => 1.0,
            Self::Fast => 2.0,
            Self::UltraFast => 3.0,
        }
    }

    /// Cell heating while charging.
    pub const fn temperature_rise(self) -> Kelvin {
        match self {
            Self::Slow => Kelvin(2.0),
            Self::Standard => Kelvin(8.0),
            Self::Fast => Kelvin(15.0),
            Self::UltraFast => Kelvin(25.0),
        }
    }

    /// Lithium plating and mechanical stress on top of the heating.
    const fn stress_factor(self) -> f64 {
        match self {
            Self::Slow => 0.8,
            Self::Standard => 1.0,
            Self::Fast => 1.3,
            Self::UltraFast => 1.8,
        }
    }

    /// Additional stress, one unit per 10 K of heating.
    pub(super) fn extra_stress(self) -> f64 {
        self.temperature_rise().0 / 10.0 * self.stress_factor()
    }
}

/// Capacity retention after a year of charging with a particular strategy.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct ChargingImpact {
    pub strategy: ChargingStrategy,
    pub retention: Retention,

    /// Loss relative to the 15% baseline yearly loss.
    pub relative_wear: f64,
}

impl ChargingImpact {
    pub const BASELINE_LOSS: f64 = 0.15;
}
