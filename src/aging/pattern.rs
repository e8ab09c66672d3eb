use bon::bon;
use serde::Deserialize;

use crate::{
    prelude::*,
    quantity::{
        ratio::{Retention, StateOfCharge},
        temperature::Kelvin,
        time::Days,
    },
};

/// Usage habits that stress the battery.
///
/// Every field is optional when building, missing ones take the documented defaults.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "PatternRecord")]
pub struct UsagePattern {
    /// Defaults to 298 K.
    pub average_temperature: Kelvin,

    /// Defaults to `0.5`.
    pub average_depth_of_discharge: f64,

    /// Typical state of charge while the phone is left alone, defaults to 50%.
    pub storage_state_of_charge: StateOfCharge,

    /// Share of fast charging sessions, `0..=1`, defaults to none.
    pub fast_charge_ratio: f64,

    /// Whether the battery is routinely charged in the cold, defaults to `false`.
    pub low_temperature_charging: bool,
}

impl Default for UsagePattern {
    fn default() -> Self {
        Self {
            average_temperature: Self::DEFAULT_TEMPERATURE,
            average_depth_of_discharge: Self::DEFAULT_DEPTH_OF_DISCHARGE,
            storage_state_of_charge: StateOfCharge::HALF,
            fast_charge_ratio: 0.0,
            low_temperature_charging: false,
        }
    }
}

#[bon]
impl UsagePattern {
    #[builder]
    pub fn new(
        #[builder(default = UsagePattern::DEFAULT_TEMPERATURE)] average_temperature: Kelvin,
        #[builder(default = UsagePattern::DEFAULT_DEPTH_OF_DISCHARGE)] average_depth_of_discharge: f64,
        #[builder(default = StateOfCharge::HALF)] storage_state_of_charge: StateOfCharge,
        #[builder(default)] fast_charge_ratio: f64,
        #[builder(default)] low_temperature_charging: bool,
    ) -> Result<Self> {
        ensure!(
            average_temperature.is_finite() && average_temperature > Kelvin::ZERO,
            "invalid average temperature: {average_temperature}",
        );
        ensure!(
            StateOfCharge(average_depth_of_discharge).is_valid(),
            "average depth of discharge must be within 0..=1: {average_depth_of_discharge}",
        );
        ensure!(
            storage_state_of_charge.is_valid(),
            "storage state of charge must be within 0..=1: {storage_state_of_charge}",
        );
        ensure!(
            StateOfCharge(fast_charge_ratio).is_valid(),
            "fast charge ratio must be within 0..=1: {fast_charge_ratio}",
        );
        Ok(Self {
            average_temperature,
            average_depth_of_discharge,
            storage_state_of_charge,
            fast_charge_ratio,
            low_temperature_charging,
        })
    }
}

/// Usage pattern as stored in a device profile, any key may be omitted.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternRecord {
    #[serde(rename = "average_temperature_kelvin")]
    average_temperature: Option<Kelvin>,

    average_depth_of_discharge: Option<f64>,
    storage_state_of_charge: Option<StateOfCharge>,
    fast_charge_ratio: Option<f64>,
    low_temperature_charging: Option<bool>,
}

impl TryFrom<PatternRecord> for UsagePattern {
    type Error = Error;

    fn try_from(record: PatternRecord) -> Result<Self> {
        Self::builder()
            .maybe_average_temperature(record.average_temperature)
            .maybe_average_depth_of_discharge(record.average_depth_of_discharge)
            .maybe_storage_state_of_charge(record.storage_state_of_charge)
            .maybe_fast_charge_ratio(record.fast_charge_ratio)
            .maybe_low_temperature_charging(record.low_temperature_charging)
            .build()
    }
}

impl UsagePattern {
    const DEFAULT_TEMPERATURE: Kelvin = Kelvin(298.0);
    const DEFAULT_DEPTH_OF_DISCHARGE: f64 = 0.5;

    /// Minimal remaining life, no matter how worn or stressed the battery is.
    const MIN_REMAINING_LIFE: Days = Days(30.0);

    /// Additive stress score, `0..=100`, the higher the harsher.
    #[must_use]
    pub fn stress_score(&self) -> u8 {
        let mut score = 0_u8;

        // Hot usage, above 40 °C and 30 °C:
        if self.average_temperature > Kelvin(313.0) {
            score += 30;
        } else if self.average_temperature > Kelvin(303.0) {
            score += 15;
        }

        // Deep discharges:
        if self.average_depth_of_discharge > 0.8 {
            score += 25;
        } else if self.average_depth_of_discharge > 0.6 {
            score += 15;
        }

        if self.storage_state_of_charge > StateOfCharge(0.9) {
            score += 20;
        }
        if self.fast_charge_ratio > 0.7 {
            score += 15;
        }
        if self.low_temperature_charging {
            score += 10;
        }

        score.min(100)
    }

    /// Rough estimate of the remaining service life.
    pub fn remaining_life(&self, retention: Retention) -> Days {
        let retention = retention.get();
        let base = if retention > 0.8 {
            Days(730.0)
        } else if retention > 0.7 {
            Days(365.0)
        } else if retention > 0.6 {
            Days(180.0)
        } else {
            Days(90.0)
        };
        (base * (1.0 - f64::from(self.stress_score()) / 200.0)).max(Self::MIN_REMAINING_LIFE)
    }
}
