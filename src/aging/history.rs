use bon::bon;
use serde::Deserialize;

use crate::{
    prelude::*,
    quantity::{ratio::StateOfCharge, temperature::Kelvin, time::Days},
};

/// Snapshot of how the battery has been used so far.
#[must_use]
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(try_from = "HistoryRecord")]
pub struct UsageHistory {
    pub age: Days,

    /// Completed charge cycles of any depth.
    pub cycles_completed: f64,

    pub average_state_of_charge: StateOfCharge,
    pub average_temperature: Kelvin,

    /// Average depth of discharge per cycle, `0..=1`.
    pub average_depth_of_discharge: f64,
}

#[bon]
impl UsageHistory {
    #[builder]
    pub fn new(
        age: Days,
        cycles_completed: f64,
        average_state_of_charge: StateOfCharge,
        average_temperature: Kelvin,
        average_depth_of_discharge: f64,
    ) -> Result<Self> {
        ensure!(age.is_finite() && age >= Days::ZERO, "invalid battery age: {age}");
        ensure!(
            cycles_completed.is_finite() && cycles_completed >= 0.0,
            "invalid number of completed cycles: {cycles_completed}",
        );
        ensure!(
            average_state_of_charge.is_valid(),
            "average state of charge must be within 0..=1: {average_state_of_charge}",
        );
        ensure!(
            average_temperature.is_finite() && average_temperature > Kelvin::ZERO,
            "invalid average temperature: {average_temperature}",
        );
        ensure!(
            StateOfCharge(average_depth_of_discharge).is_valid(),
            "average depth of discharge must be within 0..=1: {average_depth_of_discharge}",
        );
        Ok(Self {
            age,
            cycles_completed,
            average_state_of_charge,
            average_temperature,
            average_depth_of_discharge,
        })
    }
}

/// Usage history as stored in a device profile.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct HistoryRecord {
    #[serde(rename = "age_days")]
    age: Days,

    cycles_completed: f64,
    average_state_of_charge: StateOfCharge,

    #[serde(rename = "average_temperature_kelvin")]
    average_temperature: Kelvin,

    average_depth_of_discharge: f64,
}

impl TryFrom<HistoryRecord> for UsageHistory {
    type Error = Error;

    fn try_from(record: HistoryRecord) -> Result<Self> {
        Self::builder()
            .age(record.age)
            .cycles_completed(record.cycles_completed)
            .average_state_of_charge(record.average_state_of_charge)
            .average_temperature(record.average_temperature)
            .average_depth_of_discharge(record.average_depth_of_discharge)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_ok() -> Result {
        let history = UsageHistory::builder()
            .age(Days(365.0))
            .cycles_completed(200.0)
            .average_state_of_charge(StateOfCharge(0.6))
            .average_temperature(Kelvin(303.15))
            .average_depth_of_discharge(0.7)
            .build()?;
        assert_eq!(history.age, Days(365.0));
        Ok(())
    }

    #[test]
    fn test_negative_age() {
        let result = UsageHistory::builder()
            .age(Days(-1.0))
            .cycles_completed(0.0)
            .average_state_of_charge(StateOfCharge::HALF)
            .average_temperature(Kelvin::REFERENCE)
            .average_depth_of_discharge(0.5)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_depth_of_discharge_out_of_range() {
        let result = UsageHistory::builder()
            .age(Days(10.0))
            .cycles_completed(5.0)
            .average_state_of_charge(StateOfCharge::HALF)
            .average_temperature(Kelvin::REFERENCE)
            .average_depth_of_discharge(1.5)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_temperature() {
        let result = UsageHistory::builder()
            .age(Days(10.0))
            .cycles_completed(5.0)
            .average_state_of_charge(StateOfCharge::HALF)
            .average_temperature(Kelvin::ZERO)
            .average_depth_of_discharge(0.5)
            .build();
        assert!(result.is_err());
    }
}
