use crate::{
    aging::{
        charging::{ChargingImpact, ChargingStrategy},
        history::UsageHistory,
    },
    chemistry::{Chemistry, ChemistryParameters},
    prelude::*,
    quantity::{
        ratio::{Retention, StateOfCharge},
        temperature::Kelvin,
        time::Days,
    },
};

/// Calendar and cycle aging of a battery of the given chemistry.
///
/// The two mechanisms are independent and combined multiplicatively, so that the retention
/// never goes negative even when both losses are large.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct AgingModel {
    chemistry: Chemistry,
    parameters: &'static ChemistryParameters,
}

/// Breakdown of the capacity fade.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Degradation {
    /// Loss due to elapsed time, `0..=0.5`.
    pub calendar_loss: f64,

    /// Loss due to cycling, `0..=0.3`.
    pub cycle_loss: f64,

    pub retention: Retention,
}

impl AgingModel {
    /// Yearly loss at the reference temperature and 50% average charge.
    const BASE_ANNUAL_LOSS: f64 = 0.05;

    /// Calendar loss grows sub-linearly with time.
    const TIME_EXPONENT: f64 = 0.7;

    /// Activation energy in J/mol.
    const ACTIVATION_ENERGY: f64 = 50_000.0;

    /// Molar gas constant in J/(mol·K).
    const GAS_CONSTANT: f64 = 8.314;

    const MAX_CALENDAR_LOSS: f64 = 0.5;

    const CYCLE_EXPONENT: f64 = 0.8;

    /// Loss after [`ChemistryParameters::cycle_life`] full cycles under nominal stress.
    const CYCLE_LIFE_LOSS: f64 = 0.2;

    const MAX_CYCLE_LOSS: f64 = 0.3;

    pub const fn new(chemistry: Chemistry) -> Self {
        Self { chemistry, parameters: chemistry.parameters() }
    }

    pub const fn chemistry(&self) -> Chemistry {
        self.chemistry
    }

    pub const fn parameters(&self) -> &'static ChemistryParameters {
        self.parameters
    }

    /// Capacity retention after the specified usage.
    pub fn capacity_retention(&self, history: &UsageHistory) -> Retention {
        self.degradation(history).retention
    }

    #[instrument(level = "debug", skip_all, fields(chemistry = %self.chemistry))]
    pub fn degradation(&self, history: &UsageHistory) -> Degradation {
        let calendar_loss = self.calendar_loss(
            history.age,
            history.average_state_of_charge,
            history.average_temperature,
        );
        let cycle_loss = self.cycle_loss(
            history.cycles_completed,
            history.average_depth_of_discharge,
            history.average_temperature,
        );
        let retention = Retention::new((1.0 - calendar_loss) * (1.0 - cycle_loss));
        debug!(calendar_loss, cycle_loss, %retention, "estimated");
        Degradation { calendar_loss, cycle_loss, retention }
    }

    /// Capacity loss due to the elapsed time, `0..=0.5`.
    #[must_use]
    pub fn calendar_loss(
        &self,
        age: Days,
        average_state_of_charge: StateOfCharge,
        average_temperature: Kelvin,
    ) -> f64 {
        let daily_rate = 1.0 - (1.0 - Self::BASE_ANNUAL_LOSS).powf(1.0 / 365.0);
        let daily_rate = daily_rate
            * self.temperature_acceleration(average_temperature)
            * self.storage_stress(average_state_of_charge);

        // Extreme temperatures may push the rate beyond 100%:
        let daily_retention = (1.0 - daily_rate).clamp(0.0, 1.0);

        let effective_days = age.0.max(0.0).powf(Self::TIME_EXPONENT);
        (1.0 - daily_retention.powf(effective_days)).clamp(0.0, Self::MAX_CALENDAR_LOSS)
    }

    /// Arrhenius acceleration relative to the reference temperature.
    fn temperature_acceleration(&self, temperature: Kelvin) -> f64 {
        if temperature.0 > 0.0 {
            (Self::ACTIVATION_ENERGY / Self::GAS_CONSTANT
                * (1.0 / self.parameters.reference_temperature.0 - 1.0 / temperature.0))
                .exp()
        } else {
            1.0
        }
    }

    /// Storing far from the half charge accelerates aging.
    fn storage_stress(&self, average_state_of_charge: StateOfCharge) -> f64 {
        let soc = average_state_of_charge.0.max(0.0).min(1.0);
        if soc > self.parameters.high_stress_state_of_charge.0 {
            1.5
        } else if soc < self.parameters.low_stress_state_of_charge.0 {
            1.3
        } else {
            1.0 + 2.0 * (soc - 0.5).abs()
        }
    }

    /// Capacity loss due to cycling, `0..=0.3`.
    #[must_use]
    pub fn cycle_loss(
        &self,
        cycles_completed: f64,
        average_depth_of_discharge: f64,
        average_temperature: Kelvin,
    ) -> f64 {
        let depth_of_discharge = average_depth_of_discharge.max(0.0).min(1.0);

        // Shallow cycles count less than full ones:
        let effective_cycles = cycles_completed.max(0.0) * depth_of_discharge.sqrt();

        let loss_rate = (effective_cycles / self.parameters.cycle_life).powf(Self::CYCLE_EXPONENT);
        let loss = loss_rate
            * Self::depth_of_discharge_stress(depth_of_discharge)
            * self.cycling_temperature_factor(average_temperature)
            * Self::CYCLE_LIFE_LOSS;
        loss.clamp(0.0, Self::MAX_CYCLE_LOSS)
    }

    fn depth_of_discharge_stress(depth_of_discharge: f64) -> f64 {
        if depth_of_discharge > 0.8 {
            2.0
        } else if depth_of_discharge > 0.5 {
            1.5
        } else {
            0.7 + 0.6 * depth_of_discharge
        }
    }

    fn cycling_temperature_factor(&self, temperature: Kelvin) -> f64 {
        if temperature > self.parameters.high_stress_temperature {
            2.0
        } else if temperature < self.parameters.low_stress_temperature {
            1.5
        } else {
            1.0
        }
    }

    /// Estimate the retention after a year of charging with the specified strategy.
    pub fn charging_impact(&self, strategy: ChargingStrategy) -> ChargingImpact {
        let history = UsageHistory {
            age: Days(365.0),
            cycles_completed: 250.0,
            average_state_of_charge: StateOfCharge(0.7),
            average_temperature: ChargingStrategy::AMBIENT_TEMPERATURE
                + strategy.temperature_rise(),
            average_depth_of_discharge: 0.7,
        };
        let base_retention = self.capacity_retention(&history);
        let retention =
            Retention::new(base_retention.get() * (1.0 - 0.05 * strategy.extra_stress()));
        ChargingImpact {
            strategy,
            retention,
            relative_wear: (1.0 - retention.get()) / ChargingImpact::BASELINE_LOSS,
        }
    }
}
