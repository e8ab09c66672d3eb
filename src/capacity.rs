//! Usable capacity under the current conditions.

use crate::{
    quantity::{
        charge::MilliampHours,
        ratio::{Retention, StateOfCharge},
        temperature::Kelvin,
    },
    voltage::VoltageCurve,
};

#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct EffectiveCapacityModel {
    pub nominal: MilliampHours,
    pub retention: Retention,
    pub voltage_curve: VoltageCurve,
}

impl EffectiveCapacityModel {
    const COLD_MIDPOINT: Kelvin = Kelvin(278.15);

    const COLD_SLOPE: f64 = 4.0;

    const MIN_STATE_OF_CHARGE_FACTOR: f64 = 0.7;

    /// Used for an empty battery where the average voltage is undefined.
    const EMPTY_STATE_OF_CHARGE_FACTOR: f64 = 0.8;

    /// Temperature derating, `0..=1`.
    ///
    /// Cold cells deliver less, warm cells do not deliver more.
    #[must_use]
    pub fn temperature_factor(temperature: Kelvin) -> f64 {
        if temperature >= Kelvin::REFERENCE {
            return 1.0;
        }
        let parabola = 1.0 - 0.001 * (temperature - Kelvin::REFERENCE).0.powi(2);
        let sigmoid = 1.0 + (-(temperature - Self::COLD_MIDPOINT).0 / Self::COLD_SLOPE).exp();
        let factor = parabola / sigmoid;
        if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) }
    }

    /// Derating by the average discharge voltage relative to the nominal one, `0.7..=1`.
    #[must_use]
    pub fn state_of_charge_factor(&self, state_of_charge: StateOfCharge) -> f64 {
        self.voltage_curve.average_voltage(state_of_charge).map_or(
            Self::EMPTY_STATE_OF_CHARGE_FACTOR,
            |average| {
                (average.0 / self.voltage_curve.nominal.0)
                    .clamp(Self::MIN_STATE_OF_CHARGE_FACTOR, 1.0)
            },
        )
    }

    pub fn effective_capacity(
        &self,
        state_of_charge: StateOfCharge,
        temperature: Kelvin,
    ) -> MilliampHours {
        self.nominal
            * Self::temperature_factor(temperature)
            * self.state_of_charge_factor(state_of_charge)
            * self.retention.get()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn model() -> EffectiveCapacityModel {
        EffectiveCapacityModel {
            nominal: MilliampHours(3200.0),
            retention: Retention::FULL,
            voltage_curve: VoltageCurve::LIPO,
        }
    }

    #[test]
    fn test_temperature_factor() {
        assert_abs_diff_eq!(EffectiveCapacityModel::temperature_factor(Kelvin::REFERENCE), 1.0);
        assert_abs_diff_eq!(EffectiveCapacityModel::temperature_factor(Kelvin(320.0)), 1.0);

        // 15 °C:
        let factor = EffectiveCapacityModel::temperature_factor(Kelvin(288.15));
        assert_abs_diff_eq!(factor, 0.9 / (1.0 + (-2.5_f64).exp()), epsilon = 1e-12);
    }

    #[test]
    fn test_temperature_factor_extreme_cold() {
        for temperature in [Kelvin(250.0), Kelvin(200.0), Kelvin::ZERO, Kelvin(f64::NAN)] {
            let factor = EffectiveCapacityModel::temperature_factor(temperature);
            assert!((0.0..=1.0).contains(&factor), "{temperature:?}: {factor}");
        }
        assert_abs_diff_eq!(EffectiveCapacityModel::temperature_factor(Kelvin(250.0)), 0.0);
    }

    #[test]
    fn test_state_of_charge_factor() {
        let model = model();
        assert_abs_diff_eq!(model.state_of_charge_factor(StateOfCharge::FULL), 1.0);
        assert_abs_diff_eq!(model.state_of_charge_factor(StateOfCharge::EMPTY), 0.8);

        // At 1% the average voltage is 3.025 V:
        assert_abs_diff_eq!(
            model.state_of_charge_factor(StateOfCharge(0.01)),
            3.025 / 3.7,
            epsilon = 1e-9,
        );
        assert_abs_diff_eq!(model.state_of_charge_factor(StateOfCharge(1e-6)), 3.0 / 3.7, epsilon = 1e-6);
    }

    #[test]
    fn test_state_of_charge_factor_bounds() {
        let model = model();
        for percent in 0..=100 {
            let factor = model.state_of_charge_factor(StateOfCharge::from_percent(f64::from(percent)));
            assert!((0.7..=1.0).contains(&factor), "{percent}%: {factor}");
        }
    }

    #[test]
    fn test_effective_capacity() {
        let mut model = model();
        assert_abs_diff_eq!(
            model.effective_capacity(StateOfCharge::FULL, Kelvin::REFERENCE).0,
            3200.0,
            epsilon = 1e-9,
        );
        model.retention = Retention::new(0.5);
        assert_abs_diff_eq!(
            model.effective_capacity(StateOfCharge::FULL, Kelvin::REFERENCE).0,
            1600.0,
            epsilon = 1e-9,
        );
        assert_abs_diff_eq!(model.effective_capacity(StateOfCharge::FULL, Kelvin(250.0)).0, 0.0);
    }
}
