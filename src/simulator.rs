use bon::bon;
use chrono::TimeDelta;

use crate::{
    capacity::EffectiveCapacityModel,
    power::{PowerModel, Scene},
    prelude::*,
    quantity::{charge::MilliampHours, ratio::StateOfCharge, temperature::Kelvin, time::Hours},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    Running,

    /// The battery is drained.
    Empty,

    /// The horizon is reached.
    Complete,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub state_of_charge: StateOfCharge,
    pub elapsed: TimeDelta,
    pub status: Status,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub elapsed: TimeDelta,
    pub state_of_charge: StateOfCharge,
}

/// Time-stepped battery discharge under a constant scene and ambient temperature.
///
/// Yields the initial sample first and then one sample per step, until the battery is drained
/// or the horizon is reached.
pub struct DischargeSimulator<P> {
    power_model: P,
    capacity_model: EffectiveCapacityModel,
    scene: Scene,
    temperature: Kelvin,
    step: TimeDelta,
    max_samples: usize,
    n_samples: usize,
    state: SimulationState,
}

#[bon]
impl<P: PowerModel> DischargeSimulator<P> {
    #[builder]
    pub fn new(
        power_model: P,
        capacity_model: EffectiveCapacityModel,
        scene: Scene,
        #[builder(default = Kelvin::REFERENCE)] temperature: Kelvin,
        #[builder(default = StateOfCharge::FULL)] initial_state_of_charge: StateOfCharge,
        step: TimeDelta,
        horizon: TimeDelta,
    ) -> Result<Self> {
        ensure!(step > TimeDelta::zero(), "the time step must be positive: {step}");
        ensure!(horizon >= TimeDelta::zero(), "the horizon must not be negative: {horizon}");
        ensure!(
            initial_state_of_charge.is_valid(),
            "initial state of charge must be within 0..=1: {initial_state_of_charge}",
        );
        ensure!(temperature.is_finite(), "invalid ambient temperature: {temperature}");
        let max_samples = Self::sample_count(step, horizon)?;
        Ok(Self {
            power_model,
            capacity_model,
            scene,
            temperature,
            step,
            max_samples,
            n_samples: 0,
            state: SimulationState {
                state_of_charge: initial_state_of_charge,
                elapsed: TimeDelta::zero(),
                status: Status::Running,
            },
        })
    }
}

impl<P: PowerModel> DischargeSimulator<P> {
    /// Upper bound on the number of steps, the trajectory is kept in memory.
    const MAX_STEPS: f64 = 10_000_000.0;

    /// Number of samples in a complete run including the initial one.
    #[expect(clippy::cast_possible_truncation)]
    #[expect(clippy::cast_sign_loss)]
    fn sample_count(step: TimeDelta, horizon: TimeDelta) -> Result<usize> {
        let n_steps = (horizon.as_seconds_f64() / step.as_seconds_f64()).floor();
        ensure!(
            (0.0..=Self::MAX_STEPS).contains(&n_steps),
            "too many steps ({n_steps}) for the horizon {horizon} and step {step}",
        );
        (n_steps as usize).checked_add(1).context("the number of samples overflows")
    }

    /// Run the simulation to the end.
    #[instrument(skip_all, fields(scene = %self.scene, temperature = %self.temperature))]
    pub fn simulate(mut self) -> Trajectory {
        let samples = self.by_ref().collect();
        let trajectory = Trajectory { step: self.step, samples, status: self.state.status };
        debug!(
            status = ?trajectory.status,
            n_samples = trajectory.samples.len(),
            final_state_of_charge = ?trajectory.final_state_of_charge(),
            "done",
        );
        trajectory
    }

    fn advance(&mut self) {
        let state_of_charge = self.state.state_of_charge;
        let power = self.power_model.power(self.scene, state_of_charge);
        let voltage = self.capacity_model.voltage_curve.voltage(state_of_charge);
        let current = power / voltage;
        let capacity = self.capacity_model.effective_capacity(state_of_charge, self.temperature);
        let drawn = current * Hours::from(self.step);

        let next = if capacity > MilliampHours::ZERO {
            state_of_charge.0 - drawn / capacity
        } else {
            // Too cold to deliver anything:
            0.0
        };
        self.state.state_of_charge =
            if next.is_nan() { StateOfCharge::EMPTY } else { StateOfCharge(next).clamped() };
        self.state.elapsed += self.step;

        trace!(
            elapsed = %self.state.elapsed,
            %power,
            %voltage,
            %current,
            %capacity,
            state_of_charge = ?self.state.state_of_charge,
            "step",
        );
    }
}

impl<P: PowerModel> Iterator for DischargeSimulator<P> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.status != Status::Running {
            return None;
        }
        if self.n_samples != 0 {
            self.advance();
        }
        self.n_samples += 1;
        if self.state.state_of_charge <= StateOfCharge::EMPTY {
            self.state.status = Status::Empty;
        } else if self.n_samples >= self.max_samples {
            self.state.status = Status::Complete;
        }
        Some(Sample { elapsed: self.state.elapsed, state_of_charge: self.state.state_of_charge })
    }
}

/// Recorded discharge, chronological.
#[must_use]
#[derive(Clone, Debug)]
pub struct Trajectory {
    pub step: TimeDelta,
    pub samples: Vec<Sample>,
    pub status: Status,
}

impl Trajectory {
    /// Practically empty, the phone shuts down around this level.
    pub const DEFAULT_EMPTY_THRESHOLD: StateOfCharge = StateOfCharge(0.01);

    /// Time until the state of charge first drops to the threshold.
    ///
    /// # Returns
    ///
    /// [`None`] if the threshold is never reached within the trajectory.
    pub fn time_to(&self, threshold: StateOfCharge) -> Option<TimeDelta> {
        self.samples
            .iter()
            .find(|sample| sample.state_of_charge <= threshold)
            .map(|sample| sample.elapsed)
    }

    pub fn time_to_empty(&self) -> Option<TimeDelta> {
        self.time_to(Self::DEFAULT_EMPTY_THRESHOLD)
    }

    pub fn final_state_of_charge(&self) -> Option<StateOfCharge> {
        self.samples.last().map(|sample| sample.state_of_charge)
    }

    pub fn duration(&self) -> TimeDelta {
        self.samples.last().map_or_else(TimeDelta::zero, |sample| sample.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use std::ops::RangeInclusive;

    use itertools::Itertools;

    use super::*;
    use crate::{
        power::tests::flagship_parameters,
        quantity::{power::Watts, ratio::Retention},
        voltage::VoltageCurve,
    };

    const FIVE_MINUTES: TimeDelta = TimeDelta::minutes(5);

    fn capacity_model() -> EffectiveCapacityModel {
        EffectiveCapacityModel {
            nominal: MilliampHours(3200.0),
            retention: Retention::FULL,
            voltage_curve: VoltageCurve::LIPO,
        }
    }

    fn simulate(scene: Scene, temperature: Kelvin, horizon: TimeDelta) -> Result<Trajectory> {
        Ok(DischargeSimulator::builder()
            .power_model(flagship_parameters())
            .capacity_model(capacity_model())
            .scene(scene)
            .temperature(temperature)
            .step(FIVE_MINUTES)
            .horizon(horizon)
            .build()?
            .simulate())
    }

    fn assert_hours_within(time: Option<TimeDelta>, range: RangeInclusive<f64>) {
        let hours = Hours::from(time.unwrap()).0;
        assert!(range.contains(&hours), "{hours} h is not within {range:?}");
    }

    #[test]
    fn test_browsing_drains_in_half_a_day() -> Result {
        let trajectory = simulate(Scene::Browsing, Kelvin::REFERENCE, TimeDelta::hours(15))?;
        assert_eq!(trajectory.status, Status::Empty);
        assert_eq!(trajectory.final_state_of_charge(), Some(StateOfCharge::EMPTY));
        assert_eq!(trajectory.samples[0].state_of_charge, StateOfCharge::FULL);
        assert_hours_within(trajectory.time_to_empty(), 11.5..=12.5);
        Ok(())
    }

    #[test]
    fn test_gaming_drains_faster() -> Result {
        let gaming = simulate(Scene::Gaming, Kelvin::REFERENCE, TimeDelta::hours(15))?;
        let browsing = simulate(Scene::Browsing, Kelvin::REFERENCE, TimeDelta::hours(15))?;
        assert_hours_within(gaming.time_to_empty(), 2.75..=3.25);
        assert!(gaming.time_to_empty() < browsing.time_to_empty());
        Ok(())
    }

    #[test]
    fn test_cold_drains_faster() -> Result {
        let cold = simulate(Scene::Browsing, Kelvin::from_celsius(0.0), TimeDelta::hours(15))?;
        let warm = simulate(Scene::Browsing, Kelvin::REFERENCE, TimeDelta::hours(15))?;
        assert_hours_within(cold.time_to_empty(), 0.9..=1.25);
        assert!(cold.time_to_empty() < warm.time_to_empty());
        Ok(())
    }

    #[test]
    fn test_extreme_cold_drains_immediately() -> Result {
        let trajectory = simulate(Scene::Browsing, Kelvin(240.0), TimeDelta::hours(15))?;
        assert_eq!(trajectory.status, Status::Empty);
        assert_eq!(trajectory.samples.len(), 2);
        assert_eq!(trajectory.time_to_empty(), Some(FIVE_MINUTES));
        Ok(())
    }

    #[test]
    fn test_complete_sample_count() -> Result {
        let trajectory = simulate(Scene::Browsing, Kelvin::REFERENCE, TimeDelta::hours(2))?;
        assert_eq!(trajectory.status, Status::Complete);
        assert_eq!(trajectory.samples.len(), 25);
        assert_eq!(trajectory.duration(), TimeDelta::hours(2));
        assert_eq!(trajectory.time_to_empty(), None);

        // Horizon not divisible by the step:
        let trajectory = simulate(Scene::Browsing, Kelvin::REFERENCE, TimeDelta::minutes(12))?;
        assert_eq!(trajectory.samples.len(), 3);
        Ok(())
    }

    #[test]
    fn test_zero_horizon() -> Result {
        let trajectory = simulate(Scene::Video, Kelvin::REFERENCE, TimeDelta::zero())?;
        assert_eq!(trajectory.status, Status::Complete);
        assert_eq!(trajectory.samples.len(), 1);
        Ok(())
    }

    #[test]
    fn test_monotonic_and_bounded() -> Result {
        for scene in Scene::all() {
            let trajectory = simulate(scene, Kelvin::from_celsius(10.0), TimeDelta::hours(24))?;
            assert!(trajectory.samples.iter().all(|sample| sample.state_of_charge.is_valid()));
            for (previous, next) in trajectory.samples.iter().tuple_windows() {
                assert!(next.state_of_charge <= previous.state_of_charge);
                assert_eq!(next.elapsed - previous.elapsed, FIVE_MINUTES);
            }
        }
        Ok(())
    }

    #[test]
    fn test_charging_is_clamped() -> Result {
        let trajectory = DischargeSimulator::builder()
            .power_model(|_: Scene, _: StateOfCharge| Watts(-5.0))
            .capacity_model(capacity_model())
            .scene(Scene::Moderate)
            .initial_state_of_charge(StateOfCharge(0.99))
            .step(FIVE_MINUTES)
            .horizon(TimeDelta::hours(1))
            .build()?
            .simulate();
        assert_eq!(trajectory.status, Status::Complete);
        assert_eq!(trajectory.final_state_of_charge(), Some(StateOfCharge::FULL));
        Ok(())
    }

    #[test]
    fn test_early_stop() -> Result {
        let simulator = DischargeSimulator::builder()
            .power_model(flagship_parameters())
            .capacity_model(capacity_model())
            .scene(Scene::Gaming)
            .step(FIVE_MINUTES)
            .horizon(TimeDelta::hours(15))
            .build()?;
        let first_hour = simulator.take(13).collect_vec();
        assert_eq!(first_hour.len(), 13);
        assert_eq!(first_hour[12].elapsed, TimeDelta::hours(1));
        Ok(())
    }

    #[test]
    fn test_empty_initial_state() -> Result {
        let trajectory = DischargeSimulator::builder()
            .power_model(flagship_parameters())
            .capacity_model(capacity_model())
            .scene(Scene::Gaming)
            .initial_state_of_charge(StateOfCharge::EMPTY)
            .step(FIVE_MINUTES)
            .horizon(TimeDelta::hours(1))
            .build()?
            .simulate();
        assert_eq!(trajectory.status, Status::Empty);
        assert_eq!(trajectory.samples.len(), 1);
        assert_eq!(trajectory.time_to_empty(), Some(TimeDelta::zero()));
        Ok(())
    }

    #[test]
    fn test_invalid_configuration() {
        let result = DischargeSimulator::builder()
            .power_model(flagship_parameters())
            .capacity_model(capacity_model())
            .scene(Scene::Gaming)
            .step(TimeDelta::zero())
            .horizon(TimeDelta::hours(1))
            .build();
        assert!(result.is_err());

        let result = DischargeSimulator::builder()
            .power_model(flagship_parameters())
            .capacity_model(capacity_model())
            .scene(Scene::Gaming)
            .initial_state_of_charge(StateOfCharge(1.5))
            .step(FIVE_MINUTES)
            .horizon(TimeDelta::hours(1))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_too_many_steps() {
        let result = DischargeSimulator::builder()
            .power_model(flagship_parameters())
            .capacity_model(capacity_model())
            .scene(Scene::Browsing)
            .step(TimeDelta::nanoseconds(1))
            .horizon(TimeDelta::MAX)
            .build();
        assert!(result.is_err());

        let result = DischargeSimulator::builder()
            .power_model(flagship_parameters())
            .capacity_model(capacity_model())
            .scene(Scene::Browsing)
            .step(TimeDelta::nanoseconds(1))
            .horizon(TimeDelta::days(365_000))
            .build();
        assert!(result.is_err());
    }
}
