mod cli;

use clap::{Parser, crate_version};
use drain::{
    aging::{AgingModel, ChargingStrategy},
    chemistry::Chemistry,
    device::DeviceProfile,
    power::Scene,
    prelude::*,
    quantity::{ratio::StateOfCharge, temperature::Kelvin, time::Hours},
    simulator::DischargeSimulator,
};
use enumset::EnumSet;

use crate::cli::{Args, Command, DeviceArgs, SimulateArgs};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Simulate(args) => simulate(&args),
        Command::Age(args) => age(&args),
        Command::Charging(args) => {
            charging(args.chemistry);
            Ok(())
        }
    }
}

fn simulate(args: &SimulateArgs) -> Result {
    let profile = DeviceProfile::read(&args.device.profile_path)?;
    let aging_model = AgingModel::new(profile.chemistry().chemistry());
    let capacity_model = profile.capacity_model(&aging_model);
    info!(
        device = %profile.name,
        chemistry = %aging_model.chemistry(),
        capacity = %capacity_model.nominal,
        retention = %capacity_model.retention,
        temperature = %args.temperature,
        "loaded the profile",
    );

    let (step, horizon) = (args.step()?, args.horizon()?);
    for scene in args.scene.map_or_else(Scene::all, EnumSet::only) {
        let trajectory = DischargeSimulator::builder()
            .power_model(profile.power)
            .capacity_model(capacity_model)
            .scene(scene)
            .temperature(args.temperature)
            .initial_state_of_charge(args.initial_state_of_charge())
            .step(step)
            .horizon(horizon)
            .build()?
            .simulate();
        let time_to_empty = trajectory.time_to(args.empty_threshold()).map_or_else(
            || "beyond the horizon".to_owned(),
            |time| format!("{:.2}", Hours::from(time)),
        );
        info!(
            %scene,
            power = %profile.power.scene_power(scene),
            %time_to_empty,
            final_state_of_charge = ?trajectory.final_state_of_charge(),
            status = ?trajectory.status,
            "simulated",
        );
    }
    Ok(())
}

fn age(args: &DeviceArgs) -> Result {
    let profile = DeviceProfile::read(&args.profile_path)?;
    let aging_model = AgingModel::new(profile.chemistry().chemistry());

    if let Some(history) = &profile.history {
        let degradation = aging_model.degradation(history);
        info!(
            device = %profile.name,
            age = %history.age,
            age_years = format!("{:.1}", history.age.years()),
            cycles = history.cycles_completed,
            calendar_loss = format!("{:.2}%", 100.0 * degradation.calendar_loss),
            cycle_loss = format!("{:.2}%", 100.0 * degradation.cycle_loss),
            "degradation",
        );
    } else {
        warn!(device = %profile.name, "no usage history, assuming a new battery");
    }

    let parameters = aging_model.parameters();
    info!(
        chemistry = %aging_model.chemistry(),
        cycle_life = parameters.cycle_life,
        calendar_life_years = parameters.calendar_life_years,
        q10 = parameters.q10,
        "chemistry",
    );

    let capacity_model = profile.capacity_model(&aging_model);
    let retention = capacity_model.retention;
    info!(
        %retention,
        effective_capacity =
            %capacity_model.effective_capacity(StateOfCharge::FULL, Kelvin::REFERENCE),
        stress_score = profile.usage.stress_score(),
        remaining_life = %profile.usage.remaining_life(retention),
        "aging",
    );
    Ok(())
}

fn charging(chemistry: Chemistry) {
    let aging_model = AgingModel::new(chemistry);
    for strategy in EnumSet::<ChargingStrategy>::all() {
        let impact = aging_model.charging_impact(strategy);
        info!(
            %chemistry,
            %strategy,
            charger_power = %strategy.charger_power(),
            c_rate = strategy.c_rate(),
            temperature_rise = %strategy.temperature_rise(),
            retention = %impact.retention,
            relative_wear = format!("{:.2}", impact.relative_wear),
            "one year",
        );
    }
}
