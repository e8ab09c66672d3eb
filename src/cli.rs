use std::path::PathBuf;

use chrono::TimeDelta;
use clap::{Parser, Subcommand};
use drain::{
    chemistry::Chemistry,
    power::Scene,
    prelude::*,
    quantity::{ratio::StateOfCharge, temperature::Kelvin},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate the battery discharge of a device.
    #[clap(name = "simulate")]
    Simulate(Box<SimulateArgs>),

    /// Estimate the battery aging and remaining life of a device.
    #[clap(name = "age")]
    Age(DeviceArgs),

    /// Compare the impact of charging strategies on the battery wear.
    #[clap(name = "charging")]
    Charging(ChargingArgs),
}

#[derive(Parser)]
pub struct DeviceArgs {
    /// Device profile in TOML.
    #[clap(long = "device", env = "DEVICE_PROFILE")]
    pub profile_path: PathBuf,
}

#[derive(Parser)]
pub struct SimulateArgs {
    #[clap(flatten)]
    pub device: DeviceArgs,

    /// Simulate only this scene, all scenes by default.
    #[clap(long, env = "SCENE")]
    pub scene: Option<Scene>,

    #[clap(long, env = "HORIZON", default_value = "15h")]
    horizon: humantime::Duration,

    #[clap(long, env = "STEP", default_value = "5m")]
    step: humantime::Duration,

    #[clap(long = "initial-soc-percent", env = "INITIAL_SOC_PERCENT", default_value = "100")]
    initial_soc_percent: f64,

    /// Ambient temperature.
    #[clap(long = "temperature-kelvin", env = "TEMPERATURE_KELVIN", default_value = "298.15")]
    pub temperature: Kelvin,

    /// State of charge at which the phone is considered dead.
    #[clap(long = "empty-threshold-percent", env = "EMPTY_THRESHOLD_PERCENT", default_value = "1")]
    empty_threshold_percent: f64,
}

impl SimulateArgs {
    pub fn horizon(&self) -> Result<TimeDelta> {
        TimeDelta::from_std(self.horizon.into()).context("the horizon is too long")
    }

    pub fn step(&self) -> Result<TimeDelta> {
        TimeDelta::from_std(self.step.into()).context("the step is too long")
    }

    pub const fn initial_state_of_charge(&self) -> StateOfCharge {
        StateOfCharge::from_percent(self.initial_soc_percent)
    }

    pub const fn empty_threshold(&self) -> StateOfCharge {
        StateOfCharge::from_percent(self.empty_threshold_percent)
    }
}

#[derive(Parser)]
pub struct ChargingArgs {
    #[clap(long, env = "CHEMISTRY", default_value = "lipo")]
    pub chemistry: Chemistry,
}
