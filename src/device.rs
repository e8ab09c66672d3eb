use std::{fmt::Debug, fs, path::Path};

use serde::Deserialize;

use crate::{
    aging::{AgingModel, UsageHistory, UsagePattern},
    capacity::EffectiveCapacityModel,
    chemistry::{Chemistry, ChemistryLookup},
    power::PowerParameters,
    prelude::*,
    quantity::{charge::MilliampHours, ratio::Retention},
};

/// Device described by a TOML profile.
#[must_use]
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceProfile {
    pub name: String,
    pub battery: Battery,
    pub power: PowerParameters,

    /// Without a history, the battery is considered new.
    #[serde(default)]
    pub history: Option<UsageHistory>,

    #[serde(default)]
    pub usage: UsagePattern,
}

#[must_use]
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Battery {
    #[serde(rename = "capacity_mah")]
    pub capacity: MilliampHours,

    /// Chemistry name, unknown ones fall back to the default chemistry.
    #[serde(default = "Battery::default_chemistry")]
    pub chemistry: String,
}

impl Battery {
    fn default_chemistry() -> String {
        Chemistry::DEFAULT.to_string()
    }
}

impl DeviceProfile {
    #[instrument(name = "Reading the device profile…")]
    pub fn read<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("invalid device profile `{}`", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let this: Self = toml::from_str(contents)?;
        ensure!(
            this.battery.capacity.is_finite() && this.battery.capacity > MilliampHours::ZERO,
            "battery capacity must be positive: {}",
            this.battery.capacity,
        );
        Ok(this)
    }

    pub fn chemistry(&self) -> ChemistryLookup {
        Chemistry::lookup(&self.battery.chemistry)
    }

    /// Current capacity retention, full for a new battery.
    pub fn retention(&self, aging_model: &AgingModel) -> Retention {
        self.history
            .as_ref()
            .map_or(Retention::FULL, |history| aging_model.capacity_retention(history))
    }

    pub fn capacity_model(&self, aging_model: &AgingModel) -> EffectiveCapacityModel {
        EffectiveCapacityModel {
            nominal: self.battery.capacity,
            retention: self.retention(aging_model),
            voltage_curve: aging_model.parameters().voltage_curve,
        }
    }
}
