//! Device power draw per usage scene.

use std::{
    fmt::{Display, Formatter},
    ops::Index,
};

use bon::bon;
use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::{
    prelude::*,
    quantity::{power::Watts, ratio::StateOfCharge},
};

#[derive(Debug, Hash, clap::ValueEnum, enumset::EnumSetType)]
pub enum Scene {
    /// Web browsing and social apps.
    #[value(alias = "b")]
    Browsing,

    /// Video playback.
    #[value(alias = "v")]
    Video,

    /// Gaming.
    #[value(alias = "g")]
    Gaming,

    /// Moderate mixed usage.
    #[value(alias = "m")]
    Moderate,
}

impl Display for Scene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Browsing => write!(f, "Browsing"),
            Self::Video => write!(f, "Video"),
            Self::Gaming => write!(f, "Gaming"),
            Self::Moderate => write!(f, "Moderate"),
        }
    }
}

impl Scene {
    pub fn all() -> EnumSet<Self> {
        EnumSet::all()
    }
}

/// Per-scene values.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneMap<T> {
    pub browsing: T,
    pub video: T,
    pub gaming: T,
    pub moderate: T,
}

impl<T> Index<Scene> for SceneMap<T> {
    type Output = T;

    fn index(&self, scene: Scene) -> &Self::Output {
        match scene {
            Scene::Browsing => &self.browsing,
            Scene::Video => &self.video,
            Scene::Gaming => &self.gaming,
            Scene::Moderate => &self.moderate,
        }
    }
}

impl<T> SceneMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Scene, &T)> {
        Scene::all().into_iter().map(move |scene| (scene, &self[scene]))
    }
}

/// Full-load power of each component.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselinePower {
    pub screen: Watts,

    /// The chip works in a different power state in each scene.
    pub chip: SceneMap<Watts>,

    pub network: Watts,
    pub gps: Watts,
    pub background: Watts,
}

/// Fraction of each component's baseline power used in a scene.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadCoefficients {
    pub screen: f64,
    pub chip: f64,
    pub network: f64,
    pub gps: f64,
    pub background: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneProfile {
    pub load: LoadCoefficients,

    /// Extra leakage due to heating, relative to the total power.
    pub thermal_coupling: f64,
}

/// Source of the instantaneous power draw.
pub trait PowerModel {
    fn power(&self, scene: Scene, state_of_charge: StateOfCharge) -> Watts;
}

impl<F> PowerModel for F
where
    F: Fn(Scene, StateOfCharge) -> Watts,
{
    fn power(&self, scene: Scene, state_of_charge: StateOfCharge) -> Watts {
        self(scene, state_of_charge)
    }
}

/// Baseline component powers together with their per-scene load.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedPowerParameters")]
pub struct PowerParameters {
    baseline: BaselinePower,
    scenes: SceneMap<SceneProfile>,
}

#[derive(Deserialize)]
struct UncheckedPowerParameters {
    baseline: BaselinePower,
    scenes: SceneMap<SceneProfile>,
}

impl TryFrom<UncheckedPowerParameters> for PowerParameters {
    type Error = Error;

    fn try_from(unchecked: UncheckedPowerParameters) -> Result<Self> {
        Self::builder().baseline(unchecked.baseline).scenes(unchecked.scenes).build()
    }
}

#[bon]
impl PowerParameters {
    #[builder]
    pub fn new(baseline: BaselinePower, scenes: SceneMap<SceneProfile>) -> Result<Self> {
        let mut components = vec![
            ("screen", baseline.screen),
            ("network", baseline.network),
            ("gps", baseline.gps),
            ("background", baseline.background),
        ];
        components.extend(baseline.chip.iter().map(|(_, power)| ("chip", *power)));
        for (component, power) in components {
            ensure!(
                power.is_finite() && power >= Watts::ZERO,
                "invalid {component} baseline power: {power}",
            );
        }

        for (scene, profile) in scenes.iter() {
            let load = profile.load;
            for (component, coefficient) in [
                ("screen", load.screen),
                ("chip", load.chip),
                ("network", load.network),
                ("gps", load.gps),
                ("background", load.background),
            ] {
                ensure!(
                    coefficient.is_finite() && coefficient >= 0.0,
                    "invalid {component} load coefficient in {scene}: {coefficient}",
                );
            }
            ensure!(
                profile.thermal_coupling.is_finite() && profile.thermal_coupling >= 0.0,
                "invalid thermal coupling in {scene}: {}",
                profile.thermal_coupling,
            );
        }

        Ok(Self { baseline, scenes })
    }
}

impl PowerParameters {
    pub const fn baseline(&self) -> &BaselinePower {
        &self.baseline
    }

    pub const fn scenes(&self) -> &SceneMap<SceneProfile> {
        &self.scenes
    }

    /// Total power draw in the scene.
    pub fn scene_power(&self, scene: Scene) -> Watts {
        let profile = &self.scenes[scene];
        let load = profile.load;
        let components = self.baseline.screen * load.screen
            + self.baseline.chip[scene] * load.chip
            + self.baseline.network * load.network
            + self.baseline.gps * load.gps
            + self.baseline.background * load.background;
        components * (1.0 + profile.thermal_coupling)
    }
}

impl PowerModel for PowerParameters {
    /// The draw does not depend on the state of charge.
    fn power(&self, scene: Scene, _state_of_charge: StateOfCharge) -> Watts {
        self.scene_power(scene)
    }
}
