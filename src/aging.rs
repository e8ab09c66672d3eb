//! Empirical capacity fade: calendar aging, cycle aging and usage stress.

mod charging;
mod history;
mod model;
mod pattern;

pub use self::{
    charging::{ChargingImpact, ChargingStrategy},
    history::UsageHistory,
    model::{AgingModel, Degradation},
    pattern::UsagePattern,
};
