#[macro_use]
mod macros;

pub mod charge;
pub mod current;
pub mod power;
pub mod ratio;
pub mod temperature;
pub mod time;
pub mod voltage;
