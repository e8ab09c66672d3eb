#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod aging;
pub mod capacity;
pub mod chemistry;
pub mod device;
pub mod power;
pub mod prelude;
pub mod quantity;
pub mod simulator;
pub mod voltage;
