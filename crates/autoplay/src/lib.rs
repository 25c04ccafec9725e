//! Seeded headless runs: a greedy policy driving rounds across antes, with a
//! serializable trace of every step.

mod action;
mod config;
mod error;
mod policy;
mod simulator;
mod trace;

pub use action::*;
pub use config::*;
pub use error::*;
pub use policy::*;
pub use simulator::*;
pub use trace::*;
