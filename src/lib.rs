//! VCube hierarchical distributed diagnosis simulator.
//!
//! A discrete-event simulation of the VCube diagnosis algorithm in the
//! presence of false-negative test results: a hypercube-organized set of
//! processes periodically test a subset of their peers, gossip diagnosis
//! state, and a correct process that is wrongly suspected terminates
//! itself.

pub mod cis;
pub mod config;
pub mod diagnosis;
pub mod event;
pub mod process;
pub mod result;
pub mod rng;
pub mod simulation;

pub use config::{ConfigError, SimulationConfig};
pub use diagnosis::TestOutcome;
pub use event::VirtualTime;
pub use process::{Process, ProcessTable};
pub use result::{LoggedEvent, LoggedEventKind, SimulationResult};
pub use simulation::Simulation;
