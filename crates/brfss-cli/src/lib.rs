//! Library side of the `brfss` command: configuration, logging and the
//! year orchestrator.

pub mod config;
pub mod inspect;
pub mod logging;
pub mod pipeline;
pub mod types;
