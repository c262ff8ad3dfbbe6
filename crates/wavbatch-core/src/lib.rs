pub mod config;
pub mod logging;

pub mod control;
pub mod fetch;
pub mod job;
pub mod orchestrator;
pub mod snapshot;
pub mod store;
pub mod worklist;
