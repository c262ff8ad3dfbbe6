//! Job records and their per-record state machine.

pub mod transition;
mod types;

pub use transition::TransitionError;
pub use types::*;
