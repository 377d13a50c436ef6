//! Turn State: the per-request working set threaded through workflow nodes.

pub mod state;

pub use state::{NextStep, ReactState, TurnState};
