//! Reaction loop and its debounce policy.

mod policy;
mod reaction;

pub use policy::{next_display, Observation, DEFAULT_THRESHOLD};
pub use reaction::{CycleOutcome, ReactionConfig, ReactionController, RunSummary, DEFAULT_INTERVAL};
