//! Fatal, configuration-time errors (spec.md §7).
//!
//! Everything here is fatal: the simulator refuses to start, or halts with
//! a diagnostic. A find-target routine returning "nothing to do this tick"
//! is a normal `None`, never one of these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    #[error("unsupported topology: core_num = {0} (expected 1 or 8)")]
    UnsupportedTopology(u32),

    #[error("internal invariant violation in {component} ({detail})")]
    InvariantViolation { component: &'static str, detail: String },
}

pub type SimResult<T> = Result<T, SimError>;
