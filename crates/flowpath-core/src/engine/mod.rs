//! Orquestación de runs sobre un `Workflow`.

mod core;
mod run;

pub use self::core::Orchestrator;
pub use run::{AbandonCallback, Caller, CompletionCallback, RunHandle, RunOutcome, RunState, Transition};
