/// Scripted host and session harness.
pub mod harness;

pub use harness::{Harness, ScriptedHost, init_tracing};
