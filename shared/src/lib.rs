//! Shared types for the checkout readiness system
//!
//! Contains the value types that flow between the page layer and the
//! readiness controller, the shared error type, and logging setup used by
//! every binary in the workspace.

pub mod types;
pub mod errors;
pub mod logging;

pub use types::*;
pub use errors::*;
