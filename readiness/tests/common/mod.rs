//! Common test utilities and infrastructure
//!
//! Shared fixtures, fakes and builders used across the readiness test
//! suites.
#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
#[allow(unused_imports)]
pub use fixtures::TestFixtures;
#[allow(unused_imports)]
pub use helpers::{ControllerBuilder, RecordingControl, TestHelpers};
