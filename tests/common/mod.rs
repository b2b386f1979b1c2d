//! Common test utilities for syllabus-dl integration tests

#[allow(dead_code)]
pub mod engine;
#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
pub use engine::*;
#[allow(unused_imports)]
pub use fixtures::*;
