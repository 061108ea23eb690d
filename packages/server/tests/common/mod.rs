// Shared helpers for integration tests; each test binary uses a subset
#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
