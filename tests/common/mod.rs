//! Common test utilities for orders-dl integration tests

#[allow(dead_code)]
pub mod fixtures;

pub use fixtures::*;
