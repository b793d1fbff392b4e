//! Crate-level tests that exercise several modules together.
//!
//! Per-module unit tests live next to the code in `#[cfg(test)]` blocks.

mod mocks;
mod property;
mod unit;
