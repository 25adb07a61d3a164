//! Integration test crate for Tackline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives tackline-timeline through its public editor API and checks the
//! results against tackline-core types.

#[cfg(test)]
mod editing;

#[cfg(test)]
mod properties;
