//! Pure exposure evaluation (no IO).
//!
//! Input: one resource's access-control state, constructed elsewhere.
//! Output: a verdict with ordered reasons, suppressed grants, and severity.

#![forbid(unsafe_code)]

pub mod actions;
pub mod model;

mod checks;
mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{evaluate, evaluate_at};
