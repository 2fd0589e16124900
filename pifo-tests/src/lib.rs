//! PIFO Tests - property and simulation testing for the two-flow PIFO.
//!
//! Tests are organized by type:
//!
//! **Support Modules**:
//! - `properties`: Step-by-step property checker (`PropertyChecker`) and the
//!   violations it reports
//! - `scenarios`: Reusable configurations, request streams and seeds
//!
//! **Test Modules**:
//! - `pifo_tests`: Fixed scenarios, boundaries and custom sub-queues
//! - `simulation_tests`: Seeded random request streams checked after every step
//!
//! ## Naming Conventions
//!
//! - Simulation tests: `test_sim_<scenario>`
//! - Integration tests: `test_pifo_<scenario>`
//! - Unit tests: Inline in each crate under `#[cfg(test)]`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod properties;
pub mod scenarios;

#[cfg(test)]
mod simulation_tests;
