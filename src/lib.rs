//! landgrab engine library.
//!
//! Exposes the board model, the turn policy, the forward simulator, the
//! opening search and the protocol layer for use by integration tests,
//! benchmarks and the binary entry point.

pub mod board;
pub mod config;
pub mod diag;
pub mod engine;
pub mod policy;
pub mod protocol;
pub mod search;
pub mod sim;
