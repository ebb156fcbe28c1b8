//! Shared infrastructure for the gate tools.
//!
//! Nothing here holds state between runs: errors, configuration, logging,
//! directory walking and report output helpers.

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod time;
pub mod walk;
