//! `demandcast` library crate.
//!
//! The binary (`dcast`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - stages are reusable from other tooling (schedulers, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod impact;
pub mod io;
pub mod metrics;
pub mod model;
pub mod report;
pub mod train;
