//! Application layer: CLI, wiring and the run loop.

pub mod api;
pub mod cli;
pub mod logging;
mod run_loop;

pub use run_loop::drive;
