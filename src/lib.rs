//! gitship: ship local git work as commits, pushes and pull requests.
//!
//! The workflow is a pure state machine (`domain::workflow`) driven by an
//! effect executor (`services::executor`) that owns every side effect.

pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{ShipOptions, ship};
pub use domain::AppError;
