//! # env-schema
//!
//! Startup-time validation of process configuration.
//!
//! Reads a raw environment snapshot, coerces numeric and boolean inputs,
//! applies defaults, and either returns a fully typed [`config::Config`] or a
//! [`error::ValidationFailure`] listing every violated rule.

pub mod config;
pub mod env;
pub mod error;
pub mod telemetry;

pub use config::Config;
pub use env::RawEnv;
pub use error::{Error, FieldError, Result, ValidationFailure, Violation};
