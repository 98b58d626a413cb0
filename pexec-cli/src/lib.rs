//! Position Executor CLI Library
//!
//! Loads an executor configuration, applies a volatility factor and
//! dispatches it through the executor registry.
//!
//! # Architecture
//!
//! ```text
//! Env (.env) → Config → executor config JSON → rescale → Registry → Executor
//!                                                                      │
//!                                                               MemoryReporter
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pexec_cli::{runner, Config};
//!
//! let config = Config::from_env()?;
//! let report = runner::run_from_config(&config)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod runner;

pub use config::{Config, Environment, LogFormat, VolatilityConfig};
pub use error::{CliError, CliResult};
pub use runner::{run, run_from_config, RunReport};
