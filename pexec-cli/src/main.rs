//! Position Executor CLI
//!
//! Rescales an executor config to the current volatility and dispatches it.
//!
//! # Usage
//!
//! ```bash
//! PEXEC_CONFIG_PATH=btc.json PEXEC_VOLATILITY_FACTOR=1.5 cargo run -p pexec-cli
//! ```
//!
//! # Environment Variables
//!
//! - `PEXEC_ENV`: Environment (test, development, production)
//! - `PEXEC_CONFIG_PATH`: Executor config JSON (required)
//! - `PEXEC_VOLATILITY_FACTOR`: Barrier scale factor (default: 1)
//! - `PEXEC_MAX_VOLATILITY_FACTOR`: Largest accepted factor (default: 10)
//! - `PEXEC_LOG_FORMAT`: Log format (text, json)

use pexec_cli::{runner, Config, LogFormat};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing (stderr, stdout carries the report)
    let filter = EnvFilter::from_default_env().add_directive("pexec=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).init(),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        factor = %config.volatility.factor.as_decimal(),
        "Position Executor CLI"
    );

    let report = runner::run_from_config(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
