//! CLI configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{CliError, CliResult};
use pexec_domain::VolatilityFactor;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Configuration
// =============================================================================

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the executor config JSON
    pub executor_config_path: Option<PathBuf>,

    /// Volatility adjustment applied before dispatch
    pub volatility: VolatilityConfig,

    /// Log output format
    pub log_format: LogFormat,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// Volatility adjustment configuration.
#[derive(Debug, Clone)]
pub struct VolatilityConfig {
    /// Factor applied to every price-denominated barrier
    pub factor: VolatilityFactor,
    /// Largest factor accepted
    pub max_factor: Decimal,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per event
    Json,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> CliResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `from_env` uses the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Self::load_environment(&lookup)?;
        let volatility = Self::load_volatility_config(&lookup)?;
        let log_format = Self::load_log_format(&lookup)?;
        let executor_config_path = lookup("PEXEC_CONFIG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            executor_config_path,
            volatility,
            log_format,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            executor_config_path: None,
            volatility: VolatilityConfig {
                factor: VolatilityFactor::ONE,
                max_factor: Decimal::new(10, 0),
            },
            log_format: LogFormat::Text,
            environment: Environment::Test,
        }
    }

    fn load_environment<F>(lookup: &F) -> CliResult<Environment>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_str = lookup("PEXEC_ENV").unwrap_or_else(|| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(CliError::Config(format!(
                "Invalid PEXEC_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_log_format<F>(lookup: &F) -> CliResult<LogFormat>
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = lookup("PEXEC_LOG_FORMAT").unwrap_or_else(|| "text".to_string());

        match format.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(CliError::Config(format!(
                "Invalid PEXEC_LOG_FORMAT: {}. Expected: text, json",
                other
            ))),
        }
    }

    fn load_volatility_config<F>(lookup: &F) -> CliResult<VolatilityConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_factor = Self::load_decimal(lookup, "PEXEC_VOLATILITY_FACTOR", Decimal::ONE)?;
        let max_factor =
            Self::load_decimal(lookup, "PEXEC_MAX_VOLATILITY_FACTOR", Decimal::new(10, 0))?;

        if max_factor <= Decimal::ZERO {
            return Err(CliError::Config(format!(
                "PEXEC_MAX_VOLATILITY_FACTOR must be positive, got {}",
                max_factor
            )));
        }

        let factor = VolatilityFactor::new(raw_factor)
            .map_err(|e| CliError::Config(format!("Invalid PEXEC_VOLATILITY_FACTOR: {}", e)))?;

        if factor.as_decimal() > max_factor {
            return Err(CliError::Config(format!(
                "PEXEC_VOLATILITY_FACTOR {} exceeds maximum {}",
                raw_factor, max_factor
            )));
        }

        Ok(VolatilityConfig { factor, max_factor })
    }

    fn load_decimal<F>(lookup: &F, key: &str, default: Decimal) -> CliResult<Decimal>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(key) {
            Some(val) => Decimal::from_str(val.trim())
                .map_err(|_| CliError::Config(format!("Invalid {} value: {}", key, val))),
            None => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            ..Self::test()
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
