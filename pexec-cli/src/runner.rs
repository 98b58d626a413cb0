//! Single-shot run: load an executor config, rescale it, dispatch it.

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use pexec_domain::{
    BarrierLevels, ExecutorConfig, ExecutorKind, PositionExecutorStatus, TradeSide,
    VolatilityFactor,
};
use pexec_exec::{ExecutorRegistry, MemoryReporter, StatusUpdate, StubExecutorFactory};

use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Outcome of one run, printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Factor the barriers were rescaled by
    pub volatility_factor: VolatilityFactor,
    /// Configuration as loaded
    pub original: ExecutorConfig,
    /// Configuration after rescaling (what was dispatched)
    pub adjusted: ExecutorConfig,
    /// Side of the orders that close the position
    pub close_side: TradeSide,
    /// Barrier prices at the configured entry price, if one is set
    pub barrier_levels: Option<BarrierLevels>,
    /// Executor kinds available for dispatch
    pub registered_kinds: Vec<ExecutorKind>,
    /// Status of the dispatched executor
    pub status: PositionExecutorStatus,
    /// Transitions reported so far
    pub updates: Vec<StatusUpdate>,
}

/// Parse an executor config from JSON.
pub fn parse_executor_config(raw: &str) -> CliResult<ExecutorConfig> {
    Ok(serde_json::from_str(raw)?)
}

/// Read and parse the executor config at `path`.
pub fn load_executor_config(path: &Path) -> CliResult<ExecutorConfig> {
    let raw = fs::read_to_string(path)?;
    parse_executor_config(&raw)
}

/// Registry with every executor this binary can run.
pub fn default_registry(reporter: Arc<MemoryReporter>) -> CliResult<ExecutorRegistry> {
    let mut registry = ExecutorRegistry::new();
    registry.register(Arc::new(StubExecutorFactory::with_reporter(reporter)))?;
    Ok(registry)
}

/// Rescale `executor_config` by the configured factor and dispatch it.
///
/// Fails with `CliError::Domain` if a rescaled barrier is out of range.
pub fn run(config: &Config, executor_config: ExecutorConfig) -> CliResult<RunReport> {
    let factor = config.volatility.factor;
    let ExecutorConfig::PositionExecutor(position) = &executor_config;
    let adjusted = position.with_adjusted_volatility(factor)?;
    let close_side = adjusted.close_side();
    let barrier_levels = adjusted.entry_price().map(|entry| adjusted.barrier_levels(entry));

    info!(
        original_id = %position.id(),
        adjusted_id = %adjusted.id(),
        trading_pair = %adjusted.trading_pair(),
        factor = %factor.as_decimal(),
        "Barriers rescaled"
    );

    let reporter = Arc::new(MemoryReporter::new());
    let registry = default_registry(reporter.clone())?;
    let adjusted = ExecutorConfig::from(adjusted);
    let executor = registry.dispatch(adjusted.clone())?;

    Ok(RunReport {
        volatility_factor: factor,
        original: executor_config,
        adjusted,
        close_side,
        barrier_levels,
        registered_kinds: registry.kinds(),
        status: executor.status(),
        updates: reporter.updates(),
    })
}

/// Load the configured executor config file and run it.
pub fn run_from_config(config: &Config) -> CliResult<RunReport> {
    let path = config
        .executor_config_path
        .as_deref()
        .ok_or_else(|| CliError::Config("PEXEC_CONFIG_PATH is required".to_string()))?;

    info!(path = %path.display(), "Loading executor config");
    let executor_config = load_executor_config(path)?;
    run(config, executor_config)
}

// =============================================================================
// Tests
// =============================================================================
