//! Stub implementations for testing.
//!
//! These implementations drive the executor lifecycle on demand without an
//! exchange: fills, closes and clock ticks are injected by the caller.

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use pexec_domain::{
    BarrierLevels, CloseType, ExecutorConfig, ExecutorId, ExecutorKind, PositionExecutorConfig,
    PositionExecutorStatus, Price,
};

use crate::error::{ExecError, ExecResult};
use crate::lifecycle::LifecycleTracker;
use crate::ports::{PositionExecutor, StatusReporter, StatusUpdate};
use crate::registry::ExecutorFactory;

// =============================================================================
// Stub Position Executor
// =============================================================================

/// Position executor that never talks to an exchange.
///
/// Entry fills and closes are reported by the caller; the only barrier it
/// evaluates itself is the time limit, against clock ticks passed to
/// [`StubPositionExecutor::check_time_limit`].
#[derive(Debug)]
pub struct StubPositionExecutor {
    config: PositionExecutorConfig,
    tracker: LifecycleTracker,
    fill_price: Option<Price>,
    levels: Option<BarrierLevels>,
}

impl StubPositionExecutor {
    /// Create an executor in `NOT_STARTED`.
    pub fn new(config: PositionExecutorConfig) -> Self {
        let tracker = LifecycleTracker::new(&config);
        Self { config, tracker, fill_price: None, levels: None }
    }

    /// Create an executor reporting its transitions to `reporter`.
    pub fn with_reporter(config: PositionExecutorConfig, reporter: Arc<dyn StatusReporter>) -> Self {
        let tracker = LifecycleTracker::new(&config).with_reporter(reporter);
        Self { config, tracker, fill_price: None, levels: None }
    }

    /// Entry fill price, once filled.
    pub fn fill_price(&self) -> Option<Price> {
        self.fill_price
    }

    /// Absolute barrier prices, once filled.
    pub fn barrier_levels(&self) -> Option<&BarrierLevels> {
        self.levels.as_ref()
    }

    /// Cancel the entry order before it fills (`EARLY_STOP`).
    pub fn cancel_entry(&mut self) -> ExecResult<()> {
        if self.tracker.status() != PositionExecutorStatus::NotStarted {
            return Err(ExecError::InvalidState(format!(
                "entry can only be cancelled before it fills, executor is {}",
                self.tracker.status()
            )));
        }
        self.tracker.complete(CloseType::EarlyStop)
    }

    /// Evaluate the time barrier, measured from the configuration timestamp.
    ///
    /// An unfilled entry expires (`EXPIRED`); an open position closes on
    /// `TIME_LIMIT`.
    pub fn check_time_limit(&mut self, now: DateTime<Utc>) -> ExecResult<Option<CloseType>> {
        let conf = self.config.triple_barrier_conf();
        if !conf.is_time_limit_reached(self.config.timestamp(), now) {
            return Ok(None);
        }

        let close_type = match self.tracker.status() {
            PositionExecutorStatus::NotStarted => CloseType::Expired,
            PositionExecutorStatus::ActivePosition => CloseType::TimeLimit,
            PositionExecutorStatus::Completed => return Ok(None),
        };
        self.tracker.complete(close_type)?;
        Ok(Some(close_type))
    }
}

impl PositionExecutor for StubPositionExecutor {
    fn id(&self) -> ExecutorId {
        self.config.id()
    }

    fn config(&self) -> &PositionExecutorConfig {
        &self.config
    }

    fn status(&self) -> PositionExecutorStatus {
        self.tracker.status()
    }

    fn close_type(&self) -> Option<CloseType> {
        self.tracker.close_type()
    }

    fn on_entry_filled(&mut self, fill_price: Price) -> ExecResult<()> {
        self.tracker.activate()?;
        self.fill_price = Some(fill_price);
        self.levels = Some(self.config.barrier_levels(fill_price));
        Ok(())
    }

    fn close(&mut self, close_type: CloseType) -> ExecResult<()> {
        self.tracker.complete(close_type)
    }
}

// =============================================================================
// Stub Executor Factory
// =============================================================================

/// Factory building [`StubPositionExecutor`]s for position executor configs.
#[derive(Default)]
pub struct StubExecutorFactory {
    reporter: Option<Arc<dyn StatusReporter>>,
}

impl StubExecutorFactory {
    /// Factory whose executors do not report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose executors report to `reporter`.
    pub fn with_reporter(reporter: Arc<dyn StatusReporter>) -> Self {
        Self { reporter: Some(reporter) }
    }
}

impl ExecutorFactory for StubExecutorFactory {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::PositionExecutor
    }

    fn create(&self, config: ExecutorConfig) -> ExecResult<Box<dyn PositionExecutor>> {
        let ExecutorConfig::PositionExecutor(config) = config;
        let executor = match &self.reporter {
            Some(reporter) => StubPositionExecutor::with_reporter(config, Arc::clone(reporter)),
            None => StubPositionExecutor::new(config),
        };
        Ok(Box::new(executor))
    }
}

// =============================================================================
// Memory Reporter
// =============================================================================

/// Status reporter that keeps every update in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    updates: RwLock<Vec<StatusUpdate>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all updates, oldest first.
    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Updates for one executor, oldest first.
    pub fn updates_for(&self, executor_id: ExecutorId) -> Vec<StatusUpdate> {
        self.updates
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|u| u.executor_id == executor_id)
            .cloned()
            .collect()
    }

    /// Most recent update, if any.
    pub fn last(&self) -> Option<StatusUpdate> {
        self.updates.read().unwrap_or_else(|e| e.into_inner()).last().cloned()
    }
}

impl StatusReporter for MemoryReporter {
    fn report(&self, update: &StatusUpdate) {
        self.updates.write().unwrap_or_else(|e| e.into_inner()).push(update.clone());
    }
}

// =============================================================================
// Tests
// =============================================================================
