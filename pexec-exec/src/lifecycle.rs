//! Lifecycle tracker: the status transition guard for one executor.
//!
//! Every status change an executor reports goes through
//! [`LifecycleTracker`], which enforces the permitted edges
//!
//! ```text
//! NOT_STARTED → ACTIVE_POSITION → COMPLETED
//! NOT_STARTED → COMPLETED            (entry abandoned)
//! ```
//!
//! and forwards accepted transitions to an optional [`StatusReporter`].

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use pexec_domain::{CloseType, ExecutorId, PositionExecutorConfig, PositionExecutorStatus};

use crate::error::{ExecError, ExecResult};
use crate::ports::{StatusReporter, StatusUpdate};

/// Tracks and guards the lifecycle status of one executor.
pub struct LifecycleTracker {
    executor_id: ExecutorId,
    level_id: Option<String>,
    status: PositionExecutorStatus,
    close_type: Option<CloseType>,
    activated_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    reporter: Option<Arc<dyn StatusReporter>>,
}

impl LifecycleTracker {
    /// Create a tracker in `NOT_STARTED` for the given configuration.
    pub fn new(config: &PositionExecutorConfig) -> Self {
        Self {
            executor_id: config.id(),
            level_id: config.level_id().map(str::to_string),
            status: PositionExecutorStatus::NotStarted,
            close_type: None,
            activated_at: None,
            closed_at: None,
            reporter: None,
        }
    }

    /// Report accepted transitions to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Current status.
    pub fn status(&self) -> PositionExecutorStatus {
        self.status
    }

    /// Close reason, set once completed.
    pub fn close_type(&self) -> Option<CloseType> {
        self.close_type
    }

    /// When the position became active.
    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    /// When the executor completed.
    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Entry filled: `NOT_STARTED → ACTIVE_POSITION`.
    pub fn activate(&mut self) -> ExecResult<()> {
        let now = self.transition(PositionExecutorStatus::ActivePosition, None)?;
        self.activated_at = Some(now);
        Ok(())
    }

    /// Close: `ACTIVE_POSITION → COMPLETED` or `NOT_STARTED → COMPLETED`.
    ///
    /// Barrier close types (stop loss, take profit, time limit, trailing
    /// stop) need an open position and are rejected before activation.
    pub fn complete(&mut self, close_type: CloseType) -> ExecResult<()> {
        if self.status == PositionExecutorStatus::NotStarted && close_type.requires_open_position() {
            warn!(
                executor_id = %self.executor_id,
                ?close_type,
                "Barrier close requested before entry filled"
            );
            return Err(ExecError::InvalidState(format!(
                "{:?} requires an active position, executor is {}",
                close_type, self.status
            )));
        }

        let now = self.transition(PositionExecutorStatus::Completed, Some(close_type))?;
        self.close_type = Some(close_type);
        self.closed_at = Some(now);
        Ok(())
    }

    fn transition(
        &mut self,
        next: PositionExecutorStatus,
        close_type: Option<CloseType>,
    ) -> ExecResult<DateTime<Utc>> {
        let previous = self.status;

        self.status = previous.transition_to(next).map_err(|e| {
            warn!(
                executor_id = %self.executor_id,
                from = %previous,
                to = %next,
                "Status transition rejected"
            );
            ExecError::from(e)
        })?;

        let now = Utc::now();
        info!(
            executor_id = %self.executor_id,
            level_id = ?self.level_id,
            from = %previous,
            to = %next,
            ?close_type,
            "Executor status changed"
        );

        if let Some(reporter) = &self.reporter {
            reporter.report(&StatusUpdate {
                executor_id: self.executor_id,
                level_id: self.level_id.clone(),
                previous,
                current: next,
                close_type,
                timestamp: now,
            });
        }

        Ok(now)
    }
}

impl fmt::Debug for LifecycleTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleTracker")
            .field("executor_id", &self.executor_id)
            .field("status", &self.status)
            .field("close_type", &self.close_type)
            .field("has_reporter", &self.reporter.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::MemoryReporter;
    use pexec_domain::TradeSide;
    use rust_decimal_macros::dec;

    fn config() -> PositionExecutorConfig {
        PositionExecutorConfig::builder("BTC-USDT", "binance", TradeSide::Buy, dec!(1))
            .level_id("L2")
            .build()
            .unwrap()
    }

    #[test]
    fn test_happy_path() {
        let mut tracker = LifecycleTracker::new(&config());
        assert_eq!(tracker.status(), PositionExecutorStatus::NotStarted);

        tracker.activate().unwrap();
        assert_eq!(tracker.status(), PositionExecutorStatus::ActivePosition);
        assert!(tracker.activated_at().is_some());

        tracker.complete(CloseType::TakeProfit).unwrap();
        assert_eq!(tracker.status(), PositionExecutorStatus::Completed);
        assert_eq!(tracker.close_type(), Some(CloseType::TakeProfit));
        assert!(tracker.closed_at().is_some());
    }

    #[test]
    fn test_completed_rejects_everything() {
        let mut tracker = LifecycleTracker::new(&config());
        tracker.activate().unwrap();
        tracker.complete(CloseType::StopLoss).unwrap();

        let err = tracker.activate().unwrap_err();
        assert!(err.is_rejected_transition());

        let err = tracker.complete(CloseType::EarlyStop).unwrap_err();
        assert!(err.is_rejected_transition());

        // First close reason is kept
        assert_eq!(tracker.close_type(), Some(CloseType::StopLoss));
    }

    #[test]
    fn test_double_activation_rejected() {
        let mut tracker = LifecycleTracker::new(&config());
        tracker.activate().unwrap();
        assert!(tracker.activate().unwrap_err().is_rejected_transition());
        assert_eq!(tracker.status(), PositionExecutorStatus::ActivePosition);
    }

    #[test]
    fn test_entry_cancelled_before_fill() {
        let mut tracker = LifecycleTracker::new(&config());
        tracker.complete(CloseType::Expired).unwrap();

        assert_eq!(tracker.status(), PositionExecutorStatus::Completed);
        assert_eq!(tracker.activated_at(), None);
    }

    #[test]
    fn test_barrier_close_before_fill_rejected() {
        let mut tracker = LifecycleTracker::new(&config());
        let err = tracker.complete(CloseType::StopLoss).unwrap_err();

        assert!(matches!(err, ExecError::InvalidState(_)));
        assert_eq!(tracker.status(), PositionExecutorStatus::NotStarted);
    }

    #[test]
    fn test_reporter_receives_accepted_transitions_only() {
        let reporter = Arc::new(MemoryReporter::new());
        let config = config();
        let mut tracker = LifecycleTracker::new(&config).with_reporter(reporter.clone());

        tracker.activate().unwrap();
        let _ = tracker.activate();
        tracker.complete(CloseType::TrailingStop).unwrap();

        let updates = reporter.updates();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].executor_id, config.id());
        assert_eq!(updates[0].level_id.as_deref(), Some("L2"));
        assert_eq!(updates[0].previous, PositionExecutorStatus::NotStarted);
        assert_eq!(updates[0].current, PositionExecutorStatus::ActivePosition);
        assert_eq!(updates[0].close_type, None);
        assert_eq!(updates[1].current, PositionExecutorStatus::Completed);
        assert_eq!(updates[1].close_type, Some(CloseType::TrailingStop));
    }
}
