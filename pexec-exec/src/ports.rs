//! Executor boundary port definitions.
//!
//! Ports define the interfaces an external execution engine implements
//! (the executor itself) and consumes (status reporting).
//! Adapters implement these ports for specific engines (stub, live, etc.).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pexec_domain::{
    CloseType, ExecutorId, PositionExecutorConfig, PositionExecutorStatus, Price,
};

use crate::error::ExecResult;

// =============================================================================
// Position Executor Port
// =============================================================================

/// Port for an executor driving one position through its lifecycle.
///
/// Implementations:
/// - `StubPositionExecutor` - For testing (no exchange, transitions on demand)
pub trait PositionExecutor: Send + Sync {
    /// Executor identifier (same as its configuration id).
    fn id(&self) -> ExecutorId;

    /// Configuration the executor was created from.
    fn config(&self) -> &PositionExecutorConfig;

    /// Current lifecycle status.
    fn status(&self) -> PositionExecutorStatus;

    /// Why the executor completed, once it has.
    fn close_type(&self) -> Option<CloseType>;

    /// Entry order filled at `fill_price`; the position becomes active.
    ///
    /// # Errors
    ///
    /// Rejected unless the executor has not started yet.
    fn on_entry_filled(&mut self, fill_price: Price) -> ExecResult<()>;

    /// Close the position (or abandon the entry) for `close_type`.
    ///
    /// # Errors
    ///
    /// Rejected once the executor is completed.
    fn close(&mut self, close_type: CloseType) -> ExecResult<()>;
}

// =============================================================================
// Status Reporting Port
// =============================================================================

/// Port receiving every accepted status transition.
///
/// Implementations:
/// - `MemoryReporter` - Records updates in memory
pub trait StatusReporter: Send + Sync {
    /// Called once per accepted transition, after the status changed.
    fn report(&self, update: &StatusUpdate);
}

/// Status transition notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Executor that transitioned
    pub executor_id: ExecutorId,
    /// Strategy-level correlation key of the executor, if any
    pub level_id: Option<String>,
    /// Status before the transition
    pub previous: PositionExecutorStatus,
    /// Status after the transition
    pub current: PositionExecutorStatus,
    /// Close reason (set when `current` is `COMPLETED`)
    pub close_type: Option<CloseType>,
    /// When the transition happened
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_update_serialization() {
        let update = StatusUpdate {
            executor_id: Uuid::now_v7(),
            level_id: Some("L1".to_string()),
            previous: PositionExecutorStatus::ActivePosition,
            current: PositionExecutorStatus::Completed,
            close_type: Some(CloseType::StopLoss),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["previous"], "ACTIVE_POSITION");
        assert_eq!(json["current"], "COMPLETED");
        assert_eq!(json["close_type"], "STOP_LOSS");

        let parsed: StatusUpdate = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, update);
    }
}
