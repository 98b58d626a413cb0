//! Position Executor Lifecycle
//!
//! ```text
//! NotStarted ──entry filled──▶ ActivePosition ──barrier hit / close──▶ Completed
//!      │                                                                  ▲
//!      └──────────────── entry cancelled or expired ──────────────────────┘
//! ```
//!
//! `Completed` is terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::DomainError;

// =============================================================================
// PositionExecutorStatus
// =============================================================================

/// Lifecycle state reported by a position executor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionExecutorStatus {
    /// No order placed yet
    #[default]
    NotStarted,
    /// Position open and monitored against its barriers
    ActivePosition,
    /// Position closed (or entry abandoned)
    Completed,
}

impl PositionExecutorStatus {
    /// Get the name of the state for display
    pub fn name(&self) -> &'static str {
        match self {
            PositionExecutorStatus::NotStarted => "NOT_STARTED",
            PositionExecutorStatus::ActivePosition => "ACTIVE_POSITION",
            PositionExecutorStatus::Completed => "COMPLETED",
        }
    }

    /// Stable numeric code used by external status feeds
    pub fn code(&self) -> u8 {
        match self {
            PositionExecutorStatus::NotStarted => 1,
            PositionExecutorStatus::ActivePosition => 2,
            PositionExecutorStatus::Completed => 3,
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, PositionExecutorStatus::Completed)
    }

    /// Check if `next` is a permitted forward edge from this state
    pub fn can_transition_to(&self, next: PositionExecutorStatus) -> bool {
        use PositionExecutorStatus::*;
        matches!(
            (*self, next),
            (NotStarted, ActivePosition) | (ActivePosition, Completed) | (NotStarted, Completed)
        )
    }

    /// Validate and perform a transition
    ///
    /// # Examples
    /// ```
    /// # use pexec_domain::status::PositionExecutorStatus;
    /// let status = PositionExecutorStatus::NotStarted;
    /// let status = status.transition_to(PositionExecutorStatus::ActivePosition).unwrap();
    /// let status = status.transition_to(PositionExecutorStatus::Completed).unwrap();
    /// assert!(status.transition_to(PositionExecutorStatus::ActivePosition).is_err());
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidStateTransition` if the edge is not permitted
    pub fn transition_to(self, next: PositionExecutorStatus) -> Result<Self, DomainError> {
        if !self.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition(format!("{} -> {}", self, next)));
        }
        Ok(next)
    }
}

impl fmt::Display for PositionExecutorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// CloseType
// =============================================================================

/// Why an executor reached `Completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloseType {
    /// Time barrier elapsed
    TimeLimit,
    /// Stop loss barrier hit
    StopLoss,
    /// Take profit barrier hit
    TakeProfit,
    /// Trailing stop hit after activation
    TrailingStop,
    /// Entry order never filled before the time limit
    Expired,
    /// Closed on request before any barrier fired
    EarlyStop,
    /// Not enough balance to place the entry
    InsufficientBalance,
    /// Unrecoverable execution failure
    Failed,
}

impl CloseType {
    /// Whether this close reason implies a position was actually held
    pub fn requires_open_position(&self) -> bool {
        matches!(
            self,
            CloseType::TimeLimit | CloseType::StopLoss | CloseType::TakeProfit | CloseType::TrailingStop
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
