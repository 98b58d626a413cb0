//! Position Executor Domain Layer
//!
//! Pure data contract for a single triple-barrier position executor.
//! Zero I/O: value objects, barrier configuration, executor configuration
//! and the lifecycle status reported by external executors.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod barrier;
pub mod config;
pub mod status;
pub mod value_objects;

// Re-export commonly used types
pub use barrier::{BarrierLevels, TrailingStop, TripleBarrierConf};
pub use config::{
    ExecutorConfig, ExecutorId, ExecutorKind, PositionExecutorConfig,
    PositionExecutorConfigBuilder,
};
pub use status::{CloseType, PositionExecutorStatus};
pub use value_objects::{
    DomainError, Leverage, OrderType, Price, Quantity, TradeSide, TradingPair, VolatilityFactor,
};
