//! Position Executor Boundary
//!
//! Everything between a validated configuration and a running executor.
//!
//! # Architecture
//!
//! ```text
//! ExecutorConfig → ExecutorRegistry → ExecutorFactory → PositionExecutor
//!                                                            │
//!                                  LifecycleTracker ─────────┘
//!                                         │
//!                                  StatusReporter
//! ```
//!
//! # Components
//!
//! - **Ports**: Traits an execution engine implements (`PositionExecutor`)
//!   and consumes (`StatusReporter`)
//! - **Registry**: Dispatches a configuration to the factory of its kind
//! - **Lifecycle**: Guards status transitions and reports accepted ones
//! - **Stub**: Exchange-free implementations for tests and dry runs
//!
//! # Example
//!
//! ```rust
//! use pexec_domain::{PositionExecutorConfig, Price, TradeSide, CloseType};
//! use pexec_exec::{ExecutorRegistry, StubExecutorFactory};
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//!
//! let mut registry = ExecutorRegistry::new();
//! registry.register(Arc::new(StubExecutorFactory::new())).unwrap();
//!
//! let config = PositionExecutorConfig::builder("BTC-USDT", "binance", TradeSide::Buy, dec!(0.5))
//!     .build()
//!     .unwrap();
//! let mut executor = registry.dispatch(config.into()).unwrap();
//!
//! executor.on_entry_filled(Price::new(dec!(95000)).unwrap()).unwrap();
//! executor.close(CloseType::TakeProfit).unwrap();
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod registry;
pub mod stub;

// Re-exports for convenience
pub use error::{ExecError, ExecResult};
pub use lifecycle::LifecycleTracker;
pub use ports::{PositionExecutor, StatusReporter, StatusUpdate};
pub use registry::{ExecutorFactory, ExecutorRegistry};
pub use stub::{MemoryReporter, StubExecutorFactory, StubPositionExecutor};
