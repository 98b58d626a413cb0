//! Executor registry.
//!
//! Maps each [`ExecutorKind`] to the factory that builds executors of that
//! kind. A configuration is dispatched by its `type` tag, so adding a new
//! executor type means adding an `ExecutorConfig` variant and registering a
//! factory for it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use pexec_domain::{ExecutorConfig, ExecutorKind};

use crate::error::{ExecError, ExecResult};
use crate::ports::PositionExecutor;

/// Builds executors for one [`ExecutorKind`].
pub trait ExecutorFactory: Send + Sync {
    /// Kind of configuration this factory accepts.
    fn kind(&self) -> ExecutorKind;

    /// Build an executor from `config`.
    ///
    /// # Errors
    ///
    /// `ExecError::UnknownExecutor` if `config` is of another kind.
    fn create(&self, config: ExecutorConfig) -> ExecResult<Box<dyn PositionExecutor>>;
}

/// Registry of executor factories keyed by kind.
#[derive(Default)]
pub struct ExecutorRegistry {
    factories: HashMap<ExecutorKind, Arc<dyn ExecutorFactory>>,
}

impl ExecutorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its own kind.
    ///
    /// # Errors
    ///
    /// `ExecError::DuplicateExecutor` if the kind is already taken.
    pub fn register(&mut self, factory: Arc<dyn ExecutorFactory>) -> ExecResult<()> {
        let kind = factory.kind();
        if self.factories.contains_key(&kind) {
            return Err(ExecError::DuplicateExecutor(kind));
        }

        debug!(%kind, "Executor factory registered");
        self.factories.insert(kind, factory);
        Ok(())
    }

    /// Whether a factory exists for `kind`.
    pub fn is_registered(&self, kind: ExecutorKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Registered kinds, sorted by name.
    pub fn kinds(&self) -> Vec<ExecutorKind> {
        let mut kinds: Vec<_> = self.factories.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    /// Build an executor for `config` using the factory of its kind.
    pub fn dispatch(&self, config: ExecutorConfig) -> ExecResult<Box<dyn PositionExecutor>> {
        let kind = config.kind();
        let factory = self
            .factories
            .get(&kind)
            .ok_or(ExecError::UnknownExecutor(kind))?;

        let executor_id = config.id();
        let executor = factory.create(config)?;

        info!(%kind, %executor_id, "Executor created");
        Ok(executor)
    }
}

impl fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorRegistry").field("kinds", &self.kinds()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubExecutorFactory;
    use pexec_domain::{PositionExecutorConfig, PositionExecutorStatus, TradeSide};
    use rust_decimal_macros::dec;

    fn config() -> ExecutorConfig {
        PositionExecutorConfig::builder("ETH-USDT", "binance_perpetual", TradeSide::Sell, dec!(2))
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn test_empty_registry_rejects_dispatch() {
        let registry = ExecutorRegistry::new();
        let err = registry.dispatch(config()).err().unwrap();

        assert!(matches!(err, ExecError::UnknownExecutor(ExecutorKind::PositionExecutor)));
        assert!(registry.kinds().is_empty());
    }

    #[test]
    fn test_register_and_dispatch() {
        let mut registry = ExecutorRegistry::new();
        registry.register(Arc::new(StubExecutorFactory::new())).unwrap();

        assert!(registry.is_registered(ExecutorKind::PositionExecutor));
        assert_eq!(registry.kinds(), vec![ExecutorKind::PositionExecutor]);

        let config = config();
        let id = config.id();
        let executor = registry.dispatch(config).unwrap();

        assert_eq!(executor.id(), id);
        assert_eq!(executor.status(), PositionExecutorStatus::NotStarted);
        assert_eq!(executor.config().side(), TradeSide::Sell);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ExecutorRegistry::new();
        registry.register(Arc::new(StubExecutorFactory::new())).unwrap();

        let err = registry.register(Arc::new(StubExecutorFactory::new())).unwrap_err();
        assert!(matches!(err, ExecError::DuplicateExecutor(ExecutorKind::PositionExecutor)));
        assert_eq!(registry.kinds().len(), 1);
    }
}
