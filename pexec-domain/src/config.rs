//! Executor Configuration
//!
//! The input contract handed to an external executor. Every configuration
//! is validated when it is built, whether through
//! [`PositionExecutorConfig::builder`] or through deserialization, so an
//! invalid instance cannot exist.
//!
//! # Wire format
//!
//! Executor configs travel inside the [`ExecutorConfig`] envelope, tagged by
//! executor kind:
//!
//! ```json
//! {
//!   "type": "position_executor",
//!   "trading_pair": "BTC-USDT",
//!   "exchange": "binance_perpetual",
//!   "side": "BUY",
//!   "entry_price": null,
//!   "amount": "0.5",
//!   "leverage": 10,
//!   "triple_barrier_conf": { "stop_loss": "0.02", "take_profit": "0.04" },
//!   "level_id": null
//! }
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::barrier::{BarrierLevels, TripleBarrierConf};
use crate::value_objects::{
    DomainError, Leverage, Price, Quantity, TradeSide, TradingPair, VolatilityFactor,
};

/// Unique identifier for an executor instance
pub type ExecutorId = Uuid;

// =============================================================================
// Executor Kind
// =============================================================================

/// Closed set of executor implementations
///
/// Used as the registry key for dispatching a configuration to the
/// executor that understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// Single position guarded by a triple barrier
    PositionExecutor,
}

impl ExecutorKind {
    /// Stable string tag of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutorKind::PositionExecutor => "position_executor",
        }
    }
}

impl fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Executor Config Envelope
// =============================================================================

/// Any executor configuration, tagged with its kind under `"type"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutorConfig {
    /// Configuration for a position executor
    PositionExecutor(PositionExecutorConfig),
}

impl ExecutorConfig {
    /// Kind used to select the executor implementation
    pub fn kind(&self) -> ExecutorKind {
        match self {
            ExecutorConfig::PositionExecutor(_) => ExecutorKind::PositionExecutor,
        }
    }

    /// Identifier of the executor this config describes
    pub fn id(&self) -> ExecutorId {
        match self {
            ExecutorConfig::PositionExecutor(config) => config.id(),
        }
    }
}

impl From<PositionExecutorConfig> for ExecutorConfig {
    fn from(config: PositionExecutorConfig) -> Self {
        ExecutorConfig::PositionExecutor(config)
    }
}

// =============================================================================
// PositionExecutorConfig
// =============================================================================

/// Full configuration of one position executor
///
/// # Invariants
/// - `amount` > 0
/// - `leverage` >= 1
/// - `exchange` non-empty, `trading_pair` well formed
/// - `entry_price` > 0 when set (absent = enter at best available price)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PositionExecutorConfigFields")]
pub struct PositionExecutorConfig {
    id: ExecutorId,
    timestamp: DateTime<Utc>,
    trading_pair: TradingPair,
    exchange: String,
    side: TradeSide,
    entry_price: Option<Price>,
    amount: Quantity,
    leverage: Leverage,
    triple_barrier_conf: TripleBarrierConf,
    level_id: Option<String>,
}

impl PositionExecutorConfig {
    /// Discriminator for this configuration type
    pub const KIND: ExecutorKind = ExecutorKind::PositionExecutor;

    /// Start building a configuration from its required fields
    ///
    /// # Examples
    /// ```
    /// # use pexec_domain::config::PositionExecutorConfig;
    /// # use pexec_domain::value_objects::TradeSide;
    /// # use rust_decimal_macros::dec;
    /// let config = PositionExecutorConfig::builder("BTC-USDT", "binance", TradeSide::Buy, dec!(1))
    ///     .leverage(5)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.kind().as_str(), "position_executor");
    /// assert_eq!(config.leverage().value(), 5);
    ///
    /// let zero = PositionExecutorConfig::builder("BTC-USDT", "binance", TradeSide::Buy, dec!(0)).build();
    /// assert!(zero.is_err());
    /// ```
    pub fn builder(
        trading_pair: impl Into<String>,
        exchange: impl Into<String>,
        side: TradeSide,
        amount: Decimal,
    ) -> PositionExecutorConfigBuilder {
        PositionExecutorConfigBuilder {
            id: None,
            timestamp: None,
            trading_pair: trading_pair.into(),
            exchange: exchange.into(),
            side,
            entry_price: None,
            amount,
            leverage: Leverage::ONE.value(),
            triple_barrier_conf: TripleBarrierConf::default(),
            level_id: None,
        }
    }

    /// Discriminator used for executor dispatch
    pub fn kind(&self) -> ExecutorKind {
        Self::KIND
    }

    /// Executor identifier
    pub fn id(&self) -> ExecutorId {
        self.id
    }

    /// When the configuration was created
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Market traded by the executor
    pub fn trading_pair(&self) -> &TradingPair {
        &self.trading_pair
    }

    /// Exchange connector name
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Entry side
    pub fn side(&self) -> TradeSide {
        self.side
    }

    /// Limit entry price, `None` for entering at the best available price
    pub fn entry_price(&self) -> Option<Price> {
        self.entry_price
    }

    /// Position size in base asset
    pub fn amount(&self) -> Quantity {
        self.amount
    }

    /// Leverage multiplier
    pub fn leverage(&self) -> Leverage {
        self.leverage
    }

    /// Exit barriers guarding the position
    pub fn triple_barrier_conf(&self) -> &TripleBarrierConf {
        &self.triple_barrier_conf
    }

    /// Strategy-level correlation key (e.g. a grid level)
    pub fn level_id(&self) -> Option<&str> {
        self.level_id.as_deref()
    }

    /// Side of the order that closes this position
    pub fn close_side(&self) -> TradeSide {
        self.side.opposite()
    }

    /// Absolute barrier prices once the entry filled at `fill_price`
    pub fn barrier_levels(&self, fill_price: Price) -> BarrierLevels {
        BarrierLevels::from_conf(&self.triple_barrier_conf, self.side, fill_price)
    }

    /// Fresh configuration carrying a different barrier set
    ///
    /// The result is a new executor configuration: it gets its own id and
    /// creation time, everything else is copied.
    pub fn with_triple_barrier_conf(&self, triple_barrier_conf: TripleBarrierConf) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            triple_barrier_conf,
            ..self.clone()
        }
    }

    /// Fresh configuration whose barriers are rescaled by `factor`
    ///
    /// # Errors
    /// Returns `DomainError::InvalidBarrier` if a scaled threshold is no
    /// longer a valid barrier (overflow, or rounded to zero)
    pub fn with_adjusted_volatility(&self, factor: VolatilityFactor) -> Result<Self, DomainError> {
        let conf = self.triple_barrier_conf.with_adjusted_volatility(factor)?;
        Ok(self.with_triple_barrier_conf(conf))
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects raw fields; [`PositionExecutorConfigBuilder::build`] validates them
#[derive(Debug, Clone)]
pub struct PositionExecutorConfigBuilder {
    id: Option<ExecutorId>,
    timestamp: Option<DateTime<Utc>>,
    trading_pair: String,
    exchange: String,
    side: TradeSide,
    entry_price: Option<Decimal>,
    amount: Decimal,
    leverage: u32,
    triple_barrier_conf: TripleBarrierConf,
    level_id: Option<String>,
}

impl PositionExecutorConfigBuilder {
    /// Use an explicit executor id instead of a generated one
    pub fn id(mut self, id: ExecutorId) -> Self {
        self.id = Some(id);
        self
    }

    /// Use an explicit creation time instead of now
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Enter with a limit order at this price
    pub fn entry_price(mut self, price: Decimal) -> Self {
        self.entry_price = Some(price);
        self
    }

    /// Leverage multiplier (default 1)
    pub fn leverage(mut self, leverage: u32) -> Self {
        self.leverage = leverage;
        self
    }

    /// Exit barriers (default: all disabled)
    pub fn triple_barrier_conf(mut self, conf: TripleBarrierConf) -> Self {
        self.triple_barrier_conf = conf;
        self
    }

    /// Strategy-level correlation key
    pub fn level_id(mut self, level_id: impl Into<String>) -> Self {
        self.level_id = Some(level_id.into());
        self
    }

    /// Validate all fields and produce the configuration
    ///
    /// # Errors
    /// - `DomainError::InvalidTradingPair` for a malformed pair
    /// - `DomainError::InvalidExchange` for an empty exchange name
    /// - `DomainError::InvalidQuantity` if amount <= 0
    /// - `DomainError::InvalidLeverage` if leverage < 1
    /// - `DomainError::InvalidPrice` if a set entry price is <= 0
    pub fn build(self) -> Result<PositionExecutorConfig, DomainError> {
        let trading_pair = TradingPair::parse(&self.trading_pair)?;

        let exchange = self.exchange.trim().to_string();
        if exchange.is_empty() {
            return Err(DomainError::InvalidExchange("Exchange must be non-empty".to_string()));
        }

        let amount = Quantity::new(self.amount)?;
        let leverage = Leverage::new(self.leverage)?;
        let entry_price = self.entry_price.map(Price::new).transpose()?;

        Ok(PositionExecutorConfig {
            id: self.id.unwrap_or_else(Uuid::now_v7),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            trading_pair,
            exchange,
            side: self.side,
            entry_price,
            amount,
            leverage,
            triple_barrier_conf: self.triple_barrier_conf,
            level_id: self.level_id,
        })
    }
}

// Deserialization goes through the builder so serde enforces the same rules.
#[derive(Deserialize)]
struct PositionExecutorConfigFields {
    #[serde(default)]
    id: Option<ExecutorId>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    trading_pair: String,
    exchange: String,
    side: TradeSide,
    #[serde(default)]
    entry_price: Option<Decimal>,
    amount: Decimal,
    #[serde(default = "default_leverage")]
    leverage: u32,
    #[serde(default)]
    triple_barrier_conf: TripleBarrierConf,
    #[serde(default)]
    level_id: Option<String>,
}

fn default_leverage() -> u32 {
    Leverage::ONE.value()
}

impl TryFrom<PositionExecutorConfigFields> for PositionExecutorConfig {
    type Error = DomainError;

    fn try_from(fields: PositionExecutorConfigFields) -> Result<Self, Self::Error> {
        let mut builder = PositionExecutorConfig::builder(
            fields.trading_pair,
            fields.exchange,
            fields.side,
            fields.amount,
        )
        .leverage(fields.leverage)
        .triple_barrier_conf(fields.triple_barrier_conf);

        if let Some(id) = fields.id {
            builder = builder.id(id);
        }
        if let Some(timestamp) = fields.timestamp {
            builder = builder.timestamp(timestamp);
        }
        if let Some(price) = fields.entry_price {
            builder = builder.entry_price(price);
        }
        if let Some(level_id) = fields.level_id {
            builder = builder.level_id(level_id);
        }

        builder.build()
    }
}

// =============================================================================
// Tests
// =============================================================================
