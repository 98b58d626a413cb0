//! Value Objects for the position executor domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time, including
//! when they are produced by deserialization.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object and aggregate validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Price must be positive
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Quantity must be positive
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Leverage must be at least 1
    #[error("Invalid leverage: {0}")]
    InvalidLeverage(String),

    /// Trading pair must be BASE-QUOTE
    #[error("Invalid trading pair: {0}")]
    InvalidTradingPair(String),

    /// Exchange must be named
    #[error("Invalid exchange: {0}")]
    InvalidExchange(String),

    /// Barrier thresholds must be positive when present
    #[error("Invalid barrier: {0}")]
    InvalidBarrier(String),

    /// Volatility factor must be positive and finite
    #[error("Invalid volatility factor: {0}")]
    InvalidVolatilityFactor(String),

    /// Invalid state transition
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

// =============================================================================
// Price
// =============================================================================

/// Price represents a positive decimal price
///
/// # Invariants
/// - Must be > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPrice` if value <= 0
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidPrice(format!("Price must be positive, got {}", value)));
        }
        Ok(Self(value))
    }

    /// Get the underlying Decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// Quantity represents a positive decimal position size
///
/// # Invariants
/// - Must be > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    /// Create a new Quantity with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidQuantity` if value <= 0
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidQuantity(format!(
                "Quantity must be positive, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Get the underlying Decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Leverage
// =============================================================================

/// Leverage multiplier applied to a position
///
/// # Invariants
/// - Must be >= 1 (1 = unleveraged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct Leverage(u32);

impl Leverage {
    /// Unleveraged (1x)
    pub const ONE: Leverage = Leverage(1);

    /// Create a new Leverage with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidLeverage` if value < 1
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value < 1 {
            return Err(DomainError::InvalidLeverage(format!(
                "Leverage must be at least 1, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Get the multiplier
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for Leverage {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Leverage {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

// =============================================================================
// TradingPair
// =============================================================================

/// TradingPair identifies a market as `BASE-QUOTE` (e.g., BTC-USDT)
///
/// # Invariants
/// - Base and quote must be non-empty
/// - Serialized as the `BASE-QUOTE` string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradingPair {
    base: String,
    quote: String,
}

impl TradingPair {
    /// Separator between base and quote assets
    pub const SEPARATOR: char = '-';

    /// Parse a `BASE-QUOTE` trading pair
    ///
    /// # Examples
    /// ```
    /// # use pexec_domain::value_objects::TradingPair;
    /// let pair = TradingPair::parse("BTC-USDT").unwrap();
    /// assert_eq!(pair.base(), "BTC");
    /// assert_eq!(pair.quote(), "USDT");
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidTradingPair` if format is invalid
    pub fn parse(pair: &str) -> Result<Self, DomainError> {
        match pair.trim().split_once(Self::SEPARATOR) {
            Some((base, quote)) if !quote.contains(Self::SEPARATOR) => {
                Self::new(base.to_string(), quote.to_string())
            },
            _ => Err(DomainError::InvalidTradingPair(format!(
                "Cannot parse trading pair: {:?} (expected BASE-QUOTE)",
                pair
            ))),
        }
    }

    /// Create a TradingPair from explicit base and quote
    pub fn new(base: String, quote: String) -> Result<Self, DomainError> {
        if base.trim().is_empty() || quote.trim().is_empty() {
            return Err(DomainError::InvalidTradingPair(
                "Base and quote must be non-empty".to_string(),
            ));
        }
        Ok(Self { base, quote })
    }

    /// Get the base asset
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Get the quote asset
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Get the trading pair as string (e.g., "BTC-USDT")
    pub fn as_pair(&self) -> String {
        format!("{}{}{}", self.base, Self::SEPARATOR, self.quote)
    }
}

impl TryFrom<String> for TradingPair {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TradingPair> for String {
    fn from(pair: TradingPair) -> Self {
        pair.as_pair()
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_pair())
    }
}

// =============================================================================
// TradeSide
// =============================================================================

/// TradeSide represents the direction of the entry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    /// Buy to open (long)
    Buy,
    /// Sell to open (short)
    Sell,
}

impl TradeSide {
    /// Side of the order that closes a position opened with this side
    ///
    /// Buy → Sell, Sell → Buy
    pub fn opposite(&self) -> TradeSide {
        match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

// =============================================================================
// OrderType
// =============================================================================

/// Order types an executor may use for entry and for each exit barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order (immediate execution)
    Market,
    /// Limit order (price guaranteed)
    Limit,
    /// Post-only limit order (rejected if it would take liquidity)
    LimitMaker,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::LimitMaker => write!(f, "LIMIT_MAKER"),
        }
    }
}

// =============================================================================
// VolatilityFactor
// =============================================================================

/// Scale factor applied to price-denominated barrier thresholds
///
/// Typically the ratio of current to baseline market volatility.
///
/// # Invariants
/// - Must be > 0 (a zero factor collapses every barrier, a negative one
///   flips it to the wrong side of entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct VolatilityFactor(Decimal);

impl VolatilityFactor {
    /// Neutral factor (thresholds unchanged)
    pub const ONE: VolatilityFactor = VolatilityFactor(Decimal::ONE);

    /// Create a new VolatilityFactor with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidVolatilityFactor` if value <= 0
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidVolatilityFactor(format!(
                "Volatility factor must be positive, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Create a VolatilityFactor from a float ratio
    ///
    /// # Examples
    /// ```
    /// # use pexec_domain::value_objects::VolatilityFactor;
    /// # use rust_decimal_macros::dec;
    /// let factor = VolatilityFactor::from_f64(1.5).unwrap();
    /// assert_eq!(factor.as_decimal(), dec!(1.5));
    /// assert!(VolatilityFactor::from_f64(f64::NAN).is_err());
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidVolatilityFactor` if value is not finite,
    /// not representable as a Decimal, or <= 0
    pub fn from_f64(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::InvalidVolatilityFactor(format!(
                "Volatility factor must be finite, got {}",
                value
            )));
        }
        let decimal = Decimal::from_f64(value).ok_or_else(|| {
            DomainError::InvalidVolatilityFactor(format!(
                "Volatility factor {} is out of decimal range",
                value
            ))
        })?;
        Self::new(decimal)
    }

    /// Get the underlying Decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Scale a price-denominated quantity by this factor
    ///
    /// `None` if the product does not fit in a `Decimal`.
    pub fn scale(&self, value: Decimal) -> Option<Decimal> {
        value.checked_mul(self.0)
    }
}

impl Default for VolatilityFactor {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<Decimal> for VolatilityFactor {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for VolatilityFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
