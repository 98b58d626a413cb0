//! Triple Barrier Risk Specification
//!
//! A position is bounded by up to three independent exits plus an optional
//! trailing stop:
//!
//! - **Stop loss**: fractional adverse move from entry
//! - **Take profit**: fractional favorable move from entry
//! - **Time limit**: seconds after which the position is force-closed
//! - **Trailing stop**: arms at `activation_price`, then trails the best
//!   observed price by `trailing_delta`
//!
//! Every barrier is optional. A disabled barrier is `None`, never zero.
//!
//! # Volatility Rescaling
//!
//! Price-denominated thresholds scale linearly with a [`VolatilityFactor`];
//! the time limit and the order-type policy do not:
//!
//! ```text
//! stop_loss'        = stop_loss        × factor
//! take_profit'      = take_profit      × factor
//! activation_price' = activation_price × factor
//! trailing_delta'   = trailing_delta   × factor
//! time_limit'       = time_limit
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::value_objects::{DomainError, OrderType, Price, TradeSide, VolatilityFactor};

// =============================================================================
// TrailingStop
// =============================================================================

/// Trailing stop parameters, both expressed as fractions of entry price
///
/// # Invariants
/// - `activation_price` > 0
/// - `trailing_delta` > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TrailingStopFields")]
pub struct TrailingStop {
    activation_price: Decimal,
    trailing_delta: Decimal,
}

#[derive(Deserialize)]
struct TrailingStopFields {
    activation_price: Decimal,
    trailing_delta: Decimal,
}

impl TryFrom<TrailingStopFields> for TrailingStop {
    type Error = DomainError;

    fn try_from(fields: TrailingStopFields) -> Result<Self, Self::Error> {
        Self::new(fields.activation_price, fields.trailing_delta)
    }
}

impl TrailingStop {
    /// Create a new TrailingStop with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidBarrier` if either value is <= 0
    pub fn new(activation_price: Decimal, trailing_delta: Decimal) -> Result<Self, DomainError> {
        ensure_positive("trailing_stop.activation_price", activation_price)?;
        ensure_positive("trailing_stop.trailing_delta", trailing_delta)?;
        Ok(Self { activation_price, trailing_delta })
    }

    /// Offset from entry at which trailing protection arms
    pub fn activation_price(&self) -> Decimal {
        self.activation_price
    }

    /// Distance kept behind the favorable extreme once armed
    pub fn trailing_delta(&self) -> Decimal {
        self.trailing_delta
    }

    /// Both fields multiplied by the factor
    ///
    /// # Errors
    /// Returns `DomainError::InvalidBarrier` if either product overflows or
    /// rounds to zero
    pub fn scaled(&self, factor: VolatilityFactor) -> Result<Self, DomainError> {
        Ok(Self {
            activation_price: scale_threshold(
                "trailing_stop.activation_price",
                self.activation_price,
                factor,
            )?,
            trailing_delta: scale_threshold("trailing_stop.trailing_delta", self.trailing_delta, factor)?,
        })
    }
}

// =============================================================================
// TripleBarrierConf
// =============================================================================

/// Triple barrier configuration for one position
///
/// Immutable once built. Adapting it (e.g. to volatility) yields a new
/// instance via [`TripleBarrierConf::with_adjusted_volatility`].
///
/// The default is the all-disabled configuration with LIMIT entry and
/// MARKET exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TripleBarrierFields")]
pub struct TripleBarrierConf {
    stop_loss: Option<Decimal>,
    take_profit: Option<Decimal>,
    time_limit: Option<u64>,
    trailing_stop: Option<TrailingStop>,
    open_order_type: OrderType,
    take_profit_order_type: OrderType,
    stop_loss_order_type: OrderType,
    time_limit_order_type: OrderType,
}

#[derive(Deserialize)]
struct TripleBarrierFields {
    #[serde(default)]
    stop_loss: Option<Decimal>,
    #[serde(default)]
    take_profit: Option<Decimal>,
    #[serde(default)]
    time_limit: Option<u64>,
    #[serde(default)]
    trailing_stop: Option<TrailingStop>,
    #[serde(default = "default_open_order_type")]
    open_order_type: OrderType,
    #[serde(default = "default_exit_order_type")]
    take_profit_order_type: OrderType,
    #[serde(default = "default_exit_order_type")]
    stop_loss_order_type: OrderType,
    #[serde(default = "default_exit_order_type")]
    time_limit_order_type: OrderType,
}

fn default_open_order_type() -> OrderType {
    OrderType::Limit
}

fn default_exit_order_type() -> OrderType {
    OrderType::Market
}

impl TryFrom<TripleBarrierFields> for TripleBarrierConf {
    type Error = DomainError;

    fn try_from(fields: TripleBarrierFields) -> Result<Self, Self::Error> {
        Ok(Self::new(fields.stop_loss, fields.take_profit, fields.time_limit, fields.trailing_stop)?
            .with_open_order_type(fields.open_order_type)
            .with_take_profit_order_type(fields.take_profit_order_type)
            .with_stop_loss_order_type(fields.stop_loss_order_type)
            .with_time_limit_order_type(fields.time_limit_order_type))
    }
}

impl Default for TripleBarrierConf {
    fn default() -> Self {
        Self {
            stop_loss: None,
            take_profit: None,
            time_limit: None,
            trailing_stop: None,
            open_order_type: default_open_order_type(),
            take_profit_order_type: default_exit_order_type(),
            stop_loss_order_type: default_exit_order_type(),
            time_limit_order_type: default_exit_order_type(),
        }
    }
}

impl TripleBarrierConf {
    /// Create a barrier configuration with default order types
    ///
    /// # Examples
    /// ```
    /// # use pexec_domain::barrier::{TrailingStop, TripleBarrierConf};
    /// # use pexec_domain::value_objects::OrderType;
    /// # use rust_decimal_macros::dec;
    /// let conf = TripleBarrierConf::new(
    ///     Some(dec!(0.02)),
    ///     Some(dec!(0.04)),
    ///     Some(3600),
    ///     Some(TrailingStop::new(dec!(0.01), dec!(0.005)).unwrap()),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(conf.stop_loss(), Some(dec!(0.02)));
    /// assert_eq!(conf.open_order_type(), OrderType::Limit);
    /// assert_eq!(conf.stop_loss_order_type(), OrderType::Market);
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidBarrier` if a present threshold is <= 0
    pub fn new(
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
        time_limit: Option<u64>,
        trailing_stop: Option<TrailingStop>,
    ) -> Result<Self, DomainError> {
        if let Some(sl) = stop_loss {
            ensure_positive("stop_loss", sl)?;
        }
        if let Some(tp) = take_profit {
            ensure_positive("take_profit", tp)?;
        }

        Ok(Self {
            stop_loss,
            take_profit,
            time_limit,
            trailing_stop,
            ..Self::default()
        })
    }

    /// Replace the entry order type
    pub fn with_open_order_type(self, order_type: OrderType) -> Self {
        Self { open_order_type: order_type, ..self }
    }

    /// Replace the take-profit exit order type
    pub fn with_take_profit_order_type(self, order_type: OrderType) -> Self {
        Self { take_profit_order_type: order_type, ..self }
    }

    /// Replace the stop-loss exit order type
    pub fn with_stop_loss_order_type(self, order_type: OrderType) -> Self {
        Self { stop_loss_order_type: order_type, ..self }
    }

    /// Replace the time-limit exit order type
    pub fn with_time_limit_order_type(self, order_type: OrderType) -> Self {
        Self { time_limit_order_type: order_type, ..self }
    }

    /// Stop loss as a fraction of entry price
    pub fn stop_loss(&self) -> Option<Decimal> {
        self.stop_loss
    }

    /// Take profit as a fraction of entry price
    pub fn take_profit(&self) -> Option<Decimal> {
        self.take_profit
    }

    /// Time limit in seconds
    pub fn time_limit(&self) -> Option<u64> {
        self.time_limit
    }

    /// Trailing stop parameters, if enabled
    pub fn trailing_stop(&self) -> Option<TrailingStop> {
        self.trailing_stop
    }

    /// Order type used to open the position
    pub fn open_order_type(&self) -> OrderType {
        self.open_order_type
    }

    /// Order type used when the take profit fires
    pub fn take_profit_order_type(&self) -> OrderType {
        self.take_profit_order_type
    }

    /// Order type used when the stop loss fires
    pub fn stop_loss_order_type(&self) -> OrderType {
        self.stop_loss_order_type
    }

    /// Order type used when the time limit fires
    pub fn time_limit_order_type(&self) -> OrderType {
        self.time_limit_order_type
    }

    /// True when no exit barrier of any kind is configured
    pub fn is_unbounded(&self) -> bool {
        self.stop_loss.is_none()
            && self.take_profit.is_none()
            && self.time_limit.is_none()
            && self.trailing_stop.is_none()
    }

    /// Derive a new configuration with price thresholds scaled by `factor`
    ///
    /// Stop loss, take profit and both trailing stop fields are multiplied by
    /// the factor. Time limit and order types are copied. Disabled barriers
    /// stay disabled. `self` is left untouched.
    ///
    /// Every scaled threshold is still a valid barrier: a product that
    /// overflows `Decimal` or rounds to zero is rejected instead of being
    /// stored.
    ///
    /// # Examples
    /// ```
    /// # use pexec_domain::barrier::{TrailingStop, TripleBarrierConf};
    /// # use pexec_domain::value_objects::VolatilityFactor;
    /// # use rust_decimal_macros::dec;
    /// let base = TripleBarrierConf::new(
    ///     Some(dec!(0.02)),
    ///     Some(dec!(0.04)),
    ///     Some(3600),
    ///     Some(TrailingStop::new(dec!(0.01), dec!(0.005)).unwrap()),
    /// )
    /// .unwrap();
    ///
    /// let factor = VolatilityFactor::new(dec!(1.5)).unwrap();
    /// let adjusted = base.with_adjusted_volatility(factor).unwrap();
    ///
    /// assert_eq!(adjusted.stop_loss(), Some(dec!(0.03)));
    /// assert_eq!(adjusted.take_profit(), Some(dec!(0.06)));
    /// assert_eq!(adjusted.time_limit(), Some(3600));
    /// assert_eq!(adjusted.trailing_stop().unwrap().trailing_delta(), dec!(0.0075));
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidBarrier` if a scaled threshold overflows
    /// or rounds to zero
    pub fn with_adjusted_volatility(&self, factor: VolatilityFactor) -> Result<Self, DomainError> {
        let adjusted = Self {
            stop_loss: self
                .stop_loss
                .map(|sl| scale_threshold("stop_loss", sl, factor))
                .transpose()?,
            take_profit: self
                .take_profit
                .map(|tp| scale_threshold("take_profit", tp, factor))
                .transpose()?,
            time_limit: self.time_limit,
            trailing_stop: self.trailing_stop.map(|ts| ts.scaled(factor)).transpose()?,
            open_order_type: self.open_order_type,
            take_profit_order_type: self.take_profit_order_type,
            stop_loss_order_type: self.stop_loss_order_type,
            time_limit_order_type: self.time_limit_order_type,
        };

        debug!(
            %factor,
            stop_loss = ?adjusted.stop_loss,
            take_profit = ?adjusted.take_profit,
            "Barrier thresholds rescaled for volatility"
        );

        Ok(adjusted)
    }

    /// Check whether the time barrier has elapsed
    ///
    /// Always false when no time limit is configured.
    pub fn is_time_limit_reached(&self, started_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.time_limit {
            Some(limit) => {
                let elapsed = (now - started_at).num_seconds();
                elapsed >= 0 && elapsed as u64 >= limit
            },
            None => false,
        }
    }
}

// =============================================================================
// Barrier Levels
// =============================================================================

/// Absolute price levels of each barrier for a given entry
///
/// ```text
/// BUY:  stop = entry × (1 − sl)   target = entry × (1 + tp)   activation = entry × (1 + a)
/// SELL: stop = entry × (1 + sl)   target = entry × (1 − tp)   activation = entry × (1 − a)
/// ```
///
/// Levels that would not be a positive price (e.g. a 100% stop on a long)
/// or that overflow `Decimal` are reported as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierLevels {
    /// Price at which the stop loss fires
    pub stop_loss_price: Option<Price>,
    /// Price at which the take profit fires
    pub take_profit_price: Option<Price>,
    /// Price at which the trailing stop arms
    pub trailing_activation_price: Option<Price>,
}

impl BarrierLevels {
    /// Compute absolute barrier prices from fractional thresholds
    pub fn from_conf(conf: &TripleBarrierConf, side: TradeSide, entry_price: Price) -> Self {
        let entry = entry_price.as_decimal();
        // Favorable moves are up for a long and down for a short.
        let shifted = |fraction: Decimal, favorable: bool| {
            let multiplier = if favorable == (side == TradeSide::Buy) {
                Decimal::ONE.checked_add(fraction)?
            } else {
                Decimal::ONE.checked_sub(fraction)?
            };
            Price::new(entry.checked_mul(multiplier)?).ok()
        };

        Self {
            stop_loss_price: conf.stop_loss().and_then(|sl| shifted(sl, false)),
            take_profit_price: conf.take_profit().and_then(|tp| shifted(tp, true)),
            trailing_activation_price: conf
                .trailing_stop()
                .and_then(|ts| shifted(ts.activation_price(), true)),
        }
    }
}

fn scale_threshold(
    field: &str,
    value: Decimal,
    factor: VolatilityFactor,
) -> Result<Decimal, DomainError> {
    let scaled = factor.scale(value).ok_or_else(|| {
        DomainError::InvalidBarrier(format!(
            "{} of {} scaled by {} overflows",
            field, value, factor
        ))
    })?;
    ensure_positive(field, scaled)?;
    Ok(scaled)
}

fn ensure_positive(field: &str, value: Decimal) -> Result<(), DomainError> {
    if value <= Decimal::ZERO {
        return Err(DomainError::InvalidBarrier(format!(
            "{} must be positive when set, got {}",
            field, value
        )));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn factor(value: Decimal) -> VolatilityFactor {
        VolatilityFactor::new(value).unwrap()
    }

    fn full_conf() -> TripleBarrierConf {
        TripleBarrierConf::new(
            Some(dec!(0.02)),
            Some(dec!(0.04)),
            Some(3600),
            Some(TrailingStop::new(dec!(0.01), dec!(0.005)).unwrap()),
        )
        .unwrap()
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_trailing_stop_validation() {
        assert!(TrailingStop::new(dec!(0.01), dec!(0.005)).is_ok());
        assert!(matches!(
            TrailingStop::new(dec!(0), dec!(0.005)),
            Err(DomainError::InvalidBarrier(_))
        ));
        assert!(TrailingStop::new(dec!(0.01), dec!(-0.005)).is_err());
    }

    #[test]
    fn test_default_is_all_disabled() {
        let conf = TripleBarrierConf::default();

        assert!(conf.is_unbounded());
        assert_eq!(conf.stop_loss(), None);
        assert_eq!(conf.take_profit(), None);
        assert_eq!(conf.time_limit(), None);
        assert_eq!(conf.trailing_stop(), None);
        assert_eq!(conf.open_order_type(), OrderType::Limit);
        assert_eq!(conf.take_profit_order_type(), OrderType::Market);
        assert_eq!(conf.stop_loss_order_type(), OrderType::Market);
        assert_eq!(conf.time_limit_order_type(), OrderType::Market);
    }

    #[test]
    fn test_rejects_non_positive_thresholds() {
        assert!(TripleBarrierConf::new(Some(dec!(0)), None, None, None).is_err());
        assert!(TripleBarrierConf::new(None, Some(dec!(-0.01)), None, None).is_err());
        assert!(TripleBarrierConf::new(None, None, Some(0), None).is_ok());
    }

    #[test]
    fn test_order_type_overrides() {
        let conf = full_conf()
            .with_open_order_type(OrderType::Market)
            .with_take_profit_order_type(OrderType::Limit)
            .with_stop_loss_order_type(OrderType::Market)
            .with_time_limit_order_type(OrderType::LimitMaker);

        assert_eq!(conf.open_order_type(), OrderType::Market);
        assert_eq!(conf.take_profit_order_type(), OrderType::Limit);
        assert_eq!(conf.stop_loss_order_type(), OrderType::Market);
        assert_eq!(conf.time_limit_order_type(), OrderType::LimitMaker);
        assert_eq!(conf.stop_loss(), Some(dec!(0.02)));
    }

    // =========================================================================
    // Volatility rescaling
    // =========================================================================

    #[test]
    fn test_rescale_reference_example() {
        let adjusted = full_conf().with_adjusted_volatility(factor(dec!(1.5))).unwrap();

        assert_eq!(adjusted.stop_loss(), Some(dec!(0.03)));
        assert_eq!(adjusted.take_profit(), Some(dec!(0.06)));
        assert_eq!(adjusted.time_limit(), Some(3600));
        let ts = adjusted.trailing_stop().unwrap();
        assert_eq!(ts.activation_price(), dec!(0.015));
        assert_eq!(ts.trailing_delta(), dec!(0.0075));
    }

    #[test]
    fn test_rescale_multiplies_each_price_threshold() {
        let base = full_conf();
        for f in [dec!(0.5), dec!(1.25), dec!(2), dec!(3.7)] {
            let adjusted = base.with_adjusted_volatility(factor(f)).unwrap();
            assert_eq!(adjusted.stop_loss(), Some(dec!(0.02) * f));
            assert_eq!(adjusted.take_profit(), Some(dec!(0.04) * f));
            let ts = adjusted.trailing_stop().unwrap();
            assert_eq!(ts.activation_price(), dec!(0.01) * f);
            assert_eq!(ts.trailing_delta(), dec!(0.005) * f);
        }
    }

    #[test]
    fn test_rescale_keeps_time_limit_and_order_types() {
        let base = full_conf()
            .with_open_order_type(OrderType::LimitMaker)
            .with_stop_loss_order_type(OrderType::Limit);
        let adjusted = base.with_adjusted_volatility(factor(dec!(2.5))).unwrap();

        assert_eq!(adjusted.time_limit(), base.time_limit());
        assert_eq!(adjusted.open_order_type(), OrderType::LimitMaker);
        assert_eq!(adjusted.take_profit_order_type(), OrderType::Market);
        assert_eq!(adjusted.stop_loss_order_type(), OrderType::Limit);
        assert_eq!(adjusted.time_limit_order_type(), OrderType::Market);
    }

    #[test]
    fn test_rescale_preserves_absent_barriers() {
        let base = TripleBarrierConf::new(Some(dec!(0.02)), None, None, None).unwrap();
        let adjusted = base.with_adjusted_volatility(factor(dec!(4))).unwrap();

        assert_eq!(adjusted.stop_loss(), Some(dec!(0.08)));
        assert_eq!(adjusted.take_profit(), None);
        assert_eq!(adjusted.time_limit(), None);
        assert_eq!(adjusted.trailing_stop(), None);

        let empty = TripleBarrierConf::default().with_adjusted_volatility(factor(dec!(4))).unwrap();
        assert_eq!(empty, TripleBarrierConf::default());
    }

    #[test]
    fn test_rescale_by_one_is_structurally_equal() {
        let base = full_conf();
        assert_eq!(base.with_adjusted_volatility(VolatilityFactor::ONE).unwrap(), base);
    }

    #[test]
    fn test_rescale_composes_multiplicatively() {
        let base = full_conf();
        let f1 = dec!(1.5);
        let f2 = dec!(0.8);

        let chained = base
            .with_adjusted_volatility(factor(f1))
            .and_then(|conf| conf.with_adjusted_volatility(factor(f2)))
            .unwrap();
        let direct = base.with_adjusted_volatility(factor(f1 * f2)).unwrap();

        assert_eq!(chained, direct);
    }

    #[test]
    fn test_rescale_leaves_original_untouched() {
        let base = full_conf();
        let snapshot = base.clone();
        let _ = base.with_adjusted_volatility(factor(dec!(3))).unwrap();
        assert_eq!(base, snapshot);
    }

    #[test]
    fn test_rescale_concurrent_callers_share_baseline() {
        let base = std::sync::Arc::new(full_conf());
        let handles: Vec<_> = [dec!(0.5), dec!(1.5), dec!(2)]
            .into_iter()
            .map(|f| {
                let base = std::sync::Arc::clone(&base);
                std::thread::spawn(move || (f, base.with_adjusted_volatility(factor(f)).unwrap()))
            })
            .collect();

        for handle in handles {
            let (f, adjusted) = handle.join().unwrap();
            assert_eq!(adjusted.stop_loss(), Some(dec!(0.02) * f));
        }
        assert_eq!(*base, full_conf());
    }

    #[test]
    fn test_rescale_overflow_rejected() {
        let huge = TripleBarrierConf::new(Some(Decimal::MAX), Some(dec!(0.04)), None, None).unwrap();
        let result = huge.with_adjusted_volatility(factor(dec!(2)));
        assert!(matches!(result, Err(DomainError::InvalidBarrier(_))));

        let huge_trailing = TripleBarrierConf::new(
            None,
            None,
            None,
            Some(TrailingStop::new(dec!(0.01), Decimal::MAX).unwrap()),
        )
        .unwrap();
        assert!(huge_trailing.with_adjusted_volatility(factor(dec!(1.5))).is_err());

        // Shrinking the same threshold stays representable
        let shrunk = huge.with_adjusted_volatility(factor(dec!(0.5))).unwrap();
        assert!(shrunk.stop_loss().unwrap() > Decimal::ZERO);
    }

    #[test]
    fn test_rescale_to_zero_rejected() {
        let tiny = TripleBarrierConf::new(Some(dec!(0.0000000000000001)), None, None, None).unwrap();
        let result = tiny.with_adjusted_volatility(factor(dec!(0.0000000000000001)));
        assert!(matches!(result, Err(DomainError::InvalidBarrier(_))));
    }

    #[test]
    fn test_rescaled_conf_round_trips() {
        let adjusted = full_conf().with_adjusted_volatility(factor(dec!(0.0001))).unwrap();
        let json = serde_json::to_string(&adjusted).unwrap();
        let parsed: TripleBarrierConf = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, adjusted);
    }

    // =========================================================================
    // Time limit
    // =========================================================================

    #[test]
    fn test_time_limit_reached() {
        let conf = full_conf();
        let start = Utc::now();

        assert!(!conf.is_time_limit_reached(start, start + Duration::seconds(3599)));
        assert!(conf.is_time_limit_reached(start, start + Duration::seconds(3600)));
        assert!(conf.is_time_limit_reached(start, start + Duration::hours(2)));
        assert!(!conf.is_time_limit_reached(start, start - Duration::seconds(10)));
    }

    #[test]
    fn test_no_time_limit_never_reached() {
        let conf = TripleBarrierConf::default();
        let start = Utc::now();
        assert!(!conf.is_time_limit_reached(start, start + Duration::days(365)));
    }

    // =========================================================================
    // Barrier levels
    // =========================================================================

    #[test]
    fn test_barrier_levels_buy() {
        let entry = Price::new(dec!(100)).unwrap();
        let levels = BarrierLevels::from_conf(&full_conf(), TradeSide::Buy, entry);

        assert_eq!(levels.stop_loss_price.unwrap().as_decimal(), dec!(98));
        assert_eq!(levels.take_profit_price.unwrap().as_decimal(), dec!(104));
        assert_eq!(levels.trailing_activation_price.unwrap().as_decimal(), dec!(101));
    }

    #[test]
    fn test_barrier_levels_sell() {
        let entry = Price::new(dec!(100)).unwrap();
        let levels = BarrierLevels::from_conf(&full_conf(), TradeSide::Sell, entry);

        assert_eq!(levels.stop_loss_price.unwrap().as_decimal(), dec!(102));
        assert_eq!(levels.take_profit_price.unwrap().as_decimal(), dec!(96));
        assert_eq!(levels.trailing_activation_price.unwrap().as_decimal(), dec!(99));
    }

    #[test]
    fn test_barrier_levels_disabled_and_degenerate() {
        let entry = Price::new(dec!(100)).unwrap();
        let disabled = BarrierLevels::from_conf(&TripleBarrierConf::default(), TradeSide::Buy, entry);
        assert_eq!(disabled.stop_loss_price, None);
        assert_eq!(disabled.take_profit_price, None);
        assert_eq!(disabled.trailing_activation_price, None);

        // A 100% stop on a long would be a zero price.
        let wide = TripleBarrierConf::new(Some(dec!(1)), None, None, None).unwrap();
        let levels = BarrierLevels::from_conf(&wide, TradeSide::Buy, entry);
        assert_eq!(levels.stop_loss_price, None);
    }

    #[test]
    fn test_barrier_levels_overflow_is_absent() {
        let entry = Price::new(Decimal::MAX).unwrap();

        let long = BarrierLevels::from_conf(&full_conf(), TradeSide::Buy, entry);
        assert!(long.stop_loss_price.is_some_and(|sl| sl < entry));
        assert_eq!(long.take_profit_price, None);
        assert_eq!(long.trailing_activation_price, None);

        let short = BarrierLevels::from_conf(&full_conf(), TradeSide::Sell, entry);
        assert_eq!(short.stop_loss_price, None);
        assert!(short.take_profit_price.is_some_and(|tp| tp < entry));
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn test_serialization_keeps_disabled_barriers_absent() {
        let conf = TripleBarrierConf::new(Some(dec!(0.02)), None, Some(60), None).unwrap();
        let json = serde_json::to_value(&conf).unwrap();

        assert_eq!(json["stop_loss"], "0.02");
        assert!(json["take_profit"].is_null());
        assert!(json["trailing_stop"].is_null());
        assert_eq!(json["time_limit"], 60);
        assert_eq!(json["open_order_type"], "LIMIT");

        let parsed: TripleBarrierConf = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, conf);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let conf: TripleBarrierConf =
            serde_json::from_str(r#"{"take_profit": "0.05", "stop_loss_order_type": "LIMIT"}"#)
                .unwrap();

        assert_eq!(conf.take_profit(), Some(dec!(0.05)));
        assert_eq!(conf.stop_loss(), None);
        assert_eq!(conf.open_order_type(), OrderType::Limit);
        assert_eq!(conf.stop_loss_order_type(), OrderType::Limit);
        assert_eq!(conf.time_limit_order_type(), OrderType::Market);
    }

    #[test]
    fn test_deserialize_rejects_invalid_thresholds() {
        assert!(serde_json::from_str::<TripleBarrierConf>(r#"{"stop_loss": "0"}"#).is_err());
        assert!(serde_json::from_str::<TripleBarrierConf>(
            r#"{"trailing_stop": {"activation_price": "0.01", "trailing_delta": "-1"}}"#
        )
        .is_err());
        assert!(serde_json::from_str::<TripleBarrierConf>(
            r#"{"trailing_stop": {"activation_price": "0.01"}}"#
        )
        .is_err());
    }
}
