//! Configuration for the position manager and the rebalance worker.

use crate::error::ExecutionError;
use clmm_rebalancer_domain::coin::normalize_address;
use clmm_rebalancer_domain::enums::Protocol;
use clmm_rebalancer_domain::math::AmountPair;
use clmm_rebalancer_domain::rational::Percent;
use rust_decimal::Decimal;
use std::time::Duration;

/// Default inter-cycle delay.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);
/// Default watchdog bound on a single cycle.
pub const DEFAULT_PROCESSING_TIMEOUT: Duration = Duration::from_secs(300);
/// Default wait between a migrate and reading the created position.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Options shared by every plan the position manager builds.
///
/// Only `slippage_tolerance` shapes the plans themselves. The swap and reward
/// thresholds are validated and carried for submitters that route swaps or
/// price rewards; plan construction does not read them.
#[derive(Debug, Clone)]
pub struct PositionManagerOptions {
    /// Tolerance applied to every minimum amount bound.
    pub slippage_tolerance: Percent,
    /// Maximum accepted price impact for swaps. Not read when building plans.
    pub price_impact_threshold: Option<Percent>,
    /// Smallest amounts worth zapping. Not read when building plans.
    pub min_zap_amounts: AmountPair,
    /// Smallest reward value worth collecting, in USD. Not read when building plans.
    pub reward_threshold_usd: Option<Decimal>,
}

impl Default for PositionManagerOptions {
    fn default() -> Self {
        Self {
            slippage_tolerance: Percent::from_millionths(5_000), // 0.5%
            price_impact_threshold: None,
            min_zap_amounts: AmountPair::default(),
            reward_threshold_usd: None,
        }
    }
}

impl PositionManagerOptions {
    /// Checks every option lies in its accepted domain.
    pub fn validate(&self) -> Result<(), ExecutionError> {
        if !self.slippage_tolerance.is_unit_interval() {
            return Err(ExecutionError::InvalidConfig(format!(
                "slippage tolerance {} must be between 0 and 1",
                self.slippage_tolerance
            )));
        }
        if let Some(threshold) = self
            .price_impact_threshold
            .as_ref()
            .filter(|threshold| !threshold.is_unit_interval())
        {
            return Err(ExecutionError::InvalidConfig(format!(
                "price impact threshold {threshold} must be between 0 and 1"
            )));
        }
        if self.reward_threshold_usd.is_some_and(|usd| usd.is_sign_negative()) {
            return Err(ExecutionError::InvalidConfig(
                "reward threshold must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration of one rebalance worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Protocol of the pool.
    pub protocol: Protocol,
    /// Pool whose position is managed.
    pub pool_id: String,
    /// Address owning the position.
    pub owner: String,
    /// Width of the active range in tick spacings.
    pub multiplier: u32,
    /// Shrink applied to the active range to get the band that triggers widening.
    pub base_price_percent: Percent,
    /// Shrink applied to the active range to get the band the migration targets.
    pub target_price_percent: Percent,
    /// Minimum time between compounds; `None` disables compounding.
    pub compound_interval: Option<Duration>,
    /// Delay between cycles.
    pub tick_interval: Duration,
    /// Upper bound on one cycle before the worker stops.
    pub processing_timeout: Duration,
    /// Wait between a migrate and reading the created position.
    pub settle_delay: Duration,
    /// Spacings added on the side the price crossed the base band.
    pub widen_spacing_units: u32,
}

impl WorkerConfig {
    /// Creates a configuration with default timings and bands.
    pub fn new(protocol: Protocol, pool_id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            protocol,
            pool_id: pool_id.into(),
            owner: owner.into(),
            multiplier: 2,
            base_price_percent: Percent::from_millionths(100_000),
            target_price_percent: Percent::from_millionths(200_000),
            compound_interval: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
            processing_timeout: DEFAULT_PROCESSING_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            widen_spacing_units: 1,
        }
    }

    /// Sets the active range width in tick spacings.
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Enables compounding at most once per `interval`.
    pub fn with_compound_interval(mut self, interval: Duration) -> Self {
        self.compound_interval = Some(interval);
        self
    }

    /// Rejects values the worker cannot run with.
    pub fn validate(&self) -> Result<(), ExecutionError> {
        let invalid = |reason: String| Err(ExecutionError::InvalidConfig(reason));

        if self.multiplier == 0 {
            return invalid("multiplier must be positive".to_string());
        }
        if self.pool_id.trim().is_empty() {
            return invalid("pool id is required".to_string());
        }
        if self.owner.trim().is_empty() {
            return invalid("owner address is required".to_string());
        }
        if !is_hex_address(&self.pool_id) {
            return invalid(format!("pool id {} is not an address", self.pool_id));
        }
        if !is_hex_address(&self.owner) {
            return invalid(format!("owner {} is not an address", self.owner));
        }
        for (name, percent) in [
            ("base price percent", &self.base_price_percent),
            ("target price percent", &self.target_price_percent),
        ] {
            if !percent.is_unit_interval() {
                return invalid(format!("{name} {percent} must be between 0 and 1"));
            }
        }
        if self.processing_timeout.is_zero() {
            return invalid("processing timeout must be positive".to_string());
        }
        if self.settle_delay >= self.processing_timeout {
            return invalid(format!(
                "settle delay {:?} must be shorter than the processing timeout {:?}",
                self.settle_delay, self.processing_timeout
            ));
        }
        Ok(())
    }
}

fn is_hex_address(value: &str) -> bool {
    let normalized = normalize_address(value);
    normalized.len() == 66 && normalized[2..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn worker() -> WorkerConfig {
        WorkerConfig::new(Protocol::Cetus, "0xa1", "0xa11ce")
    }

    #[test]
    fn test_default_options_are_valid() {
        let options = PositionManagerOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.slippage_tolerance.to_fixed(1), "0.5");
    }

    #[test]
    fn test_slippage_outside_unit_interval_is_rejected() {
        let options = PositionManagerOptions {
            slippage_tolerance: Percent::new(11, 10).unwrap(),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ExecutionError::InvalidConfig(_))));

        let negative = PositionManagerOptions {
            slippage_tolerance: Percent::new(-1, 100).unwrap(),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_negative_reward_threshold_is_rejected() {
        let options = PositionManagerOptions {
            reward_threshold_usd: Some(dec!(-1.5)),
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_worker_defaults() {
        let config = worker();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert_eq!(config.processing_timeout, Duration::from_secs(300));
        assert_eq!(config.settle_delay, Duration::from_secs(5));
        assert!(config.compound_interval.is_none());
    }

    #[test]
    fn test_worker_rejects_bad_values() {
        assert!(worker().with_multiplier(0).validate().is_err());
        assert!(WorkerConfig::new(Protocol::Cetus, "", "0xa11ce").validate().is_err());
        assert!(WorkerConfig::new(Protocol::Cetus, "0xa1", "alice").validate().is_err());

        let mut config = worker();
        config.settle_delay = Duration::from_secs(300);
        assert!(config.validate().is_err());

        let mut config = worker();
        config.base_price_percent = Percent::new(3, 2).unwrap();
        assert!(config.validate().is_err());
    }
}
