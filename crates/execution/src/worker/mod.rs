//! The rebalance control loop.
//!
//! Each cycle synchronizes the tracked position, migrates it when it has left
//! the pool's active range and compounds it on schedule while it is out of
//! range. Cycles are bounded by a watchdog timeout that stops the worker.

use crate::config::WorkerConfig;
use crate::error::ExecutionError;
use crate::lifecycle::{EventData, LifecycleEvent, LifecycleTracker};
use crate::scheduler::CompoundTimer;
use crate::strategy::{PositionManager, RebalancePolicy, decide_rebalance};
use crate::submission::PlanSubmitter;
use clmm_rebalancer_domain::math::tick_to_price;
use clmm_rebalancer_domain::position::Position;
use clmm_rebalancer_domain::range::TickRange;
use clmm_rebalancer_protocols::provider::PositionProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What the rebalance check did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RebalanceOutcome {
    /// The position stays where it is.
    Kept {
        range: TickRange,
    },
    /// The position was moved to a new range.
    Migrated {
        from: TickRange,
        to: TickRange,
        digest: String,
        new_position: Option<String>,
    },
}

/// What the compound check did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CompoundOutcome {
    /// The current tick is inside the position's bounds.
    InRange,
    /// No compound interval is configured.
    Disabled,
    /// The interval has not elapsed since the last compound or migrate.
    NotDue,
    /// The created position of a migrate is not known yet.
    NoPosition,
    /// Fees and rewards were deposited into the position.
    Compounded {
        digest: String,
        added_liquidity: u128,
    },
}

/// Summary of one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Position tracked at the start of the cycle.
    pub position_id: String,
    /// Pool of the position.
    pub pool_id: String,
    /// Pool tick at the start of the cycle.
    pub tick_current: i32,
    /// Active range for the configured multiplier.
    pub active_range: TickRange,
    /// What the rebalance check did.
    pub rebalance: RebalanceOutcome,
    /// What the compound check did.
    pub compound: CompoundOutcome,
}

/// Tracks one owner's position in one pool and keeps it in the pool's active range.
///
/// The worker owns its tracked position and compound timer. Run it with
/// [`RebalanceWorker::run`] or drive single cycles through [`RebalanceWorker::run_cycle`].
pub struct RebalanceWorker {
    config: WorkerConfig,
    policy: RebalancePolicy,
    provider: PositionProvider,
    manager: PositionManager,
    submitter: Arc<dyn PlanSubmitter>,
    position: Option<Position>,
    compound_timer: CompoundTimer,
    history: LifecycleTracker,
}

impl RebalanceWorker {
    /// Creates a worker. The compound timer starts now.
    pub fn new(
        config: WorkerConfig,
        provider: PositionProvider,
        manager: PositionManager,
        submitter: Arc<dyn PlanSubmitter>,
    ) -> Result<Self, ExecutionError> {
        config.validate()?;
        for (what, protocol) in [
            ("provider", provider.adapter().protocol()),
            ("position manager", manager.adapter().protocol()),
        ] {
            if protocol != config.protocol {
                return Err(ExecutionError::InvalidConfig(format!(
                    "{what} is set up for {protocol}, worker for {}",
                    config.protocol
                )));
            }
        }

        let policy = RebalancePolicy {
            multiplier: config.multiplier,
            base_price_percent: config.base_price_percent.clone(),
            target_price_percent: config.target_price_percent.clone(),
            widen_spacing_units: config.widen_spacing_units,
        };
        Ok(Self {
            compound_timer: CompoundTimer::new(config.compound_interval),
            config,
            policy,
            provider,
            manager,
            submitter,
            position: None,
            history: LifecycleTracker::new(),
        })
    }

    /// Worker configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// The tracked position as of the last synchronization or migrate.
    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Migrations and compounds recorded so far.
    pub fn history(&self) -> &LifecycleTracker {
        &self.history
    }

    /// Runs cycles until a fatal error.
    ///
    /// Ordinary cycle errors are logged and the next cycle starts after the
    /// tick interval. A cycle exceeding the processing timeout stops the loop
    /// with [`ExecutionError::WatchdogTimeout`].
    pub async fn run(&mut self) -> Result<(), ExecutionError> {
        info!(
            protocol = %self.config.protocol,
            pool = %self.config.pool_id,
            owner = %self.config.owner,
            multiplier = self.config.multiplier,
            "Starting rebalance worker"
        );
        let timeout = self.config.processing_timeout;

        loop {
            match tokio::time::timeout(timeout, self.run_cycle()).await {
                Err(_) => {
                    error!(timeout = ?timeout, "Worker timeout, stopping");
                    return Err(ExecutionError::WatchdogTimeout(timeout));
                }
                Ok(Err(e)) if e.is_fatal() => {
                    error!(error = %e, "Fatal worker error");
                    return Err(e);
                }
                Ok(Err(e)) => error!(error = %e, "Worker error"),
                Ok(Ok(report)) => debug!(report = ?report, "Cycle finished"),
            }
            tokio::time::sleep(self.config.tick_interval).await;
        }
    }

    /// Runs one synchronize, rebalance and compound cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, ExecutionError> {
        let position = self.synchronize().await?;
        let position_id = position.id().unwrap_or_default().to_string();
        info!(
            position = %position_id,
            tick_lower = position.tick_lower(),
            tick_upper = position.tick_upper(),
            liquidity = position.liquidity(),
            "Start tracking position"
        );

        let (active_range, rebalance) = self.rebalance_if_necessary(&position).await?;
        let compound = self.compound_if_necessary().await?;

        Ok(CycleReport {
            position_id,
            pool_id: position.pool().id().to_string(),
            tick_current: position.pool().tick_current(),
            active_range,
            rebalance,
            compound,
        })
    }

    async fn synchronize(&mut self) -> Result<Position, ExecutionError> {
        let tracked = self.position.as_ref().and_then(Position::id).map(str::to_string);
        let position = match tracked {
            Some(id) => self.provider.get_position_by_id(&id).await?,
            None => self
                .provider
                .get_largest_position(&self.config.owner, &self.config.pool_id)
                .await?
                .ok_or_else(|| ExecutionError::NoPositionFound {
                    owner: self.config.owner.clone(),
                    pool_id: self.config.pool_id.clone(),
                })?,
        };
        self.position = Some(position.clone());
        Ok(position)
    }

    async fn rebalance_if_necessary(
        &mut self,
        position: &Position,
    ) -> Result<(TickRange, RebalanceOutcome), ExecutionError> {
        let decision = decide_rebalance(position, &self.policy)?;
        log_active_prices(position, decision.active);

        if !decision.requires_migration() {
            return Ok((
                decision.active,
                RebalanceOutcome::Kept {
                    range: decision.current,
                },
            ));
        }

        let target = decision.target;
        let migration = self.manager.migrate(position, target.lower, target.upper).await?;
        let receipt = self.submitter.submit(&migration.plan).await?;
        self.compound_timer.reset();
        self.position = None;

        let position_type = self.manager.adapter().operations().position_object_type();
        let new_position = receipt.created_of_type(position_type).map(str::to_string);
        info!(
            from = %decision.current,
            to = %target,
            digest = %receipt.digest,
            new_position = new_position.as_deref().unwrap_or("unknown"),
            "Migrate position successful"
        );
        self.history.record(LifecycleEvent::new(
            position.id().unwrap_or_default(),
            position.pool().id(),
            receipt.digest.clone(),
            EventData::Migrated {
                from: decision.current,
                to: target,
                projected_liquidity: migration.projected.liquidity(),
                new_position: new_position.clone(),
            },
        ));

        match &new_position {
            Some(id) => {
                tokio::time::sleep(self.config.settle_delay).await;
                self.position = Some(self.provider.get_position_by_id(id).await?);
            }
            None => {
                warn!(digest = %receipt.digest, "Created position not reported, rediscovering next cycle");
            }
        }

        Ok((
            decision.active,
            RebalanceOutcome::Migrated {
                from: decision.current,
                to: target,
                digest: receipt.digest,
                new_position,
            },
        ))
    }

    async fn compound_if_necessary(&mut self) -> Result<CompoundOutcome, ExecutionError> {
        let Some(position) = self.position.clone() else {
            return Ok(CompoundOutcome::NoPosition);
        };

        if position.contains_current_tick() {
            info!(position = position.id().unwrap_or_default(), "Skip compound: price still in range");
            return Ok(CompoundOutcome::InRange);
        }
        if !self.compound_timer.is_enabled() {
            return Ok(CompoundOutcome::Disabled);
        }
        if !self.compound_timer.is_due() {
            debug!(elapsed = ?self.compound_timer.elapsed(), "Compound not due");
            return Ok(CompoundOutcome::NotDue);
        }

        let compound = self.manager.compound(&position).await?;
        let receipt = self.submitter.submit(&compound.plan).await?;
        self.compound_timer.reset();

        info!(
            position = position.id().unwrap_or_default(),
            digest = %receipt.digest,
            "Compound position successful"
        );
        self.history.record(LifecycleEvent::new(
            position.id().unwrap_or_default(),
            position.pool().id(),
            receipt.digest.clone(),
            EventData::Compounded {
                range: TickRange::of(&position),
                added_liquidity: compound.projected.liquidity(),
            },
        ));
        Ok(CompoundOutcome::Compounded {
            digest: receipt.digest,
            added_liquidity: compound.projected.liquidity(),
        })
    }
}

fn log_active_prices(position: &Position, active: TickRange) {
    let (base, quote) = (position.coin_x(), position.coin_y());
    match (
        tick_to_price(base, quote, active.lower),
        tick_to_price(base, quote, active.upper),
    ) {
        (Ok(lower), Ok(upper)) => debug!(
            active = %active,
            price_lower = %lower.to_fixed(9),
            price_upper = %upper.to_fixed(9),
            "Active range prices"
        ),
        (Err(e), _) | (_, Err(e)) => debug!(active = %active, error = %e, "Active range prices unavailable"),
    }
}
