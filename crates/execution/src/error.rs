//! Error types for orchestration and the worker loop.

use clmm_rebalancer_domain::error::{DomainError, MathError};
use clmm_rebalancer_protocols::error::{ProtocolError, ProviderError};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by plan building and the worker loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// A configuration value is outside its accepted domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The owner holds no position in the tracked pool.
    #[error("no position found for owner {owner} in pool {pool_id}")]
    NoPositionFound { owner: String, pool_id: String },
    /// The ledger rejected or reverted a submitted plan.
    #[error("plan execution failed: {0}")]
    ExecutionFailed(String),
    /// A capability step broke its contract while a plan was being built.
    #[error("invalid plan: {0}")]
    InvalidPlan(&'static str),
    /// A cycle did not finish within the processing timeout.
    #[error("cycle exceeded processing timeout of {0:?}")]
    WatchdogTimeout(Duration),
    /// Reading or decoding ledger state failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// A protocol operation could not be added to a plan.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// A domain invariant was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Fixed point math failed.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl ExecutionError {
    /// Whether the worker loop must stop instead of retrying next cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExecutionError::InvalidConfig(_)
                | ExecutionError::NoPositionFound { .. }
                | ExecutionError::WatchdogTimeout(_)
        )
    }
}
