//! Error types for plan construction and ledger reads.

use clmm_rebalancer_domain::error::{DomainError, MathError};
use thiserror::Error;

/// Errors raised while adding protocol operations to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The position has no on chain id yet.
    #[error("operation requires a position that exists on chain")]
    NotMaterialized,
    /// The position already exists on chain.
    #[error("operation requires a projected position, got on chain position {0}")]
    AlreadyMaterialized(String),
    /// An amount exceeds the `u64` range of entry function arguments.
    #[error("{what} amount {value} does not fit in u64")]
    AmountOverflow { what: &'static str, value: u128 },
    /// Amount or price math failed.
    #[error(transparent)]
    Math(#[from] MathError),
    /// A domain invariant was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Errors raised while reading and decoding ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No object with this id exists.
    #[error("object {0} not found")]
    NotFound(String),
    /// A field is missing or malformed.
    #[error("invalid data in object {object_id}, field {field}: {reason}")]
    InvalidData {
        object_id: String,
        field: String,
        reason: String,
    },
    /// The object is not of the protocol's pool or position type.
    #[error("object {object_id} has type {actual}, expected {expected}")]
    UnexpectedType {
        object_id: String,
        expected: String,
        actual: String,
    },
    /// The ledger could not be reached.
    #[error("ledger transport error: {0}")]
    Transport(String),
    /// A snapshot file could not be read or parsed.
    #[error("snapshot error: {0}")]
    Snapshot(String),
    /// Decoded values violate a domain invariant.
    #[error("object {object_id} violates a domain invariant: {source}")]
    Domain {
        object_id: String,
        #[source]
        source: DomainError,
    },
}

impl ProviderError {
    pub(crate) fn invalid(object_id: &str, field: &str, reason: impl Into<String>) -> Self {
        ProviderError::InvalidData {
            object_id: object_id.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
