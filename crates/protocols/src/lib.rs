//! Protocol adapters for Sui concentrated liquidity pools.
//!
//! This crate provides:
//! - An ordered operation plan model for the submission layer
//! - The six operation capability set with Cetus and FlowX V3 implementations
//! - Decoding of raw ledger objects into pool and position snapshots
//! - A ledger read provider and an in-memory snapshot ledger

/// Prelude module for convenient imports.
pub mod prelude;

/// Protocol selection.
pub mod adapter;
/// Protocol agnostic position operations.
pub mod capability;
/// Cetus CLMM.
pub mod cetus;
/// Object decoding interface.
pub mod decoder;
/// Error types.
pub mod error;
/// Ledger object builders for tests.
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
/// FlowX CLMM V3.
pub mod flowx;
/// Ledger access.
pub mod ledger;
/// Move field parsing helpers.
pub mod parsers;
/// Operation plans.
pub mod plan;
/// Pool and position provider.
pub mod provider;
/// In-memory snapshot ledger.
pub mod snapshot;
