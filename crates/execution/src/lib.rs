//! Position management for Sui concentrated liquidity pools.
//!
//! This crate provides:
//! - Migrate and compound plans built from a protocol's capability set
//! - Target range selection with directional widening
//! - A plan submission interface and a dry-run submitter
//! - The rebalance worker loop with its watchdog and compound schedule
//! - A bounded lifecycle history

/// Prelude module for convenient imports.
pub mod prelude;

/// Manager and worker configuration.
pub mod config;
/// Error types.
pub mod error;
/// Position lifecycle tracking.
pub mod lifecycle;
/// Compound schedule timing.
pub mod scheduler;
/// Migrate/compound planning and range selection.
pub mod strategy;
/// Plan submission.
pub mod submission;
/// Rebalance control loop.
pub mod worker;
