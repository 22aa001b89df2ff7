//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use clmm_rebalancer_protocols::prelude::*;
//! ```

pub use crate::adapter::ProtocolAdapter;
pub use crate::capability::{
    CoinPair, DecreaseLiquidityOptions, IncreaseLiquidityOptions, IncreaseTarget,
    PositionOperations, minimum_amounts,
};
pub use crate::cetus::{CetusConfig, CetusDecoder, CetusOperations};
pub use crate::decoder::ObjectDecoder;
pub use crate::error::{ProtocolError, ProviderError};
pub use crate::flowx::{FlowXConfig, FlowXDecoder, FlowXOperations};
pub use crate::ledger::{CoinMetadata, LedgerObject, LedgerReader, ObjectContent, ObjectPage};
pub use crate::plan::{Argument, MoveCall, Plan, PureValue, Step, StepHandle};
pub use crate::provider::PositionProvider;
pub use crate::snapshot::{SnapshotFile, SnapshotLedger};
