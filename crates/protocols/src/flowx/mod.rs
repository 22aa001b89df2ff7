//! FlowX CLMM (V3) adapter.
//!
//! - Pool and position object decoding with tick realignment
//! - Position operations on the `position_manager` module

/// Ledger object decoding.
pub mod decoder;
/// Position operations.
pub mod operations;

pub use decoder::FlowXDecoder;
pub use operations::FlowXOperations;

/// Published FlowX CLMM entry package.
pub const FLOWX_PACKAGE_ID: &str =
    "0xde2c47eb0da8c74e4d0f6a220c41619681221b9c2590518095f0f0c2d3f3c772";

/// Package that defines the FlowX pool and position structs.
pub const FLOWX_TYPES_PACKAGE_ID: &str =
    "0x25929e7f29e0a30eb4e692952ba1b5b65a3a4d65ab5f2a32e1ba3edcb587f26d";

/// Versioned object checked by every entry function.
pub const FLOWX_VERSION_OBJECT_ID: &str =
    "0xf7b8c3e41cde89b0f5c6e5e2e3e0e1e2e3e4e5e6e7e8e9e0e1e2e3e4e5e6e7e8";

/// Object ids and types the adapter addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowXConfig {
    /// Package holding the `position_manager` entry functions.
    pub package_id: String,
    /// Package defining the pool and position types.
    pub types_package_id: String,
    /// Versioned object checked by every entry function.
    pub version_object_id: String,
}

impl Default for FlowXConfig {
    fn default() -> Self {
        Self {
            package_id: FLOWX_PACKAGE_ID.to_string(),
            types_package_id: FLOWX_TYPES_PACKAGE_ID.to_string(),
            version_object_id: FLOWX_VERSION_OBJECT_ID.to_string(),
        }
    }
}

impl FlowXConfig {
    /// Full Move type of position objects.
    pub fn position_type(&self) -> String {
        format!("{}::position::Position", self.types_package_id)
    }

    /// Move type prefix of pool objects.
    pub fn pool_type(&self) -> String {
        format!("{}::pool::Pool", self.types_package_id)
    }
}
