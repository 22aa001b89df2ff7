//! Cetus CLMM adapter.
//!
//! - Pool and position object decoding
//! - Position operations on the `pool` module

/// Ledger object decoding.
pub mod decoder;
/// Position operations.
pub mod operations;

pub use decoder::CetusDecoder;
pub use operations::CetusOperations;

/// Published Cetus CLMM package.
pub const CETUS_PACKAGE_ID: &str =
    "0x1eabed72c53feb3805120a081dc15963c204dc8d091542592abaf7a35689b2fb";

/// Shared global config object passed to every pool call.
pub const CETUS_GLOBAL_CONFIG_ID: &str =
    "0xdaa46292632c3c4d8f31f23ea0f9b36a28ff3677e9684980e4438403a67a3d8f";

/// Sui system clock object.
pub const CLOCK_OBJECT_ID: &str = "0x6";

/// Object ids and types the adapter addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CetusConfig {
    /// Package the position and pool types and entry functions live in.
    pub package_id: String,
    /// Shared global configuration object passed to entry functions.
    pub global_config_id: String,
}

impl Default for CetusConfig {
    fn default() -> Self {
        Self {
            package_id: CETUS_PACKAGE_ID.to_string(),
            global_config_id: CETUS_GLOBAL_CONFIG_ID.to_string(),
        }
    }
}

impl CetusConfig {
    /// Full Move type of position objects.
    pub fn position_type(&self) -> String {
        format!("{}::position::Position", self.package_id)
    }

    /// Move type prefix of pool objects.
    pub fn pool_type(&self) -> String {
        format!("{}::pool::Pool", self.package_id)
    }
}
