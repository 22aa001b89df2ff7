//! Coins and Sui address normalization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Canonical type of the native gas coin.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

const ADDRESS_HEX_LENGTH: usize = 64;

/// Normalizes an object id or address to `0x` followed by 64 lowercase hex digits.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_ascii_lowercase();
    format!("0x{hex:0>width$}", width = ADDRESS_HEX_LENGTH)
}

/// Normalizes the address part of a `address::module::Name` type tag.
pub fn normalize_coin_type(coin_type: &str) -> String {
    match coin_type.find("::") {
        Some(idx) => {
            let (address, rest) = coin_type.split_at(idx);
            format!("{}{}", normalize_address(address), rest)
        }
        None => normalize_address(coin_type),
    }
}

/// A fungible coin identified by its normalized type tag.
///
/// Equality, hashing and ordering only look at `coin_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    coin_type: String,
    decimals: u8,
    symbol: String,
    name: String,
}

impl Coin {
    /// Creates a coin with unknown metadata.
    pub fn new(coin_type: &str) -> Self {
        Self {
            coin_type: normalize_coin_type(coin_type),
            decimals: 0,
            symbol: String::new(),
            name: String::new(),
        }
    }

    /// Attaches on-chain metadata.
    #[must_use]
    pub fn with_metadata(
        mut self,
        decimals: u8,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.decimals = decimals;
        self.symbol = symbol.into();
        self.name = name.into();
        self
    }

    /// Normalized type tag.
    pub fn coin_type(&self) -> &str {
        &self.coin_type
    }

    /// Number of decimal places of the raw amount.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Display symbol, empty until metadata is applied.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Display name, empty until metadata is applied.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical ordering used to orient prices.
    pub fn sorts_before(&self, other: &Coin) -> bool {
        self.coin_type < other.coin_type
    }

    /// Whether this is the native gas coin.
    pub fn is_gas_coin(&self) -> bool {
        self.coin_type == normalize_coin_type(SUI_COIN_TYPE)
    }
}

impl PartialEq for Coin {
    fn eq(&self, other: &Self) -> bool {
        self.coin_type == other.coin_type
    }
}

impl Eq for Coin {}

impl Hash for Coin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coin_type.hash(state);
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol.is_empty() {
            write!(f, "{}", self.coin_type)
        } else {
            write!(f, "{}", self.symbol)
        }
    }
}
