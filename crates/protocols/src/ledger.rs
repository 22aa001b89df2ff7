//! Read access to ledger objects.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Move struct content of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectContent {
    /// Kind of content, `moveObject` for Move structs.
    pub data_type: String,
    /// Struct fields as JSON.
    #[serde(default)]
    pub fields: Value,
}

/// An object as returned by the ledger's JSON interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerObject {
    /// Object id.
    pub object_id: String,
    /// Full Move type of the object.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Ownership, in the ledger's JSON shape.
    #[serde(default)]
    pub owner: Option<Value>,
    /// Content, absent when it was not requested.
    #[serde(default)]
    pub content: Option<ObjectContent>,
}

impl LedgerObject {
    /// Address owning the object, empty for shared or wrapped objects.
    pub fn owner_address(&self) -> &str {
        self.owner
            .as_ref()
            .and_then(|owner| owner.get("AddressOwner"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// One page of an owned objects query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPage {
    /// Objects on this page.
    pub data: Vec<LedgerObject>,
    /// Cursor for the next page.
    pub next_cursor: Option<String>,
    /// Whether another page follows.
    pub has_next_page: bool,
}

/// Metadata of a coin type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinMetadata {
    /// Number of decimal places.
    pub decimals: u8,
    /// Display symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
}

/// Source of ledger objects.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Fetches an object with its content, `None` when it does not exist.
    async fn get_object(&self, object_id: &str) -> Result<Option<LedgerObject>, ProviderError>;

    /// Objects of exactly `struct_type` owned by `owner`, one page at a time.
    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
        cursor: Option<String>,
    ) -> Result<ObjectPage, ProviderError>;

    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<CoinMetadata>, ProviderError>;
}
