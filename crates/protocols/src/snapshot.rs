//! In-memory ledger backed by a JSON snapshot.

use crate::error::ProviderError;
use crate::ledger::{CoinMetadata, LedgerObject, LedgerReader, ObjectPage};
use async_trait::async_trait;
use clmm_rebalancer_domain::coin::{normalize_address, normalize_coin_type};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

const DEFAULT_PAGE_SIZE: usize = 50;

/// Serialized form of a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    /// Ledger objects.
    #[serde(default)]
    pub objects: Vec<LedgerObject>,
    /// Metadata keyed by coin type.
    #[serde(default)]
    pub coin_metadata: HashMap<String, CoinMetadata>,
}

#[derive(Debug, Default)]
struct SnapshotState {
    objects: BTreeMap<String, LedgerObject>,
    coin_metadata: HashMap<String, CoinMetadata>,
}

/// A [`LedgerReader`] over objects held in memory.
///
/// Clones share state, so objects can be replaced between worker cycles.
#[derive(Debug, Clone)]
pub struct SnapshotLedger {
    state: Arc<RwLock<SnapshotState>>,
    page_size: usize,
}

impl Default for SnapshotLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(SnapshotState::default())),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the number of objects per owned objects page, at least one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// A ledger holding the objects and metadata of `snapshot`.
    pub fn from_snapshot(snapshot: SnapshotFile) -> Self {
        let state = SnapshotState {
            objects: snapshot
                .objects
                .into_iter()
                .map(|object| (normalize_address(&object.object_id), object))
                .collect(),
            coin_metadata: snapshot
                .coin_metadata
                .into_iter()
                .map(|(coin_type, metadata)| (normalize_coin_type(&coin_type), metadata))
                .collect(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let snapshot: SnapshotFile =
            serde_json::from_str(json).map_err(|e| ProviderError::Snapshot(e.to_string()))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Reads and parses a snapshot file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ProviderError::Snapshot(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Inserts or replaces an object.
    pub async fn insert_object(&self, object: LedgerObject) {
        let mut state = self.state.write().await;
        state.objects.insert(normalize_address(&object.object_id), object);
    }

    /// Removes an object, returning it when present.
    pub async fn remove_object(&self, object_id: &str) -> Option<LedgerObject> {
        self.state.write().await.objects.remove(&normalize_address(object_id))
    }

    /// Inserts or replaces the metadata of a coin type.
    pub async fn set_coin_metadata(&self, coin_type: &str, metadata: CoinMetadata) {
        self.state
            .write()
            .await
            .coin_metadata
            .insert(normalize_coin_type(coin_type), metadata);
    }
}

#[async_trait]
impl LedgerReader for SnapshotLedger {
    async fn get_object(&self, object_id: &str) -> Result<Option<LedgerObject>, ProviderError> {
        Ok(self.state.read().await.objects.get(&normalize_address(object_id)).cloned())
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
        cursor: Option<String>,
    ) -> Result<ObjectPage, ProviderError> {
        let start = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| ProviderError::Transport(format!("invalid cursor {cursor}")))?,
            None => 0,
        };
        let owner = normalize_address(owner);
        let state = self.state.read().await;
        let matching: Vec<&LedgerObject> = state
            .objects
            .values()
            .filter(|object| {
                object.object_type == struct_type
                    && normalize_address(object.owner_address()) == owner
            })
            .collect();

        let end = (start + self.page_size).min(matching.len());
        let data = matching
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|object| (*object).clone())
            .collect();
        let has_next_page = end < matching.len();
        Ok(ObjectPage {
            data,
            next_cursor: has_next_page.then(|| end.to_string()),
            has_next_page,
        })
    }

    async fn get_coin_metadata(&self, coin_type: &str) -> Result<Option<CoinMetadata>, ProviderError> {
        Ok(self
            .state
            .read()
            .await
            .coin_metadata
            .get(&normalize_coin_type(coin_type))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::cetus_position_object;
    use crate::cetus::CetusConfig;

    #[tokio::test]
    async fn test_pages_owned_objects() {
        let ledger = SnapshotLedger::new().with_page_size(2);
        for i in 0..5u128 {
            ledger
                .insert_object(cetus_position_object(&format!("0xb{i}"), "0xa1", "0xa11ce", -60, 60, i))
                .await;
        }
        ledger
            .insert_object(cetus_position_object("0xbf", "0xa1", "0xb0b", -60, 60, 1))
            .await;

        let position_type = CetusConfig::default().position_type();
        let mut cursor = None;
        let mut seen = 0;
        let mut pages = 0;
        loop {
            let page = ledger
                .get_owned_objects("0xa11ce", &position_type, cursor)
                .await
                .unwrap();
            seen += page.data.len();
            pages += 1;
            if !page.has_next_page {
                break;
            }
            cursor = page.next_cursor;
        }
        assert_eq!(seen, 5);
        assert_eq!(pages, 3);
    }

    #[tokio::test]
    async fn test_json_snapshot_round_trip() {
        let snapshot = SnapshotFile {
            objects: vec![cetus_position_object("0xb1", "0xa1", "0xa11ce", -60, 60, 1)],
            coin_metadata: HashMap::from([(
                "0x2::sui::SUI".to_string(),
                CoinMetadata {
                    decimals: 9,
                    symbol: "SUI".to_string(),
                    name: "Sui".to_string(),
                },
            )]),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let ledger = SnapshotLedger::from_json(&json).unwrap();

        assert!(ledger.get_object("0xb1").await.unwrap().is_some());
        let metadata = ledger
            .get_coin_metadata(
                "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI",
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(metadata.decimals, 9);

        ledger.remove_object("0xb1").await;
        assert!(ledger.get_object("0xb1").await.unwrap().is_none());
    }

    #[test]
    fn test_bad_json_is_a_snapshot_error() {
        assert!(matches!(
            SnapshotLedger::from_json("{"),
            Err(ProviderError::Snapshot(_))
        ));
    }
}
