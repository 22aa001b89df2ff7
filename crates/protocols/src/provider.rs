//! Ledger read provider producing validated pool and position snapshots.

use crate::adapter::ProtocolAdapter;
use crate::error::ProviderError;
use crate::ledger::{LedgerObject, LedgerReader};
use clmm_rebalancer_domain::coin::{Coin, normalize_address};
use clmm_rebalancer_domain::pool::Pool;
use clmm_rebalancer_domain::position::Position;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads pools and positions of one protocol from a ledger.
#[derive(Clone)]
pub struct PositionProvider {
    ledger: Arc<dyn LedgerReader>,
    adapter: ProtocolAdapter,
}

impl PositionProvider {
    /// Creates a provider reading through `ledger` and decoding with `adapter`.
    pub fn new(ledger: Arc<dyn LedgerReader>, adapter: ProtocolAdapter) -> Self {
        Self { ledger, adapter }
    }

    /// Protocol adapter the provider decodes with.
    pub fn adapter(&self) -> &ProtocolAdapter {
        &self.adapter
    }

    async fn coin(&self, coin_type: &str) -> Result<Coin, ProviderError> {
        let coin = Coin::new(coin_type);
        Ok(match self.ledger.get_coin_metadata(coin_type).await? {
            Some(metadata) => coin.with_metadata(metadata.decimals, &metadata.symbol, &metadata.name),
            None => {
                debug!(coin = %coin_type, "No coin metadata, using defaults");
                coin
            }
        })
    }

    async fn fetch(&self, object_id: &str) -> Result<LedgerObject, ProviderError> {
        self.ledger
            .get_object(object_id)
            .await?
            .ok_or_else(|| ProviderError::NotFound(object_id.to_string()))
    }

    /// Reads and decodes the pool `pool_id` with its coin metadata.
    pub async fn get_pool_by_id(&self, pool_id: &str) -> Result<Pool, ProviderError> {
        let object = self.fetch(pool_id).await?;
        let decoder = self.adapter.decoder();
        if !object.object_type.starts_with(decoder.pool_type_prefix()) {
            return Err(ProviderError::UnexpectedType {
                object_id: object.object_id,
                expected: decoder.pool_type_prefix().to_string(),
                actual: object.object_type,
            });
        }
        let [type_x, type_y] = decoder.pool_coin_types(&object)?;
        let (coin_x, coin_y) = tokio::try_join!(self.coin(&type_x), self.coin(&type_y))?;
        decoder.decode_pool(&object, [coin_x, coin_y])
    }

    /// Reads and decodes the position `position_id` with its pool.
    pub async fn get_position_by_id(&self, position_id: &str) -> Result<Position, ProviderError> {
        let object = self.fetch(position_id).await?;
        let decoder = self.adapter.decoder();
        if object.object_type != decoder.position_type() {
            return Err(ProviderError::UnexpectedType {
                object_id: object.object_id,
                expected: decoder.position_type().to_string(),
                actual: object.object_type,
            });
        }
        let pool = self.get_pool_by_id(&decoder.position_pool_id(&object)?).await?;
        decoder.decode_position(&object, pool)
    }

    /// The owner's position with the most liquidity in `pool_id`, if any.
    ///
    /// Position objects that fail to decode are logged and skipped; failures
    /// reading the pool itself are returned.
    pub async fn get_largest_position(
        &self,
        owner: &str,
        pool_id: &str,
    ) -> Result<Option<Position>, ProviderError> {
        let decoder = self.adapter.decoder();
        let wanted_pool = normalize_address(pool_id);
        let mut pool: Option<Pool> = None;
        let mut largest: Option<Position> = None;
        let mut cursor = None;
        let mut scanned = 0usize;

        loop {
            let page = self
                .ledger
                .get_owned_objects(owner, decoder.position_type(), cursor)
                .await?;

            for object in &page.data {
                scanned += 1;
                let belongs = match decoder.position_pool_id(object) {
                    Ok(id) => normalize_address(&id) == wanted_pool,
                    Err(e) => {
                        warn!(object = %object.object_id, error = %e, "Skipping undecodable position");
                        continue;
                    }
                };
                if !belongs {
                    continue;
                }

                let pool = match &pool {
                    Some(pool) => pool.clone(),
                    None => {
                        let fetched = self.get_pool_by_id(pool_id).await?;
                        pool = Some(fetched.clone());
                        fetched
                    }
                };

                match decoder.decode_position(object, pool) {
                    Ok(position) => {
                        let larger = largest
                            .as_ref()
                            .is_none_or(|current| position.liquidity() > current.liquidity());
                        if larger {
                            largest = Some(position);
                        }
                    }
                    Err(e) => {
                        warn!(object = %object.object_id, error = %e, "Skipping undecodable position");
                    }
                }
            }

            if !page.has_next_page {
                break;
            }
            cursor = page.next_cursor;
        }

        debug!(owner, pool = %wanted_pool, scanned, found = largest.is_some(), "Position scan finished");
        Ok(largest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cetus_pool_object, cetus_position_object, coin_metadata, flowx_pool_object};
    use crate::snapshot::SnapshotLedger;
    use clmm_rebalancer_domain::enums::Protocol;

    const OWNER: &str = "0xa11ce";

    async fn ledger() -> SnapshotLedger {
        let ledger = SnapshotLedger::new().with_page_size(2);
        for (coin_type, metadata) in coin_metadata() {
            ledger.set_coin_metadata(&coin_type, metadata).await;
        }
        ledger.insert_object(cetus_pool_object("0xa1", 1000, 60)).await;
        ledger.insert_object(cetus_pool_object("0xa2", 0, 60)).await;
        ledger
    }

    fn provider(ledger: &SnapshotLedger) -> PositionProvider {
        PositionProvider::new(Arc::new(ledger.clone()), ProtocolAdapter::for_protocol(Protocol::Cetus))
    }

    #[tokio::test]
    async fn test_pool_carries_coin_metadata() {
        let ledger = ledger().await;
        let pool = provider(&ledger).get_pool_by_id("0xa1").await.unwrap();
        assert_eq!(pool.coin_x().decimals(), 9);
        assert_eq!(pool.coin_y().symbol(), "USDC");
    }

    #[tokio::test]
    async fn test_wrong_pool_type_is_rejected() {
        let ledger = ledger().await;
        ledger.insert_object(flowx_pool_object("0xf1", 0, 60)).await;
        assert!(matches!(
            provider(&ledger).get_pool_by_id("0xf1").await,
            Err(ProviderError::UnexpectedType { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_position_is_not_found() {
        let ledger = ledger().await;
        assert_eq!(
            provider(&ledger).get_position_by_id("0xdead").await.unwrap_err(),
            ProviderError::NotFound("0xdead".to_string())
        );
    }

    #[tokio::test]
    async fn test_largest_position_skips_corrupt_and_foreign_objects() {
        let ledger = ledger().await;
        ledger
            .insert_object(cetus_position_object("0xb1", "0xa1", OWNER, 960, 1080, 500))
            .await;
        ledger
            .insert_object(cetus_position_object("0xb2", "0xa1", OWNER, 900, 1020, 9_000))
            .await;
        ledger
            .insert_object(cetus_position_object("0xb3", "0xa2", OWNER, -60, 60, 99_000))
            .await;
        let mut corrupt = cetus_position_object("0xb4", "0xa1", OWNER, 960, 1080, 1_000_000);
        if let Some(content) = corrupt.content.as_mut() {
            content.fields["liquidity"] = serde_json::json!("not a number");
        }
        ledger.insert_object(corrupt).await;

        let largest = provider(&ledger)
            .get_largest_position(OWNER, "0x00a1")
            .await
            .unwrap()
            .unwrap();
        assert!(largest.id().is_some_and(|id| id.ends_with("b2")));
        assert_eq!(largest.liquidity(), 9_000);
    }

    #[tokio::test]
    async fn test_no_position_returns_none() {
        let ledger = ledger().await;
        assert!(provider(&ledger)
            .get_largest_position(OWNER, "0xa1")
            .await
            .unwrap()
            .is_none());
    }
}
