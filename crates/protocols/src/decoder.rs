//! Raw ledger object decoding interface.

use crate::error::ProviderError;
use crate::ledger::LedgerObject;
use clmm_rebalancer_domain::coin::Coin;
use clmm_rebalancer_domain::error::DomainError;
use clmm_rebalancer_domain::pool::Pool;
use clmm_rebalancer_domain::position::Position;

/// Decodes a protocol's raw pool and position objects into domain snapshots.
///
/// Decoding is split so the caller can resolve coin metadata and the owning
/// pool between the two phases.
pub trait ObjectDecoder: Send + Sync {
    /// Type prefix every pool object of the protocol starts with.
    fn pool_type_prefix(&self) -> &str;

    fn position_type(&self) -> &str;

    /// Coin types of a pool object, in X/Y order.
    fn pool_coin_types(&self, object: &LedgerObject) -> Result<[String; 2], ProviderError>;

    fn decode_pool(&self, object: &LedgerObject, coins: [Coin; 2]) -> Result<Pool, ProviderError>;

    /// Id of the pool a position object belongs to.
    fn position_pool_id(&self, object: &LedgerObject) -> Result<String, ProviderError>;

    fn decode_position(&self, object: &LedgerObject, pool: Pool) -> Result<Position, ProviderError>;
}

pub(crate) fn domain_error(object: &LedgerObject) -> impl FnOnce(DomainError) -> ProviderError + '_ {
    move |source| ProviderError::Domain {
        object_id: object.object_id.clone(),
        source,
    }
}
