//! Decoding of Cetus pool and position objects.

use super::CetusConfig;
use crate::decoder::{ObjectDecoder, domain_error};
use crate::error::ProviderError;
use crate::ledger::LedgerObject;
use crate::parsers::{FieldReader, extract_type_arguments};
use clmm_rebalancer_domain::coin::Coin;
use clmm_rebalancer_domain::enums::Protocol;
use clmm_rebalancer_domain::pool::{Pool, PoolParams, RewardInfo};
use clmm_rebalancer_domain::position::{Position, PositionParams, PositionRewardInfo};

/// Cetus positions always carry three reward slots.
const REWARD_SLOTS: usize = 3;

/// Decodes Cetus pool and position objects.
#[derive(Debug, Clone)]
pub struct CetusDecoder {
    pool_type: String,
    position_type: String,
}

impl Default for CetusDecoder {
    fn default() -> Self {
        Self::new(&CetusConfig::default())
    }
}

impl CetusDecoder {
    /// A decoder matching the object types of `config`.
    pub fn new(config: &CetusConfig) -> Self {
        Self {
            pool_type: config.pool_type(),
            position_type: config.position_type(),
        }
    }
}

pub(crate) fn reward_infos(reader: &FieldReader<'_>) -> Result<Vec<RewardInfo>, ProviderError> {
    reader
        .struct_vec("reward_infos")?
        .iter()
        .map(|info| {
            let coin_type = info
                .type_name("reward_coin_type")?
                .ok_or_else(|| ProviderError::invalid(info.object_id(), "reward_infos.reward_coin_type", "missing"))?;
            Ok(RewardInfo {
                coin: Coin::new(&coin_type),
                ended_at_seconds: info.u64("ended_at_seconds")?,
                last_update_time: info.u64("last_update_time")?,
                reward_per_seconds: info.u128("reward_per_seconds")?,
                total_reward: info.u128("total_reward")?,
                reward_growth_global: info.u128("reward_growth_global")?,
            })
        })
        .collect()
}

pub(crate) fn coin_types_from(
    object: &LedgerObject,
    field_x: &'static str,
    field_y: &'static str,
) -> Result<[String; 2], ProviderError> {
    let reader = FieldReader::of(object)?;
    if let (Some(x), Some(y)) = (reader.type_name(field_x)?, reader.type_name(field_y)?) {
        return Ok([x, y]);
    }
    match extract_type_arguments(&object.object_type).as_deref() {
        Some([x, y, ..]) => Ok([x.clone(), y.clone()]),
        _ => Err(ProviderError::invalid(
            &object.object_id,
            "type",
            format!("cannot resolve coin types from fields or type {}", object.object_type),
        )),
    }
}

impl ObjectDecoder for CetusDecoder {
    fn pool_type_prefix(&self) -> &str {
        &self.pool_type
    }

    fn position_type(&self) -> &str {
        &self.position_type
    }

    fn pool_coin_types(&self, object: &LedgerObject) -> Result<[String; 2], ProviderError> {
        coin_types_from(object, "coin_type_a", "coin_type_b")
    }

    fn decode_pool(&self, object: &LedgerObject, coins: [Coin; 2]) -> Result<Pool, ProviderError> {
        let reader = FieldReader::of(object)?;
        Pool::new(PoolParams {
            id: object.object_id.clone(),
            coins,
            rewards: reward_infos(&reader)?,
            reserves: [reader.u128("coin_a")?, reader.u128("coin_b")?],
            fee: reader.u32("fee_rate")?,
            sqrt_price_x64: reader.u128("current_sqrt_price")?,
            tick_current: reader.tick("current_tick_index")?,
            tick_spacing: reader.get("tick_spacing").map(|_| reader.u32("tick_spacing")).transpose()?,
            liquidity: reader.u128("liquidity")?,
            fee_growth_global_x: reader.u128("fee_growth_global_a")?,
            fee_growth_global_y: reader.u128("fee_growth_global_b")?,
            protocol: Protocol::Cetus,
        })
        .map_err(domain_error(object))
    }

    fn position_pool_id(&self, object: &LedgerObject) -> Result<String, ProviderError> {
        Ok(FieldReader::of(object)?.string("pool")?.to_string())
    }

    fn decode_position(&self, object: &LedgerObject, pool: Pool) -> Result<Position, ProviderError> {
        let reader = FieldReader::of(object)?;
        let reward_infos = (0..REWARD_SLOTS)
            .map(|slot| {
                Ok(PositionRewardInfo {
                    coins_owed_reward: reader.u128(&format!("reward_amount_owed_{slot}"))?,
                    reward_growth_inside_last: reader.u128(&format!("reward_growth_inside_{slot}"))?,
                })
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        Position::new(PositionParams {
            id: object.object_id.clone(),
            owner: object.owner_address().to_string(),
            pool,
            liquidity: reader.u128("liquidity")?,
            tick_lower: reader.tick("tick_lower_index")?,
            tick_upper: reader.tick("tick_upper_index")?,
            fee_growth_inside_last_x: reader.u128("fee_growth_inside_a")?,
            fee_growth_inside_last_y: reader.u128("fee_growth_inside_b")?,
            coins_owed_x: reader.u128("fee_owed_a")?,
            coins_owed_y: reader.u128("fee_owed_b")?,
            reward_infos,
        })
        .map_err(domain_error(object))
    }
}
