//! Decoding of FlowX V3 pool and position objects.

use super::FlowXConfig;
use crate::cetus::decoder::{coin_types_from, reward_infos};
use crate::decoder::{ObjectDecoder, domain_error};
use crate::error::ProviderError;
use crate::ledger::LedgerObject;
use crate::parsers::FieldReader;
use clmm_rebalancer_domain::coin::Coin;
use clmm_rebalancer_domain::enums::{Protocol, Rounding};
use clmm_rebalancer_domain::math::{MAX_TICK, MIN_TICK, align_tick_to_spacing, clamp_tick_to_range};
use clmm_rebalancer_domain::pool::{Pool, PoolParams};
use clmm_rebalancer_domain::position::{Position, PositionParams, PositionRewardInfo};

/// Decodes FlowX V3 pool and position objects.
#[derive(Debug, Clone)]
pub struct FlowXDecoder {
    pool_type: String,
    position_type: String,
}

impl Default for FlowXDecoder {
    fn default() -> Self {
        Self::new(&FlowXConfig::default())
    }
}

impl FlowXDecoder {
    /// A decoder matching the object types of `config`.
    pub fn new(config: &FlowXConfig) -> Self {
        Self {
            pool_type: config.pool_type(),
            position_type: config.position_type(),
        }
    }
}

/// Snaps raw position ticks outward onto the spacing grid inside the global bounds.
///
/// A range that collapses is widened by one spacing, or pinned below the
/// highest aligned tick when there is no room above.
pub fn realign_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: u32) -> (i32, i32) {
    let mut lower = align_tick_to_spacing(tick_lower, tick_spacing, Rounding::Down);
    let mut upper = align_tick_to_spacing(tick_upper, tick_spacing, Rounding::Up);
    lower = clamp_tick_to_range(lower, tick_spacing, MIN_TICK, MAX_TICK);
    upper = clamp_tick_to_range(upper, tick_spacing, MIN_TICK, MAX_TICK);

    if lower >= upper {
        let spacing = tick_spacing as i32;
        let aligned_max = align_tick_to_spacing(MAX_TICK, tick_spacing, Rounding::Down);
        if lower + spacing <= aligned_max {
            upper = lower + spacing;
        } else {
            upper = aligned_max;
            lower = aligned_max - spacing;
        }
    }
    (lower, upper)
}

impl ObjectDecoder for FlowXDecoder {
    fn pool_type_prefix(&self) -> &str {
        &self.pool_type
    }

    fn position_type(&self) -> &str {
        &self.position_type
    }

    fn pool_coin_types(&self, object: &LedgerObject) -> Result<[String; 2], ProviderError> {
        coin_types_from(object, "coin_type_x", "coin_type_y")
    }

    fn decode_pool(&self, object: &LedgerObject, coins: [Coin; 2]) -> Result<Pool, ProviderError> {
        let reader = FieldReader::of(object)?;
        Pool::new(PoolParams {
            id: object.object_id.clone(),
            coins,
            rewards: reward_infos(&reader)?,
            reserves: [reader.u128("reserve_x")?, reader.u128("reserve_y")?],
            fee: reader.u32("swap_fee_rate")?,
            sqrt_price_x64: reader.u128("sqrt_price")?,
            tick_current: reader.tick("tick_index")?,
            tick_spacing: reader.get("tick_spacing").map(|_| reader.u32("tick_spacing")).transpose()?,
            liquidity: reader.u128("liquidity")?,
            fee_growth_global_x: reader.u128("fee_growth_global_x")?,
            fee_growth_global_y: reader.u128("fee_growth_global_y")?,
            protocol: Protocol::FlowXV3,
        })
        .map_err(domain_error(object))
    }

    fn position_pool_id(&self, object: &LedgerObject) -> Result<String, ProviderError> {
        Ok(FieldReader::of(object)?.string("pool_id")?.to_string())
    }

    fn decode_position(&self, object: &LedgerObject, pool: Pool) -> Result<Position, ProviderError> {
        let reader = FieldReader::of(object)?;
        let (tick_lower, tick_upper) = realign_ticks(
            reader.tick("tick_lower_index")?,
            reader.tick("tick_upper_index")?,
            pool.tick_spacing(),
        );
        let reward_infos = reader
            .struct_vec("reward_infos")?
            .iter()
            .map(|info| {
                Ok(PositionRewardInfo {
                    coins_owed_reward: info.u128("coins_owed_reward")?,
                    reward_growth_inside_last: info.u128("reward_growth_inside_last")?,
                })
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        Position::new(PositionParams {
            id: object.object_id.clone(),
            owner: object.owner_address().to_string(),
            pool,
            liquidity: reader.u128("liquidity")?,
            tick_lower,
            tick_upper,
            fee_growth_inside_last_x: reader.u128("fee_growth_inside_x_last")?,
            fee_growth_inside_last_y: reader.u128("fee_growth_inside_y_last")?,
            coins_owed_x: reader.u128("coins_owed_x")?,
            coins_owed_y: reader.u128("coins_owed_y")?,
            reward_infos,
        })
        .map_err(domain_error(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{flowx_pool_object, flowx_position_object, sui_usdc};

    #[test]
    fn test_realign_widens_outward() {
        assert_eq!(realign_ticks(-100, 100, 60), (-120, 120));
        assert_eq!(realign_ticks(-120, 120, 60), (-120, 120));
    }

    #[test]
    fn test_realign_repairs_collapsed_ranges() {
        assert_eq!(realign_ticks(60, 60, 60), (60, 120));
        // both bounds clamp onto the highest aligned tick
        assert_eq!(realign_ticks(443_630, 443_700, 60), (443_520, 443_580));
        assert_eq!(realign_ticks(-500_000, -460_000, 60), (-443_580, -443_520));
    }

    #[test]
    fn test_decodes_flowx_position() {
        let decoder = FlowXDecoder::default();
        let pool = decoder
            .decode_pool(&flowx_pool_object("0xc1", 30, 60), sui_usdc())
            .unwrap();
        assert_eq!(pool.protocol(), Protocol::FlowXV3);
        assert_eq!(pool.tick_current(), 30);

        let object = flowx_position_object("0xd1", "0xc1", "0xa11ce", -100, 100, 9_000);
        assert_eq!(decoder.position_pool_id(&object).unwrap(), "0xc1");
        let position = decoder.decode_position(&object, pool).unwrap();
        assert_eq!((position.tick_lower(), position.tick_upper()), (-120, 120));
        assert_eq!(position.owed_rewards(), vec![3]);
    }
}
