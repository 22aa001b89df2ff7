//! Builders for ledger objects and snapshots used in tests.

use crate::cetus::CetusConfig;
use crate::flowx::FlowXConfig;
use crate::ledger::{CoinMetadata, LedgerObject, ObjectContent};
use clmm_rebalancer_domain::coin::Coin;
use clmm_rebalancer_domain::enums::Protocol;
use clmm_rebalancer_domain::math::{tick_to_bits, tick_to_sqrt_price_x64};
use clmm_rebalancer_domain::pool::{Pool, PoolParams};
use clmm_rebalancer_domain::position::{FromAmounts, Position, PositionParams};
use serde_json::{Value, json};

/// Sui coin type.
pub const SUI: &str = "0x2::sui::SUI";
/// USDC coin type.
pub const USDC: &str =
    "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC";
/// Cetus token type, used as a reward coin.
pub const CETUS: &str =
    "0x06864a6f921804860930db6ddbe2e16acdf8504495ea7481637a1c8b9a8fe54b::cetus::CETUS";

/// SUI and USDC with metadata, in X/Y order.
pub fn sui_usdc() -> [Coin; 2] {
    [
        Coin::new(SUI).with_metadata(9, "SUI", "Sui"),
        Coin::new(USDC).with_metadata(6, "USDC", "USD Coin"),
    ]
}

/// Metadata entries for SUI and USDC.
pub fn coin_metadata() -> Vec<(String, CoinMetadata)> {
    vec![
        (
            SUI.to_string(),
            CoinMetadata {
                decimals: 9,
                symbol: "SUI".to_string(),
                name: "Sui".to_string(),
            },
        ),
        (
            USDC.to_string(),
            CoinMetadata {
                decimals: 6,
                symbol: "USDC".to_string(),
                name: "USD Coin".to_string(),
            },
        ),
    ]
}

fn sqrt_price(tick: i32) -> String {
    tick_to_sqrt_price_x64(tick).unwrap_or_default().to_string()
}

fn bits(tick: i32) -> Value {
    json!({ "type": "0x1::i32::I32", "fields": { "bits": tick_to_bits(tick) } })
}

fn move_object(object_id: &str, object_type: String, owner: Option<&str>, fields: Value) -> LedgerObject {
    LedgerObject {
        object_id: object_id.to_string(),
        object_type,
        owner: Some(match owner {
            Some(address) => json!({ "AddressOwner": address }),
            None => json!({ "Shared": { "initial_shared_version": 1 } }),
        }),
        content: Some(ObjectContent {
            data_type: "moveObject".to_string(),
            fields,
        }),
    }
}

fn reward_info(total_reward: u128) -> Value {
    json!({
        "type": "reward_info",
        "fields": {
            "reward_coin_type": {
                "type": "0x1::type_name::TypeName",
                "fields": { "name": CETUS.trim_start_matches("0x") }
            },
            "ended_at_seconds": "1800000000",
            "last_update_time": "1700000000",
            "reward_per_seconds": "1000",
            "total_reward": total_reward.to_string(),
            "total_reward_allocated": "0",
            "reward_growth_global": "0"
        }
    })
}

/// A shared Cetus SUI/USDC pool with one reward slot.
pub fn cetus_pool_object(pool_id: &str, tick_current: i32, tick_spacing: u32) -> LedgerObject {
    let object_type = format!("{}<{SUI}, {USDC}>", CetusConfig::default().pool_type());
    move_object(
        pool_id,
        object_type,
        None,
        json!({
            "id": { "id": pool_id },
            "coin_a": "1000000000000",
            "coin_b": "3000000000",
            "current_sqrt_price": sqrt_price(tick_current),
            "current_tick_index": bits(tick_current),
            "tick_spacing": tick_spacing,
            "fee_rate": "2500",
            "liquidity": "10000000000",
            "fee_growth_global_a": "0",
            "fee_growth_global_b": "0",
            "reward_infos": [reward_info(1_000_000)]
        }),
    )
}

/// A Cetus position owned by `owner`.
pub fn cetus_position_object(
    position_id: &str,
    pool_id: &str,
    owner: &str,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> LedgerObject {
    move_object(
        position_id,
        CetusConfig::default().position_type(),
        Some(owner),
        json!({
            "id": { "id": position_id },
            "pool": pool_id,
            "liquidity": liquidity.to_string(),
            "tick_lower_index": bits(tick_lower),
            "tick_upper_index": bits(tick_upper),
            "fee_growth_inside_a": "0",
            "fee_growth_inside_b": "0",
            "fee_owed_a": "11",
            "fee_owed_b": "13",
            "reward_amount_owed_0": "7",
            "reward_amount_owed_1": "0",
            "reward_amount_owed_2": "0",
            "reward_growth_inside_0": "0",
            "reward_growth_inside_1": "0",
            "reward_growth_inside_2": "0"
        }),
    )
}

/// A shared FlowX SUI/USDC pool.
pub fn flowx_pool_object(pool_id: &str, tick_current: i32, tick_spacing: u32) -> LedgerObject {
    let object_type = format!("{}<{SUI}, {USDC}>", FlowXConfig::default().pool_type());
    move_object(
        pool_id,
        object_type,
        None,
        json!({
            "id": { "id": pool_id },
            "coin_type_x": { "type": "0x1::type_name::TypeName", "fields": { "name": SUI.trim_start_matches("0x") } },
            "coin_type_y": { "type": "0x1::type_name::TypeName", "fields": { "name": USDC.trim_start_matches("0x") } },
            "reserve_x": "1000000000000",
            "reserve_y": "3000000000",
            "sqrt_price": sqrt_price(tick_current),
            "swap_fee_rate": "3000",
            "tick_index": bits(tick_current),
            "tick_spacing": tick_spacing,
            "liquidity": "10000000000",
            "fee_growth_global_x": "0",
            "fee_growth_global_y": "0",
            "reward_infos": []
        }),
    )
}

/// A FlowX position owned by `owner`.
pub fn flowx_position_object(
    position_id: &str,
    pool_id: &str,
    owner: &str,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> LedgerObject {
    move_object(
        position_id,
        FlowXConfig::default().position_type(),
        Some(owner),
        json!({
            "id": { "id": position_id },
            "pool_id": pool_id,
            "liquidity": liquidity.to_string(),
            "tick_lower_index": bits(tick_lower),
            "tick_upper_index": bits(tick_upper),
            "coins_owed_x": "5",
            "coins_owed_y": "6",
            "fee_growth_inside_x_last": "0",
            "fee_growth_inside_y_last": "0",
            "reward_infos": [{
                "type": "position_reward_info",
                "fields": { "coins_owed_reward": "3", "reward_growth_inside_last": "0" }
            }]
        }),
    )
}

/// A pool snapshot at `tick_current` with SUI/USDC coins and no rewards.
pub fn pool(protocol: Protocol, tick_current: i32, tick_spacing: u32) -> Pool {
    Pool::new(PoolParams {
        id: "0xa1".to_string(),
        coins: sui_usdc(),
        rewards: Vec::new(),
        reserves: [1_000_000_000_000, 3_000_000_000],
        fee: 2_500,
        sqrt_price_x64: tick_to_sqrt_price_x64(tick_current).unwrap_or_default(),
        tick_current,
        tick_spacing: Some(tick_spacing),
        liquidity: 10_000_000_000,
        fee_growth_global_x: 0,
        fee_growth_global_y: 0,
        protocol,
    })
    .unwrap_or_else(|e| panic!("fixture pool: {e}"))
}

/// A position `0xb1` read from the ledger.
pub fn materialized(
    protocol: Protocol,
    tick_current: i32,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> Position {
    Position::new(PositionParams {
        id: "0xb1".to_string(),
        owner: "0xa11ce".to_string(),
        pool: pool(protocol, tick_current, 60),
        liquidity,
        tick_lower,
        tick_upper,
        fee_growth_inside_last_x: 0,
        fee_growth_inside_last_y: 0,
        coins_owed_x: 0,
        coins_owed_y: 0,
        reward_infos: Vec::new(),
    })
    .unwrap_or_else(|e| panic!("fixture position: {e}"))
}

/// A position sized from fixed deposit amounts.
pub fn projected(protocol: Protocol, tick_current: i32, tick_lower: i32, tick_upper: i32) -> Position {
    Position::from_amounts(FromAmounts {
        owner: "0xa11ce".to_string(),
        pool: pool(protocol, tick_current, 60),
        tick_lower,
        tick_upper,
        amount_x: 1_000_000_000,
        amount_y: 3_000_000,
    })
    .unwrap_or_else(|e| panic!("fixture projection: {e}"))
}
