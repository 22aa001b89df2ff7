//! Conversions between tick indices and 64.64 fixed point square root prices.

use crate::enums::Rounding;
use crate::error::MathError;
use primitive_types::U256;

/// Lowest supported tick index.
pub const MIN_TICK: i32 = -443_636;
/// Highest supported tick index.
pub const MAX_TICK: i32 = 443_636;
/// `tick_to_sqrt_price_x64(MIN_TICK)`.
pub const MIN_SQRT_RATIO: u128 = 4_295_048_016;
/// `tick_to_sqrt_price_x64(MAX_TICK)`.
pub const MAX_SQRT_RATIO: u128 = 79_226_673_515_401_279_992_447_579_055;
/// `2^64`, the unit of a 64.64 fixed point value.
pub const Q64: u128 = 1 << 64;
/// Width of the two's complement encoding of on-chain tick indices.
pub const TICK_INDEX_BITS: u32 = 32;

const BIT_PRECISION: u32 = 14;
const LOG_B_2_X32: i128 = 59_543_866_431_248;
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184_467_440_737_095_516;
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15_793_534_762_490_258_745;

// sqrt(1.0001^(2^i)) in Q96 for i = 1..=18.
const POSITIVE_LADDER: [u128; 18] = [
    79_236_085_330_515_764_027_303_304_731,
    79_244_008_939_048_815_603_706_035_061,
    79_259_858_533_276_714_757_314_932_305,
    79_291_567_232_598_584_799_939_703_904,
    79_355_022_692_464_371_645_785_046_466,
    79_482_085_999_252_804_386_437_311_141,
    79_736_823_300_114_093_921_829_183_326,
    80_248_749_790_819_932_309_965_073_892,
    81_282_483_887_344_747_381_513_967_011,
    83_390_072_131_320_151_908_154_831_281,
    87_770_609_709_833_776_024_991_924_138,
    97_234_110_755_111_693_312_479_820_773,
    119_332_217_159_966_728_226_237_229_890,
    179_736_315_981_702_064_433_883_588_727,
    407_748_233_172_238_350_107_850_275_304,
    2_098_478_828_474_011_932_436_660_412_517,
    55_581_415_166_113_811_149_459_800_483_533,
    38_992_368_544_603_139_932_233_054_999_993_551,
];
const POSITIVE_ODD: u128 = 79_232_123_823_359_799_118_286_999_567;
const POSITIVE_ONE: u128 = 79_228_162_514_264_337_593_543_950_336;

// sqrt(1.0001^-(2^i)) in Q64 for i = 1..=18.
const NON_POSITIVE_LADDER: [u128; 18] = [
    18_444_899_583_751_176_498,
    18_443_055_278_223_354_162,
    18_439_367_220_385_604_838,
    18_431_993_317_065_449_817,
    18_417_254_355_718_160_513,
    18_387_811_781_193_591_352,
    18_329_067_761_203_520_168,
    18_212_142_134_806_087_854,
    17_980_523_815_641_551_639,
    17_526_086_738_831_147_013,
    16_651_378_430_235_024_244,
    15_030_750_278_693_429_944,
    12_247_334_978_882_834_399,
    8_131_365_268_884_726_200,
    3_584_323_654_723_342_297,
    696_457_651_847_595_233,
    26_294_789_957_452_057,
    37_481_735_321_082,
];
const NON_POSITIVE_ODD: u128 = 18_445_821_805_675_392_311;

fn sqrt_price_positive(tick: u32) -> u128 {
    let mut ratio = U256::from(if tick & 1 != 0 {
        POSITIVE_ODD
    } else {
        POSITIVE_ONE
    });
    for (i, magic) in POSITIVE_LADDER.iter().enumerate() {
        if tick & (2 << i) != 0 {
            ratio = (ratio * U256::from(*magic)) >> 96;
        }
    }
    (ratio >> 32).low_u128()
}

fn sqrt_price_non_positive(tick: u32) -> u128 {
    let mut ratio = if tick & 1 != 0 { NON_POSITIVE_ODD } else { Q64 };
    for (i, magic) in NON_POSITIVE_LADDER.iter().enumerate() {
        if tick & (2 << i) != 0 {
            // ratio <= 2^64 and magic < 2^64, so the product stays below 2^128.
            ratio = (ratio * magic) >> 64;
        }
    }
    ratio
}

// Accepts any |tick| below 2^19; bound checks live in the public entry point.
fn sqrt_price_at(tick: i32) -> u128 {
    if tick > 0 {
        sqrt_price_positive(tick.unsigned_abs())
    } else {
        sqrt_price_non_positive(tick.unsigned_abs())
    }
}

/// Converts a tick index to its square root price in 64.64 fixed point.
///
/// Evaluates `sqrt(1.0001^tick) * 2^64` by binary exponentiation over a
/// ladder of precomputed constants with 256-bit intermediates.
pub fn tick_to_sqrt_price_x64(tick: i32) -> Result<u128, MathError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::OutOfRange {
            what: "tick",
            value: tick.to_string(),
            min: MIN_TICK.to_string(),
            max: MAX_TICK.to_string(),
        });
    }
    Ok(sqrt_price_at(tick))
}

/// Converts a square root price to the greatest tick whose price does not exceed it.
pub fn sqrt_price_x64_to_tick(sqrt_price_x64: u128) -> Result<i32, MathError> {
    if !(MIN_SQRT_RATIO..=MAX_SQRT_RATIO).contains(&sqrt_price_x64) {
        return Err(MathError::OutOfRange {
            what: "sqrt price",
            value: sqrt_price_x64.to_string(),
            min: MIN_SQRT_RATIO.to_string(),
            max: MAX_SQRT_RATIO.to_string(),
        });
    }

    let msb = 127 - sqrt_price_x64.leading_zeros();
    let log2p_integer_x32 = (i128::from(msb) - 64) << 32;

    // Normalize into [2^63, 2^64) and extract fractional log2 bits by squaring.
    let mut r = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };
    let mut bit: u128 = 0x8000_0000_0000_0000;
    let mut log2p_fraction_x64: u128 = 0;
    for _ in 0..BIT_PRECISION {
        r *= r;
        let more_than_two = r >> 127;
        r >>= 63 + more_than_two;
        log2p_fraction_x64 += bit * more_than_two;
        bit >>= 1;
    }

    let log2p_x32 = log2p_integer_x32 + (log2p_fraction_x64 >> 32) as i128;
    let logbp_x64 = log2p_x32 * LOG_B_2_X32;

    let tick_low = narrow_tick((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64)?;
    let tick_high = narrow_tick((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64)?;

    if tick_low == tick_high || sqrt_price_at(tick_high) > sqrt_price_x64 {
        Ok(tick_low)
    } else {
        Ok(tick_high)
    }
}

fn narrow_tick(value: i128) -> Result<i32, MathError> {
    i32::try_from(value).map_err(|_| MathError::Overflow("tick index"))
}

/// Truncates `tick` toward zero onto the spacing grid.
pub fn initializable_tick_index(tick: i32, tick_spacing: u32) -> i32 {
    let spacing = tick_spacing as i32;
    if spacing == 0 {
        return tick;
    }
    tick - tick % spacing
}

/// Snaps `tick` onto the spacing grid in the given direction.
pub fn align_tick_to_spacing(tick: i32, tick_spacing: u32, rounding: Rounding) -> i32 {
    if tick_spacing == 0 {
        return tick;
    }
    let tick = i64::from(tick);
    let spacing = i64::from(tick_spacing);
    let units = match rounding {
        Rounding::Down => tick.div_euclid(spacing),
        Rounding::Up => -(-tick).div_euclid(spacing),
        Rounding::HalfUp => (2 * tick + spacing).div_euclid(2 * spacing),
    };
    saturate_tick(units * spacing)
}

/// Clamps `tick` into `[min_tick, max_tick]` shrunk to the spacing grid.
pub fn clamp_tick_to_range(tick: i32, tick_spacing: u32, min_tick: i32, max_tick: i32) -> i32 {
    let aligned_min = align_tick_to_spacing(min_tick, tick_spacing, Rounding::Up);
    let aligned_max = align_tick_to_spacing(max_tick, tick_spacing, Rounding::Down);
    tick.clamp(aligned_min, aligned_max.max(aligned_min))
}

pub(crate) fn saturate_tick(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Decodes a two's complement tick stored in the low 32 bits of `bits`.
pub fn tick_from_bits(bits: u64) -> i32 {
    (bits as u32) as i32
}

/// Encodes a tick in its unsigned two's complement form.
pub fn tick_to_bits(tick: i32) -> u32 {
    tick as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(tick_to_sqrt_price_x64(0).unwrap(), Q64);
        assert_eq!(tick_to_sqrt_price_x64(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(tick_to_sqrt_price_x64(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
        assert_eq!(tick_to_sqrt_price_x64(1).unwrap(), 18_447_666_387_855_959_850);
        assert_eq!(tick_to_sqrt_price_x64(-1).unwrap(), 18_445_821_805_675_392_311);
        assert_eq!(tick_to_sqrt_price_x64(100).unwrap(), 18_539_204_128_674_405_812);
        assert_eq!(tick_to_sqrt_price_x64(1000).unwrap(), 19_392_480_388_906_836_277);
        assert_eq!(tick_to_sqrt_price_x64(2000).unwrap(), 20_386_703_156_472_572_688);
    }

    #[test]
    fn test_tick_out_of_range() {
        assert!(matches!(
            tick_to_sqrt_price_x64(MAX_TICK + 1),
            Err(MathError::OutOfRange { what: "tick", .. })
        ));
        assert!(tick_to_sqrt_price_x64(MIN_TICK - 1).is_err());
    }

    #[test]
    fn test_sqrt_price_bounds() {
        assert_eq!(sqrt_price_x64_to_tick(MIN_SQRT_RATIO).unwrap(), MIN_TICK);
        assert_eq!(sqrt_price_x64_to_tick(MAX_SQRT_RATIO).unwrap(), MAX_TICK);
        assert!(sqrt_price_x64_to_tick(MIN_SQRT_RATIO - 1).is_err());
        assert!(sqrt_price_x64_to_tick(MAX_SQRT_RATIO + 1).is_err());
    }

    #[test]
    fn test_sqrt_price_between_ticks_rounds_down() {
        let at_100 = tick_to_sqrt_price_x64(100).unwrap();
        assert_eq!(sqrt_price_x64_to_tick(at_100 + 1).unwrap(), 100);
        assert_eq!(sqrt_price_x64_to_tick(at_100 - 1).unwrap(), 99);
    }

    #[test]
    fn test_alignment_helpers() {
        assert_eq!(initializable_tick_index(125, 60), 120);
        assert_eq!(initializable_tick_index(-125, 60), -120);

        assert_eq!(align_tick_to_spacing(-125, 60, Rounding::Down), -180);
        assert_eq!(align_tick_to_spacing(-125, 60, Rounding::Up), -120);
        assert_eq!(align_tick_to_spacing(-150, 60, Rounding::HalfUp), -120);
        assert_eq!(align_tick_to_spacing(150, 60, Rounding::HalfUp), 180);
        assert_eq!(align_tick_to_spacing(120, 60, Rounding::Up), 120);

        assert_eq!(clamp_tick_to_range(500_000, 60, MIN_TICK, MAX_TICK), 443_580);
        assert_eq!(clamp_tick_to_range(-500_000, 60, MIN_TICK, MAX_TICK), -443_580);
        assert_eq!(clamp_tick_to_range(600, 60, MIN_TICK, MAX_TICK), 600);
    }

    #[test]
    fn test_tick_bits() {
        assert_eq!(tick_from_bits(u64::from(u32::MAX)), -1);
        assert_eq!(tick_from_bits(4_294_966_296), -1000);
        assert_eq!(tick_from_bits(1000), 1000);
        assert_eq!(tick_to_bits(-1000), 4_294_966_296);
    }

    proptest! {
        #[test]
        fn prop_round_trip(tick in MIN_TICK..=MAX_TICK) {
            let sqrt_price = tick_to_sqrt_price_x64(tick).unwrap();
            prop_assert_eq!(sqrt_price_x64_to_tick(sqrt_price).unwrap(), tick);
        }

        #[test]
        fn prop_strictly_increasing(tick in MIN_TICK..MAX_TICK) {
            let here = tick_to_sqrt_price_x64(tick).unwrap();
            let next = tick_to_sqrt_price_x64(tick + 1).unwrap();
            prop_assert!(here < next);
        }
    }
}
