use crate::types::REFERENCE_DECIMALS;
use alloy::primitives::U256;

/// 2^96, the Q96 fixed-point denominator.
const Q96: f64 = 79228162514264337593543950336.0;

/// Closest `f64` to `value`. Precision beyond 53 bits is dropped.
pub fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(f64::INFINITY)
}

/// `(sqrtPriceX96 / 2^96)^2`: raw token1-per-token0 ratio, without decimal adjustment.
pub fn sqrt_price_x96_to_ratio(sqrt_price_x96: U256) -> f64 {
    let sqrt_price = u256_to_f64(sqrt_price_x96) / Q96;
    sqrt_price * sqrt_price
}

/// `10^(18 - decimals)`. Tokens with more than 18 decimals get a fractional scalar.
pub fn decimal_scalar(token_decimals: u8) -> f64 {
    10f64.powi(REFERENCE_DECIMALS as i32 - token_decimals as i32)
}

/// USD price per whole token from a pool's Q96 square-root price.
///
/// When the reference asset sits in slot 0 the raw ratio is inverted before
/// rescaling; the result is then divided by [`decimal_scalar`] and multiplied
/// by the reference asset's USD `exchange_rate`.
pub fn calculate_adjusted_price(
    sqrt_price_x96: U256,
    token_decimals: u8,
    token0_is_reference: bool,
    exchange_rate: f64,
) -> f64 {
    let ratio = sqrt_price_x96_to_ratio(sqrt_price_x96);
    let price_per_reference = if token0_is_reference { 1.0 / ratio } else { ratio };
    let adjusted = price_per_reference / decimal_scalar(token_decimals);
    adjusted * exchange_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        ((a - b) / b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_round_trip_for_known_sqrt() {
        // sqrt = 1.5 * 2^96 encodes r = 1.5
        let sqrt = U256::from(3u64) << 95;
        let price = calculate_adjusted_price(sqrt, 18, false, 1.0);
        assert!(approx_eq(price, 2.25));
    }

    #[test]
    fn test_reference_in_slot0_inverts_ratio() {
        let sqrt = U256::from(1u64) << 97; // ratio 4
        let price = calculate_adjusted_price(sqrt, 18, true, 1.0);
        assert!(approx_eq(price, 0.25));
    }

    #[test]
    fn test_usdc_weth_pool_prices_weth_side() {
        // token0 = USDC (6 decimals), token1 = WETH: 1 ETH = 2000 USDC
        // raw ratio = WETH wei per USDC unit = 10^18 / (2000 * 10^6)
        let raw_ratio: f64 = 1e18 / 2000e6;
        let sqrt = U256::from((raw_ratio.sqrt() * Q96) as u128);

        // WETH in slot 1, so the raw ratio is used directly for USDC
        let price = calculate_adjusted_price(sqrt, 6, false, 2000.0);
        assert!((price - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_exchange_rate_scales_linearly() {
        let sqrt = U256::from(1u64) << 96;
        let one = calculate_adjusted_price(sqrt, 18, false, 1.0);
        let rate = calculate_adjusted_price(sqrt, 18, false, 3920.84);
        assert!(approx_eq(rate, one * 3920.84));
    }

    #[test]
    fn test_decimal_scalar_above_reference_precision() {
        assert!(approx_eq(decimal_scalar(24), 1e-6));
        assert!(approx_eq(decimal_scalar(6), 1e12));
        assert_eq!(decimal_scalar(18), 1.0);

        let price = calculate_adjusted_price(U256::from(1u64) << 96, 24, false, 1.0);
        assert!(price.is_finite());
        assert!(approx_eq(price, 1e6));
    }

    #[test]
    fn test_u256_to_f64_is_exact_for_small_values() {
        assert_eq!(u256_to_f64(U256::from(123_456_789u64)), 123_456_789.0);
        assert_eq!(u256_to_f64(U256::ZERO), 0.0);
    }
}
