use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use std::str::FromStr;

/// STORJ's ERC-20 contract declares 6 decimals, matching the micro-USD
/// scale used for pricing below.
pub const TOKEN_DECIMALS: u32 = 6;
/// Micro-USD has 6 decimals (1 USD == 1_000_000 micro-USD).
pub const USD_DECIMALS: u32 = 6;

/// `USD = tokenAmount * price`, both represented as integer base units with
/// a declared exponent (spec.md §4.C). The multiplication is performed as
/// arbitrary-precision decimals and coerced back to integer micro-USD.
pub fn usd_value(token_base_units: U256, price_micro_usd: i64) -> BigDecimal {
    let token = BigDecimal::from_str(&token_base_units.to_string())
        .expect("U256 decimal string always parses");
    let token_scale = BigDecimal::from(10u64.pow(TOKEN_DECIMALS));
    let token_whole = token / token_scale;

    let price = BigDecimal::from(price_micro_usd) / BigDecimal::from(10u64.pow(USD_DECIMALS));

    let usd_whole = token_whole * price;
    (usd_whole * BigDecimal::from(10u64.pow(USD_DECIMALS))).round(0)
}

/// Coerce a [`usd_value`] result down to an `i64` micro-USD amount,
/// failing loudly rather than truncating silently on overflow (spec.md §9).
pub fn usd_value_micro_usd(token_base_units: U256, price_micro_usd: i64) -> Option<i64> {
    use bigdecimal::ToPrimitive;
    usd_value(token_base_units, price_micro_usd).to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_thousand_base_units_at_two_dollars_is_twenty_thousand_micro_usd() {
        let value = usd_value_micro_usd(U256::from(10_000u64), 2_000_000).unwrap();
        assert_eq!(value, 20_000);
    }

    #[test]
    fn one_whole_token_at_two_dollars_is_two_dollars() {
        let one_token = U256::from(10u64.pow(TOKEN_DECIMALS));
        let value = usd_value_micro_usd(one_token, 2_000_000).unwrap();
        assert_eq!(value, 2_000_000);
    }
}
