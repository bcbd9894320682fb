//! Exact conversion between user-typed decimal strings and integer token
//! amounts in the smallest unit.

use alloy::primitives::U256;

use crate::{error::AmountError, types::TokenAmount};

/// Parses `input` (e.g. `"12.5"`) into smallest units at `decimals` precision.
///
/// Accepts plain digits with an optional fractional part. Signs, exponents,
/// separators, a bare `.` and zero are rejected, as is any input with more
/// fractional digits than `decimals`.
pub fn to_smallest_unit(input: &str, decimals: u8) -> Result<TokenAmount, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => {
            if fraction.is_empty() {
                return Err(AmountError::NonNumeric(trimmed.to_string()));
            }
            (whole, fraction)
        }
        None => (trimmed, ""),
    };

    if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::NonNumeric(trimmed.to_string()));
    }

    if fraction.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals {
            found: fraction.len(),
            max: decimals,
        });
    }

    let scale = U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or(AmountError::Overflow)?;

    let whole = parse_digits(whole)?;
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{fraction:0<width$}", width = decimals as usize);
        parse_digits(&padded)?
    };

    let value = whole
        .checked_mul(scale)
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or(AmountError::Overflow)?;

    if value.is_zero() {
        return Err(AmountError::Zero);
    }

    Ok(TokenAmount::new(value))
}

/// Renders `amount` as a decimal string with trailing fractional zeros
/// removed. Inverse of [`to_smallest_unit`] up to that normalization.
pub fn to_display_string(amount: TokenAmount, decimals: u8) -> String {
    let digits = amount.as_u256().to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_digits(s: &str) -> Result<U256, AmountError> {
    U256::from_str_radix(s, 10).map_err(|_| AmountError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDC: u8 = 6;

    fn normalized(s: &str) -> String {
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let whole = whole.trim_start_matches('0');
        let whole = if whole.is_empty() { "0" } else { whole };
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{fraction}")
        }
    }

    #[test]
    fn converts_whole_and_fractional_amounts() {
        assert_eq!(to_smallest_unit("1", USDC), Ok(TokenAmount::from(1_000_000)));
        assert_eq!(to_smallest_unit("12.5", USDC), Ok(TokenAmount::from(12_500_000)));
        assert_eq!(to_smallest_unit("0.000001", USDC), Ok(TokenAmount::from(1)));
        assert_eq!(to_smallest_unit(" 50 ", USDC), Ok(TokenAmount::from(50_000_000)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(to_smallest_unit("", USDC), Err(AmountError::Empty));
        assert_eq!(to_smallest_unit("-1", USDC), Err(AmountError::Negative));
        assert_eq!(to_smallest_unit("0", USDC), Err(AmountError::Zero));
        assert_eq!(to_smallest_unit("0.000", USDC), Err(AmountError::Zero));
        for bad in ["abc", "1.2.3", "1e6", "+1", "1,000", ".5", "5.", "1_000"] {
            assert!(
                matches!(to_smallest_unit(bad, USDC), Err(AmountError::NonNumeric(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_excess_precision() {
        assert_eq!(
            to_smallest_unit("1.0000001", USDC),
            Err(AmountError::TooManyDecimals { found: 7, max: 6 })
        );
        assert_eq!(
            to_smallest_unit("1.5", 0),
            Err(AmountError::TooManyDecimals { found: 1, max: 0 })
        );
    }

    #[test]
    fn detects_overflow() {
        let huge = "1".repeat(80);
        assert_eq!(to_smallest_unit(&huge, USDC), Err(AmountError::Overflow));
        assert_eq!(to_smallest_unit("1", 78), Err(AmountError::Overflow));
    }

    #[test]
    fn displays_with_trailing_zeros_trimmed() {
        assert_eq!(to_display_string(TokenAmount::from(12_500_000), USDC), "12.5");
        assert_eq!(to_display_string(TokenAmount::from(1), USDC), "0.000001");
        assert_eq!(to_display_string(TokenAmount::from(3_000_000), USDC), "3");
        assert_eq!(to_display_string(TokenAmount::ZERO, USDC), "0");
        assert_eq!(to_display_string(TokenAmount::from(42), 0), "42");
    }

    #[test]
    fn displays_unbounded_allowance() {
        let rendered = to_display_string(TokenAmount::MAX, 18);
        assert!(rendered.starts_with("115792089237316195423570985008687907853269984665640564039457."));
    }

    #[test]
    fn round_trips_valid_amounts() {
        let samples = [
            "1", "100", "0.5", "12.50", "007.25", "999999.999999", "0.000001", "1000000",
            "3.141592",
        ];
        for decimals in [USDC, 8, 18] {
            for sample in samples {
                let units = to_smallest_unit(sample, decimals).expect("valid amount");
                assert_eq!(
                    to_display_string(units, decimals),
                    normalized(sample),
                    "{sample} at {decimals} decimals"
                );
            }
        }
    }
}
