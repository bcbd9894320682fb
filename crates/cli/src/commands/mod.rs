pub mod balance;
pub mod bet;
pub mod claim;
pub mod status;
pub mod traders;

use wager_core::{TokenAmount, amount::to_display_string};

pub(crate) fn format_amount(amount: TokenAmount, decimals: u8, symbol: &str) -> String {
    if amount.is_unbounded() {
        return format!("unlimited {symbol}");
    }
    format!("{} {symbol}", to_display_string(amount, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_amounts_with_symbol() {
        assert_eq!(
            format_amount(TokenAmount::from(12_500_000), 6, "USDC"),
            "12.5 USDC"
        );
        assert_eq!(format_amount(TokenAmount::MAX, 6, "USDC"), "unlimited USDC");
    }
}
