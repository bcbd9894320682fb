use alloy::primitives::Address;

use super::primitives::{MarketId, Outcome, TokenAmount};

/// Read-only view of a market as reported by the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSummary {
    pub id: MarketId,
    pub creator: Address,
    pub question: String,
    pub end_time: u64,
    /// `Some` once the market has been resolved.
    pub resolution: Option<Outcome>,
    pub total_yes: TokenAmount,
    pub total_no: TokenAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub yes: TokenAmount,
    pub no: TokenAmount,
    pub claimed: bool,
}

impl Position {
    pub fn is_empty(&self) -> bool {
        self.yes.is_zero() && self.no.is_zero()
    }
}
