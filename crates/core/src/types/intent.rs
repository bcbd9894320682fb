use alloy::primitives::Address;

use super::primitives::{MarketId, Outcome};

/// One "bet N tokens on outcome X" request, as typed by the user.
///
/// `amount` stays a decimal string until the orchestrator normalizes it, so
/// format errors surface as a failed run instead of at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerIntent {
    pub market_id: MarketId,
    pub outcome: Outcome,
    pub amount: String,
    pub account: Address,
}

impl WagerIntent {
    pub fn new(
        market_id: MarketId,
        outcome: Outcome,
        amount: impl Into<String>,
        account: Address,
    ) -> Self {
        Self {
            market_id,
            outcome,
            amount: amount.into(),
            account,
        }
    }
}
