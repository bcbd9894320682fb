use alloy::primitives::Address;

use super::primitives::TokenAmount;

/// Advisory copy of an on-chain allowance. The token contract stays the
/// source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceSnapshot {
    pub owner: Address,
    pub spender: Address,
    pub amount: TokenAmount,
}

impl AllowanceSnapshot {
    pub fn new(owner: Address, spender: Address, amount: TokenAmount) -> Self {
        Self {
            owner,
            spender,
            amount,
        }
    }
}
