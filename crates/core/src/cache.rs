use alloy::primitives::TxHash;

use crate::types::{AllowanceSnapshot, BlockNumber, TokenAmount};

/// Tells subscribers that cached balance/allowance figures are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    NewBlock(BlockNumber),
    WagerSettled(TxHash),
    RunFailed,
}

/// Last balance and allowance seen for the session's account.
///
/// Advisory only: the orchestrator never decides on these values, it always
/// reads the ledger afresh when a submission starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerCache {
    balance: Option<TokenAmount>,
    allowance: Option<AllowanceSnapshot>,
}

impl LedgerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, balance: TokenAmount, allowance: AllowanceSnapshot) {
        self.balance = Some(balance);
        self.allowance = Some(allowance);
    }

    pub fn invalidate(&mut self) {
        self.balance = None;
        self.allowance = None;
    }

    pub fn balance(&self) -> Option<TokenAmount> {
        self.balance
    }

    pub fn allowance(&self) -> Option<AllowanceSnapshot> {
        self.allowance
    }

    pub fn is_stale(&self) -> bool {
        self.balance.is_none() || self.allowance.is_none()
    }
}
