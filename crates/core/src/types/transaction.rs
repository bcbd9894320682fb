use std::fmt;

use alloy::primitives::{Address, TxHash};
use chrono::{DateTime, Utc};

use super::primitives::{MarketId, Outcome, TokenAmount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxKind {
    Authorize,
    Wager,
    Claim,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Authorize => f.write_str("authorize"),
            TxKind::Wager => f.write_str("wager"),
            TxKind::Claim => f.write_str("claim"),
        }
    }
}

/// A state-changing call to sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxAction {
    Authorize {
        spender: Address,
        amount: TokenAmount,
    },
    Wager {
        market_id: MarketId,
        outcome: Outcome,
        amount: TokenAmount,
    },
    Claim {
        market_id: MarketId,
    },
}

impl TxAction {
    pub fn kind(&self) -> TxKind {
        match self {
            TxAction::Authorize { .. } => TxKind::Authorize,
            TxAction::Wager { .. } => TxKind::Wager,
            TxAction::Claim { .. } => TxKind::Claim,
        }
    }
}

/// A broadcast transaction whose fate is not yet known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHandle {
    pub hash: TxHash,
    pub kind: TxKind,
    pub submitted_at: DateTime<Utc>,
}

impl TransactionHandle {
    pub fn new(hash: TxHash, kind: TxKind) -> Self {
        Self {
            hash,
            kind,
            submitted_at: Utc::now(),
        }
    }
}

/// Terminal report from the confirmation watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Reverted,
    /// Nothing observed inside the patience window. The transaction may
    /// still land.
    TimedOut,
}
