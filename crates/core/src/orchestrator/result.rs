use crate::types::{OrchestratorState, TokenAmount, TransactionHandle};

/// Proof of a settled wager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerReceipt {
    pub amount: TokenAmount,
    /// Present only when the run had to authorize spending first.
    pub authorization: Option<TransactionHandle>,
    pub wager: TransactionHandle,
}

/// One edge of the state machine, in the order it was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: OrchestratorState,
    pub to: OrchestratorState,
}

/// Handles created so far by the current run.
#[derive(Debug, Default)]
pub(crate) struct RunProgress {
    pub amount: Option<TokenAmount>,
    pub authorization: Option<TransactionHandle>,
    pub wager: Option<TransactionHandle>,
}

impl RunProgress {
    pub fn into_receipt(self) -> Option<WagerReceipt> {
        Some(WagerReceipt {
            amount: self.amount?,
            authorization: self.authorization,
            wager: self.wager?,
        })
    }
}
