use std::fmt;

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::error::{AmountError, SubmitError};

use super::{
    primitives::TokenAmount,
    transaction::{TransactionHandle, TxKind},
};

/// Where a single wager run currently stands.
///
/// At most one of the `Awaiting*` states holds a handle at any time, so no
/// two transactions of one session are ever pending together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrchestratorState {
    #[default]
    Idle,
    CheckingAllowance,
    Authorizing,
    AwaitingAuthorizationConfirmation(TransactionHandle),
    PlacingWager,
    AwaitingWagerConfirmation(TransactionHandle),
    Succeeded,
    Failed(FailureReason),
}

impl OrchestratorState {
    pub fn is_idle(&self) -> bool {
        matches!(self, OrchestratorState::Idle)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrchestratorState::Succeeded | OrchestratorState::Failed(_)
        )
    }

    pub fn is_in_flight(&self) -> bool {
        !self.is_idle() && !self.is_terminal()
    }

    pub fn pending(&self) -> Option<&TransactionHandle> {
        match self {
            OrchestratorState::AwaitingAuthorizationConfirmation(handle)
            | OrchestratorState::AwaitingWagerConfirmation(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrchestratorState::Idle => "Idle",
            OrchestratorState::CheckingAllowance => "CheckingAllowance",
            OrchestratorState::Authorizing => "Authorizing",
            OrchestratorState::AwaitingAuthorizationConfirmation(_) => {
                "AwaitingAuthorizationConfirmation"
            }
            OrchestratorState::PlacingWager => "PlacingWager",
            OrchestratorState::AwaitingWagerConfirmation(_) => "AwaitingWagerConfirmation",
            OrchestratorState::Succeeded => "Succeeded",
            OrchestratorState::Failed(_) => "Failed",
        }
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestratorState::AwaitingAuthorizationConfirmation(handle)
            | OrchestratorState::AwaitingWagerConfirmation(handle) => {
                write!(f, "{}({})", self.name(), handle.hash)
            }
            OrchestratorState::Failed(reason) => write!(f, "Failed({reason})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Why a run ended in `Failed`. The message is meant for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: TokenAmount,
        available: TokenAmount,
    },

    #[error("could not read balance or allowance: {0}")]
    ReadFailed(String),

    #[error("request rejected in wallet")]
    UserRejected,

    #[error("could not submit transaction: {0}")]
    SubmissionError(String),

    #[error("{kind} transaction reverted: {tx_hash}")]
    Reverted { kind: TxKind, tx_hash: TxHash },

    #[error("{kind} transaction not confirmed in time: {tx_hash}")]
    TimedOut { kind: TxKind, tx_hash: TxHash },
}

impl FailureReason {
    /// Whether resubmitting the same intent can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FailureReason::UserRejected
            | FailureReason::SubmissionError(_)
            | FailureReason::ReadFailed(_) => true,
            FailureReason::InvalidAmount(_)
            | FailureReason::InsufficientBalance { .. }
            | FailureReason::Reverted { .. }
            | FailureReason::TimedOut { .. } => false,
        }
    }

    /// The outcome on chain is unknown; balance and allowance must be
    /// re-read before anything is resubmitted.
    pub fn requires_reconciliation(&self) -> bool {
        matches!(self, FailureReason::TimedOut { .. })
    }
}

impl From<SubmitError> for FailureReason {
    fn from(error: SubmitError) -> Self {
        match error {
            SubmitError::UserRejected => FailureReason::UserRejected,
            SubmitError::Submission(message) => FailureReason::SubmissionError(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_and_in_flight_are_disjoint() {
        let handle = TransactionHandle::new(TxHash::ZERO, TxKind::Wager);
        let states = [
            OrchestratorState::Idle,
            OrchestratorState::CheckingAllowance,
            OrchestratorState::Authorizing,
            OrchestratorState::AwaitingAuthorizationConfirmation(handle.clone()),
            OrchestratorState::PlacingWager,
            OrchestratorState::AwaitingWagerConfirmation(handle),
            OrchestratorState::Succeeded,
            OrchestratorState::Failed(FailureReason::UserRejected),
        ];

        for state in &states {
            let buckets = [state.is_idle(), state.is_in_flight(), state.is_terminal()];
            assert_eq!(buckets.iter().filter(|b| **b).count(), 1, "{state}");
        }
    }

    #[test]
    fn only_timeouts_need_reconciliation() {
        let timed_out = FailureReason::TimedOut {
            kind: TxKind::Wager,
            tx_hash: TxHash::ZERO,
        };
        assert!(timed_out.requires_reconciliation());
        assert!(!timed_out.is_retryable());
        assert!(!FailureReason::UserRejected.requires_reconciliation());
        assert!(FailureReason::UserRejected.is_retryable());
    }

    #[test]
    fn submit_errors_map_onto_failure_reasons() {
        assert_eq!(
            FailureReason::from(SubmitError::UserRejected),
            FailureReason::UserRejected
        );
        assert_eq!(
            FailureReason::from(SubmitError::Submission("nonce too low".into())),
            FailureReason::SubmissionError("nonce too low".into())
        );
    }
}
