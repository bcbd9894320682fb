use alloy::{
    contract,
    providers::MulticallError,
    transports::{RpcError, TransportError},
};
use thiserror::Error;

use crate::types::FailureReason;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("`{0}` is not a decimal number")]
    NonNumeric(String),

    #[error("amount must not be negative")]
    Negative,

    #[error("amount must be greater than zero")]
    Zero,

    #[error("at most {max} fractional digits allowed, got {found}")]
    TooManyDecimals { found: usize, max: u8 },

    #[error("amount does not fit in 256 bits")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("contract call failed: {0}")]
    Contract(#[from] contract::Error),

    #[error("multicall failed: {0}")]
    Multicall(#[from] MulticallError),

    #[error("failed to fetch ledger state: {0}")]
    Transport(#[from] TransportError),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Failures raised before a transaction hash exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("signer declined the request")]
    UserRejected,

    #[error("submission failed: {0}")]
    Submission(String),
}

impl SubmitError {
    /// EIP-1193 code for a request the user refused in the wallet.
    pub const USER_REJECTED_CODE: i64 = 4001;
}

impl From<contract::Error> for SubmitError {
    fn from(error: contract::Error) -> Self {
        if let contract::Error::TransportError(RpcError::ErrorResp(payload)) = &error {
            if payload.code == Self::USER_REJECTED_CODE {
                return SubmitError::UserRejected;
            }
        }
        SubmitError::Submission(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error("a wager is already in progress")]
    AlreadyInProgress,

    #[error("the previous wager has finished, reset before placing another")]
    ResetRequired,

    #[error("cannot reset while a transaction is in flight")]
    InFlight,

    #[error(transparent)]
    Failed(#[from] FailureReason),
}

#[derive(Debug, Error)]
pub enum BlockStreamError {
    #[error("block stream error: {0}")]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use alloy::rpc::json_rpc::ErrorPayload;

    use super::*;

    fn rpc_error(code: i64, message: &'static str) -> contract::Error {
        contract::Error::TransportError(RpcError::ErrorResp(ErrorPayload {
            code,
            message: message.into(),
            data: None,
        }))
    }

    #[test]
    fn wallet_refusal_maps_to_user_rejected() {
        let error = SubmitError::from(rpc_error(4001, "User rejected the request."));
        assert_eq!(error, SubmitError::UserRejected);
    }

    #[test]
    fn other_rpc_errors_map_to_submission() {
        let error = SubmitError::from(rpc_error(-32000, "nonce too low"));

        let SubmitError::Submission(message) = error else {
            panic!("expected a submission error, got {error:?}");
        };
        assert!(message.contains("nonce too low"));
        assert!(message.contains("-32000"));
    }

    #[test]
    fn transport_failures_map_to_submission() {
        let error = SubmitError::from(contract::Error::TransportError(
            alloy::transports::TransportErrorKind::backend_gone(),
        ));
        assert!(matches!(error, SubmitError::Submission(_)));
    }
}
