use async_trait::async_trait;

use crate::{
    error::SubmitError,
    types::{TransactionHandle, TxAction},
};

/// Signs and broadcasts a transaction.
///
/// Each call shows the user exactly one signing prompt and returns as soon as
/// the transaction hash is known, without waiting for inclusion.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, action: TxAction) -> Result<TransactionHandle, SubmitError>;
}
