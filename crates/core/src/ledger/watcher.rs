use async_trait::async_trait;

use crate::types::{Confirmation, TransactionHandle};

/// Follows one submitted transaction until its fate is known.
///
/// No ordering is guaranteed across handles. Callers that need ordering
/// must not submit the next transaction before this resolves.
#[async_trait]
pub trait ConfirmationWatcher: Send + Sync {
    async fn await_confirmation(&self, handle: &TransactionHandle) -> Confirmation;
}
