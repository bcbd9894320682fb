use alloy::primitives::Address;
use async_trait::async_trait;

use crate::{
    error::ReadError,
    types::{AllowanceSnapshot, TokenAmount},
};

/// Read side of the token ledger. Reads are idempotent and lock-free.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn balance_of(&self, account: Address) -> Result<TokenAmount, ReadError>;

    async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> Result<AllowanceSnapshot, ReadError>;

    /// Balance and allowance for one decision. Implementations that can batch
    /// both reads into one round trip should override this.
    async fn snapshot(
        &self,
        account: Address,
        spender: Address,
    ) -> Result<(TokenAmount, AllowanceSnapshot), ReadError> {
        let balance = self.balance_of(account).await?;
        let allowance = self.allowance(account, spender).await?;
        Ok((balance, allowance))
    }
}
