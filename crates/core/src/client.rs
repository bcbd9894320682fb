use alloy::{
    consensus::TxReceipt,
    primitives::{Address, U256},
    providers::{PendingTransactionBuilder, PendingTransactionError, Provider, WatchTxError},
};
use async_trait::async_trait;
use tracing::{debug, info, warn};
use wager_abi::{IERC20, IPredictionMarket};

use crate::{
    error::{ReadError, SubmitError},
    ledger::{ConfirmationWatcher, LedgerReader, TransactionSubmitter},
    types::{
        AllowanceSnapshot, Confirmation, MarketId, MarketSummary, Outcome, Position, TokenAmount,
        TransactionHandle, TxAction, WatcherConfig,
    },
};

/// Token + prediction-market pair behind one alloy provider.
///
/// The provider must carry a wallet for the write side to work.
#[derive(Clone)]
pub struct MarketClient<P>
where
    P: Provider + Clone,
{
    provider: P,
    token: Address,
    market: Address,
    watcher: WatcherConfig,
}

impl<P> MarketClient<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, token: Address, market: Address) -> Self {
        Self {
            provider,
            token,
            market,
            watcher: WatcherConfig::default(),
        }
    }

    pub fn with_watcher(mut self, watcher: WatcherConfig) -> Self {
        self.watcher = watcher;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn market(&self) -> Address {
        self.market
    }

    pub async fn decimals(&self) -> Result<u8, ReadError> {
        let token = IERC20::new(self.token, &self.provider);
        Ok(token.decimals().call().await?)
    }

    pub async fn symbol(&self) -> Result<String, ReadError> {
        let token = IERC20::new(self.token, &self.provider);
        Ok(token.symbol().call().await?)
    }

    pub async fn market_info(&self, id: MarketId) -> Result<MarketSummary, ReadError> {
        let market = IPredictionMarket::new(self.market, &self.provider);
        let info = market.getMarketInfo(id.as_u256()).call().await?;

        Ok(MarketSummary {
            id,
            creator: info.creator,
            question: info.question,
            end_time: info.endTime.saturating_to::<u64>(),
            resolution: info.resolved.then(|| Outcome::from_bool(info.outcome)),
            total_yes: TokenAmount::new(info.totalYes),
            total_no: TokenAmount::new(info.totalNo),
        })
    }

    pub async fn user_position(&self, id: MarketId, user: Address) -> Result<Position, ReadError> {
        let market = IPredictionMarket::new(self.market, &self.provider);
        let position = market.getUserPosition(id.as_u256(), user).call().await?;

        Ok(Position {
            yes: TokenAmount::new(position.yesAmount),
            no: TokenAmount::new(position.noAmount),
            claimed: position.claimed,
        })
    }

    /// Payout `user` would receive from `id` if it resolved in their favour.
    pub async fn potential_winnings(
        &self,
        id: MarketId,
        user: Address,
    ) -> Result<TokenAmount, ReadError> {
        let market = IPredictionMarket::new(self.market, &self.provider);
        let winnings = market.calculatePotentialWinnings(id.as_u256(), user).call().await?;
        Ok(TokenAmount::new(winnings))
    }

    pub async fn user_bets(&self, user: Address) -> Result<Vec<MarketId>, ReadError> {
        let market = IPredictionMarket::new(self.market, &self.provider);
        let ids: Vec<U256> = market.getUserBets(user).call().await?;
        Ok(ids.into_iter().map(MarketId::new).collect())
    }
}

#[async_trait]
impl<P> LedgerReader for MarketClient<P>
where
    P: Provider + Clone,
{
    async fn balance_of(&self, account: Address) -> Result<TokenAmount, ReadError> {
        let token = IERC20::new(self.token, &self.provider);
        let balance = token.balanceOf(account).call().await?;
        Ok(TokenAmount::new(balance))
    }

    async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> Result<AllowanceSnapshot, ReadError> {
        let token = IERC20::new(self.token, &self.provider);
        let amount = token.allowance(owner, spender).call().await?;
        Ok(AllowanceSnapshot::new(owner, spender, TokenAmount::new(amount)))
    }

    async fn snapshot(
        &self,
        account: Address,
        spender: Address,
    ) -> Result<(TokenAmount, AllowanceSnapshot), ReadError> {
        let token = IERC20::new(self.token, &self.provider);

        let (balance, allowance) = self
            .provider
            .multicall()
            .add(token.balanceOf(account))
            .add(token.allowance(account, spender))
            .aggregate()
            .await?;

        debug!(%account, %balance, %allowance, "ledger snapshot");

        Ok((
            TokenAmount::new(balance),
            AllowanceSnapshot::new(account, spender, TokenAmount::new(allowance)),
        ))
    }
}

#[async_trait]
impl<P> TransactionSubmitter for MarketClient<P>
where
    P: Provider + Clone,
{
    async fn submit(&self, action: TxAction) -> Result<TransactionHandle, SubmitError> {
        let kind = action.kind();
        let token = IERC20::new(self.token, &self.provider);
        let market = IPredictionMarket::new(self.market, &self.provider);

        let sent = match action {
            TxAction::Authorize { spender, amount } => {
                token.approve(spender, amount.as_u256()).send().await
            }
            TxAction::Wager {
                market_id,
                outcome,
                amount,
            } => {
                market
                    .placeBet(market_id.as_u256(), outcome.as_bool(), amount.as_u256())
                    .send()
                    .await
            }
            TxAction::Claim { market_id } => {
                market.claimWinnings(market_id.as_u256()).send().await
            }
        };

        let pending = sent.map_err(SubmitError::from)?;
        let handle = TransactionHandle::new(*pending.tx_hash(), kind);
        info!(tx_hash = %handle.hash, %kind, "transaction broadcast");

        Ok(handle)
    }
}

#[async_trait]
impl<P> ConfirmationWatcher for MarketClient<P>
where
    P: Provider + Clone,
{
    async fn await_confirmation(&self, handle: &TransactionHandle) -> Confirmation {
        let pending = PendingTransactionBuilder::new(self.provider.root().clone(), handle.hash)
            .with_required_confirmations(self.watcher.required_confirmations)
            .with_timeout(Some(self.watcher.timeout));

        let watched = pending.get_receipt().await.map(|receipt| {
            debug!(tx_hash = %handle.hash, block = ?receipt.block_number, "receipt received");
            receipt.inner.as_receipt().map(|body| body.status())
        });

        settle(handle, watched)
    }
}

/// Maps a watched receipt to a confirmation. `Ok(None)` is a receipt
/// without a body.
fn settle(
    handle: &TransactionHandle,
    watched: Result<Option<bool>, PendingTransactionError>,
) -> Confirmation {
    match watched {
        Ok(Some(true)) => {
            info!(tx_hash = %handle.hash, kind = %handle.kind, "transaction confirmed");
            Confirmation::Confirmed
        }
        Ok(Some(false)) => {
            warn!(tx_hash = %handle.hash, kind = %handle.kind, "transaction reverted");
            Confirmation::Reverted
        }
        Ok(None) => {
            warn!(tx_hash = %handle.hash, "receipt missing body");
            Confirmation::TimedOut
        }
        Err(PendingTransactionError::TxWatcher(WatchTxError::Timeout)) => {
            warn!(tx_hash = %handle.hash, kind = %handle.kind, "no receipt within timeout");
            Confirmation::TimedOut
        }
        Err(error) => {
            // Outcome unknown; report like a timeout so callers re-check chain state.
            warn!(tx_hash = %handle.hash, kind = %handle.kind, %error, "lost track of transaction");
            Confirmation::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::{primitives::B256, transports::TransportErrorKind};

    use super::*;
    use crate::types::TxKind;

    fn handle() -> TransactionHandle {
        TransactionHandle::new(B256::with_last_byte(9), TxKind::Wager)
    }

    #[test]
    fn receipt_status_decides_the_outcome() {
        assert_eq!(settle(&handle(), Ok(Some(true))), Confirmation::Confirmed);
        assert_eq!(settle(&handle(), Ok(Some(false))), Confirmation::Reverted);
    }

    #[test]
    fn unknown_outcomes_report_as_timed_out() {
        assert_eq!(settle(&handle(), Ok(None)), Confirmation::TimedOut);
        assert_eq!(
            settle(
                &handle(),
                Err(PendingTransactionError::TxWatcher(WatchTxError::Timeout))
            ),
            Confirmation::TimedOut
        );
        assert_eq!(
            settle(
                &handle(),
                Err(PendingTransactionError::TransportError(
                    TransportErrorKind::backend_gone()
                ))
            ),
            Confirmation::TimedOut
        );
    }
}
