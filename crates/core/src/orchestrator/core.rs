use std::sync::Arc;

use alloy::primitives::Address;
use futures::StreamExt;
use tokio::sync::{RwLock, broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    amount,
    blocks::BlockStream,
    cache::{Invalidation, LedgerCache},
    error::{BlockStreamError, OrchestratorError, ReadError},
    gate,
    history::{RecordStatus, WagerHistory, WagerRecord},
    ledger::{ConfirmationWatcher, LedgerReader, TransactionSubmitter},
    orchestrator::result::{RunProgress, StateTransition, WagerReceipt},
    types::{
        BlockNumber, Confirmation, FailureReason, OrchestratorConfig, OrchestratorState,
        TransactionHandle, TxAction, WagerIntent,
    },
};

const EVENT_CAPACITY: usize = 64;

/// Turns a [`WagerIntent`] into an optional authorization transaction followed
/// by the wager transaction, one at a time.
///
/// `submit` only starts from `Idle`; every other state rejects it with
/// [`OrchestratorError::AlreadyInProgress`]. The wager is submitted only after
/// the watcher reports the authorization as confirmed.
///
/// A started `submit` future must be driven to completion: a transaction that
/// has been broadcast cannot be withdrawn.
pub struct WagerOrchestrator<L, S, W>
where
    L: LedgerReader,
    S: TransactionSubmitter,
    W: ConfirmationWatcher,
{
    ledger: L,
    submitter: S,
    watcher: W,
    config: OrchestratorConfig,
    state: watch::Sender<OrchestratorState>,
    transitions: broadcast::Sender<StateTransition>,
    invalidations: broadcast::Sender<Invalidation>,
    cache: RwLock<LedgerCache>,
    history: Arc<WagerHistory>,
}

impl<L, S, W> WagerOrchestrator<L, S, W>
where
    L: LedgerReader,
    S: TransactionSubmitter,
    W: ConfirmationWatcher,
{
    pub fn new(ledger: L, submitter: S, watcher: W, config: OrchestratorConfig) -> Self {
        let (state, _) = watch::channel(OrchestratorState::Idle);
        let (transitions, _) = broadcast::channel(EVENT_CAPACITY);
        let (invalidations, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            ledger,
            submitter,
            watcher,
            config,
            state,
            transitions,
            invalidations,
            cache: RwLock::new(LedgerCache::new()),
            history: Arc::new(WagerHistory::default()),
        }
    }

    pub fn with_history(mut self, history: Arc<WagerHistory>) -> Self {
        self.history = history;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn state(&self) -> OrchestratorState {
        self.state.borrow().clone()
    }

    /// Latest state; intermediate states may be skipped by slow readers.
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> {
        self.state.subscribe()
    }

    /// Every transition in order.
    pub fn transitions(&self) -> broadcast::Receiver<StateTransition> {
        self.transitions.subscribe()
    }

    pub fn invalidations(&self) -> broadcast::Receiver<Invalidation> {
        self.invalidations.subscribe()
    }

    pub fn history(&self) -> &Arc<WagerHistory> {
        &self.history
    }

    pub async fn cached(&self) -> LedgerCache {
        self.cache.read().await.clone()
    }

    /// Runs one wager to a terminal state and returns its receipt.
    ///
    /// The terminal state stays published until [`reset`](Self::reset).
    pub async fn submit(&self, intent: WagerIntent) -> Result<WagerReceipt, OrchestratorError> {
        self.try_begin()?;

        info!(
            market = %intent.market_id,
            outcome = %intent.outcome,
            amount = %intent.amount,
            account = %intent.account,
            "wager started"
        );

        let mut progress = RunProgress::default();
        let outcome = self.execute(&intent, &mut progress).await;

        // Figures read before or during the run no longer describe the chain.
        self.cache.write().await.invalidate();

        let authorization_tx = progress.authorization.as_ref().map(|handle| handle.hash);
        let wager_tx = progress.wager.as_ref().map(|handle| handle.hash);

        let result = outcome.and_then(|()| {
            progress.into_receipt().ok_or_else(|| {
                FailureReason::SubmissionError("run finished without a wager handle".into())
            })
        });

        match result {
            Ok(receipt) => {
                self.transition(OrchestratorState::Succeeded);
                self.history
                    .record(WagerRecord::new(
                        &intent,
                        authorization_tx,
                        wager_tx,
                        RecordStatus::Succeeded,
                    ))
                    .await;
                let _ = self
                    .invalidations
                    .send(Invalidation::WagerSettled(receipt.wager.hash));
                info!(tx_hash = %receipt.wager.hash, "wager settled");
                Ok(receipt)
            }
            Err(reason) => {
                warn!(%reason, "wager failed");
                self.transition(OrchestratorState::Failed(reason.clone()));
                self.history
                    .record(WagerRecord::new(
                        &intent,
                        authorization_tx,
                        wager_tx,
                        RecordStatus::Failed(reason.clone()),
                    ))
                    .await;
                let _ = self.invalidations.send(Invalidation::RunFailed);
                Err(OrchestratorError::Failed(reason))
            }
        }
    }

    /// Moves a finished run back to `Idle`. No-op when already idle.
    pub fn reset(&self) -> Result<(), OrchestratorError> {
        let mut previous = None;
        self.state.send_if_modified(|state| {
            if state.is_terminal() {
                previous = Some(std::mem::replace(state, OrchestratorState::Idle));
                true
            } else {
                false
            }
        });

        match previous {
            Some(from) => {
                self.publish(from, OrchestratorState::Idle);
                Ok(())
            }
            None if self.state().is_idle() => Ok(()),
            None => Err(OrchestratorError::InFlight),
        }
    }

    /// Reads balance and allowance for `account` and caches them.
    pub async fn refresh(&self, account: Address) -> Result<LedgerCache, ReadError> {
        let (balance, allowance) = self.ledger.snapshot(account, self.config.spender).await?;
        let mut cache = self.cache.write().await;
        cache.update(balance, allowance);
        Ok(cache.clone())
    }

    /// Marks the cache stale for a new block, unless a run is in flight.
    /// Returns whether the tick was forwarded.
    pub async fn on_block(&self, block: BlockNumber) -> bool {
        if self.state.borrow().is_in_flight() {
            debug!(%block, "block tick ignored while a transaction is in flight");
            return false;
        }

        self.cache.write().await.invalidate();
        let _ = self.invalidations.send(Invalidation::NewBlock(block));
        true
    }

    pub async fn follow_blocks<B>(&self, mut blocks: B) -> Result<(), BlockStreamError>
    where
        B: BlockStream,
    {
        while let Some(block) = blocks.next().await {
            self.on_block(block?).await;
        }
        Ok(())
    }

    async fn execute(
        &self,
        intent: &WagerIntent,
        progress: &mut RunProgress,
    ) -> Result<(), FailureReason> {
        let amount = amount::to_smallest_unit(&intent.amount, self.config.decimals)?;
        progress.amount = Some(amount);

        let (balance, allowance) = self
            .ledger
            .snapshot(intent.account, self.config.spender)
            .await
            .map_err(|error| FailureReason::ReadFailed(error.to_string()))?;
        self.cache.write().await.update(balance, allowance);

        if self.config.enforce_balance && amount > balance {
            return Err(FailureReason::InsufficientBalance {
                requested: amount,
                available: balance,
            });
        }

        if gate::needs_authorization(&allowance, amount) {
            let authorize = self.config.policy.authorization_amount(amount);
            debug!(current = %allowance.amount, requested = %amount, "authorization required");

            self.transition(OrchestratorState::Authorizing);
            let handle = self
                .submitter
                .submit(TxAction::Authorize {
                    spender: self.config.spender,
                    amount: authorize,
                })
                .await?;
            progress.authorization = Some(handle.clone());

            self.transition(OrchestratorState::AwaitingAuthorizationConfirmation(
                handle.clone(),
            ));
            self.confirm(&handle).await?;
        }

        self.transition(OrchestratorState::PlacingWager);
        let handle = self
            .submitter
            .submit(TxAction::Wager {
                market_id: intent.market_id,
                outcome: intent.outcome,
                amount,
            })
            .await?;
        progress.wager = Some(handle.clone());

        self.transition(OrchestratorState::AwaitingWagerConfirmation(handle.clone()));
        self.confirm(&handle).await
    }

    async fn confirm(&self, handle: &TransactionHandle) -> Result<(), FailureReason> {
        match self.watcher.await_confirmation(handle).await {
            Confirmation::Confirmed => Ok(()),
            Confirmation::Reverted => Err(FailureReason::Reverted {
                kind: handle.kind,
                tx_hash: handle.hash,
            }),
            Confirmation::TimedOut => Err(FailureReason::TimedOut {
                kind: handle.kind,
                tx_hash: handle.hash,
            }),
        }
    }

    /// Atomically claims the session: `Idle` -> `CheckingAllowance`.
    fn try_begin(&self) -> Result<(), OrchestratorError> {
        let mut busy = None;
        self.state.send_if_modified(|state| {
            if state.is_idle() {
                *state = OrchestratorState::CheckingAllowance;
                true
            } else {
                busy = Some(state.clone());
                false
            }
        });

        match busy {
            None => {
                self.publish(OrchestratorState::Idle, OrchestratorState::CheckingAllowance);
                Ok(())
            }
            Some(state) if state.is_terminal() => {
                warn!(%state, "submit ignored, previous wager not reset");
                Err(OrchestratorError::ResetRequired)
            }
            Some(state) => {
                warn!(%state, "submit ignored, a wager is already in progress");
                Err(OrchestratorError::AlreadyInProgress)
            }
        }
    }

    fn transition(&self, to: OrchestratorState) {
        let from = self.state.send_replace(to.clone());
        self.publish(from, to);
    }

    fn publish(&self, from: OrchestratorState, to: OrchestratorState) {
        debug!(%from, %to, "state transition");
        let _ = self.transitions.send(StateTransition { from, to });
    }
}
