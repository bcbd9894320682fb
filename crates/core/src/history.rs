use std::collections::VecDeque;

use alloy::primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::types::{FailureReason, MarketId, Outcome, WagerIntent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Succeeded,
    Failed(FailureReason),
}

/// One finished wager run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerRecord {
    pub market_id: MarketId,
    pub outcome: Outcome,
    pub amount: String,
    pub account: Address,
    pub authorization_tx: Option<TxHash>,
    pub wager_tx: Option<TxHash>,
    pub status: RecordStatus,
    pub finished_at: DateTime<Utc>,
}

impl WagerRecord {
    pub fn new(
        intent: &WagerIntent,
        authorization_tx: Option<TxHash>,
        wager_tx: Option<TxHash>,
        status: RecordStatus,
    ) -> Self {
        Self {
            market_id: intent.market_id,
            outcome: intent.outcome,
            amount: intent.amount.clone(),
            account: intent.account,
            authorization_tx,
            wager_tx,
            status,
            finished_at: Utc::now(),
        }
    }
}

/// Bounded log of finished wagers, newest first.
///
/// Created once per session and shared by `Arc`; mutated only through
/// [`record`](Self::record) and [`clear`](Self::clear).
#[derive(Debug)]
pub struct WagerHistory {
    records: RwLock<VecDeque<WagerRecord>>,
    capacity: usize,
}

impl WagerHistory {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY))),
            capacity: capacity.max(1),
        }
    }

    pub async fn record(&self, record: WagerRecord) {
        let mut records = self.records.write().await;
        records.push_front(record);
        records.truncate(self.capacity);
    }

    pub async fn records(&self) -> Vec<WagerRecord> {
        self.records.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

impl Default for WagerHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(amount: &str) -> WagerIntent {
        WagerIntent::new(MarketId::from(1), Outcome::Yes, amount, Address::repeat_byte(9))
    }

    #[tokio::test]
    async fn keeps_newest_first_within_capacity() {
        let history = WagerHistory::new(2);
        for amount in ["1", "2", "3"] {
            history
                .record(WagerRecord::new(&intent(amount), None, None, RecordStatus::Succeeded))
                .await;
        }

        let amounts: Vec<String> = history.records().await.into_iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec!["3".to_string(), "2".to_string()]);

        history.clear().await;
        assert!(history.is_empty().await);
    }
}
