//! Rate-limited, sequential per-address enrichment.

use std::{fmt::Display, time::Duration};

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::{sync::mpsc, time::sleep};
use tracing::{debug, warn};

#[async_trait]
pub trait Analyzer: Send + Sync {
    type Output: Send;
    type Error: Display + Send;

    async fn analyze(&self, address: Address) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentConfig {
    /// Only this many leading addresses are analyzed.
    pub max_items: usize,
    /// Pause between two consecutive calls.
    pub delay: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_items: 5,
            delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment<T> {
    pub address: Address,
    pub output: T,
}

pub struct BatchEnricher<A>
where
    A: Analyzer,
{
    analyzer: A,
    config: EnrichmentConfig,
}

impl<A> BatchEnricher<A>
where
    A: Analyzer,
{
    pub fn new(analyzer: A, config: EnrichmentConfig) -> Self {
        Self { analyzer, config }
    }

    /// Analyzes up to `max_items` addresses one at a time and delivers each
    /// result on `sink`. Stops quietly once the receiver is gone. Returns the
    /// number of results delivered.
    pub async fn run(
        &self,
        addresses: &[Address],
        sink: mpsc::Sender<Enrichment<A::Output>>,
    ) -> usize {
        let mut delivered = 0;

        for (index, address) in addresses.iter().take(self.config.max_items).enumerate() {
            if index > 0 {
                sleep(self.config.delay).await;
            }
            if sink.is_closed() {
                debug!(delivered, "consumer gone, dropping remaining analyses");
                break;
            }

            let output = match self.analyzer.analyze(*address).await {
                Ok(output) => output,
                Err(error) => {
                    warn!(%address, %error, "analysis failed, skipping");
                    continue;
                }
            };

            let enrichment = Enrichment {
                address: *address,
                output,
            };
            if sink.send(enrichment).await.is_err() {
                debug!(%address, "consumer gone, result dropped");
                break;
            }
            delivered += 1;
        }

        delivered
    }

    /// Runs [`run`](Self::run) on a background task. Dropping the returned
    /// receiver ends the loop.
    pub fn spawn(self, addresses: Vec<Address>) -> mpsc::Receiver<Enrichment<A::Output>>
    where
        A: 'static,
        A::Output: 'static,
    {
        let (tx, rx) = mpsc::channel(self.config.max_items.max(1));
        tokio::spawn(async move {
            self.run(&addresses, tx).await;
        });
        rx
    }
}
