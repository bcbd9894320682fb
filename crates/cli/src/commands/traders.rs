use std::collections::HashSet;

use alloy::{
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::Filter,
    sol_types::SolEvent,
};
use async_trait::async_trait;
use eyre::Result;
use tracing::debug;
use wager_abi::IPredictionMarket;
use wager_core::{Analyzer, BatchEnricher, EnrichmentConfig, MarketClient, MarketId, ReadError};

/// Counts the markets an address has bet on.
pub struct BetCount<P>
where
    P: Provider + Clone,
{
    client: MarketClient<P>,
}

impl<P> BetCount<P>
where
    P: Provider + Clone,
{
    pub fn new(client: MarketClient<P>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<P> Analyzer for BetCount<P>
where
    P: Provider + Clone + 'static,
{
    type Output = usize;
    type Error = ReadError;

    async fn analyze(&self, address: Address) -> Result<usize, ReadError> {
        Ok(self.client.user_bets(address).await?.len())
    }
}

/// Blocks scanned for bettors when no start block is configured.
pub const DEFAULT_LOG_WINDOW: u64 = 10_000;

pub async fn traders<P>(
    client: MarketClient<P>,
    addresses: Vec<Address>,
    market_id: Option<MarketId>,
    from_block: Option<u64>,
    config: EnrichmentConfig,
) -> Result<()>
where
    P: Provider + Clone + 'static,
{
    let addresses = if addresses.is_empty() {
        bettors(&client, market_id, from_block).await?
    } else {
        addresses
    };

    if addresses.is_empty() {
        println!("No traders found");
        return Ok(());
    }
    if addresses.len() > config.max_items {
        println!(
            "Looking up the first {} of {} traders",
            config.max_items,
            addresses.len()
        );
    }

    let mut results = BatchEnricher::new(BetCount::new(client), config).spawn(addresses);
    while let Some(enrichment) = results.recv().await {
        println!("{}  {} markets", enrichment.address, enrichment.output);
    }

    Ok(())
}

/// Distinct bettors from `BetPlaced` logs, in order of first appearance.
async fn bettors<P>(
    client: &MarketClient<P>,
    market_id: Option<MarketId>,
    from_block: Option<u64>,
) -> Result<Vec<Address>>
where
    P: Provider + Clone,
{
    let latest = client.provider().get_block_number().await?;
    let start = log_range_start(latest, from_block);
    debug!(start, latest, "scanning bet logs");

    let mut filter = Filter::new()
        .address(client.market())
        .event_signature(IPredictionMarket::BetPlaced::SIGNATURE_HASH)
        .from_block(start)
        .to_block(latest);
    if let Some(id) = market_id {
        filter = filter.topic1(B256::from(id.as_u256()));
    }

    let logs = client.provider().get_logs(&filter).await?;
    debug!(count = logs.len(), "fetched bet logs");

    let mut seen = HashSet::new();
    let mut bettors = Vec::new();
    for log in logs {
        let Ok(decoded) = log.log_decode::<IPredictionMarket::BetPlaced>() else {
            continue;
        };
        let user = decoded.inner.data.user;
        if seen.insert(user) {
            bettors.push(user);
        }
    }
    Ok(bettors)
}

fn log_range_start(latest: u64, from_block: Option<u64>) -> u64 {
    from_block
        .map(|block| block.min(latest))
        .unwrap_or_else(|| latest.saturating_sub(DEFAULT_LOG_WINDOW))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_range_defaults_to_a_recent_window() {
        assert_eq!(log_range_start(25_000, None), 15_000);
        assert_eq!(log_range_start(500, None), 0);
    }

    #[test]
    fn log_range_honours_the_configured_start() {
        assert_eq!(log_range_start(25_000, Some(1_000)), 1_000);
        assert_eq!(log_range_start(25_000, Some(30_000)), 25_000);
    }
}
