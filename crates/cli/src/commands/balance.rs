use alloy::{primitives::Address, providers::Provider};
use eyre::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use wager_core::{
    BlockTicker, Invalidation, LedgerCache, MarketClient, OrchestratorConfig, WagerOrchestrator,
};

use super::format_amount;

pub async fn balance<P>(
    client: MarketClient<P>,
    account: Address,
    decimals: u8,
    follow: bool,
) -> Result<()>
where
    P: Provider + Clone + 'static,
{
    let symbol = client.symbol().await?;
    let ticker = BlockTicker::new(client.provider().clone());
    let config = OrchestratorConfig::new(decimals, client.market());
    let orchestrator = WagerOrchestrator::new(client.clone(), client.clone(), client, config);

    let cache = orchestrator.refresh(account).await?;
    print_cache(&cache, decimals, &symbol);

    if !follow {
        return Ok(());
    }

    let blocks = ticker.into_stream().await?;
    let mut invalidations = orchestrator.invalidations();

    let reprint = async {
        let mut last = cache;
        loop {
            match invalidations.recv().await {
                Ok(Invalidation::NewBlock(block)) => match orchestrator.refresh(account).await {
                    Ok(cache) if cache != last => {
                        println!("at block {block}");
                        print_cache(&cache, decimals, &symbol);
                        last = cache;
                    }
                    Ok(_) => debug!(%block, "balance unchanged"),
                    Err(err) => warn!(%err, %block, "refresh failed"),
                },
                Ok(other) => debug!(?other, "ignoring invalidation"),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "skipped block ticks"),
                Err(RecvError::Closed) => break,
            }
        }
    };

    tokio::select! {
        result = orchestrator.follow_blocks(blocks) => result?,
        () = reprint => {}
    }

    Ok(())
}

fn print_cache(cache: &LedgerCache, decimals: u8, symbol: &str) {
    match cache.balance() {
        Some(balance) => println!("Balance:   {}", format_amount(balance, decimals, symbol)),
        None => println!("Balance:   unknown"),
    }
    match cache.allowance() {
        Some(allowance) => println!(
            "Allowance: {} (spender {})",
            format_amount(allowance.amount, decimals, symbol),
            allowance.spender
        ),
        None => println!("Allowance: unknown"),
    }
}
