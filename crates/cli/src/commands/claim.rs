use alloy::{primitives::Address, providers::Provider};
use eyre::{Result, bail};
use tracing::info;
use wager_core::{
    Confirmation, ConfirmationWatcher, MarketClient, MarketId, Outcome, TransactionSubmitter,
    TxAction,
};

/// Claims winnings for a resolved market. Runs outside the wager state
/// machine, through the same submitter and watcher.
pub async fn claim<P>(client: &MarketClient<P>, account: Address, market_id: MarketId) -> Result<()>
where
    P: Provider + Clone,
{
    let market = client.market_info(market_id).await?;
    let Some(outcome) = market.resolution else {
        bail!("market {market_id} is not resolved yet");
    };

    let position = client.user_position(market_id, account).await?;
    if position.claimed {
        bail!("winnings for market {market_id} were already claimed");
    }
    let stake = match outcome {
        Outcome::Yes => position.yes,
        Outcome::No => position.no,
    };
    if stake.is_zero() {
        bail!("no {outcome} position in market {market_id}");
    }

    let handle = client.submit(TxAction::Claim { market_id }).await?;
    println!("Claim sent: {}", handle.hash);

    match client.await_confirmation(&handle).await {
        Confirmation::Confirmed => {
            info!(tx_hash = %handle.hash, %market_id, "winnings claimed");
            println!("Claimed winnings for market {market_id}");
            Ok(())
        }
        Confirmation::Reverted => bail!("claim {} reverted", handle.hash),
        Confirmation::TimedOut => bail!(
            "claim {} not confirmed in time; check it on a block explorer before retrying",
            handle.hash
        ),
    }
}
