use std::str::FromStr;

use alloy::{primitives::Address, providers::Provider};
use chrono::DateTime;
use eyre::Result;
use rust_decimal::Decimal;
use wager_core::{MarketClient, MarketId, MarketSummary, Position, TokenAmount};

use super::format_amount;

#[derive(Debug, Clone)]
pub struct StatusOutput {
    pub market: MarketSummary,
    pub position: Option<Position>,
    /// Payout if the market resolves in the account's favour.
    pub potential_winnings: Option<TokenAmount>,
    pub current_block: u64,
}

pub async fn status<P>(
    client: &MarketClient<P>,
    market_id: MarketId,
    account: Option<Address>,
) -> Result<StatusOutput>
where
    P: Provider + Clone,
{
    let market = client.market_info(market_id).await?;
    let (position, potential_winnings) = match account {
        Some(account) => {
            let position = client.user_position(market_id, account).await?;
            let winnings = if position.is_empty() || position.claimed {
                None
            } else {
                Some(client.potential_winnings(market_id, account).await?)
            };
            (Some(position), winnings)
        }
        None => (None, None),
    };
    let current_block = client.provider().get_block_number().await?;

    Ok(StatusOutput {
        market,
        position,
        potential_winnings,
        current_block,
    })
}

pub fn print_status(output: &StatusOutput, decimals: u8, symbol: &str) {
    let market = &output.market;

    println!("Market {}: {}", market.id, market.question);
    println!("  creator:  {}", market.creator);
    match DateTime::from_timestamp(market.end_time as i64, 0) {
        Some(end) => println!("  closes:   {}", end.format("%Y-%m-%d %H:%M UTC")),
        None => println!("  closes:   {}", market.end_time),
    }
    match market.resolution {
        Some(outcome) => println!("  resolved: {outcome}"),
        None => println!("  resolved: not yet"),
    }
    println!("  YES pool: {}", format_amount(market.total_yes, decimals, symbol));
    println!("  NO pool:  {}", format_amount(market.total_no, decimals, symbol));
    if let Some(share) = yes_share(market.total_yes, market.total_no) {
        println!("  implied:  {share}% YES");
    }

    if let Some(position) = &output.position {
        if position.is_empty() {
            println!("  position: none");
        } else {
            println!(
                "  position: {} YES / {} NO{}",
                format_amount(position.yes, decimals, symbol),
                format_amount(position.no, decimals, symbol),
                if position.claimed { " (claimed)" } else { "" }
            );
        }
    }
    if let Some(winnings) = output.potential_winnings {
        println!("  payout:   {} if it goes your way", format_amount(winnings, decimals, symbol));
    }
    println!("  block:    {}", output.current_block);
}

/// Percentage of the pool staked on YES, one decimal place. `None` for an
/// empty pool or totals too large for a `Decimal`.
pub fn yes_share(total_yes: TokenAmount, total_no: TokenAmount) -> Option<Decimal> {
    let yes = Decimal::from_str(&total_yes.as_u256().to_string()).ok()?;
    let no = Decimal::from_str(&total_no.as_u256().to_string()).ok()?;
    let total = yes.checked_add(no)?;
    if total.is_zero() {
        return None;
    }
    let share = yes.checked_div(total)?.checked_mul(Decimal::ONE_HUNDRED)?;
    Some(share.round_dp(1))
}
