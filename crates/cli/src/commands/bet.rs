use alloy::{primitives::Address, providers::Provider};
use eyre::{Result, bail};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;
use wager_core::{
    AuthorizationPolicy, MarketClient, OrchestratorConfig, OrchestratorError, OrchestratorState,
    StateTransition, WagerIntent, WagerOrchestrator,
};

use super::format_amount;
use crate::config::Wager;

/// Places one wager through the orchestrator, printing every state change.
pub async fn bet<P>(
    client: MarketClient<P>,
    account: Address,
    wager: Wager,
    decimals: u8,
) -> Result<()>
where
    P: Provider + Clone + 'static,
{
    ensure_decimals(decimals, client.decimals().await?)?;
    let symbol = client.symbol().await.unwrap_or_else(|_| "tokens".into());
    let config = OrchestratorConfig::new(decimals, client.market()).with_policy(wager.policy);
    let orchestrator = WagerOrchestrator::new(client.clone(), client.clone(), client, config);

    let intent = WagerIntent::new(wager.market_id, wager.outcome, wager.amount, account);
    println!(
        "Betting {} {symbol} on {} in market {} ({} authorization)",
        intent.amount,
        intent.outcome,
        intent.market_id,
        policy_label(orchestrator.config().policy)
    );

    let mut transitions = orchestrator.transitions();
    let (result, ()) = tokio::join!(
        orchestrator.submit(intent),
        print_transitions(&mut transitions)
    );

    match orchestrator.refresh(account).await {
        Ok(cache) => {
            if let Some(balance) = cache.balance() {
                println!("Balance:   {}", format_amount(balance, decimals, &symbol));
            }
            if let Some(allowance) = cache.allowance() {
                println!(
                    "Allowance: {}",
                    format_amount(allowance.amount, decimals, &symbol)
                );
            }
        }
        Err(err) => warn!(%err, "could not refresh balance after the wager"),
    }

    orchestrator.reset()?;

    match result {
        Ok(receipt) => {
            if let Some(authorization) = &receipt.authorization {
                println!("Authorized in {}", authorization.hash);
            }
            println!(
                "Wagered {} {symbol} in {}",
                wager_core::amount::to_display_string(receipt.amount, decimals),
                receipt.wager.hash
            );
            Ok(())
        }
        Err(OrchestratorError::Failed(reason)) if reason.requires_reconciliation() => {
            Err(eyre::eyre!(
                "{reason}; check the transaction on a block explorer before retrying"
            ))
        }
        Err(err) => Err(err.into()),
    }
}

/// Prints transitions until the run reaches a terminal state.
async fn print_transitions(transitions: &mut broadcast::Receiver<StateTransition>) {
    loop {
        match transitions.recv().await {
            Ok(StateTransition { from, to }) => {
                println!("  {} -> {}", from.name(), to.name());
                if let Some(handle) = to.pending() {
                    println!("     waiting on {} {}", handle.kind, handle.hash);
                }
                if let OrchestratorState::Failed(reason) = &to {
                    println!("     {reason}");
                }
                if to.is_terminal() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "missed state transitions");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Refuses to scale amounts with a precision the token does not use.
fn ensure_decimals(configured: u8, onchain: u8) -> Result<()> {
    if configured != onchain {
        bail!(
            "[token] decimals is {configured} but the token reports {onchain}; fix wager.toml before betting"
        );
    }
    Ok(())
}

fn policy_label(policy: AuthorizationPolicy) -> &'static str {
    match policy {
        AuthorizationPolicy::Unbounded => "unlimited",
        AuthorizationPolicy::Exact => "exact",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_must_match_the_token() {
        assert!(ensure_decimals(6, 6).is_ok());

        let error = ensure_decimals(6, 18).unwrap_err();
        assert!(error.to_string().contains("token reports 18"));
    }
}
