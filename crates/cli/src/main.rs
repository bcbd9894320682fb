use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use wager_cli::{
    commands::{balance, bet, claim, status, traders},
    config::{
        Contracts, DEFAULT_CONFIG_PATH, FileConfig, PRIVATE_KEY_ENV, RPC_URL_ENV, WagerOverrides,
        load_config, resolve_wager,
    },
    provider::{connect_read_only, connect_wallet, resolve_account, signer_from_key},
};
use wager_core::{EnrichmentConfig, MarketClient, MarketId, Outcome};

#[derive(Debug, Parser)]
#[command(name = "wager", about = "Prediction-market wager CLI", version)]
struct Cli {
    /// Path to the wager configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: PathBuf,

    /// RPC URL for the target chain, overrides [network] rpc_url
    #[arg(long, env = RPC_URL_ENV, value_name = "URL")]
    rpc_url: Option<String>,

    /// Key used to sign transactions
    #[arg(long, env = PRIVATE_KEY_ENV, hide_env_values = true, value_name = "KEY")]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Place a wager, authorizing token spending first if needed
    Bet(BetArgs),

    /// Show token balance and allowance for the market
    Balance(BalanceArgs),

    /// Show market info and your position
    Status(StatusArgs),

    /// Claim winnings from a resolved market
    Claim(ClaimArgs),

    /// Look up how many markets a few traders have bet on
    Traders(TradersArgs),
}

#[derive(Debug, Args)]
struct BetArgs {
    /// Market to bet on (from config by default)
    #[arg(long, value_name = "ID")]
    market_id: Option<u64>,
    /// yes or no (from config by default)
    #[arg(long, value_name = "OUTCOME")]
    outcome: Option<Outcome>,
    /// Amount in whole tokens, e.g. 12.5 (from config by default)
    #[arg(long, value_name = "AMOUNT")]
    amount: Option<String>,
    /// Authorize exactly the wagered amount instead of an unlimited allowance
    #[arg(long)]
    exact: bool,
}

#[derive(Debug, Args)]
struct BalanceArgs {
    /// Account to inspect, defaults to the signer
    #[arg(long, value_name = "ADDRESS")]
    account: Option<Address>,
    /// Keep printing on every new block
    #[arg(long)]
    follow: bool,
}

#[derive(Debug, Args)]
struct StatusArgs {
    #[arg(long, value_name = "ID")]
    market_id: u64,
    /// Account whose position to show, defaults to the signer
    #[arg(long, value_name = "ADDRESS")]
    account: Option<Address>,
}

#[derive(Debug, Args)]
struct ClaimArgs {
    #[arg(long, value_name = "ID")]
    market_id: u64,
}

#[derive(Debug, Args)]
struct TradersArgs {
    /// Traders to look up; collected from bet logs when omitted
    addresses: Vec<Address>,
    /// Only collect traders who bet on this market
    #[arg(long, value_name = "ID")]
    market_id: Option<u64>,
    /// First block to scan for bets, overrides [network] from_block
    #[arg(long, value_name = "BLOCK")]
    from_block: Option<u64>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let contracts = config.contracts()?;
    let rpc_url = cli
        .rpc_url
        .clone()
        .or_else(|| config.network.rpc_url.clone())
        .ok_or_else(|| eyre::eyre!("--rpc-url, {RPC_URL_ENV} or [network] rpc_url is required"))?;
    let key = cli.private_key.as_deref();
    let decimals = config.token.decimals;

    match cli.command {
        Commands::Bet(args) => {
            let wager = resolve_wager(
                &config,
                WagerOverrides {
                    market_id: args.market_id,
                    outcome: args.outcome,
                    amount: args.amount,
                    exact: args.exact,
                },
            )?;
            let signer = signer_from_key(require_key(key, "bet")?)?;
            let account = signer.address();
            let provider = connect_wallet(&rpc_url, signer).await?;
            bet::bet(client(provider, contracts, &config), account, wager, decimals).await?;
        }
        Commands::Balance(args) => {
            let account = resolve_account(args.account, key)?;
            let provider = connect_read_only(&rpc_url).await?;
            balance::balance(
                client(provider, contracts, &config),
                account,
                decimals,
                args.follow,
            )
            .await?;
        }
        Commands::Status(args) => {
            // Without an account or key, show the market alone.
            let account = match (args.account, key) {
                (None, None) => None,
                (explicit, key) => Some(resolve_account(explicit, key)?),
            };
            let provider = connect_read_only(&rpc_url).await?;
            let client = client(provider, contracts, &config);
            let symbol = client
                .symbol()
                .await
                .wrap_err("failed to read token symbol")?;
            let output =
                status::status(&client, MarketId::from(args.market_id), account).await?;
            status::print_status(&output, decimals, &symbol);
        }
        Commands::Claim(args) => {
            let signer = signer_from_key(require_key(key, "claim")?)?;
            let account = signer.address();
            let provider = connect_wallet(&rpc_url, signer).await?;
            claim::claim(
                &client(provider, contracts, &config),
                account,
                MarketId::from(args.market_id),
            )
            .await?;
        }
        Commands::Traders(args) => {
            let provider = connect_read_only(&rpc_url).await?;
            traders::traders(
                client(provider, contracts, &config),
                args.addresses,
                args.market_id.map(MarketId::from),
                args.from_block.or(config.network.from_block),
                EnrichmentConfig::default(),
            )
            .await?;
        }
    }

    Ok(())
}

fn client<P>(provider: P, contracts: Contracts, config: &FileConfig) -> MarketClient<P>
where
    P: alloy::providers::Provider + Clone,
{
    MarketClient::new(provider, contracts.token, contracts.market)
        .with_watcher(config.watcher.resolve())
}

fn require_key<'a>(key: Option<&'a str>, command: &str) -> eyre::Result<&'a str> {
    key.ok_or_else(|| eyre::eyre!("`{command}` sends transactions: set {PRIVATE_KEY_ENV}"))
}
