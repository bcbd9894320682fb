use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use alloy::primitives::Address;
use serde::Deserialize;
use thiserror::Error;
use wager_core::{AuthorizationPolicy, MarketId, Outcome, WatcherConfig};

pub const DEFAULT_CONFIG_PATH: &str = "wager.toml";
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
pub const RPC_URL_ENV: &str = "WAGER_RPC_URL";

#[derive(Debug, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub watcher: WatcherFileConfig,
    #[serde(default)]
    pub wager: WagerConfig,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct NetworkConfig {
    pub rpc_url: Option<String>,
    /// First block scanned for market logs.
    pub from_block: Option<u64>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ContractsConfig {
    pub token: String,
    pub market: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct TokenConfig {
    #[serde(default = "TokenConfig::default_decimals")]
    pub decimals: u8,
}

impl TokenConfig {
    fn default_decimals() -> u8 {
        6
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            decimals: Self::default_decimals(),
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct WatcherFileConfig {
    pub confirmations: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl WatcherFileConfig {
    pub fn resolve(&self) -> WatcherConfig {
        let defaults = WatcherConfig::default();
        WatcherConfig {
            required_confirmations: self
                .confirmations
                .unwrap_or(defaults.required_confirmations),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationSetting {
    #[default]
    Unbounded,
    Exact,
}

impl From<AuthorizationSetting> for AuthorizationPolicy {
    fn from(setting: AuthorizationSetting) -> Self {
        match setting {
            AuthorizationSetting::Unbounded => AuthorizationPolicy::Unbounded,
            AuthorizationSetting::Exact => AuthorizationPolicy::Exact,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct WagerConfig {
    pub market_id: Option<u64>,
    pub outcome: Option<String>,
    pub amount: Option<String>,
    #[serde(default)]
    pub authorization: AuthorizationSetting,
}

/// Contract addresses after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contracts {
    pub token: Address,
    pub market: Address,
}

/// A wager ready for the orchestrator, minus the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wager {
    pub market_id: MarketId,
    pub outcome: Outcome,
    pub amount: String,
    pub policy: AuthorizationPolicy,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WagerOverrides {
    pub market_id: Option<u64>,
    pub outcome: Option<Outcome>,
    pub amount: Option<String>,
    pub exact: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse toml at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid {field} address `{value}`")]
    InvalidAddress { field: &'static str, value: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum WagerError {
    #[error("missing market id: pass --market-id or set [wager] market_id")]
    MissingMarket,
    #[error("missing outcome: pass --outcome or set [wager] outcome")]
    MissingOutcome,
    #[error("missing amount: pass --amount or set [wager] amount")]
    MissingAmount,
    #[error(transparent)]
    InvalidOutcome(#[from] wager_core::ParseOutcomeError),
}

pub fn load_config(path: impl AsRef<Path>) -> Result<FileConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FileConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(config)
}

impl FileConfig {
    pub fn contracts(&self) -> Result<Contracts, ConfigError> {
        Ok(Contracts {
            token: parse_address("token", &self.contracts.token)?,
            market: parse_address("market", &self.contracts.market)?,
        })
    }
}

pub fn resolve_wager(config: &FileConfig, overrides: WagerOverrides) -> Result<Wager, WagerError> {
    let market_id = overrides
        .market_id
        .or(config.wager.market_id)
        .ok_or(WagerError::MissingMarket)?;

    let outcome = match overrides.outcome {
        Some(outcome) => outcome,
        None => config
            .wager
            .outcome
            .as_deref()
            .ok_or(WagerError::MissingOutcome)?
            .parse()?,
    };

    let amount = overrides
        .amount
        .or_else(|| config.wager.amount.clone())
        .ok_or(WagerError::MissingAmount)?;

    let policy = if overrides.exact {
        AuthorizationPolicy::Exact
    } else {
        config.wager.authorization.into()
    };

    Ok(Wager {
        market_id: MarketId::from(market_id),
        outcome,
        amount,
        policy,
    })
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> FileConfig {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("wager.example.toml");
        load_config(path).expect("should parse example config")
    }

    #[test]
    fn parses_example_config() {
        let config = example();

        assert_eq!(config.network.rpc_url.as_deref(), Some("http://127.0.0.1:8545"));
        assert_eq!(config.network.from_block, None);
        assert_eq!(config.token.decimals, 6);
        assert_eq!(config.wager.market_id, Some(1));
        assert_eq!(config.wager.authorization, AuthorizationSetting::Unbounded);

        let contracts = config.contracts().expect("valid addresses");
        assert_ne!(contracts.token, contracts.market);

        let watcher = config.watcher.resolve();
        assert_eq!(watcher.required_confirmations, 1);
        assert_eq!(watcher.timeout, Duration::from_secs(120));
    }

    #[test]
    fn overrides_take_precedence_over_file() {
        let config = example();

        let wager = resolve_wager(
            &config,
            WagerOverrides {
                amount: Some("2.5".into()),
                outcome: Some(Outcome::No),
                exact: true,
                ..Default::default()
            },
        )
        .expect("should resolve");

        assert_eq!(wager.market_id, MarketId::from(1));
        assert_eq!(wager.outcome, Outcome::No);
        assert_eq!(wager.amount, "2.5");
        assert_eq!(wager.policy, AuthorizationPolicy::Exact);

        let from_file = resolve_wager(&config, WagerOverrides::default()).expect("should resolve");
        assert_eq!(from_file.outcome, Outcome::Yes);
        assert_eq!(from_file.amount, "10");
        assert_eq!(from_file.policy, AuthorizationPolicy::Unbounded);
    }

    #[test]
    fn missing_fields_are_reported() {
        let config: FileConfig = toml::from_str(
            r#"
            [network]
            from_block = 19000000

            [contracts]
            token = "0x3c499c542cef5e3811e1192ce70d8cc03d5c3359"
            market = "not-an-address"
            "#,
        )
        .expect("minimal config parses");

        assert_eq!(config.token.decimals, 6);
        assert_eq!(config.network.from_block, Some(19_000_000));
        assert_eq!(
            resolve_wager(&config, WagerOverrides::default()),
            Err(WagerError::MissingMarket)
        );
        assert!(matches!(
            config.contracts(),
            Err(ConfigError::InvalidAddress { field: "market", .. })
        ));
    }
}
