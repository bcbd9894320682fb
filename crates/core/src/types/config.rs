use std::time::Duration;

use alloy::primitives::Address;

use crate::gate::AuthorizationPolicy;

/// Per-session settings for the wager orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Fixed-point precision of the wagered token (6 for USDC-like tokens).
    pub decimals: u8,
    /// Contract that spends the token when a wager is placed.
    pub spender: Address,
    pub policy: AuthorizationPolicy,
    /// Reject amounts above the freshly read balance before prompting.
    pub enforce_balance: bool,
}

impl OrchestratorConfig {
    pub fn new(decimals: u8, spender: Address) -> Self {
        Self {
            decimals,
            spender,
            policy: AuthorizationPolicy::default(),
            enforce_balance: true,
        }
    }

    pub fn with_policy(mut self, policy: AuthorizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_balance_check(mut self, enforce: bool) -> Self {
        self.enforce_balance = enforce;
        self
    }
}

/// Patience window of the confirmation watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherConfig {
    pub required_confirmations: u64,
    pub timeout: Duration,
}

impl WatcherConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            required_confirmations: 1,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}
