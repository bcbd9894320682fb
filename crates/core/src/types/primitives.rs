use std::{fmt, str::FromStr};

use alloy::primitives::U256;
use thiserror::Error;

/// Token quantity in the token's smallest unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const MAX: Self = Self(U256::MAX);

    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_unbounded(&self) -> bool {
        self.0 == U256::MAX
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarketId(U256);

impl MarketId {
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl From<u64> for MarketId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    /// Contract encoding: YES is `true`.
    pub fn as_bool(&self) -> bool {
        matches!(self, Outcome::Yes)
    }

    pub fn from_bool(value: bool) -> Self {
        if value { Outcome::Yes } else { Outcome::No }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Yes => f.write_str("YES"),
            Outcome::No => f.write_str("NO"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown outcome `{0}`, expected yes or no")]
pub struct ParseOutcomeError(String);

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Outcome::Yes),
            "no" | "n" => Ok(Outcome::No),
            _ => Err(ParseOutcomeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_encodes_yes_as_true() {
        assert!(Outcome::Yes.as_bool());
        assert!(!Outcome::No.as_bool());
        assert_eq!(Outcome::from_bool(true), Outcome::Yes);
    }

    #[test]
    fn outcome_parses_case_insensitively() {
        assert_eq!("YES".parse::<Outcome>(), Ok(Outcome::Yes));
        assert_eq!(" no ".parse::<Outcome>(), Ok(Outcome::No));
        assert!("maybe".parse::<Outcome>().is_err());
    }

    #[test]
    fn max_amount_is_unbounded() {
        assert!(TokenAmount::MAX.is_unbounded());
        assert!(!TokenAmount::from(5).is_unbounded());
        assert!(TokenAmount::from(5) < TokenAmount::from(6));
    }
}
