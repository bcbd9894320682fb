use crate::types::{AllowanceSnapshot, TokenAmount};

/// True iff the snapshot does not already cover `requested`.
///
/// The snapshot must have been read during the current submission.
pub fn needs_authorization(snapshot: &AllowanceSnapshot, requested: TokenAmount) -> bool {
    snapshot.amount < requested
}

/// How much to authorize once an authorization is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorizationPolicy {
    /// Authorize the maximum representable amount once, so later wagers
    /// skip the authorization prompt. Leaves the spender with unlimited
    /// allowance.
    #[default]
    Unbounded,
    /// Authorize exactly the wagered amount. Every wager above the
    /// remaining allowance prompts again.
    Exact,
}

impl AuthorizationPolicy {
    pub fn authorization_amount(&self, requested: TokenAmount) -> TokenAmount {
        match self {
            AuthorizationPolicy::Unbounded => TokenAmount::MAX,
            AuthorizationPolicy::Exact => requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;

    use super::*;

    fn snapshot(amount: u64) -> AllowanceSnapshot {
        AllowanceSnapshot::new(Address::repeat_byte(1), Address::repeat_byte(2), amount.into())
    }

    #[test]
    fn sufficient_allowance_needs_no_authorization() {
        assert!(!needs_authorization(&snapshot(50), 50.into()));
        assert!(!needs_authorization(&snapshot(1_000_000), 50.into()));
    }

    #[test]
    fn short_allowance_needs_authorization() {
        assert!(needs_authorization(&snapshot(0), 50.into()));
        assert!(needs_authorization(&snapshot(49), 50.into()));
    }

    #[test]
    fn unbounded_allowance_covers_anything() {
        let unbounded = AllowanceSnapshot {
            amount: TokenAmount::MAX,
            ..snapshot(0)
        };
        assert!(!needs_authorization(&unbounded, TokenAmount::MAX));
    }

    #[test]
    fn policy_picks_authorization_amount() {
        let requested = TokenAmount::from(50);
        assert_eq!(
            AuthorizationPolicy::Unbounded.authorization_amount(requested),
            TokenAmount::MAX
        );
        assert_eq!(AuthorizationPolicy::Exact.authorization_amount(requested), requested);
    }
}
