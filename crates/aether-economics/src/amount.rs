use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-token AE amount. Balances and prices in this economy are integral;
/// there is no sub-token unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens)
    }

    pub const fn tokens(&self) -> u64 {
        self.0
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AE", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        let a = TokenAmount::from_tokens(30);
        let b = TokenAmount::from_tokens(50);

        assert_eq!(a.checked_add(b), Some(TokenAmount::from_tokens(80)));
        assert_eq!(b.checked_sub(a), Some(TokenAmount::from_tokens(20)));
        assert_eq!(a.checked_sub(b), None);
        assert_eq!(
            TokenAmount::from_tokens(u64::MAX).checked_add(TokenAmount::from_tokens(1)),
            None
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenAmount::from_tokens(1000).to_string(), "1000 AE");
    }
}
