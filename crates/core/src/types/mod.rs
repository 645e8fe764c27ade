//! Shared type definitions and newtypes

use serde::{Deserialize, Serialize};

/// Reward points amount (for clarity in function signatures)
///
/// Balances are always the server's last-known value; the client never
/// derives one by local arithmetic, so no arithmetic operators are provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Points(pub u32);

impl Points {
    pub fn new(amount: u32) -> Self {
        Points(amount)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Parse a server-reported balance, rejecting negative values
    pub fn from_server(value: i64) -> crate::Result<Self> {
        u32::try_from(value)
            .map(Points)
            .map_err(|_| crate::Error::InvalidData(format!("negative points balance: {value}")))
    }
}

impl std::fmt::Display for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pts", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_server_rejects_negative() {
        assert!(Points::from_server(-1).is_err());
        assert_eq!(Points::from_server(0).unwrap(), Points(0));
        assert_eq!(Points::from_server(42).unwrap(), Points(42));
    }
}
