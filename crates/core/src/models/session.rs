//! Client-side session record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AuthResponse, Role};
use crate::types::Points;
use crate::Result;

/// Authenticated identity persisted between runs
///
/// `points_balance` is always the server's last-known value. The record is
/// serialized into the session cookie; field names match the original wire
/// casing so stale cookies from older clients still parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub token: String,
    pub points_balance: Points,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a login/signup response
    ///
    /// Fails with invalid-data when the server reports a negative balance.
    pub fn from_auth(auth: AuthResponse, expires_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            user_id: auth.id,
            display_name: auth.full_name,
            email: auth.email,
            role: auth.role,
            token: auth.token,
            points_balance: Points::from_server(auth.points)?,
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn auth() -> AuthResponse {
        AuthResponse {
            id: "u1".into(),
            full_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            role: Role::User,
            points: 20,
            token: "jwt".into(),
        }
    }

    #[test]
    fn test_from_auth_carries_server_balance() {
        let expires = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let session = Session::from_auth(auth(), expires).unwrap();
        assert_eq!(session.points_balance, Points(20));
        assert_eq!(session.expires_at, expires);
    }

    #[test]
    fn test_from_auth_rejects_negative_balance() {
        let mut a = auth();
        a.points = -3;
        let expires = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        assert!(Session::from_auth(a, expires).is_err());
    }

    #[test]
    fn test_expiry_is_inclusive_of_deadline() {
        let expires = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let session = Session::from_auth(auth(), expires).unwrap();
        assert!(!session.is_expired_at(expires - chrono::Duration::seconds(1)));
        assert!(session.is_expired_at(expires));
    }
}
