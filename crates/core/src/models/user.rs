//! User and authentication models

use serde::{Deserialize, Serialize};

/// Account role reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Request body for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Response from login/signup: identity plus the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Raw server value; validated when building the Session
    #[serde(default)]
    pub points: i64,
    pub token: String,
}

/// Profile from `GET /users/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregate counters from `GET /users/me/stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub coupons_added: u32,
    #[serde(default)]
    pub coupons_redeemed: u32,
    #[serde(default)]
    pub current_points: i64,
    #[serde(default)]
    pub total_points_earned: i64,
    #[serde(default)]
    pub total_points_spent: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_defaults_role() {
        let json = r#"{
            "id": "u1",
            "fullName": "Asha Rao",
            "email": "asha@example.com",
            "points": 20,
            "token": "jwt-token"
        }"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(auth.role, Role::User);
        assert_eq!(auth.points, 20);
    }

    #[test]
    fn test_role_wire_format() {
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert!(role.is_admin());
    }
}
