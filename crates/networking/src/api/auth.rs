//! Authentication operations with credential validation

use crate::DealVistaClient;
use dealvista_core::{AuthResponse, Error, LoginRequest, Result, SignupRequest};
use tracing::info;

/// Log in with email/password
///
/// Credentials are checked for shape locally; the server decides whether
/// they are correct.
pub async fn login(client: &DealVistaClient, email: &str, password: &str) -> Result<AuthResponse> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::ValidationError("A valid email address is required".to_string()));
    }
    if password.is_empty() {
        return Err(Error::ValidationError("Password must not be empty".to_string()));
    }

    info!("Logging in as {}", email);
    client
        .login(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
}

/// Create an account and return the fresh session credentials
pub async fn signup(
    client: &DealVistaClient,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<AuthResponse> {
    let full_name = full_name.trim();
    let email = email.trim();
    if full_name.is_empty() {
        return Err(Error::ValidationError("Full name must not be empty".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(Error::ValidationError("A valid email address is required".to_string()));
    }
    if password.len() < 6 {
        return Err(Error::ValidationError(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    info!("Creating account for {}", email);
    client
        .signup(&SignupRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
}
