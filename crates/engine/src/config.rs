//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client works with zero configuration.

use std::path::PathBuf;

use dealvista_core::DEFAULT_PAGE_SIZE;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the coupon API.
    /// Env: `DEALVISTA_API_URL`
    /// Default: `https://api.dealvista.app`
    pub api_url: String,

    /// Session cookie lifetime in seconds.
    /// Env: `DEALVISTA_SESSION_TTL_SECS`
    /// Default: `3600` (1 hour)
    pub session_ttl_secs: i64,

    /// Page size for catalog browsing.
    /// Env: `DEALVISTA_PAGE_SIZE`
    /// Default: `10`
    pub page_size: u32,

    /// Filesystem path of the session cookie.
    /// Env: `DEALVISTA_COOKIE_PATH`
    /// Default: `$HOME/.dealvista/session.cookie`, falling back to
    /// `./.dealvista-session` when no home directory is known.
    pub cookie_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.dealvista.app".to_string(),
            session_ttl_secs: 3600,
            page_size: DEFAULT_PAGE_SIZE,
            cookie_path: default_cookie_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("DEALVISTA_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }

        if let Ok(val) = std::env::var("DEALVISTA_SESSION_TTL_SECS") {
            if let Ok(secs) = val.parse::<i64>() {
                if secs > 0 {
                    config.session_ttl_secs = secs;
                } else {
                    tracing::warn!(value = %val, "Non-positive DEALVISTA_SESSION_TTL_SECS, using default");
                }
            } else {
                tracing::warn!(value = %val, "Invalid DEALVISTA_SESSION_TTL_SECS, using default");
            }
        }

        if let Ok(val) = std::env::var("DEALVISTA_PAGE_SIZE") {
            if let Ok(size) = val.parse::<u32>() {
                if size > 0 {
                    config.page_size = size;
                }
            }
        }

        if let Ok(path) = std::env::var("DEALVISTA_COOKIE_PATH") {
            if !path.is_empty() {
                config.cookie_path = PathBuf::from(path);
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs)
    }
}

fn default_cookie_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => {
            PathBuf::from(home).join(".dealvista").join("session.cookie")
        }
        _ => PathBuf::from("./.dealvista-session"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.session_ttl_secs, 3600);
        assert_eq!(config.page_size, 10);
        assert!(config.api_url.starts_with("https://"));
    }

    #[test]
    fn test_session_ttl_duration() {
        let config = AppConfig {
            session_ttl_secs: 90,
            ..Default::default()
        };
        assert_eq!(config.session_ttl(), chrono::Duration::seconds(90));
    }
}
