//! Cookie-backed session store
//!
//! Owns the in-memory [`Session`] and keeps the persisted cookie in sync
//! with it. Expiry is checked lazily on restore; an absent, malformed, or
//! expired cookie is treated identically to "not logged in".

use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;

use dealvista_core::{Error, Points, Result, Session};

use crate::cookie;

/// Storage backend holding the single session cookie line
pub trait CookieJar: Send + Sync {
    fn read(&self) -> Result<Option<String>>;
    fn write(&mut self, line: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// In-memory jar for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryJar {
    line: Option<String>,
}

impl CookieJar for MemoryJar {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.line.clone())
    }

    fn write(&mut self, line: &str) -> Result<()> {
        self.line = Some(line.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.line = None;
        Ok(())
    }
}

/// File-backed jar used by the CLI
#[derive(Debug)]
pub struct FileJar {
    path: PathBuf,
}

impl FileJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CookieJar for FileJar {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(line) => Ok(Some(line)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageError(e.to_string())),
        }
    }

    fn write(&mut self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::StorageError(e.to_string()))?;
        }
        std::fs::write(&self.path, line).map_err(|e| Error::StorageError(e.to_string()))
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::StorageError(e.to_string())),
        }
    }
}

/// Session store with a fixed TTL
///
/// Every mutation re-serializes the full session back to the jar with a
/// refreshed expiry window and the cookie security attributes.
pub struct SessionStore {
    jar: Box<dyn CookieJar>,
    ttl: Duration,
    secure: bool,
    current: Option<Session>,
}

impl SessionStore {
    /// Default session lifetime (matches the original web client)
    pub const DEFAULT_TTL_SECS: i64 = 3600;

    pub fn new(jar: Box<dyn CookieJar>, ttl: Duration, secure: bool) -> Self {
        Self {
            jar,
            ttl,
            secure,
            current: None,
        }
    }

    /// File-backed store; `secure` should reflect the API transport
    pub fn on_disk(path: impl Into<PathBuf>, ttl: Duration, secure: bool) -> Self {
        Self::new(Box::new(FileJar::new(path)), ttl, secure)
    }

    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(Box::new(MemoryJar::default()), ttl, false)
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    /// Persist a freshly authenticated session
    ///
    /// Stamps `expires_at = now + TTL` regardless of what the session
    /// carried before.
    pub fn persist(&mut self, session: Session) -> Result<&Session> {
        self.persist_at(session, Utc::now())
    }

    pub(crate) fn persist_at(
        &mut self,
        mut session: Session,
        now: DateTime<Utc>,
    ) -> Result<&Session> {
        session.expires_at = now + self.ttl;
        let line = cookie::format_cookie(&session, self.secure)?;
        self.jar.write(&line)?;
        Ok(self.current.insert(session))
    }

    /// Load the persisted session, if any
    ///
    /// Clears the jar and returns None when the record is absent, does not
    /// parse, or has expired.
    pub fn restore(&mut self) -> Result<Option<Session>> {
        self.restore_at(Utc::now())
    }

    pub(crate) fn restore_at(&mut self, now: DateTime<Utc>) -> Result<Option<Session>> {
        let Some(line) = self.jar.read()? else {
            self.current = None;
            return Ok(None);
        };
        match cookie::parse_cookie(&line) {
            Ok(session) if !session.is_expired_at(now) => {
                self.current = Some(session.clone());
                Ok(Some(session))
            }
            _ => {
                self.jar.clear()?;
                self.current = None;
                Ok(None)
            }
        }
    }

    /// Drop the session unconditionally
    ///
    /// Succeeds without any network call; a jar failure still leaves the
    /// in-memory state logged out.
    pub fn logout(&mut self) {
        self.current = None;
        let _ = self.jar.clear();
    }

    /// Overwrite the balance with the server-reported value and re-persist
    ///
    /// The balance is never computed locally. A negative value is rejected
    /// as an invalid response and the stored session is left untouched.
    pub fn apply_points_delta(&mut self, new_balance: i64) -> Result<Points> {
        self.apply_points_delta_at(new_balance, Utc::now())
    }

    pub(crate) fn apply_points_delta_at(
        &mut self,
        new_balance: i64,
        now: DateTime<Utc>,
    ) -> Result<Points> {
        let balance = Points::from_server(new_balance)?;
        let mut session = self.current.clone().ok_or(Error::SessionExpired)?;
        session.points_balance = balance;
        self.persist_at(session, now)?;
        Ok(balance)
    }
}
