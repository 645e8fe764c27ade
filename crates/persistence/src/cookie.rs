//! Session cookie serialization
//!
//! The whole client-side auth state is one cookie-format record holding the
//! JSON-serialized [`Session`]. `SameSite=Strict` is always set; `Secure`
//! only when the API is reached over an encrypted transport. Expiry is
//! carried redundantly in the attribute string, but the `expiresAt` field
//! inside the payload is what the store checks on restore.

use dealvista_core::{Error, Result, Session};

/// Cookie name shared with the original web client
pub const SESSION_COOKIE: &str = "dealvista_user";

/// Serialize a session into a storable cookie line
pub fn format_cookie(session: &Session, secure: bool) -> Result<String> {
    let payload = serde_json::to_string(session)?;
    let mut line = format!(
        "{}={}; Expires={}; Path=/; SameSite=Strict",
        SESSION_COOKIE,
        percent_encode(&payload),
        session.expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
    );
    if secure {
        line.push_str("; Secure");
    }
    Ok(line)
}

/// Parse a stored cookie line back into a session
///
/// Any shape problem is an error; callers treat it the same as "not logged
/// in" and clear the jar.
pub fn parse_cookie(line: &str) -> Result<Session> {
    let first = line
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default();
    let (name, value) = first
        .split_once('=')
        .ok_or_else(|| Error::InvalidData("cookie line has no name=value pair".to_string()))?;
    if name != SESSION_COOKIE {
        return Err(Error::InvalidData(format!("unexpected cookie name: {name}")));
    }
    let payload = percent_decode(value)?;
    Ok(serde_json::from_str(&payload)?)
}

/// Percent-encode every byte outside the cookie-safe unreserved set
fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn percent_decode(encoded: &str) -> Result<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .ok_or_else(|| Error::InvalidData("truncated percent escape".to_string()))?;
            let hex = std::str::from_utf8(hex)
                .map_err(|_| Error::InvalidData("invalid percent escape".to_string()))?;
            let byte = u8::from_str_radix(hex, 16)
                .map_err(|_| Error::InvalidData(format!("invalid percent escape: %{hex}")))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|e| Error::InvalidData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dealvista_core::{AuthResponse, Points, Role};

    fn session() -> Session {
        let auth = AuthResponse {
            id: "u1".into(),
            full_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            role: Role::User,
            points: 20,
            token: "jwt.token.value".into(),
        };
        let expires = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        Session::from_auth(auth, expires).unwrap()
    }

    #[test]
    fn test_cookie_round_trip() {
        let original = session();
        let line = format_cookie(&original, true).unwrap();
        let restored = parse_cookie(&line).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.points_balance, Points(20));
    }

    #[test]
    fn test_strict_same_site_always_set() {
        let line = format_cookie(&session(), false).unwrap();
        assert!(line.contains("SameSite=Strict"));
        assert!(!line.contains("Secure"));
    }

    #[test]
    fn test_secure_flag_only_on_encrypted_transport() {
        let line = format_cookie(&session(), true).unwrap();
        assert!(line.ends_with("; Secure"));
    }

    #[test]
    fn test_parse_rejects_foreign_cookie() {
        assert!(parse_cookie("other_cookie=abc; Path=/").is_err());
        assert!(parse_cookie("not a cookie").is_err());
        assert!(parse_cookie(&format!("{SESSION_COOKIE}=%ZZ")).is_err());
    }
}
