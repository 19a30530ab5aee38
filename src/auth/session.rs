use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, warn};

pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            other => Err(format!("unknown role `{other}` (expected admin or editor)")),
        }
    }
}

/// Contents of the encrypted session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// `None` for the shared admin password login.
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
}

/// Cookie attributes derived from `[basic]` config.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub secure: bool,
    pub ttl: chrono::Duration,
}

impl SessionSettings {
    pub fn new(insecure_cookie: bool, ttl_hours: u32) -> Self {
        Self {
            secure: !insecure_cookie,
            ttl: chrono::Duration::hours(i64::from(ttl_hours)),
        }
    }
}

impl Session {
    pub fn new(user_id: Option<i64>, email: Option<String>, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
            issued_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, ttl: chrono::Duration) -> bool {
        Utc::now() - self.issued_at >= ttl
    }

    /// Decrypted, parsed and unexpired session from the jar, if any.
    pub fn from_jar(jar: &PrivateCookieJar, settings: &SessionSettings) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        let session = match serde_json::from_str::<Session>(cookie.value()) {
            Ok(session) => session,
            Err(e) => {
                debug!(error = %e, "discarding malformed session cookie");
                return None;
            }
        };
        if session.is_expired(settings.ttl) {
            debug!(issued_at = %session.issued_at, "session expired");
            return None;
        }
        Some(session)
    }

    pub fn to_cookie(&self, settings: &SessionSettings) -> Cookie<'static> {
        // Serializing a plain struct of strings and numbers cannot fail.
        let value = serde_json::to_string(self).unwrap_or_default();
        Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(settings.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(settings.ttl.num_seconds()))
            .build()
    }

    /// Cookie that clears the session when passed to `PrivateCookieJar::remove`.
    pub fn removal_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, "")).path("/").build()
    }
}

/// Key for the private cookie jar. Secrets shorter than 64 bytes are rejected
/// in favour of a per-process random key.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => match Key::try_from(secret.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "basic.cookie_secret is too short, using a random key");
                Key::generate()
            }
        },
        None => {
            warn!("basic.cookie_secret not set, sessions will not survive a restart");
            Key::generate()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" editor ".parse::<Role>(), Ok(Role::Editor));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn session_expires_after_ttl() {
        let mut session = Session::new(None, None, Role::Admin);
        assert!(!session.is_expired(chrono::Duration::hours(1)));
        session.issued_at = Utc::now() - chrono::Duration::hours(2);
        assert!(session.is_expired(chrono::Duration::hours(1)));
    }

    #[test]
    fn cookie_attributes_follow_settings() {
        let session = Session::new(Some(3), Some("ed@example.com".into()), Role::Editor);
        let cookie = session.to_cookie(&SessionSettings::new(true, 24));
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
        let parsed: Session = serde_json::from_str(cookie.value()).unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn short_secret_falls_back_to_random_key() {
        let a = cookie_key(Some("too short"));
        let b = cookie_key(Some("too short"));
        assert_ne!(a.master(), b.master());
        let long = "x".repeat(64);
        assert_eq!(
            cookie_key(Some(&long)).master(),
            cookie_key(Some(&long)).master()
        );
    }
}
