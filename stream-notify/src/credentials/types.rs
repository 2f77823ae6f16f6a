//! Core credential types.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// Tokens are treated as expired this long before the platform says so.
pub const EXPIRY_MARGIN: TimeDelta = TimeDelta::seconds(10);

/// Upper bound on a granted lifetime, so absurd `expires_in` values cannot
/// overflow date arithmetic.
const MAX_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

/// An API bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// A bearer token with the instant it stops being usable.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredToken {
    pub token: BearerToken,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// Token granted at `now` and valid for `expires_in` seconds, minus the
    /// safety margin.
    pub fn granted(token: impl Into<String>, expires_in: u64, now: DateTime<Utc>) -> Self {
        let lifetime = TimeDelta::seconds(expires_in.min(MAX_LIFETIME_SECS) as i64);
        Self {
            token: BearerToken::new(token),
            expires_at: now + lifetime - EXPIRY_MARGIN,
        }
    }

    /// Rebuild a persisted token from its config representation
    /// (token string and unix-seconds expiry). Both parts must be present.
    pub fn from_persisted(token: Option<&str>, expiry: Option<f64>) -> Option<Self> {
        let token = token.filter(|t| !t.is_empty())?;
        let expiry = expiry.filter(|e| e.is_finite())?;
        let expires_at = DateTime::<Utc>::from_timestamp_millis((expiry * 1000.0) as i64)?;
        Some(Self {
            token: BearerToken::new(token),
            expires_at,
        })
    }

    /// Expiry as unix seconds, the format kept in the config file.
    pub fn expiry_timestamp(&self) -> f64 {
        self.expires_at.timestamp_millis() as f64 / 1000.0
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Client id and secret used for the client-credentials grant.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_applies_margin() {
        let now = Utc::now();
        let token = StoredToken::granted("abc", 3600, now);
        assert_eq!(token.expires_at, now + TimeDelta::seconds(3590));
        assert!(!token.is_expired(now));
        assert!(token.is_expired(now + TimeDelta::seconds(3590)));
    }

    #[test]
    fn test_persisted_round_trip() {
        let token = StoredToken::granted("abc", 100, Utc::now());
        let restored =
            StoredToken::from_persisted(Some("abc"), Some(token.expiry_timestamp())).unwrap();
        assert_eq!(restored.token, token.token);
        assert_eq!(
            restored.expires_at.timestamp_millis(),
            token.expires_at.timestamp_millis()
        );
    }

    #[test]
    fn test_from_persisted_requires_both_parts() {
        assert!(StoredToken::from_persisted(None, Some(1.0)).is_none());
        assert!(StoredToken::from_persisted(Some("abc"), None).is_none());
        assert!(StoredToken::from_persisted(Some(""), Some(1.0)).is_none());
        assert!(StoredToken::from_persisted(Some("abc"), Some(f64::NAN)).is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let token = BearerToken::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));

        let creds = ClientCredentials {
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("id"));
        assert!(!debug.contains("hunter2"));
    }
}
