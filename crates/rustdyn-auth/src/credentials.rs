//! Credential material used to sign requests.

use std::fmt;

use chrono::{DateTime, Utc};

/// Access key pair plus the optional session token and expiry of temporary
/// credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The access key id.
    pub access_key_id: String,
    /// The secret access key.
    pub secret_access_key: String,
    /// Session token issued alongside temporary credentials.
    pub session_token: Option<String>,
    /// When temporary credentials stop being valid.
    pub expiration: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Create long-lived credentials without a token or expiry.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            expiration: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Attach an expiry timestamp.
    #[must_use]
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Returns `true` once `now` has reached the expiry. Credentials without
    /// an expiry never expire.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|expiration| expiration <= now)
    }

    /// Returns `true` if the credentials are expired right now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_should_never_expire_without_expiration() {
        let creds = Credentials::new("AKID", "secret");
        assert!(!creds.is_expired());
    }

    #[test]
    fn test_should_expire_once_time_passes_expiration() {
        let now = Utc::now();
        let creds = Credentials::new("AKID", "secret").with_expiration(now + Duration::minutes(5));
        assert!(!creds.is_expired_at(now));
        assert!(creds.is_expired_at(now + Duration::minutes(5)));
        assert!(creds.is_expired_at(now + Duration::hours(1)));
    }

    #[test]
    fn test_should_redact_secrets_in_debug_output() {
        let creds = Credentials::new("AKID", "hunter2").with_session_token("token-value");
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("token-value"));
    }
}
