use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims embedded in locally-issued access and refresh tokens.
///
/// Both token kinds share this shape; they differ in lifetime and in whether
/// an email claim is present (refresh tokens carry none).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPayload {
    /// Subject: the owning user's identifier.
    pub sub: String,

    /// Email, embedded in access tokens only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenPayload {
    /// Create a payload for `user_id` expiring `lifetime` from now.
    pub fn new(user_id: impl ToString, email: Option<String>, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            email,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// The owning user's identifier.
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// The expiry instant itself counts as expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_payload() {
        let payload = TokenPayload::new("user123", Some("alice@example.com".to_string()), Duration::hours(24));

        assert_eq!(payload.sub, "user123");
        assert_eq!(payload.email.as_deref(), Some("alice@example.com"));
        assert_eq!(payload.exp - payload.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_email_omitted_when_absent() {
        let payload = TokenPayload::new("user123", None, Duration::days(7));

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_is_expired_boundary() {
        let mut payload = TokenPayload::new("user123", None, Duration::hours(1));
        payload.exp = 1000;

        assert!(!payload.is_expired(999));
        assert!(payload.is_expired(1000)); // Exactly at expiration counts as expired
        assert!(payload.is_expired(1001));
    }
}
