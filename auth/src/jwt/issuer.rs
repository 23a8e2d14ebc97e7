use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenPayload;
use super::errors::TokenError;

/// Issues and verifies locally-signed bearer credentials.
///
/// One fixed symmetric algorithm (HS256) and one configured secret for the
/// whole process; tokens whose header names any other algorithm are rejected.
/// Rotating the secret invalidates every previously issued token.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    /// Policy default lifetime for access tokens.
    pub const DEFAULT_ACCESS_LIFETIME_HOURS: i64 = 24;

    /// Policy default lifetime for refresh tokens.
    pub const DEFAULT_REFRESH_LIFETIME_DAYS: i64 = 7;

    /// Create an issuer with the default token lifetimes.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self::with_lifetimes(
            secret,
            Duration::hours(Self::DEFAULT_ACCESS_LIFETIME_HOURS),
            Duration::days(Self::DEFAULT_REFRESH_LIFETIME_DAYS),
        )
    }

    /// Create an issuer with explicit access and refresh lifetimes.
    pub fn with_lifetimes(
        secret: &[u8],
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_lifetime,
            refresh_lifetime,
        }
    }

    pub fn access_lifetime(&self) -> Duration {
        self.access_lifetime
    }

    pub fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }

    /// Sign a short-lived access token for `user_id`.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn issue_access(&self, user_id: &str, email: Option<&str>) -> Result<String, TokenError> {
        let payload = TokenPayload::new(user_id, email.map(str::to_owned), self.access_lifetime);
        self.sign(&payload)
    }

    /// Sign a refresh token for `user_id`. Refresh tokens carry no email
    /// claim.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn issue_refresh(&self, user_id: &str) -> Result<String, TokenError> {
        let payload = TokenPayload::new(user_id, None, self.refresh_lifetime);
        self.sign(&payload)
    }

    fn sign(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, payload, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a token and return its payload.
    ///
    /// Pure function of (token, secret, current time); no external state is
    /// consulted.
    ///
    /// # Errors
    /// * `Expired` - Token expired (the expiry instant itself counts)
    /// * `NotYetValid` - Token carries a future not-before claim
    /// * `SignatureInvalid` - Signature mismatch or wrong algorithm
    /// * `Malformed` - Not a parseable token
    pub fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<TokenPayload>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureInvalid
                }
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        // jsonwebtoken lets a token live through its exp instant; here the
        // boundary counts as expired.
        if data.claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    /// Decode a token without signature or expiry validation.
    ///
    /// # Security Warning
    /// This does NOT validate the token. Only use for debugging or logging;
    /// never trust claims from this method for authorization decisions.
    pub fn decode_unverified(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<TokenPayload>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Malformed(e.to_string()))
    }
}
