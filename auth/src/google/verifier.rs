use std::collections::HashMap;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::claims::GoogleClaims;
use super::claims::IdentityProfile;
use super::errors::GoogleAuthError;

const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Both issuer spellings Google uses in ID tokens.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Bound on the signing-key fetch; a slow or dead endpoint must fail the
/// verification, not hang the request.
const KEY_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Google OAuth client identity, loaded once from configuration.
#[derive(Debug, Clone)]
pub struct GoogleClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

/// Verifies Google-issued ID tokens against Google's published signing keys.
///
/// Keys are fetched lazily and cached by key id; an unknown key id triggers a
/// single re-fetch since Google rotates its keys. Safe for concurrent reuse
/// once constructed.
pub struct GoogleTokenVerifier {
    config: GoogleClientConfig,
    http: reqwest::Client,
    certs_url: String,
    keys: RwLock<HashMap<String, Jwk>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

impl GoogleTokenVerifier {
    /// Create a verifier against Google's production certs endpoint.
    ///
    /// # Errors
    /// * `VerificationFailed` - Client credentials missing or the HTTP client
    ///   could not be constructed
    pub fn new(config: GoogleClientConfig) -> Result<Self, GoogleAuthError> {
        Self::with_certs_url(config, GOOGLE_CERTS_URL.to_string())
    }

    /// The certs endpoint is injectable so tests can point at a local server.
    pub fn with_certs_url(
        config: GoogleClientConfig,
        certs_url: String,
    ) -> Result<Self, GoogleAuthError> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            tracing::error!(
                has_client_id = !config.client_id.is_empty(),
                has_client_secret = !config.client_secret.is_empty(),
                "Google OAuth configuration missing"
            );
            return Err(GoogleAuthError::VerificationFailed(
                "Google OAuth client credentials not configured".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(KEY_FETCH_TIMEOUT)
            .build()
            .map_err(|e| GoogleAuthError::VerificationFailed(e.to_string()))?;

        tracing::info!(
            client_id = %redact(&config.client_id),
            "Google OAuth client initialized"
        );

        Ok(Self {
            config,
            http,
            certs_url,
            keys: RwLock::new(HashMap::new()),
        })
    }

    /// Verify a Google ID token and extract the user profile.
    ///
    /// Checks signature (RS256, key selected by the token's key id), issuer,
    /// audience against the configured client id, expiry and not-before, and
    /// the email-verified invariant.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a parseable JWT
    /// * `SignatureInvalid` - Signature, issuer, or audience mismatch
    /// * `Expired` / `NotYetValid` - Outside the token's validity window
    /// * `EmailUnverified` - Email claim missing or not provider-verified
    /// * `VerificationFailed` - Signing-key fetch failed; never treated as
    ///   success
    pub async fn verify(&self, id_token: &str) -> Result<IdentityProfile, GoogleAuthError> {
        if id_token.is_empty() {
            return Err(GoogleAuthError::InvalidFormat(
                "token must be a non-empty string".to_string(),
            ));
        }

        let header =
            decode_header(id_token).map_err(|e| GoogleAuthError::InvalidFormat(e.to_string()))?;
        let kid = header.kid.ok_or(GoogleAuthError::SignatureInvalid)?;

        let key = self.signing_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.config.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleClaims>(id_token, &key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => GoogleAuthError::Expired,
                ErrorKind::ImmatureSignature => GoogleAuthError::NotYetValid,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAlgorithm => GoogleAuthError::SignatureInvalid,
                ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    GoogleAuthError::InvalidFormat(e.to_string())
                }
                _ => GoogleAuthError::VerificationFailed(e.to_string()),
            }
        })?;

        let profile = IdentityProfile::try_from(data.claims)?;

        tracing::debug!(subject = %profile.subject, "Google identity token verified");

        Ok(profile)
    }

    async fn signing_key(&self, kid: &str) -> Result<DecodingKey, GoogleAuthError> {
        if let Some(jwk) = self.keys.read().await.get(kid) {
            return decoding_key(jwk);
        }

        self.refresh_keys().await?;

        match self.keys.read().await.get(kid) {
            Some(jwk) => decoding_key(jwk),
            // Still unknown after a fresh fetch: not a key Google signs with
            None => Err(GoogleAuthError::SignatureInvalid),
        }
    }

    async fn refresh_keys(&self) -> Result<(), GoogleAuthError> {
        let response = self
            .http
            .get(&self.certs_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(error = %e, "Google signing-key fetch failed");
                GoogleAuthError::VerificationFailed(format!("signing-key fetch failed: {e}"))
            })?;

        let jwks: JwkSet = response.json().await.map_err(|e| {
            GoogleAuthError::VerificationFailed(format!("signing-key set malformed: {e}"))
        })?;

        let mut keys = self.keys.write().await;
        keys.clear();
        for jwk in jwks.keys {
            keys.insert(jwk.kid.clone(), jwk);
        }

        tracing::debug!(key_count = keys.len(), "Google signing keys refreshed");

        Ok(())
    }
}

fn decoding_key(jwk: &Jwk) -> Result<DecodingKey, GoogleAuthError> {
    DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
        .map_err(|e| GoogleAuthError::VerificationFailed(format!("invalid signing key: {e}")))
}

fn redact(client_id: &str) -> String {
    if client_id.chars().count() > 12 {
        let prefix: String = client_id.chars().take(6).collect();
        let suffix: String = client_id
            .chars()
            .rev()
            .take(6)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{prefix}...{suffix}")
    } else {
        "(short)".to_string()
    }
}

/// Decode a Google ID token's payload without any verification.
///
/// # Security Warning
/// This does NOT validate the token signature. Only use for debugging or for
/// extracting claims before full validation; never trust the result for
/// authorization decisions.
pub fn decode_unverified(id_token: &str) -> Result<GoogleClaims, GoogleAuthError> {
    let mut segments = id_token.split('.');

    let payload = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(GoogleAuthError::InvalidFormat(
                "expected three dot-separated segments".to_string(),
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| GoogleAuthError::InvalidFormat(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| GoogleAuthError::InvalidFormat(e.to_string()))
}
