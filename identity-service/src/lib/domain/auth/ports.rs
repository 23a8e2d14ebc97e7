use async_trait::async_trait;
use auth::GoogleAuthError;
use auth::IdentityProfile;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthSession;
use crate::domain::auth::models::RefreshTokenId;
use crate::domain::auth::models::RefreshTokenRecord;
use crate::domain::auth::models::RefreshedSession;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for login, refresh, and session operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify a Google identity token, resolve or create the local account,
    /// and issue a fresh access/refresh pair.
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Identity token rejected by the verifier
    /// * `VerificationFailed` - Provider-side or network failure
    /// * `Persistence` - Account or ledger storage failed
    async fn login(&self, id_token: &str) -> Result<AuthSession, AuthError>;

    /// Exchange a refresh token for a new access/refresh pair, revoking the
    /// presented token (rotation). Exactly one of any number of concurrent
    /// calls presenting the same token value succeeds.
    ///
    /// # Errors
    /// * `InvalidRefresh` - Token malformed, unknown, revoked, or expired;
    ///   deliberately indistinguishable
    /// * `UserNotFound` - Owning account no longer exists
    /// * `Persistence` - Ledger storage failed
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedSession, AuthError>;

    /// Revoke the ledger record behind a presented refresh token, if one
    /// exists. Idempotent; unknown tokens are a no-op.
    ///
    /// # Errors
    /// * `Persistence` - Ledger storage failed
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Retrieve the account behind an authenticated principal.
    ///
    /// # Errors
    /// * `UserNotFound` - Account was deleted after the token was issued
    /// * `Persistence` - Account storage failed
    async fn current_user(&self, id: &UserId) -> Result<User, AuthError>;
}

/// Port for verifying third-party identity assertions.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Validate an externally-issued identity token and extract the profile.
    ///
    /// Implementations must never report success on lookup or network
    /// failure.
    async fn verify(&self, id_token: &str) -> Result<IdentityProfile, GoogleAuthError>;
}

/// Persistence operations for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `Persistence` - Storage failed, including uniqueness races on
    ///   google_id or email
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Retrieve user by the provider-assigned subject identifier.
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, AuthError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Persistence` - Storage failed
    async fn update(&self, user: User) -> Result<User, AuthError>;
}

/// Persistence for issued refresh tokens: one record per issuance.
#[async_trait]
pub trait RefreshTokenLedger: Send + Sync + 'static {
    /// Insert a new unrevoked record for a freshly issued token.
    ///
    /// # Errors
    /// * `Persistence` - Storage failed
    async fn record(
        &self,
        token: &str,
        user_id: &UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AuthError>;

    /// Retrieve the record for a token value, revoked or not.
    async fn lookup(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Mark a record revoked. Idempotent.
    ///
    /// Returns whether THIS call performed the unrevoked-to-revoked
    /// transition. Rotation treats `false` as a lost race and fails; two
    /// concurrent rotations of one token value can never both see `true`.
    async fn revoke(&self, id: &RefreshTokenId) -> Result<bool, AuthError>;
}
