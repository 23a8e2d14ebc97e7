use std::sync::Arc;

use async_trait::async_trait;
use auth::IdentityProfile;
use auth::TokenIssuer;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthSession;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::RefreshedSession;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::IdentityVerifier;
use crate::domain::auth::ports::RefreshTokenLedger;
use crate::domain::auth::ports::UserRepository;

/// Domain service implementing login and refresh-rotation flows.
///
/// Concrete implementation of AuthServicePort with dependency injection:
/// identity verifier, user store, and refresh-token ledger are ports; the
/// token issuer is constructed once from process configuration.
pub struct AuthSessionService<IV, UR, RL>
where
    IV: IdentityVerifier,
    UR: UserRepository,
    RL: RefreshTokenLedger,
{
    verifier: Arc<IV>,
    users: Arc<UR>,
    ledger: Arc<RL>,
    issuer: Arc<TokenIssuer>,
}

impl<IV, UR, RL> AuthSessionService<IV, UR, RL>
where
    IV: IdentityVerifier,
    UR: UserRepository,
    RL: RefreshTokenLedger,
{
    /// Create a new session service with injected dependencies.
    pub fn new(verifier: Arc<IV>, users: Arc<UR>, ledger: Arc<RL>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            verifier,
            users,
            ledger,
            issuer,
        }
    }

    /// Resolve the local account for a verified profile: by provider subject
    /// first, then by email for accounts that predate the Google link. The
    /// provider is authoritative for display name and picture, so a match
    /// refreshes both (most-recent-wins).
    async fn resolve_or_create_user(&self, profile: IdentityProfile) -> Result<User, AuthError> {
        let existing = match self.users.find_by_google_id(&profile.subject).await? {
            Some(user) => Some(user),
            None => self.users.find_by_email(&profile.email).await?,
        };

        if let Some(mut user) = existing {
            user.google_id = profile.subject;
            user.email = EmailAddress::new(profile.email)?;
            if !profile.display_name.is_empty() {
                user.display_name = profile.display_name;
            }
            if profile.picture_url.is_some() {
                user.picture_url = profile.picture_url;
            }

            let updated = self.users.update(user).await?;
            tracing::info!(user_id = %updated.id, "Existing account refreshed from provider profile");
            return Ok(updated);
        }

        let user = User {
            id: UserId::new(),
            google_id: profile.subject,
            email: EmailAddress::new(profile.email)?,
            display_name: profile.display_name,
            picture_url: profile.picture_url,
            created_at: Utc::now(),
        };

        let created = self.users.create(user).await?;
        tracing::info!(user_id = %created.id, "Account created");
        Ok(created)
    }

    /// Issue an access/refresh pair for `user` and record the refresh token
    /// in the ledger.
    async fn issue_pair(&self, user: &User) -> Result<(String, String), AuthError> {
        let user_id = user.id.to_string();

        let access_token = self
            .issuer
            .issue_access(&user_id, Some(user.email.as_str()))
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;
        let refresh_token = self
            .issuer
            .issue_refresh(&user_id)
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        let expires_at = Utc::now() + self.issuer.refresh_lifetime();
        self.ledger
            .record(&refresh_token, &user.id, expires_at)
            .await?;

        Ok((access_token, refresh_token))
    }
}

#[async_trait]
impl<IV, UR, RL> AuthServicePort for AuthSessionService<IV, UR, RL>
where
    IV: IdentityVerifier,
    UR: UserRepository,
    RL: RefreshTokenLedger,
{
    async fn login(&self, id_token: &str) -> Result<AuthSession, AuthError> {
        let profile = self.verifier.verify(id_token).await.map_err(|e| {
            tracing::warn!(error = %e, "Identity token rejected");
            AuthError::from(e)
        })?;

        let user = self.resolve_or_create_user(profile).await?;
        let (access_token, refresh_token) = self.issue_pair(&user).await?;

        tracing::info!(user_id = %user.id, "Login succeeded");

        Ok(AuthSession {
            user,
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedSession, AuthError> {
        let payload = self.issuer.verify(refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token failed verification");
            AuthError::InvalidRefresh
        })?;

        let record = self
            .ledger
            .lookup(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefresh)?;

        if !record.is_live(Utc::now()) {
            // A well-signed token pointing at a dead record is the replay
            // signature of a stolen credential.
            tracing::warn!(user_id = %record.user_id, "Refresh attempted with a revoked or expired token");
            return Err(AuthError::InvalidRefresh);
        }

        let owner = UserId::from_string(payload.user_id()).map_err(|_| AuthError::InvalidRefresh)?;
        let user = self
            .users
            .find_by_id(&owner)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Rotation: the conditional revoke admits exactly one winner per
        // token value, no matter how many calls race.
        if !self.ledger.revoke(&record.id).await? {
            tracing::warn!(user_id = %record.user_id, "Refresh lost rotation race; token already consumed");
            return Err(AuthError::InvalidRefresh);
        }

        let (access_token, new_refresh_token) = self.issue_pair(&user).await?;

        tracing::info!(user_id = %user.id, "Refresh token rotated");

        Ok(RefreshedSession {
            user_id: user.id,
            access_token,
            refresh_token: new_refresh_token,
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        if let Some(record) = self.ledger.lookup(refresh_token).await? {
            self.ledger.revoke(&record.id).await?;
            tracing::info!(user_id = %record.user_id, "Refresh token revoked at logout");
        }

        Ok(())
    }

    async fn current_user(&self, id: &UserId) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
