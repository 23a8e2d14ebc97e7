use async_trait::async_trait;
use auth::GoogleAuthError;
use auth::GoogleTokenVerifier;
use auth::IdentityProfile;

use crate::domain::auth::ports::IdentityVerifier;

// The auth library's verifier already has the port's exact shape; adapting it
// here keeps the domain free of a direct dependency on the concrete client.
#[async_trait]
impl IdentityVerifier for GoogleTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<IdentityProfile, GoogleAuthError> {
        GoogleTokenVerifier::verify(self, id_token).await
    }
}
