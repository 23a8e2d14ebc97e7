//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Local session-token issuance and verification (access + refresh JWTs)
//! - Google identity-token verification against Google's published keys
//!
//! Each service defines its own authentication traits and adapts these
//! implementations. This avoids coupling services through shared domain logic
//! while reducing code duplication.
//!
//! # Examples
//!
//! ## Local session tokens
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//!
//! let access = issuer.issue_access("user123", Some("alice@example.com")).unwrap();
//! let payload = issuer.verify(&access).unwrap();
//! assert_eq!(payload.sub, "user123");
//! assert_eq!(payload.email.as_deref(), Some("alice@example.com"));
//!
//! // Refresh tokens share the payload shape but carry no email claim.
//! let refresh = issuer.issue_refresh("user123").unwrap();
//! assert!(issuer.verify(&refresh).unwrap().email.is_none());
//! ```
//!
//! ## Google identity tokens
//! ```no_run
//! use auth::{GoogleClientConfig, GoogleTokenVerifier};
//!
//! # async fn run() -> Result<(), auth::GoogleAuthError> {
//! let verifier = GoogleTokenVerifier::new(GoogleClientConfig {
//!     client_id: "client-id.apps.googleusercontent.com".into(),
//!     client_secret: "client-secret".into(),
//!     redirect_url: "http://localhost:3000/auth/google/callback".into(),
//! })?;
//!
//! let profile = verifier.verify("<id token from Google Sign-In>").await?;
//! println!("signed in as {}", profile.email);
//! # Ok(())
//! # }
//! ```

pub mod google;
pub mod jwt;

// Re-export commonly used items
pub use google::GoogleAuthError;
pub use google::GoogleClaims;
pub use google::GoogleClientConfig;
pub use google::GoogleTokenVerifier;
pub use google::IdentityProfile;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenPayload;
