use serde::Deserialize;
use serde::Serialize;

use super::errors::GoogleAuthError;

/// Raw claims of a Google ID token, as published by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleClaims {
    /// Google user ID (stable, unique per account)
    pub sub: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Canonical user profile extracted from a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    /// Opaque stable identifier assigned by the provider.
    pub subject: String,
    pub email: String,
    pub email_verified: bool,
    pub display_name: String,
    pub picture_url: Option<String>,
}

impl TryFrom<GoogleClaims> for IdentityProfile {
    type Error = GoogleAuthError;

    /// A profile is only produced when the email claim is present, non-empty,
    /// and provider-verified.
    fn try_from(claims: GoogleClaims) -> Result<Self, Self::Error> {
        let email = match claims.email {
            Some(email) if !email.is_empty() => email,
            _ => return Err(GoogleAuthError::EmailUnverified),
        };

        if !claims.email_verified {
            return Err(GoogleAuthError::EmailUnverified);
        }

        Ok(Self {
            subject: claims.sub,
            email,
            email_verified: true,
            display_name: claims.name.unwrap_or_default(),
            picture_url: claims.picture,
        })
    }
}
