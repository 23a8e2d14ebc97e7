use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::User;
use crate::inbound::http::router::AppState;

/// Sign in with a Google ID token from the frontend's Google Sign-In flow.
///
/// The access token is returned in the body for bearer use; the refresh
/// token travels only in an HTTP-only cookie.
pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<GoogleLoginRequestBody>>,
) -> Result<(CookieJar, ApiSuccess<GoogleLoginResponseData>), ApiError> {
    let id_token = body.map(|Json(body)| body.id_token).unwrap_or_default();
    if id_token.trim().is_empty() {
        return Err(ApiError::BadRequest("idToken is required".to_string()));
    }

    let session = state
        .auth_service
        .login(id_token.trim())
        .await
        .map_err(ApiError::from)?;

    let jar = jar.add(state.cookies.cookie(session.refresh_token));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            GoogleLoginResponseData {
                user: (&session.user).into(),
                access_token: session.access_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequestBody {
    #[serde(default)]
    id_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginResponseData {
    pub user: UserData,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            display_name: user.display_name.clone(),
            profile_picture_url: user.picture_url.clone(),
            created_at: user.created_at,
        }
    }
}
