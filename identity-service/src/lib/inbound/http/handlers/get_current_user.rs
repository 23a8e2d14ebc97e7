use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::google_login::UserData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

/// Return the account behind the request's bearer token. Mandatory-mode
/// route; the principal is attached by the auth middleware.
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Result<ApiSuccess<CurrentUserResponseData>, ApiError> {
    let user = state
        .auth_service
        .current_user(&principal.user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        CurrentUserResponseData {
            user: (&user).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponseData {
    pub user: UserData,
}
