use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::inbound::http::router::REFRESH_COOKIE_NAME;

/// Clear the refresh-token cookie and revoke its ledger record.
///
/// Always succeeds outward: a logout must not fail even when the ledger is
/// unreachable, so revocation is best effort.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<LogoutResponseData>) {
    if let Some(cookie) = jar.get(REFRESH_COOKIE_NAME) {
        if let Err(e) = state.auth_service.logout(cookie.value()).await {
            tracing::warn!(error = %e, "Failed to revoke refresh token at logout");
        }
    }

    let jar = jar.remove(state.cookies.removal());

    (
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                message: "Logged out successfully".to_string(),
            },
        ),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
