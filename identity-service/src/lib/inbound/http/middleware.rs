use auth::TokenIssuer;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::auth::models::AuthenticatedPrincipal;
use crate::domain::auth::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extract and verify a bearer credential from `headers`.
///
/// Pure with respect to the request: verification is local and synchronous,
/// no network, no retries. Any failure (absent header, wrong scheme,
/// unverifiable token) yields `None`; whether that is an error is the
/// caller's policy, not this function's.
pub fn try_authenticate(headers: &HeaderMap, issuer: &TokenIssuer) -> Option<AuthenticatedPrincipal> {
    let token = bearer_token(headers)?;

    let payload = match issuer.verify(token) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token failed verification");
            return None;
        }
    };

    let user_id = match UserId::from_string(payload.user_id()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Verified token carries a malformed subject");
            return None;
        }
    };

    Some(AuthenticatedPrincipal {
        user_id,
        email: payload.email,
    })
}

/// Surface the optional-mode outcome as a hard requirement.
pub fn require_authenticated(
    principal: Option<&AuthenticatedPrincipal>,
) -> Result<AuthenticatedPrincipal, ApiError> {
    principal.cloned().ok_or_else(|| {
        ApiError::Unauthorized("Valid authentication token is required".to_string())
    })
}

/// Succeed only when the authenticated principal owns the resource.
///
/// Distinct from the unauthenticated case: identity is known, access is not
/// granted.
pub fn ensure_resource_owner(
    principal: &AuthenticatedPrincipal,
    owner: &UserId,
) -> Result<(), ApiError> {
    if &principal.user_id == owner {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %principal.user_id,
            owner_id = %owner,
            "Resource ownership check failed"
        );
        Err(ApiError::Forbidden(
            "You do not have permission to access this resource".to_string(),
        ))
    }
}

/// Expected form: `Bearer <token>` with a case-sensitive scheme; anything
/// else is treated as no credential at all.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Optional-mode middleware, applied globally: attach the principal when a
/// valid credential is present and continue either way. Downstream handlers
/// see `Option<AuthenticatedPrincipal>`.
pub async fn attach_principal(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let principal = try_authenticate(req.headers(), &state.issuer);

    if let Some(principal) = &principal {
        tracing::debug!(user_id = %principal.user_id, "Request authenticated");
    }

    req.extensions_mut().insert(principal);
    next.run(req).await
}

/// Mandatory-mode middleware, applied per protected route after
/// `attach_principal`: reject before the handler when no principal was
/// attached.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let attached = req
        .extensions()
        .get::<Option<AuthenticatedPrincipal>>()
        .cloned()
        .flatten();

    let principal = require_authenticated(attached.as_ref())?;
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
