use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_current_user::get_current_user;
use super::handlers::google_login::google_login;
use super::handlers::health::health;
use super::handlers::logout::logout;
use super::handlers::refresh_token::refresh_token;
use super::middleware::attach_principal;
use super::middleware::require_auth;
use crate::domain::auth::ports::AuthServicePort;

/// Cookie carrying the refresh token between browser and service.
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Builds the HTTP-only refresh-token cookie and its removal twin.
#[derive(Debug, Clone)]
pub struct RefreshCookieSettings {
    pub secure: bool,
    pub max_age: time::Duration,
}

impl RefreshCookieSettings {
    pub fn cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((REFRESH_COOKIE_NAME, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .max_age(self.max_age)
            .build()
    }

    /// A name-and-path-matching cookie for `CookieJar::remove`.
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((REFRESH_COOKIE_NAME, ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .build()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub issuer: Arc<TokenIssuer>,
    pub cookies: RefreshCookieSettings,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    issuer: Arc<TokenIssuer>,
    cookies: RefreshCookieSettings,
    cors_origin: HeaderValue,
) -> Router {
    let state = AppState {
        auth_service,
        issuer,
        cookies,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/google", post(google_login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/refresh", post(refresh_token));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(get_current_user))
        .route_layer(middleware::from_fn(require_auth));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Cookies require a concrete origin; a wildcard cannot be combined with
    // credentials.
    let cors_layer = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), attach_principal))
        .layer(trace_layer)
        .layer(cors_layer)
        .with_state(state)
}
