use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::GoogleAuthError;
use auth::IdentityProfile;
use auth::TokenIssuer;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use chrono::DateTime;
use chrono::Utc;
use identity_service::domain::auth::errors::AuthError;
use identity_service::domain::auth::models::RefreshTokenId;
use identity_service::domain::auth::models::RefreshTokenRecord;
use identity_service::domain::auth::models::User;
use identity_service::domain::auth::models::UserId;
use identity_service::domain::auth::ports::AuthServicePort;
use identity_service::domain::auth::ports::IdentityVerifier;
use identity_service::domain::auth::ports::RefreshTokenLedger;
use identity_service::domain::auth::ports::UserRepository;
use identity_service::domain::auth::service::AuthSessionService;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::RefreshCookieSettings;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-at-least-32-bytes";

/// Test application serving the real router over in-memory adapters
pub struct TestApp {
    pub router: Router,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<StaticIdentityVerifier>,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let issuer = Arc::new(TokenIssuer::new(TEST_SECRET));
        let verifier = Arc::new(StaticIdentityVerifier::default());
        let users = Arc::new(InMemoryUserRepository::default());
        let ledger = Arc::new(InMemoryRefreshTokenLedger::default());

        let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthSessionService::new(
            Arc::clone(&verifier),
            Arc::clone(&users),
            Arc::clone(&ledger),
            Arc::clone(&issuer),
        ));

        let cookies = RefreshCookieSettings {
            secure: false,
            max_age: time::Duration::days(7),
        };

        let router = create_router(
            auth_service,
            Arc::clone(&issuer),
            cookies,
            HeaderValue::from_static("http://localhost:5173"),
        );

        Self {
            router,
            issuer,
            verifier,
            users,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }
}

pub fn google_profile(subject: &str, email: &str, name: &str) -> IdentityProfile {
    IdentityProfile {
        subject: subject.to_string(),
        email: email.to_string(),
        email_verified: true,
        display_name: name.to_string(),
        picture_url: Some(format!("https://example.com/{subject}.jpg")),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Failed to parse response body")
}

/// The raw Set-Cookie header, for asserting cookie attributes.
pub fn set_cookie_header(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// The refresh-token cookie value set by a response, if any.
pub fn refresh_cookie(response: &Response) -> Option<String> {
    let header = set_cookie_header(response)?;
    let name_value = header.split(';').next()?;
    let (name, value) = name_value.split_once('=')?;
    (name == "refreshToken").then(|| value.to_string())
}

/// Flip the last character of a token so its signature no longer matches.
pub fn tamper(token: &str) -> String {
    let mut tampered = token.to_string();
    let last = tampered.pop().expect("token is empty");
    tampered.push(if last == 'A' { 'B' } else { 'A' });
    tampered
}

/// Identity verifier resolving pre-registered tokens only
#[derive(Default)]
pub struct StaticIdentityVerifier {
    profiles: Mutex<HashMap<String, IdentityProfile>>,
}

impl StaticIdentityVerifier {
    pub fn register(&self, id_token: &str, profile: IdentityProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(id_token.to_string(), profile);
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, id_token: &str) -> Result<IdentityProfile, GoogleAuthError> {
        self.profiles
            .lock()
            .unwrap()
            .get(id_token)
            .cloned()
            .ok_or(GoogleAuthError::SignatureInvalid)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn remove(&self, id: &UserId) {
        self.users.lock().unwrap().retain(|user| user.id != *id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == *id)
            .cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.google_id == google_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(AuthError::UserNotFound),
        }
    }
}

/// Ledger with the same conditional-revoke semantics as the Postgres adapter
#[derive(Default)]
pub struct InMemoryRefreshTokenLedger {
    records: Mutex<HashMap<String, RefreshTokenRecord>>,
}

#[async_trait]
impl RefreshTokenLedger for InMemoryRefreshTokenLedger {
    async fn record(
        &self,
        token: &str,
        user_id: &UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AuthError> {
        let record = RefreshTokenRecord {
            id: RefreshTokenId::new(),
            token: token.to_string(),
            user_id: *user_id,
            expires_at,
            revoked: false,
            created_at: Utc::now(),
        };
        self.records
            .lock()
            .unwrap()
            .insert(token.to_string(), record.clone());
        Ok(record)
    }

    async fn lookup(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        Ok(self.records.lock().unwrap().get(token).cloned())
    }

    async fn revoke(&self, id: &RefreshTokenId) -> Result<bool, AuthError> {
        let mut records = self.records.lock().unwrap();
        for record in records.values_mut() {
            if record.id == *id {
                if record.revoked {
                    return Ok(false);
                }
                record.revoked = true;
                return Ok(true);
            }
        }
        Ok(false)
    }
}
