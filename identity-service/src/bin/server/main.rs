use std::sync::Arc;

use auth::GoogleClientConfig;
use auth::GoogleTokenVerifier;
use auth::TokenIssuer;
use axum::http::HeaderValue;
use chrono::Duration;
use identity_service::config::Config;
use identity_service::domain::auth::ports::AuthServicePort;
use identity_service::domain::auth::service::AuthSessionService;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::RefreshCookieSettings;
use identity_service::outbound::repositories::PostgresRefreshTokenLedger;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        cors_origin = %config.server.cors_origin,
        access_expiration_hours = config.jwt.access_expiration_hours,
        refresh_expiration_days = config.jwt.refresh_expiration_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let issuer = Arc::new(TokenIssuer::with_lifetimes(
        config.jwt.secret.as_bytes(),
        Duration::hours(config.jwt.access_expiration_hours),
        Duration::days(config.jwt.refresh_expiration_days),
    ));

    let verifier = Arc::new(GoogleTokenVerifier::new(GoogleClientConfig {
        client_id: config.google.client_id.clone(),
        client_secret: config.google.client_secret.clone(),
        redirect_url: config.google.redirect_url.clone(),
    })?);

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let refresh_token_ledger = Arc::new(PostgresRefreshTokenLedger::new(pg_pool));

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthSessionService::new(
        verifier,
        user_repository,
        refresh_token_ledger,
        Arc::clone(&issuer),
    ));

    let cookies = RefreshCookieSettings {
        secure: config.server.secure_cookies,
        max_age: time::Duration::days(config.jwt.refresh_expiration_days),
    };
    let cors_origin: HeaderValue = config.server.cors_origin.parse()?;

    let application = create_router(auth_service, issuer, cookies, cors_origin);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, application).await?;

    Ok(())
}
