//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::middleware::AuthMiddlewareState;
use auth::{AuthConfig, HttpMailer, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use finance::{PgFinanceRepository, finance_router};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,finance=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Seed the canonical role before accepting traffic; registration
    // treats its absence as a fatal misconfiguration
    let auth_repo = PgAuthRepository::new(pool.clone());
    auth_repo
        .ensure_role("USER")
        .await
        .map_err(|e| anyhow::anyhow!("Role bootstrap failed: {e}"))?;

    tracing::info!("Role bootstrap completed");

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig {
            activation_url: env::var("ACTIVATION_URL")
                .unwrap_or_else(|_| AuthConfig::default().activation_url),
            ..AuthConfig::development()
        }
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("AUTH_TOKEN_SECRET").expect("AUTH_TOKEN_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        anyhow::ensure!(
            secret_bytes.len() == 32,
            "AUTH_TOKEN_SECRET must decode to 32 bytes"
        );
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);

        AuthConfig {
            token_secret: secret,
            activation_url: env::var("ACTIVATION_URL")
                .expect("ACTIVATION_URL must be set in production"),
            ..AuthConfig::default()
        }
    };

    // Outbound mail relay
    let mail_endpoint =
        env::var("MAIL_RELAY_URL").unwrap_or_else(|_| "http://localhost:8025/send".to_string());
    let mail_api_key = env::var("MAIL_RELAY_API_KEY").ok();
    let mailer = HttpMailer::new(mail_endpoint, mail_api_key);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:4200,http://127.0.0.1:4200".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let auth_middleware = AuthMiddlewareState::new(&auth_config);
    let finance_repo = PgFinanceRepository::new(pool.clone());

    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(auth_repo, mailer, auth_config),
        )
        .nest("/api", finance_router(finance_repo, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8088));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
