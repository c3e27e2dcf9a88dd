use std::sync::Arc;
use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_server::routes::create_router;
use wallet_server::shared::clients::PaystackClient;
use wallet_server::shared::config::AppConfig;
use wallet_server::shared::database::Database;
use wallet_server::shared::services::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wallet_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드 (.env 포함)
    let config = AppConfig::from_env()?;

    // DB 연결 + 마이그레이션
    tracing::info!("Connecting to database...");
    let db = Database::new(&config.database).await?;
    db.initialize().await?;

    // AppState 생성 (모든 Service 초기화)
    let gateway = Arc::new(PaystackClient::new(&config.paystack)?);
    let app_state = AppState::new(db, &config, gateway);

    // CORS 설정
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static("x-api-key"),
        ]);
    let cors = match &config.cors_origin {
        Some(origin) => cors.allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS_ORIGIN: {}", origin))?,
        ),
        None => cors.allow_origin(Any),
    };

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
