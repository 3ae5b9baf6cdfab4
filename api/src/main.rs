use std::net::SocketAddr;

use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use shop_api::bootstrap::app_context::{AppContext, AppServices};
use shop_api::bootstrap::config::{Config, DatabaseBackend};
use shop_api::infrastructure::{db, memory::MemoryDatabase};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "shop_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        backend = ?cfg.database_backend,
        address_write_mode = ?cfg.address_write_mode,
        "Starting shop API"
    );

    let services = match cfg.database_backend {
        DatabaseBackend::Postgres => {
            let pool = db::connect_pool(&cfg.database_url, cfg.database_max_connections).await?;
            db::migrate(&pool).await?;
            AppServices::postgres(pool)
        }
        DatabaseBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on shutdown");
            AppServices::in_memory(MemoryDatabase::new())
        }
    };
    let ctx = AppContext::new(cfg.clone(), services);

    let cors = cors_layer(cfg.frontend_url.as_deref());

    let app = shop_api::presentation::http::router(ctx)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP API stopped");
    Ok(())
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(v)) => AllowOrigin::exact(v),
        // Unset or unparsable origin: reflect the caller.
        _ => AllowOrigin::mirror_request(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "shutdown_signal_failed");
    }
}
