use std::{env, net::SocketAddr, sync::Arc};

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth};
use service::token::TokenService;
use store::{DocumentStore, JsonDocumentStore};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

/// CORS allowlist: one configured origin with credentials enabled, so the
/// HTTP-only token cookie survives cross-origin requests. Credentials rule
/// out wildcard origins/methods/headers, hence the explicit lists.
fn build_cors(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid CORS origin: {origin}"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("PORT")
                .ok()
                .or_else(|| env::var("SERVER_PORT").ok())
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(5000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

fn load_store_path() -> String {
    match configs::load_default() {
        Ok(cfg) => cfg.store.path,
        Err(_) => env::var("STORE_PATH").unwrap_or_else(|_| "data/car_doctor.json".to_string()),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // Document store: opened once, shared across all requests.
    let store_path = load_store_path();
    common::env::ensure_store_dir(&store_path).await?;
    let store: Arc<dyn DocumentStore> = JsonDocumentStore::new(&store_path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot open document store at {store_path}: {e}"))?;

    // Signing secret
    let secret = env::var("ACCESS_TOKEN_SECRET")
        .unwrap_or_else(|_| "dev-secret-change-me".to_string());
    let state = auth::ServerState { store, tokens: TokenService::new(secret) };

    // Build router
    let cors_origin =
        env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
    let cors = build_cors(&cors_origin)?;
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, store = %store_path, "starting car-doctor server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
