use axum::{Server, http::HeaderValue, middleware::from_fn};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use wfh_scheduler::{AppState, config::Config, db::create_pool, init_tracing, middleware, routes};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let db = match create_pool(&config.database()) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database connection pool");
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match config.server_address().parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, address = %config.server_address(), "Invalid server address");
            std::process::exit(1);
        }
    };

    let cors = cors_layer(&config.server().cors_origins);
    let state = Arc::new(AppState::new(db, config));

    let app = routes::create_router(state)
        .layer(cors)
        .layer(from_fn(middleware::logger));

    tracing::info!(%addr, "Server running");
    if let Err(e) = Server::bind(&addr).serve(app.into_make_service()).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    layer.allow_origin(origins)
}
