use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use carebook::config::AppConfig;
use carebook::handlers;
use carebook::services::catalog::{Catalog, StaticCatalog};
use carebook::services::checkout::http::HttpCheckoutProvider;
use carebook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let catalog: Box<dyn Catalog> = match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path, "loading catalog from file");
            Box::new(StaticCatalog::from_json_file(path)?)
        }
        None => {
            tracing::info!("using built-in catalog");
            Box::new(StaticCatalog::with_default_data())
        }
    };

    let checkout = HttpCheckoutProvider::new(config.checkout_url.clone());

    let state = Arc::new(AppState {
        config: config.clone(),
        catalog,
        checkout: Box::new(checkout),
        sessions: Mutex::new(HashMap::new()),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat/sessions", post(handlers::chat::create_session))
        .route("/api/chat/sessions/:id", get(handlers::chat::get_session))
        .route(
            "/api/chat/sessions/:id/select",
            post(handlers::chat::select),
        )
        .route(
            "/api/chat/sessions/:id/message",
            post(handlers::chat::send_message),
        )
        .route(
            "/api/catalog/caregivers",
            get(handlers::catalog::list_caregivers),
        )
        .route(
            "/api/catalog/caregivers/:id",
            get(handlers::catalog::get_caregiver),
        )
        .route(
            "/api/catalog/packages",
            get(handlers::catalog::list_packages),
        )
        .route(
            "/api/catalog/packages/:id",
            get(handlers::catalog::get_package),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
