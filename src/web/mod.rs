// Web server — Axum-based JSON API.
//
// All /api/* routes serve JSON. The server owns one document store, one
// graph-service client, and one text generator, shared across requests;
// every pipeline run is otherwise independent, so concurrent requests
// never contend on mutable state.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::documents::DocumentStore;
use crate::generate::openai::OpenAiGenerator;
use crate::generate::traits::TextGenerator;
use crate::graph::client::GraphStoreClient;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<DocumentStore>,
    pub graph: Arc<GraphStoreClient>,
    pub generator: Arc<dyn TextGenerator>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(config: Config, port: u16, bind: &str) -> Result<()> {
    config.require_generator()?;
    config.require_graph()?;

    let store = Arc::new(DocumentStore::new(&config.data_dir));
    store.init().await?;

    let graph = Arc::new(GraphStoreClient::new(
        &config.graph_api_url,
        &config.graph_api_key,
    )?);
    let generator: Arc<dyn TextGenerator> = Arc::new(OpenAiGenerator::new(
        &config.openai_api_url,
        &config.openai_api_key,
        &config.openai_model,
    )?);

    let state = AppState {
        config: Arc::new(config),
        store,
        graph,
        generator,
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Graphseed API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/upload", post(handlers::files::upload))
        .route("/api/files", get(handlers::files::list_files))
        .route("/api/delete_file", post(handlers::files::delete_file))
        .route("/api/create_graph", post(handlers::create_graph::create_graph))
        .route("/api/query", post(handlers::query::query_graph))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Deployment health check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
