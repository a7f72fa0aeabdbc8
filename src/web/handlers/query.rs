// POST /api/query — natural-language query against a built graph.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub namespace: String,
    pub question: String,
}

pub async fn query_graph(
    State(state): State<AppState>,
    Json(query): Json<QueryRequest>,
) -> Response {
    if query.namespace.is_empty() || query.question.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Namespace and question are required.");
    }

    match state.graph.query_graph(&query.namespace, &query.question).await {
        Ok(response) => Json(serde_json::json!({ "response": response })).into_response(),
        Err(e) => {
            error!(error = %e, "graph query failed");
            api_error(StatusCode::BAD_GATEWAY, "Graph query failed")
        }
    }
}
