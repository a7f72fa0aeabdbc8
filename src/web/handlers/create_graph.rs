// POST /api/create_graph — the full document -> topics -> questions -> graph flow.
//
// Combines the requested documents' text, runs the topic pipeline, uploads
// the source documents, and asks the graph service to build a graph from
// the generated seed questions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::PipelineError;
use crate::topics::pipeline::{PipelineOptions, TopicPipeline};
use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateGraphRequest {
    pub namespace: String,
    pub files: Vec<String>,
    #[serde(default)]
    pub use_raw_text: bool,
    #[serde(default = "default_topic_count")]
    pub topic_count: usize,
}

fn default_topic_count() -> usize {
    1
}

pub async fn create_graph(
    State(state): State<AppState>,
    Json(request): Json<CreateGraphRequest>,
) -> Response {
    if request.namespace.is_empty() || request.files.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Namespace and files are required.");
    }

    info!(
        namespace = %request.namespace,
        files = request.files.len(),
        "starting graph creation"
    );

    // Resolve every requested document up front so a missing file fails
    // fast, before any remote call is spent.
    let mut paths = Vec::with_capacity(request.files.len());
    for name in &request.files {
        match state.store.resolve(name) {
            Ok(path) => {
                if !state.store.exists(name).await {
                    return api_error(StatusCode::NOT_FOUND, &format!("File {name} not found."));
                }
                paths.push(path);
            }
            Err(_) => {
                return api_error(StatusCode::BAD_REQUEST, &format!("Invalid file name: {name}"))
            }
        }
    }

    let combined_text = match state.store.combined_text(&request.files).await {
        Ok(text) => text,
        Err(e) => return api_error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
    };

    let pipeline = match TopicPipeline::new(state.generator.as_ref()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "pipeline construction failed");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Pipeline setup failed");
        }
    };
    let options = PipelineOptions {
        use_raw_text: request.use_raw_text,
        topic_count: request.topic_count,
        ..Default::default()
    };
    let result = match pipeline.run(&combined_text, &options).await {
        Ok(result) => result,
        Err(e) => return pipeline_error_response(e),
    };
    info!(
        topics = result.topics.len(),
        questions = result.questions.len(),
        "pipeline complete"
    );

    let documents_response = match state.graph.add_documents(&request.namespace, &paths).await {
        Ok(receipt) => receipt,
        Err(e) => {
            error!(error = %e, "document upload failed");
            return api_error(
                StatusCode::BAD_GATEWAY,
                "Document upload to the graph service failed",
            );
        }
    };

    let extracted_graph = match state
        .graph
        .create_graph_with_retry(&request.namespace, &result.questions)
        .await
    {
        Ok(graph) => graph,
        Err(e) => {
            error!(error = %e, "graph creation failed");
            return api_error(StatusCode::BAD_GATEWAY, "Graph creation failed");
        }
    };

    Json(serde_json::json!({
        "important_phrases": result.topics,
        "questions": result.questions,
        "documents_response": documents_response,
        "extracted_graph": extracted_graph,
    }))
    .into_response()
}

/// Map pipeline error kinds onto service statuses: the caller can tell a
/// bad document (422) from a flaky upstream (502) or a blown deadline (504).
fn pipeline_error_response(e: PipelineError) -> Response {
    error!(stage = e.stage(), error = %e, "pipeline failed");
    let status = match e {
        PipelineError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        PipelineError::Generation { .. } => StatusCode::BAD_GATEWAY,
        PipelineError::Extraction(_) | PipelineError::ModelFit(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    api_error(status, &e.to_string())
}
