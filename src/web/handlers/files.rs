// Document file endpoints: upload, list, delete.
//
// Upload stores the file in the data directory and registers it with the
// graph service in one step, so a later create_graph call only needs names.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

use crate::web::{api_error, AppState};

/// POST /api/upload — multipart `file` plus a `namespace` field.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut namespace = String::new();
    let mut file_name: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return api_error(
                    StatusCode::BAD_REQUEST,
                    &format!("Malformed multipart body: {e}"),
                )
            }
        };

        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("namespace") => match field.text().await {
                Ok(value) => namespace = value,
                Err(e) => {
                    return api_error(
                        StatusCode::BAD_REQUEST,
                        &format!("Unreadable namespace field: {e}"),
                    )
                }
            },
            Some("file") => {
                file_name = field.file_name().map(|s| s.to_string());
                match field.bytes().await {
                    Ok(data) => bytes = Some(data.to_vec()),
                    Err(e) => {
                        return api_error(
                            StatusCode::BAD_REQUEST,
                            &format!("Unreadable file field: {e}"),
                        )
                    }
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) = match (file_name, bytes) {
        (Some(name), Some(bytes)) if !name.is_empty() => (name, bytes),
        _ => return api_error(StatusCode::BAD_REQUEST, "A named file field is required."),
    };
    if namespace.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "A namespace field is required.");
    }

    let path = match state.store.save(&file_name, &bytes).await {
        Ok(path) => path,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    info!(file = %file_name, bytes = bytes.len(), namespace = %namespace, "received upload");

    if let Err(e) = state.graph.add_documents(&namespace, &[path]).await {
        error!(error = %e, "failed to register the uploaded document");
        return api_error(
            StatusCode::BAD_GATEWAY,
            "Stored the file, but registering it with the graph service failed",
        );
    }

    Json(serde_json::json!({ "filename": file_name, "namespace": namespace })).into_response()
}

/// GET /api/files — names of all stored documents.
pub async fn list_files(State(state): State<AppState>) -> Response {
    match state.store.list().await {
        Ok(files) => Json(serde_json::json!({ "files": files })).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list stored documents");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list files")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteFileRequest {
    pub file_name: String,
}

/// POST /api/delete_file — remove a stored document.
pub async fn delete_file(
    State(state): State<AppState>,
    Json(request): Json<DeleteFileRequest>,
) -> Response {
    match state.store.delete(&request.file_name).await {
        Ok(true) => Json(serde_json::json!({
            "message": format!("File {} deleted successfully", request.file_name)
        }))
        .into_response(),
        Ok(false) => Json(serde_json::json!({
            "message": format!("File {} does not exist", request.file_name)
        }))
        .into_response(),
        Err(e) => api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}
