//! The gateway handlers: list, serve, upload, delete. Each request is
//! independent; everything stateful lives behind the storage backend.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppError, Result},
    AppState,
};

/// Flag-plus-message body returned by upload and delete. Clients key off
/// `success`, the message is human-readable.
#[derive(Debug, Serialize)]
pub struct OperationStatus {
    pub success: bool,
    pub message: String,
}

pub async fn list_files(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let files = state.storage.list_all_files().await?;

    Ok(Json(json!({ "files": files })))
}

pub async fn serve_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let file = state.storage.get_file(&filename).await?;

    let mut headers = HeaderMap::new();

    let content_type: mime::Mime = file
        .content_type
        .parse()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type.as_ref())
            .map_err(|_| AppError::InternalServerError)?,
    );

    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&file.content.len().to_string())
            .map_err(|_| AppError::InternalServerError)?,
    );

    // The disposition filename echoes the caller-supplied path parameter,
    // not the descriptor's own name.
    let disposition = format!(
        "{}; filename=\"{}\"",
        file.display_mode.content_disposition(),
        filename.replace('"', "\\\"")
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        disposition
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Filename {} is not header-safe", filename)))?,
    );

    Ok((StatusCode::OK, headers, file.content).into_response())
}

pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OperationStatus>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| AppError::BadRequest("Missing filename".to_string()))?
            .to_string();

        // Read and store failures both collapse into the failure flag; the
        // underlying error is logged here and never propagated to the caller.
        return match read_and_store(&state, &filename, field).await {
            Ok(size) => {
                info!(filename = %filename, size = size, "file uploaded");
                Ok(Json(OperationStatus {
                    success: true,
                    message: format!("You successfully uploaded {}!", filename),
                }))
            }
            Err(e) => {
                tracing::error!(filename = %filename, error = %e, "upload failed");
                Ok(Json(OperationStatus {
                    success: false,
                    message: format!("Failed to upload {}", filename),
                }))
            }
        };
    }

    Err(AppError::BadRequest("No file found in request".to_string()))
}

async fn read_and_store(
    state: &AppState,
    filename: &str,
    field: Field<'_>,
) -> anyhow::Result<u64> {
    let data = field.bytes().await?;
    let size = data.len() as u64;

    state.storage.store(filename, &data, size).await?;

    Ok(size)
}

pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Json<OperationStatus> {
    // "Not present" and "backend failed" are deliberately indistinguishable
    // to the caller; only the flag comes back.
    let success = match state.storage.delete_file(&filename).await {
        Ok(deleted) => deleted,
        Err(e) => {
            tracing::error!(filename = %filename, error = %e, "delete failed");
            false
        }
    };

    if success {
        info!(filename = %filename, "file deleted");
    }

    Json(OperationStatus {
        success,
        message: if success {
            format!("You successfully deleted {}!", filename)
        } else {
            format!("Failed to delete {}.", filename)
        },
    })
}
