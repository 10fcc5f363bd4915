use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;

use media_converter_core::{ConversionError, Pipeline};

use crate::pages;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let response = ApiResponse::<()> {
        success: false,
        data: None,
        error: Some(message.into()),
    };
    (status, Json(response)).into_response()
}

fn status_for(err: &ConversionError) -> StatusCode {
    match err {
        ConversionError::Validation(_) => StatusCode::BAD_REQUEST,
        ConversionError::InputTooLarge { .. } | ConversionError::ImageTooLarge { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        ConversionError::Decode(_)
        | ConversionError::Encode(_)
        | ConversionError::OptionsMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Everything the form submitted for a single upload.
#[derive(Debug, Default)]
struct Upload {
    /// `None` when no `file` part was sent at all
    filename: Option<String>,
    bytes: Vec<u8>,
    form: HashMap<String, String>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, StatusCode> {
    let mut upload = Upload::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => return Err(e.status()),
        };

        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            upload.filename = Some(field.file_name().unwrap_or("").to_string());
            upload.bytes = field.bytes().await.map_err(|e| e.status())?.to_vec();
        } else if !name.is_empty() {
            let text = field.text().await.map_err(|e| e.status())?;
            upload.form.insert(name, text);
        }
    }

    Ok(upload)
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(pages::INDEX_HTML)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// POST /convert
///
/// Convert a single uploaded image and return it as an attachment.
///
/// Form fields:
/// - file: binary file data (png, jpg, jpeg, gif, webp, bmp)
/// - format (optional): png/jpg/jpeg/webp/gif/bmp/tiff (default: png)
/// - resize (optional): yes/no (default: no)
/// - width, height (optional): target size; one side alone keeps the aspect ratio
/// - quality (optional): JPEG 1-100 (default: 90), WebP 1-100 (default: 80)
/// - compression (optional): PNG 0-9 (default: 6)
pub async fn convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, StatusCode> {
    let upload = read_upload(&mut multipart).await?;
    let pipeline = state.pipeline.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        pipeline.convert_upload(upload.filename.as_deref(), &upload.bytes, &upload.form)
    })
    .await
    .map_err(|e| {
        log::error!("Conversion task failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match outcome {
        Ok(result) => {
            log::info!(
                "Converted upload to {} ({}x{}, {} bytes)",
                result.filename,
                result.width,
                result.height,
                result.bytes.len()
            );
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, result.mime_type),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", result.filename),
                    ),
                ],
                result.bytes,
            )
                .into_response())
        }
        Err(e) => {
            if e.is_rejection() {
                log::warn!("Rejected upload: {}", e);
            } else {
                log::error!("Error processing image: {}", e);
            }
            Ok(error_response(status_for(&e), e.to_string()))
        }
    }
}

/// GET /batch
pub async fn batch_form() -> Html<&'static str> {
    Html(pages::BATCH_HTML)
}

/// POST /batch
///
/// Accepts `files[]` plus shared options. Files are counted but not converted.
pub async fn batch(mut multipart: Multipart) -> Result<Response, StatusCode> {
    let mut saw_files_part = false;
    let mut selected = 0usize;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => return Err(e.status()),
        };

        if field.name() == Some("files[]") {
            saw_files_part = true;
            if field.file_name().is_some_and(|n| !n.is_empty()) {
                selected += 1;
            }
        }
    }

    if !saw_files_part {
        return Ok(error_response(StatusCode::BAD_REQUEST, "no files part"));
    }
    if selected == 0 {
        return Ok(error_response(StatusCode::BAD_REQUEST, "no files selected"));
    }

    log::info!("Batch upload of {} file(s) received; batch conversion is not implemented", selected);

    Ok(error_response(
        StatusCode::NOT_IMPLEMENTED,
        "batch processing not fully implemented",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for() {
        assert_eq!(
            status_for(&ConversionError::Validation(
                media_converter_core::ValidationError::NoFile
            )),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ConversionError::InputTooLarge { size: 2, limit: 1 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_for(&ConversionError::Decode("bad".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
