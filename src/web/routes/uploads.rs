use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::{
    model::ResourceType,
    utils::uploads::{save_upload, stored_file_name},
    web::{
        AppState, WebError, WebResult,
        dto::uploads::{UploadForm, UploadResponse},
        error::ErrorResponse,
        routes::STATIC_PREFIX,
    },
};

/// Thumbnails, covers and lesson material.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(uploads_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/uploads/",
    description = "Store a file and return the url it is served from",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No `file` field in the form", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "uploads"
)]
async fn uploads_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> WebResult<impl IntoResponse> {
    let bad_request = |e: axum::extract::multipart::MultipartError| {
        WebError::resource_bad_request(ResourceType::Upload, e.body_text())
    };

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(bad_request)?;
        let name = stored_file_name(chrono::Utc::now().timestamp_millis(), &original);

        save_upload(state.uploads_dir(), &name, &bytes)
            .await
            .map_err(WebError::server_io_error)?;

        tracing::info!(file = %name, size = bytes.len(), "upload stored");
        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                url: format!("{STATIC_PREFIX}{name}"),
            }),
        ));
    }

    Err(WebError::resource_bad_request(
        ResourceType::Upload,
        "no file was sent",
    ))
}
