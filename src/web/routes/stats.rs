use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};

use crate::{
    model::{ResourceType, entity::CatalogStats},
    web::{AppState, WebError, WebResult, error::ErrorResponse},
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(stats_handler))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/",
    description = "Catalog totals and the figures behind the dashboard charts",
    responses(
        (status = 200, description = "Statistics collected", body = CatalogStats),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "stats"
)]
async fn stats_handler(State(state): State<AppState>) -> WebResult<impl IntoResponse> {
    let stats = CatalogStats::collect(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::Stats, e))?;

    Ok((StatusCode::OK, Json(stats)))
}
