use crate::{
    Config,
    model::ResourceType,
    web::{AppState, WebError, WebResult, doc::ApiDoc},
};
use axum::Router;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod courses;
pub mod lessons;
pub mod modules;
pub mod stats;
pub mod uploads;

/// Where stored uploads are served from.
pub const STATIC_PREFIX: &str = "/api/v1/static/";

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct PaginationQuery {
    limit: i64,
    offset: i64,
}

impl PaginationQuery {
    pub fn limit(&self) -> i64 {
        self.limit.clamp(0, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }
}

pub(crate) fn require_title(r#type: ResourceType, title: &str) -> WebResult<()> {
    if title.trim().is_empty() {
        return Err(WebError::resource_bad_request(r#type, "title must not be empty"));
    }
    Ok(())
}

pub fn build_app<S: Send + Sync + Clone + 'static>(
    state: AppState,
    config: &'static Config,
) -> Router<S> {
    let mut router = Router::new()
        .nest("/api/v1/courses/", courses::routes(state.clone()))
        .nest("/api/v1/modules/", modules::routes(state.clone()))
        .nest("/api/v1/lessons/", lessons::routes(state.clone()))
        .nest("/api/v1/stats/", stats::routes(state.clone()))
        .nest("/api/v1/uploads/", uploads::routes(state.clone()))
        .nest_service(STATIC_PREFIX, ServeDir::new(state.uploads_dir()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}
