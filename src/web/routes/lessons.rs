use axum::Json;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use uuid::Uuid;

use crate::model::entity::{Lesson, LessonCreate};
use crate::model::{CrudRepository, PaginatableRepository, ResourceTyped};
use crate::web::dto::lessons::LessonMoveRequest;
use crate::web::error::ErrorResponse;
use crate::web::routes::{PaginationQuery, require_title};
use crate::web::{AppState, WebError, WebResult};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(lessons_create_handler))
        .route("/page", get(lessons_page_handler))
        .route(
            "/{id}",
            get(lessons_get_handler)
                .put(lessons_update_handler)
                .delete(lessons_delete_handler),
        )
        .route("/{id}/move", post(lessons_move_handler))
        .with_state(state)
}

async fn find_lesson(state: &AppState, id: Uuid) -> WebResult<Lesson> {
    Lesson::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_database(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/page",
    params(
        ("limit" = i64, Query, description = "Page size"),
        ("offset" = i64, Query, description = "Rows to skip"),
    ),
    responses(
        (status = 200, description = "Page of lessons", body = crate::model::Page<Lesson>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_page_handler(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
) -> WebResult<impl IntoResponse> {
    let page = Lesson::page(state.pool(), page.limit(), page.offset())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/",
    description = "Create a lesson. Without `order_index` it is appended to the module, \
        otherwise the lessons at and after that position shift down by one",
    request_body = LessonCreate,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 400, description = "Empty title or order out of range", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<LessonCreate>,
) -> WebResult<impl IntoResponse> {
    require_title(Lesson::get_resource_type(), &payload.title)?;

    let lesson = Lesson::create(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Lesson::get_resource_type(), e))?;

    tracing::info!(lesson_id = %lesson.id(), order_index = lesson.order_index(), "lesson created");
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{lesson_id}",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to get")
    ),
    responses(
        (status = 200, description = "Lesson found", body = Lesson),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let lesson = find_lesson(&state, id).await?;
    Ok((StatusCode::OK, Json(lesson)))
}

#[utoipa::path(
    put,
    path = "/api/v1/lessons/{lesson_id}",
    description = "Update a lesson. A different `module_id` moves it to that module, \
        an `order_index` moves it to that position",
    request_body = LessonCreate,
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to update")
    ),
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 400, description = "Empty title or order out of range", body = ErrorResponse),
        (status = 404, description = "Lesson or module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LessonCreate>,
) -> WebResult<impl IntoResponse> {
    require_title(Lesson::get_resource_type(), &payload.title)?;

    let lesson = find_lesson(&state, id)
        .await?
        .update(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(lesson)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lessons/{lesson_id}",
    description = "Delete a lesson and close the gap among the remaining lessons of its module",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to delete")
    ),
    responses(
        (status = 200, description = "Lesson deleted"),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    find_lesson(&state, id)
        .await?
        .delete(state.pool())
        .await
        .map_err(|e| WebError::from_database(Lesson::get_resource_type(), e))?;

    tracing::info!(lesson_id = %id, "lesson deleted");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/{lesson_id}/move",
    request_body = LessonMoveRequest,
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to move")
    ),
    responses(
        (status = 200, description = "Lesson moved", body = Lesson),
        (status = 400, description = "Order out of range", body = ErrorResponse),
        (status = 404, description = "Lesson or module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
async fn lessons_move_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LessonMoveRequest>,
) -> WebResult<impl IntoResponse> {
    let lesson = Lesson::move_to(state.pool(), id, payload.order_index, payload.module_id)
        .await
        .map_err(|e| WebError::from_database(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(lesson)))
}
