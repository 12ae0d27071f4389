use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{Course, CourseCreate, CourseSummaryRow, Lesson, Module},
    },
    web::{
        AppState, WebError, WebResult, dto::courses::CourseDetail, error::ErrorResponse,
        routes::require_title,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(courses_list_handler).post(courses_create_handler))
        .route(
            "/{id}",
            get(courses_get_handler)
                .put(courses_update_handler)
                .delete(courses_delete_handler),
        )
        .route("/{id}/modules", get(courses_modules_handler))
        .with_state(state)
}

async fn find_course(state: &AppState, id: Uuid) -> WebResult<Course> {
    Course::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Course::get_resource_type()))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/",
    description = "List every course, newest first, with module and lesson counts",
    responses(
        (status = 200, description = "Courses collected", body = Vec<CourseSummaryRow>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_list_handler(
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let courses = CourseSummaryRow::fetch_all(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(courses)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/",
    request_body = CourseCreate,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Title is empty", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> WebResult<impl IntoResponse> {
    require_title(Course::get_resource_type(), &payload.title)?;

    let course = Course::create(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?;

    tracing::info!(course_id = %course.id(), "course created");
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}",
    description = "Course with its modules and lessons in order",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetail),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let course = find_course(&state, id).await?;

    let modules = Module::all_by_course(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;
    let lessons = Lesson::all_by_course(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(CourseDetail::assemble(course, modules, lessons)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{course_id}",
    request_body = CourseCreate,
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to update")
    ),
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Title is empty", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CourseCreate>,
) -> WebResult<impl IntoResponse> {
    require_title(Course::get_resource_type(), &payload.title)?;

    let course = find_course(&state, id)
        .await?
        .update(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(course)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{course_id}",
    description = "Delete the course together with its modules and lessons",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to delete")
    ),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    find_course(&state, id)
        .await?
        .delete(state.pool())
        .await
        .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?;

    tracing::info!(course_id = %id, "course deleted");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}/modules",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Modules of the course in order", body = Vec<Module>),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
async fn courses_modules_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    find_course(&state, id).await?;

    let modules = Module::all_by_course(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(modules)))
}
