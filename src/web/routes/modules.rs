use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, PaginatableRepository, ResourceTyped,
        entity::{Lesson, Module, ModuleCreate, ModuleWithCourseRow},
    },
    web::{
        AppState, WebError, WebResult,
        dto::modules::ModuleMoveRequest,
        error::ErrorResponse,
        routes::{PaginationQuery, require_title},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(modules_list_handler).post(modules_create_handler))
        .route("/page", get(modules_page_handler))
        .route(
            "/{id}",
            get(modules_get_handler)
                .put(modules_update_handler)
                .delete(modules_delete_handler),
        )
        .route("/{id}/move", post(modules_move_handler))
        .route("/{id}/lessons", get(modules_lessons_handler))
        .with_state(state)
}

async fn find_module(state: &AppState, id: Uuid) -> WebResult<Module> {
    Module::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::from_database(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Module::get_resource_type()))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/",
    description = "List ALL modules with the title of their course, by course title and order",
    responses(
        (status = 200, description = "Successfully collected modules", body = Vec<ModuleWithCourseRow>),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_list_handler(State(state): State<AppState>) -> WebResult<impl IntoResponse> {
    let modules = ModuleWithCourseRow::fetch_all(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(modules)))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/page",
    params(
        ("limit" = i64, Query, description = "Page size"),
        ("offset" = i64, Query, description = "Rows to skip"),
    ),
    responses(
        (status = 200, description = "Page of modules", body = crate::model::Page<Module>),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_page_handler(
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
) -> WebResult<impl IntoResponse> {
    let page = Module::page(state.pool(), page.limit(), page.offset())
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    post,
    path = "/api/v1/modules/",
    description = "Create a module. Without `order_index` it is appended after the last module \
        of the course, otherwise the modules at and after that position shift down by one",
    request_body = ModuleCreate,
    responses(
        (status = 201, description = "Module created", body = Module),
        (status = 400, description = "Empty title or order out of range", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<ModuleCreate>,
) -> WebResult<impl IntoResponse> {
    require_title(Module::get_resource_type(), &payload.title)?;

    let module = Module::create(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Module::get_resource_type(), e))?;

    tracing::info!(module_id = %module.id(), order_index = module.order_index(), "module created");
    Ok((StatusCode::CREATED, Json(module)))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{module_id}",
    params(
        ("module_id" = Uuid, Path, description = "ID of the module")
    ),
    responses(
        (status = 200, description = "Module found", body = Module),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let module = find_module(&state, id).await?;
    Ok((StatusCode::OK, Json(module)))
}

#[utoipa::path(
    put,
    path = "/api/v1/modules/{module_id}",
    description = "Update a module. A different `course_id` moves it to that course, \
        an `order_index` moves it to that position",
    request_body = ModuleCreate,
    params(
        ("module_id" = Uuid, Path, description = "ID of the module to update")
    ),
    responses(
        (status = 200, description = "Module updated", body = Module),
        (status = 400, description = "Empty title or order out of range", body = ErrorResponse),
        (status = 404, description = "Module or course not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModuleCreate>,
) -> WebResult<impl IntoResponse> {
    require_title(Module::get_resource_type(), &payload.title)?;

    let module = find_module(&state, id)
        .await?
        .update(state.pool(), payload)
        .await
        .map_err(|e| WebError::from_database(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(module)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/modules/{module_id}",
    description = "Delete a module with its lessons and close the gap among the remaining modules",
    params(
        ("module_id" = Uuid, Path, description = "ID of the module to delete")
    ),
    responses(
        (status = 200, description = "Module deleted"),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    find_module(&state, id)
        .await?
        .delete(state.pool())
        .await
        .map_err(|e| WebError::from_database(Module::get_resource_type(), e))?;

    tracing::info!(module_id = %id, "module deleted");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/v1/modules/{module_id}/move",
    request_body = ModuleMoveRequest,
    params(
        ("module_id" = Uuid, Path, description = "ID of the module to move")
    ),
    responses(
        (status = 200, description = "Module moved", body = Module),
        (status = 400, description = "Order out of range", body = ErrorResponse),
        (status = 404, description = "Module or course not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_move_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModuleMoveRequest>,
) -> WebResult<impl IntoResponse> {
    let module = Module::move_to(state.pool(), id, payload.order_index, payload.course_id)
        .await
        .map_err(|e| WebError::from_database(Module::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(module)))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{module_id}/lessons",
    params(
        ("module_id" = Uuid, Path, description = "ID of the module")
    ),
    responses(
        (status = 200, description = "Lessons of the module in order", body = Vec<Lesson>),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules"
)]
async fn modules_lessons_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    find_module(&state, id).await?;

    let lessons = Lesson::all_by_module(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(lessons)))
}
