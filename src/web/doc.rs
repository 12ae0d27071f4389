use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "syllabus", description = "Course catalog administration API"),
    paths(
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::courses::courses_create_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_update_handler,
        crate::web::routes::courses::courses_delete_handler,
        crate::web::routes::courses::courses_modules_handler,
        crate::web::routes::modules::modules_list_handler,
        crate::web::routes::modules::modules_page_handler,
        crate::web::routes::modules::modules_create_handler,
        crate::web::routes::modules::modules_get_handler,
        crate::web::routes::modules::modules_update_handler,
        crate::web::routes::modules::modules_delete_handler,
        crate::web::routes::modules::modules_move_handler,
        crate::web::routes::modules::modules_lessons_handler,
        crate::web::routes::lessons::lessons_page_handler,
        crate::web::routes::lessons::lessons_create_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::lessons::lessons_update_handler,
        crate::web::routes::lessons::lessons_delete_handler,
        crate::web::routes::lessons::lessons_move_handler,
        crate::web::routes::stats::stats_handler,
        crate::web::routes::uploads::uploads_handler,
    ),
    tags(
        (name = "courses", description = "Courses and their content tree"),
        (name = "modules", description = "Ordered modules of a course"),
        (name = "lessons", description = "Ordered lessons of a module"),
        (name = "stats", description = "Dashboard figures"),
        (name = "uploads", description = "Files for thumbnails, covers and materials"),
    ),
)]
pub struct ApiDoc;
