use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    model::entity::{Course, Lesson, Module},
    web::dto::modules::ModuleWithLessons,
};

/// A course with its modules in order, each carrying its lessons in order.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub modules: Vec<ModuleWithLessons>,
}

impl CourseDetail {
    /// `modules` and `lessons` are expected in display order; lessons of modules that are not
    /// listed are dropped.
    pub fn assemble(course: Course, modules: Vec<Module>, lessons: Vec<Lesson>) -> Self {
        let mut by_module: HashMap<Uuid, Vec<Lesson>> = HashMap::new();
        for lesson in lessons {
            by_module.entry(lesson.module_id()).or_default().push(lesson);
        }

        let modules = modules
            .into_iter()
            .map(|module| ModuleWithLessons {
                lessons: by_module.remove(&module.id()).unwrap_or_default(),
                module,
            })
            .collect();

        Self { course, modules }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    const NOW: &str = "2025-01-01T00:00:00Z";

    fn course(id: Uuid) -> Course {
        serde_json::from_value(json!({
            "id": id, "title": "Rust", "description": null, "thumbnail_url": null,
            "cover_url": null, "created_at": NOW, "updated_at": NOW,
        }))
        .unwrap()
    }

    fn module(id: Uuid, course_id: Uuid, order_index: i32) -> Module {
        serde_json::from_value(json!({
            "id": id, "course_id": course_id, "title": format!("m{order_index}"),
            "description": null, "thumbnail_url": null, "cover_url": null,
            "order_index": order_index, "created_at": NOW, "updated_at": NOW,
        }))
        .unwrap()
    }

    fn lesson(module_id: Uuid, order_index: i32) -> Lesson {
        serde_json::from_value(json!({
            "id": Uuid::new_v4(), "module_id": module_id, "title": format!("l{order_index}"),
            "description": null, "content": null, "video_url": null, "embed_url": null,
            "thumbnail_url": null, "material_url": null, "duration": 60,
            "order_index": order_index, "created_at": NOW, "updated_at": NOW,
        }))
        .unwrap()
    }

    #[test]
    fn test_assemble_groups_lessons_under_modules() {
        let course_id = Uuid::new_v4();
        let (first, second, empty) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let detail = CourseDetail::assemble(
            course(course_id),
            vec![module(first, course_id, 0), module(second, course_id, 1), module(empty, course_id, 2)],
            vec![lesson(first, 0), lesson(first, 1), lesson(second, 0)],
        );

        let shape: Vec<(Uuid, Vec<i32>)> = detail
            .modules
            .iter()
            .map(|m| (m.module.id(), m.lessons.iter().map(Lesson::order_index).collect()))
            .collect();
        assert_eq!(
            shape,
            vec![(first, vec![0, 1]), (second, vec![0]), (empty, vec![])]
        );
    }

    #[test]
    fn test_detail_serializes_flat() {
        let course_id = Uuid::new_v4();
        let detail = CourseDetail::assemble(course(course_id), vec![], vec![]);

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], json!(course_id));
        assert_eq!(value["title"], "Rust");
        assert_eq!(value["modules"], json!([]));
    }
}
