use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::{Lesson, Module};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModuleMoveRequest {
    /// Zero-based position among the destination course's modules
    pub order_index: i32,
    /// Move into this course instead of reordering inside the current one
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModuleWithLessons {
    #[serde(flatten)]
    pub module: Module,
    pub lessons: Vec<Lesson>,
}
