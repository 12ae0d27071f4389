use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonMoveRequest {
    /// Zero-based position among the destination module's lessons
    pub order_index: i32,
    /// Move into this module instead of reordering inside the current one
    pub module_id: Option<Uuid>,
}
