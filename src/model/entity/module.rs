use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::ordering::{
    self, OrderError, OrderResult, PgSiblingTx, SiblingInsert, SiblingLevel,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Module {
    id: Uuid,
    course_id: Uuid,
    title: String,
    description: Option<String>,
    thumbnail_url: Option<String>,
    cover_url: Option<String>,
    order_index: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Payload for both create and update. On update a changed `course_id` moves the module to
/// that course (appending unless `order_index` is given) and a given `order_index` moves it
/// inside its course.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ModuleCreate {
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub cover_url: Option<String>,
    pub order_index: Option<i32>,
}

impl ResourceTyped for Module {
    fn get_resource_type() -> ResourceType {
        ResourceType::Module
    }
}

impl Module {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[async_trait]
impl SiblingInsert<PgSiblingTx> for ModuleCreate {
    type Output = Module;

    fn level(&self) -> SiblingLevel {
        SiblingLevel::Module
    }

    fn parent_id(&self) -> Uuid {
        self.course_id
    }

    fn requested_order(&self) -> Option<i32> {
        self.order_index
    }

    async fn insert(self, tx: &mut PgSiblingTx, order_index: i32) -> DatabaseResult<Module> {
        let module = sqlx::query_as(
            r#"
            INSERT INTO modules (id, course_id, title, description, thumbnail_url, cover_url, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(self.course_id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(&self.thumbnail_url)
        .bind(&self.cover_url)
        .bind(order_index)
        .fetch_one(tx.connection())
        .await?;

        Ok(module)
    }
}

impl Module {
    /// The parent change is decided against the row as read under the course lock.
    async fn update_in(tx: &mut PgSiblingTx, id: Uuid, data: ModuleCreate) -> OrderResult<Self> {
        ordering::relocate(tx, SiblingLevel::Module, id, data.order_index, Some(data.course_id))
            .await?;

        let module = sqlx::query_as(
            r#"
            UPDATE modules
            SET title = $1, description = $2, thumbnail_url = $3, cover_url = $4, updated_at = now()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.thumbnail_url)
        .bind(&data.cover_url)
        .bind(id)
        .fetch_optional(tx.connection())
        .await?;

        module.ok_or_else(|| OrderError::not_found(ResourceType::Module, id))
    }

    /// Moves the module to `order_index`, optionally into another course.
    pub async fn move_to(
        mm: &ModelManager,
        id: Uuid,
        order_index: i32,
        course_id: Option<Uuid>,
    ) -> DatabaseResult<Self> {
        mm.ordering()
            .move_to(SiblingLevel::Module, id, order_index, course_id)
            .await?;

        Self::find_by_id(mm, id)
            .await?
            .ok_or_else(|| OrderError::not_found(ResourceType::Module, id).into())
    }

    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM modules WHERE course_id = $1 ORDER BY order_index")
            .bind(course_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl CrudRepository<Module, ModuleCreate, Uuid> for Module {
    async fn create(mm: &ModelManager, data: ModuleCreate) -> DatabaseResult<Self> {
        Ok(mm.ordering().insert_with_order(data).await?)
    }

    async fn update(self, mm: &ModelManager, data: ModuleCreate) -> DatabaseResult<Self> {
        let mut tx = mm.ordering().begin().await?;
        let result = Self::update_in(&mut tx, self.id, data).await;
        Ok(ordering::finish(tx, result).await?)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        mm.ordering()
            .delete_and_compact(SiblingLevel::Module, self.id)
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM modules WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM modules ORDER BY course_id, order_index LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM modules")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Module, ModuleCreate, Uuid);

// Utils

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ModuleWithCourseRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub module: Module,
    pub course_title: String,
}

impl ModuleWithCourseRow {
    /// Every module, grouped by course title and then by order.
    pub async fn fetch_all(mm: &ModelManager) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT m.*, c.title AS course_title
            FROM modules m
            JOIN courses c ON c.id = m.course_id
            ORDER BY c.title, m.course_id, m.order_index
            "#,
        )
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
