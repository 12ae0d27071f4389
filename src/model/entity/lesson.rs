use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::ordering::{self, OrderError, OrderResult, PgSiblingTx, SiblingInsert, SiblingLevel};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lesson {
    id: Uuid,
    module_id: Uuid,
    title: String,
    description: Option<String>,
    content: Option<String>,
    video_url: Option<String>,
    embed_url: Option<String>,
    thumbnail_url: Option<String>,
    material_url: Option<String>,
    /// Seconds
    duration: Option<i32>,
    order_index: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> ResourceType {
        ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    pub fn duration(&self) -> Option<i32> {
        self.duration
    }
}

/// Same re-ordering rules as [`super::ModuleCreate`], with `module_id` as the parent.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LessonCreate {
    pub module_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub embed_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub material_url: Option<String>,
    pub duration: Option<i32>,
    pub order_index: Option<i32>,
}

#[async_trait]
impl SiblingInsert<PgSiblingTx> for LessonCreate {
    type Output = Lesson;

    fn level(&self) -> SiblingLevel {
        SiblingLevel::Lesson
    }

    fn parent_id(&self) -> Uuid {
        self.module_id
    }

    fn requested_order(&self) -> Option<i32> {
        self.order_index
    }

    async fn insert(self, tx: &mut PgSiblingTx, order_index: i32) -> DatabaseResult<Lesson> {
        let lesson = sqlx::query_as(
            r#"
            INSERT INTO lessons (
                id, module_id, title, description, content, video_url,
                embed_url, thumbnail_url, material_url, duration, order_index
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(self.module_id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(&self.content)
        .bind(&self.video_url)
        .bind(&self.embed_url)
        .bind(&self.thumbnail_url)
        .bind(&self.material_url)
        .bind(self.duration)
        .bind(order_index)
        .fetch_one(tx.connection())
        .await?;

        Ok(lesson)
    }
}

impl Lesson {
    async fn update_in(tx: &mut PgSiblingTx, id: Uuid, data: LessonCreate) -> OrderResult<Self> {
        ordering::relocate(tx, SiblingLevel::Lesson, id, data.order_index, Some(data.module_id))
            .await?;

        let lesson = sqlx::query_as(
            r#"
            UPDATE lessons
            SET title = $1, description = $2, content = $3, video_url = $4, embed_url = $5,
                thumbnail_url = $6, material_url = $7, duration = $8, updated_at = now()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.content)
        .bind(&data.video_url)
        .bind(&data.embed_url)
        .bind(&data.thumbnail_url)
        .bind(&data.material_url)
        .bind(data.duration)
        .bind(id)
        .fetch_optional(tx.connection())
        .await?;

        lesson.ok_or_else(|| OrderError::not_found(ResourceType::Lesson, id))
    }

    /// Moves the lesson to `order_index`, optionally into another module.
    pub async fn move_to(
        mm: &ModelManager,
        id: Uuid,
        order_index: i32,
        module_id: Option<Uuid>,
    ) -> DatabaseResult<Self> {
        mm.ordering()
            .move_to(SiblingLevel::Lesson, id, order_index, module_id)
            .await?;

        Self::find_by_id(mm, id)
            .await?
            .ok_or_else(|| OrderError::not_found(ResourceType::Lesson, id).into())
    }

    pub async fn all_by_module(mm: &ModelManager, module_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE module_id = $1 ORDER BY order_index")
            .bind(module_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    /// Lessons of every module in the course, by module order and then lesson order.
    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT l.*
            FROM lessons l
            JOIN modules m ON m.id = l.module_id
            WHERE m.course_id = $1
            ORDER BY m.order_index, l.order_index
            "#,
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, Uuid> for Lesson {
    async fn create(mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        Ok(mm.ordering().insert_with_order(data).await?)
    }

    async fn update(self, mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        let mut tx = mm.ordering().begin().await?;
        let result = Self::update_in(&mut tx, self.id, data).await;
        Ok(ordering::finish(tx, result).await?)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        mm.ordering()
            .delete_and_compact(SiblingLevel::Lesson, self.id)
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM lessons ORDER BY module_id, order_index LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Lesson, LessonCreate, Uuid);
