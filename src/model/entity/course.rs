use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Course {
    id: Uuid,
    title: String,
    description: Option<String>,
    thumbnail_url: Option<String>,
    cover_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CourseCreate {
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub cover_url: Option<String>,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, Uuid> for Course {
    async fn create(mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        let course = sqlx::query_as(
            "INSERT INTO courses (id, title, description, thumbnail_url, cover_url) VALUES ($1,$2,$3,$4,$5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.thumbnail_url)
        .bind(&data.cover_url)
        .fetch_one(mm.executor())
        .await?;

        Ok(course)
    }

    async fn update(self, mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        let course = sqlx::query_as(
            r#"
            UPDATE courses
            SET title = $1, description = $2, thumbnail_url = $3, cover_url = $4, updated_at = now()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.thumbnail_url)
        .bind(&data.cover_url)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(course)
    }

    /// Removes the course with all of its modules and lessons.
    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        let mut tx = mm.executor().begin().await?;

        // same lock order as the order service: course, modules by id, then lessons
        let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(self.id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(sqlx::Error::RowNotFound.into());
        }

        let _: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM modules WHERE course_id = $1 ORDER BY id FOR UPDATE")
                .bind(self.id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query(
            "DELETE FROM lessons WHERE module_id IN (SELECT id FROM modules WHERE course_id = $1)",
        )
        .bind(self.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM modules WHERE course_id = $1")
            .bind(self.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(self.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(course_id = %self.id, "course deleted");
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Course, CourseCreate, Uuid);

// Utils

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct CourseSummaryRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    pub modules_count: i64,
    pub lessons_count: i64,
}

impl CourseSummaryRow {
    pub async fn fetch_all(mm: &ModelManager) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                c.*,
                (SELECT COUNT(*) FROM modules m WHERE m.course_id = c.id) AS modules_count,
                (
                    SELECT COUNT(*)
                    FROM lessons l
                    JOIN modules m ON m.id = l.module_id
                    WHERE m.course_id = c.id
                ) AS lessons_count
            FROM courses c
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
