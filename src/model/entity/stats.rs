use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::model::{ModelManager, error::DatabaseResult};

/// Number of most recent courses listed in `modules_per_course`.
const RECENT_COURSES: i64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ModulesPerCourse {
    pub course_name: String,
    pub module_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct CoursesPerMonth {
    /// `YYYY-MM`
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CatalogStats {
    pub total_courses: i64,
    pub total_modules: i64,
    pub total_lessons: i64,
    pub average_lessons_per_module: f64,
    pub average_modules_per_course: f64,
    pub modules_per_course: Vec<ModulesPerCourse>,
    pub courses_per_month: Vec<CoursesPerMonth>,
}

fn average(total: i64, over: i64) -> f64 {
    if over > 0 {
        total as f64 / over as f64
    } else {
        0.0
    }
}

impl CatalogStats {
    pub async fn collect(mm: &ModelManager) -> DatabaseResult<Self> {
        let (total_courses, total_modules, total_lessons): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM courses),
                (SELECT COUNT(*) FROM modules),
                (SELECT COUNT(*) FROM lessons)
            "#,
        )
        .fetch_one(mm.executor())
        .await?;

        let modules_per_course = sqlx::query_as(
            r#"
            SELECT c.title AS course_name, COUNT(m.id) AS module_count
            FROM courses c
            LEFT JOIN modules m ON m.course_id = c.id
            GROUP BY c.id
            ORDER BY c.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_COURSES)
        .fetch_all(mm.executor())
        .await?;

        // the last twelve calendar months, current one included
        let courses_per_month = sqlx::query_as(
            r#"
            SELECT to_char(date_trunc('month', created_at), 'YYYY-MM') AS month, COUNT(*) AS count
            FROM courses
            WHERE created_at >= date_trunc('month', now()) - interval '11 months'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .fetch_all(mm.executor())
        .await?;

        Ok(Self {
            total_courses,
            total_modules,
            total_lessons,
            average_lessons_per_module: average(total_lessons, total_modules),
            average_modules_per_course: average(total_modules, total_courses),
            modules_per_course,
            courses_per_month,
        })
    }
}
