use color_eyre::Result;

use super::models::{CourseBriefRow, CourseRow};
use super::Db;
use crate::models::CreateCourseBody;
use crate::names;

const COURSE_COLUMNS: &str = r#"
    c.id, c.title, c.title_ar, c.description, c.description_ar,
    c.price, c.currency, c.total_lessons,
    c.certificate_available, c.certificate_minimum_score, c.instructor_id,
    (SELECT COUNT(*) FROM progress p WHERE p.course_id = c.id) AS num_enrollments
"#;

impl Db {
    pub async fn create_course(&self, body: &CreateCourseBody, instructor_id: i64) -> Result<i64> {
        let currency = body
            .currency
            .as_deref()
            .unwrap_or(names::DEFAULT_CURRENCY);

        let course_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO courses (
                title, title_ar, description, description_ar, price, currency,
                certificate_available, certificate_minimum_score, instructor_id
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING id
            "#,
        )
        .bind(&body.title)
        .bind(&body.title_ar)
        .bind(&body.description)
        .bind(&body.description_ar)
        .bind(body.price)
        .bind(currency)
        .bind(body.certificate_available)
        .bind(body.certificate_minimum_score)
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("new course created: id={course_id} by user_id={instructor_id}");
        Ok(course_id)
    }

    pub async fn courses(&self) -> Result<Vec<CourseRow>> {
        let courses = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses c ORDER BY c.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    pub async fn get_course(&self, course_id: i64) -> Result<Option<CourseRow>> {
        let course = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses c WHERE c.id = ?1"
        ))
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    pub async fn course_brief(&self, course_id: i64) -> Result<Option<CourseBriefRow>> {
        let brief = sqlx::query_as::<_, CourseBriefRow>(
            "SELECT id, title, title_ar, total_lessons FROM courses WHERE id = ?1",
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brief)
    }

    /// Courses the user holds a progress record for, newest enrollment first.
    pub async fn enrolled_courses(&self, user_id: i64) -> Result<Vec<CourseRow>> {
        let courses = sqlx::query_as::<_, CourseRow>(&format!(
            r#"
            SELECT {COURSE_COLUMNS}
            FROM courses c
            JOIN progress pr ON pr.course_id = c.id
            WHERE pr.user_id = ?1
            ORDER BY pr.id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    pub async fn is_enrolled(&self, user_id: i64, course_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM progress WHERE user_id = ?1 AND course_id = ?2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
