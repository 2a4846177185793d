use color_eyre::Result;

use super::models::{LessonBriefRow, LessonRow, QuizOptionRow, QuizQuestion, QuizQuestionRow};
use super::Db;
use crate::models::CreateLessonBody;

const LESSON_COLUMNS: &str = r#"
    id, course_id, title, title_ar, section, position, lesson_type,
    duration, is_free, quiz_passing_score, views
"#;

impl Db {
    /// Insert a lesson with its quiz questions and options atomically in a
    /// transaction, and bump the owning course's lesson count.
    /// Returns the id of the newly created lesson.
    pub async fn create_lesson(&self, body: &CreateLessonBody) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let passing_score = body
            .quiz
            .as_ref()
            .map(|q| q.passing_score)
            .unwrap_or(crate::names::DEFAULT_PASSING_SCORE);

        let lesson_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO lessons (
                course_id, title, title_ar, section, position, lesson_type,
                duration, is_free, quiz_passing_score
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING id
            "#,
        )
        .bind(body.course)
        .bind(&body.title)
        .bind(&body.title_ar)
        .bind(&body.section)
        .bind(body.order)
        .bind(&body.lesson_type)
        .bind(body.duration)
        .bind(body.is_free)
        .bind(passing_score)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(quiz) = &body.quiz {
            for (position, question) in quiz.questions.iter().enumerate() {
                let question_id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO quiz_questions (
                        lesson_id, position, question, question_ar, question_type,
                        correct_answer, explanation, explanation_ar, points
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    RETURNING id
                    "#,
                )
                .bind(lesson_id)
                .bind(position as i64)
                .bind(&question.question)
                .bind(&question.question_ar)
                .bind(&question.question_type)
                .bind(&question.correct_answer)
                .bind(&question.explanation)
                .bind(&question.explanation_ar)
                .bind(question.points)
                .fetch_one(&mut *tx)
                .await?;

                for option in &question.options {
                    sqlx::query(
                        "INSERT INTO quiz_options (question_id, text, text_ar, is_correct) VALUES (?1, ?2, ?3, ?4)",
                    )
                    .bind(question_id)
                    .bind(&option.text)
                    .bind(&option.text_ar)
                    .bind(option.is_correct)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        sqlx::query("UPDATE courses SET total_lessons = total_lessons + 1 WHERE id = ?1")
            .bind(body.course)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("new lesson created: id={lesson_id} for course={}", body.course);
        Ok(lesson_id)
    }

    pub async fn get_lesson(&self, lesson_id: i64) -> Result<Option<LessonRow>> {
        let lesson = sqlx::query_as::<_, LessonRow>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ?1"
        ))
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    pub async fn lessons_for_course(&self, course_id: i64) -> Result<Vec<LessonRow>> {
        let lessons = sqlx::query_as::<_, LessonRow>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE course_id = ?1 ORDER BY section, position, id"
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    pub async fn lesson_brief(&self, lesson_id: i64) -> Result<Option<LessonBriefRow>> {
        let brief = sqlx::query_as::<_, LessonBriefRow>(
            "SELECT id, title, title_ar, lesson_type FROM lessons WHERE id = ?1",
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brief)
    }

    /// The lesson's quiz questions in order, each with its options attached.
    pub async fn quiz_questions(&self, lesson_id: i64) -> Result<Vec<QuizQuestion>> {
        let rows = sqlx::query_as::<_, QuizQuestionRow>(
            r#"
            SELECT id, question, question_ar, question_type, correct_answer,
                   explanation, explanation_ar, points
            FROM quiz_questions
            WHERE lesson_id = ?1
            ORDER BY position, id
            "#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            let options = sqlx::query_as::<_, QuizOptionRow>(
                "SELECT id, text, text_ar, is_correct FROM quiz_options WHERE question_id = ?1 ORDER BY id",
            )
            .bind(row.id)
            .fetch_all(&self.pool)
            .await?;

            questions.push(QuizQuestion {
                id: row.id,
                question: row.question,
                question_ar: row.question_ar,
                question_type: row.question_type,
                correct_answer: row.correct_answer,
                explanation: row.explanation,
                explanation_ar: row.explanation_ar,
                points: row.points,
                options,
            });
        }

        Ok(questions)
    }

    pub async fn increment_views(&self, lesson_id: i64) -> Result<()> {
        sqlx::query("UPDATE lessons SET views = views + 1 WHERE id = ?1")
            .bind(lesson_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a lesson and decrement the course's lesson count.
    /// Returns false when the lesson did not exist.
    pub async fn delete_lesson(&self, lesson_id: i64, course_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM lessons WHERE id = ?1")
            .bind(lesson_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE courses SET total_lessons = MAX(total_lessons - 1, 0) WHERE id = ?1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("deleted lesson {lesson_id} from course {course_id}");
        Ok(true)
    }
}
