use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};

use super::models::{
    BookmarkRow, CompletedLessonRow, NoteRow, ProgressRow, ProgressStatsRow, QuizScoreRow,
};
use super::Db;
use crate::services;

const PROGRESS_COLUMNS: &str = r#"
    id, user_id, course_id, current_lesson_id, overall_progress, streak_days,
    last_streak_date, certificate_issued, certificate_issued_at, certificate_url,
    started_at, completed_at, last_accessed_at, version
"#;

/// Attempts for the version-guarded progress update before giving up.
const UPDATE_RETRIES: u32 = 3;

impl Db {
    /// Create the progress record for a new enrollment.
    /// The (user, course) pair is unique; enrolling twice is a caller error.
    pub async fn create_progress(
        &self,
        user_id: i64,
        course_id: i64,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let progress_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO progress (user_id, course_id, started_at, last_accessed_at)
            VALUES (?1, ?2, ?3, ?3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("progress created: id={progress_id} user={user_id} course={course_id}");
        Ok(progress_id)
    }

    pub async fn find_progress(&self, user_id: i64, course_id: i64) -> Result<Option<ProgressRow>> {
        let progress = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress WHERE user_id = ?1 AND course_id = ?2"
        ))
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(progress)
    }

    pub async fn get_progress(&self, progress_id: i64) -> Result<ProgressRow> {
        let progress = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress WHERE id = ?1"
        ))
        .bind(progress_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(progress)
    }

    pub async fn all_progress(&self, user_id: i64) -> Result<Vec<ProgressRow>> {
        let progress = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM progress WHERE user_id = ?1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(progress)
    }

    /// Record a lesson completion. Completing an already-completed lesson is
    /// a no-op and returns the progress unchanged; a fresh completion
    /// recomputes the overall percentage, advances the streak, and persists
    /// through a version-guarded update so racing requests cannot lose
    /// writes.
    pub async fn complete_lesson(
        &self,
        progress_id: i64,
        lesson_id: i64,
        score: Option<i64>,
        time_spent: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<ProgressRow> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO completed_lessons (progress_id, lesson_id, completed_at, score, time_spent)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (progress_id, lesson_id) DO NOTHING
            "#,
        )
        .bind(progress_id)
        .bind(lesson_id)
        .bind(now)
        .bind(score)
        .bind(time_spent)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            // Already completed: nothing to recompute.
            return self.get_progress(progress_id).await;
        }

        for _ in 0..UPDATE_RETRIES {
            let progress = self.get_progress(progress_id).await?;

            let completed: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM completed_lessons WHERE progress_id = ?1",
            )
            .bind(progress_id)
            .fetch_one(&self.pool)
            .await?;

            let total_lessons: i64 =
                sqlx::query_scalar("SELECT total_lessons FROM courses WHERE id = ?1")
                    .bind(progress.course_id)
                    .fetch_one(&self.pool)
                    .await?;

            let overall = services::progress::overall_progress(completed, total_lessons);
            let (streak_days, last_streak_date) = services::progress::advance_streak(
                progress.streak_days,
                progress.last_streak_date,
                now.date_naive(),
            );
            let completed_at = (overall == 100).then_some(now);

            let updated = sqlx::query(
                r#"
                UPDATE progress
                SET overall_progress = ?1,
                    streak_days = ?2,
                    last_streak_date = ?3,
                    completed_at = COALESCE(completed_at, ?4),
                    last_accessed_at = ?5,
                    version = version + 1
                WHERE id = ?6 AND version = ?7
                "#,
            )
            .bind(overall)
            .bind(streak_days)
            .bind(last_streak_date)
            .bind(completed_at)
            .bind(now)
            .bind(progress_id)
            .bind(progress.version)
            .execute(&self.pool)
            .await?
            .rows_affected();

            if updated == 1 {
                tracing::info!(
                    "lesson {lesson_id} completed on progress {progress_id}: overall={overall}%"
                );
                return self.get_progress(progress_id).await;
            }
            // Lost the race against a concurrent update; recompute and retry.
        }

        Err(eyre!(
            "progress {progress_id} kept changing underneath the completion update"
        ))
    }

    /// Merge a graded quiz attempt into the stored best score. The merge is
    /// one atomic statement: best score, attempt count, and the sticky
    /// passed flag survive concurrent submissions.
    pub async fn record_quiz_score(
        &self,
        progress_id: i64,
        lesson_id: i64,
        percentage: i64,
        passed: bool,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quiz_scores (progress_id, lesson_id, score, max_score, attempts, last_attempt, passed)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6)
            ON CONFLICT (progress_id, lesson_id) DO UPDATE SET
                score = MAX(quiz_scores.score, excluded.score),
                attempts = quiz_scores.attempts + 1,
                last_attempt = excluded.last_attempt,
                passed = quiz_scores.passed OR excluded.passed
            "#,
        )
        .bind(progress_id)
        .bind(lesson_id)
        .bind(percentage)
        .bind(crate::names::QUIZ_MAX_SCORE)
        .bind(now)
        .bind(passed)
        .execute(&self.pool)
        .await?;

        sqlx::query("UPDATE progress SET last_accessed_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(progress_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(
            "quiz score recorded on progress {progress_id} lesson {lesson_id}: {percentage}%"
        );
        Ok(())
    }

    pub async fn set_current_lesson(
        &self,
        progress_id: i64,
        lesson_id: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE progress SET current_lesson_id = ?1, last_accessed_at = ?2 WHERE id = ?3",
        )
        .bind(lesson_id)
        .bind(now)
        .bind(progress_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn completed_lessons(&self, progress_id: i64) -> Result<Vec<CompletedLessonRow>> {
        let completed = sqlx::query_as::<_, CompletedLessonRow>(
            r#"
            SELECT cl.lesson_id, cl.completed_at, cl.score, cl.time_spent,
                   l.title, l.title_ar, l.lesson_type
            FROM completed_lessons cl
            LEFT JOIN lessons l ON l.id = cl.lesson_id
            WHERE cl.progress_id = ?1
            ORDER BY cl.id
            "#,
        )
        .bind(progress_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(completed)
    }

    pub async fn quiz_scores(&self, progress_id: i64) -> Result<Vec<QuizScoreRow>> {
        let scores = sqlx::query_as::<_, QuizScoreRow>(
            r#"
            SELECT lesson_id, score, max_score, attempts, last_attempt, passed
            FROM quiz_scores
            WHERE progress_id = ?1
            ORDER BY lesson_id
            "#,
        )
        .bind(progress_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }

    pub async fn quiz_score_values(&self, progress_id: i64) -> Result<Vec<i64>> {
        let scores: Vec<i64> =
            sqlx::query_scalar("SELECT score FROM quiz_scores WHERE progress_id = ?1")
                .bind(progress_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(scores)
    }

    pub async fn total_time_spent(&self, progress_id: i64) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(time_spent), 0) FROM completed_lessons WHERE progress_id = ?1",
        )
        .bind(progress_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// One-shot certificate stamp. The conditional write means only the
    /// first caller ever sets the fields; everyone later reads them back
    /// unchanged.
    pub async fn stamp_certificate(&self, progress_id: i64, now: DateTime<Utc>) -> Result<()> {
        let stamped = sqlx::query(
            r#"
            UPDATE progress
            SET certificate_issued = 1, certificate_issued_at = ?1, certificate_url = ?2
            WHERE id = ?3 AND certificate_issued = 0
            "#,
        )
        .bind(now)
        .bind(crate::names::certificate_url(progress_id))
        .bind(progress_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if stamped == 1 {
            tracing::info!("certificate issued for progress {progress_id}");
        }
        Ok(())
    }

    /// Insert or update the user's note for a lesson.
    pub async fn upsert_note(
        &self,
        progress_id: i64,
        lesson_id: i64,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notes (progress_id, lesson_id, content, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (progress_id, lesson_id) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.created_at
            "#,
        )
        .bind(progress_id)
        .bind(lesson_id)
        .bind(content)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn notes(&self, progress_id: i64) -> Result<Vec<NoteRow>> {
        let notes = sqlx::query_as::<_, NoteRow>(
            "SELECT id, lesson_id, content, created_at, updated_at FROM notes WHERE progress_id = ?1 ORDER BY id",
        )
        .bind(progress_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    pub async fn add_bookmark(
        &self,
        progress_id: i64,
        lesson_id: i64,
        position_secs: Option<i64>,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let bookmark_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookmarks (progress_id, lesson_id, position_secs, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(progress_id)
        .bind(lesson_id)
        .bind(position_secs)
        .bind(note)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(bookmark_id)
    }

    pub async fn bookmarks(&self, progress_id: i64) -> Result<Vec<BookmarkRow>> {
        let bookmarks = sqlx::query_as::<_, BookmarkRow>(
            "SELECT id, lesson_id, position_secs, note, created_at FROM bookmarks WHERE progress_id = ?1 ORDER BY id",
        )
        .bind(progress_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookmarks)
    }

    /// Returns false when no such bookmark belongs to this progress record.
    pub async fn delete_bookmark(&self, progress_id: i64, bookmark_id: i64) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM bookmarks WHERE id = ?1 AND progress_id = ?2")
            .bind(bookmark_id)
            .bind(progress_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    /// Per-course aggregates for the statistics endpoint.
    pub async fn progress_stats(&self, user_id: i64) -> Result<Vec<ProgressStatsRow>> {
        let stats = sqlx::query_as::<_, ProgressStatsRow>(
            r#"
            SELECT
                p.overall_progress,
                p.streak_days,
                (SELECT COUNT(*) FROM completed_lessons cl WHERE cl.progress_id = p.id) AS lessons_completed,
                (SELECT COALESCE(SUM(cl.time_spent), 0) FROM completed_lessons cl WHERE cl.progress_id = p.id) AS time_spent
            FROM progress p
            WHERE p.user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}
