// Database model structs

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

#[derive(sqlx::FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub title: String,
    pub title_ar: String,
    pub description: Option<String>,
    pub description_ar: Option<String>,
    pub price: i64,
    pub currency: String,
    pub total_lessons: i64,
    pub certificate_available: bool,
    pub certificate_minimum_score: i64,
    pub instructor_id: i64,
    pub num_enrollments: i64,
}

#[derive(sqlx::FromRow)]
pub struct CourseBriefRow {
    pub id: i64,
    pub title: String,
    pub title_ar: String,
    pub total_lessons: i64,
}

#[derive(sqlx::FromRow)]
pub struct LessonRow {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub title_ar: String,
    pub section: String,
    pub position: i64,
    pub lesson_type: String,
    pub duration: i64,
    pub is_free: bool,
    pub quiz_passing_score: i64,
    pub views: i64,
}

#[derive(sqlx::FromRow)]
pub struct LessonBriefRow {
    pub id: i64,
    pub title: String,
    pub title_ar: String,
    pub lesson_type: String,
}

#[derive(sqlx::FromRow)]
pub struct QuizQuestionRow {
    pub id: i64,
    pub question: String,
    pub question_ar: Option<String>,
    pub question_type: String,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub explanation_ar: Option<String>,
    pub points: i64,
}

#[derive(Clone, sqlx::FromRow)]
pub struct QuizOptionRow {
    pub id: i64,
    pub text: String,
    pub text_ar: Option<String>,
    pub is_correct: bool,
}

/// A quiz question with its options attached.
pub struct QuizQuestion {
    pub id: i64,
    pub question: String,
    pub question_ar: Option<String>,
    pub question_type: String,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub explanation_ar: Option<String>,
    pub points: i64,
    pub options: Vec<QuizOptionRow>,
}

#[derive(Clone, sqlx::FromRow)]
pub struct ProgressRow {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub current_lesson_id: Option<i64>,
    pub overall_progress: i64,
    pub streak_days: i64,
    pub last_streak_date: Option<NaiveDate>,
    pub certificate_issued: bool,
    pub certificate_issued_at: Option<DateTime<Utc>>,
    pub certificate_url: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed_at: DateTime<Utc>,
    pub version: i64,
}

/// Completion entry joined with the lesson it refers to. The lesson columns
/// are null when the lesson has since been deleted.
#[derive(sqlx::FromRow)]
pub struct CompletedLessonRow {
    pub lesson_id: i64,
    pub completed_at: DateTime<Utc>,
    pub score: Option<i64>,
    pub time_spent: Option<i64>,
    pub title: Option<String>,
    pub title_ar: Option<String>,
    pub lesson_type: Option<String>,
}

#[derive(sqlx::FromRow)]
pub struct QuizScoreRow {
    pub lesson_id: i64,
    pub score: i64,
    pub max_score: i64,
    pub attempts: i64,
    pub last_attempt: DateTime<Utc>,
    pub passed: bool,
}

#[derive(sqlx::FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub lesson_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
pub struct BookmarkRow {
    pub id: i64,
    pub lesson_id: i64,
    pub position_secs: Option<i64>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-course aggregates backing the user statistics endpoint.
#[derive(sqlx::FromRow)]
pub struct ProgressStatsRow {
    pub overall_progress: i64,
    pub streak_days: i64,
    pub lessons_completed: i64,
    pub time_spent: i64,
}
