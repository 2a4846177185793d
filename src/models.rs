//! Wire types for the JSON API. Field names are camelCase to match the
//! frontend contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ApiData<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct ApiList<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

pub fn data<T: Serialize>(data: T) -> axum::Json<ApiData<T>> {
    axum::Json(ApiData {
        success: true,
        data,
    })
}

pub fn list<T: Serialize>(items: Vec<T>) -> axum::Json<ApiList<T>> {
    axum::Json(ApiList {
        success: true,
        count: items.len(),
        data: items,
    })
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseBody {
    pub title: String,
    pub title_ar: String,
    pub description: Option<String>,
    pub description_ar: Option<String>,
    #[serde(default)]
    pub price: i64,
    pub currency: Option<String>,
    #[serde(default = "default_true")]
    pub certificate_available: bool,
    #[serde(default = "default_minimum_score")]
    pub certificate_minimum_score: i64,
}

fn default_true() -> bool {
    true
}

fn default_minimum_score() -> i64 {
    crate::names::DEFAULT_MINIMUM_CERTIFICATE_SCORE
}

fn default_passing_score() -> i64 {
    crate::names::DEFAULT_PASSING_SCORE
}

fn default_points() -> i64 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonBody {
    pub course: i64,
    pub title: String,
    pub title_ar: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "type")]
    pub lesson_type: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub is_free: bool,
    pub quiz: Option<QuizBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizBody {
    #[serde(default = "default_passing_score")]
    pub passing_score: i64,
    #[serde(default)]
    pub questions: Vec<QuestionBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBody {
    pub question: String,
    pub question_ar: Option<String>,
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<OptionBody>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub explanation_ar: Option<String>,
    #[serde(default = "default_points")]
    pub points: i64,
}

fn default_question_type() -> String {
    "multiple-choice".to_owned()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionBody {
    pub text: String,
    pub text_ar: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonBody {
    pub score: Option<i64>,
    pub time_spent: Option<i64>,
}

#[derive(Deserialize)]
pub struct SubmitQuizBody {
    /// Positional: answers[i] belongs to the i-th question of the quiz.
    pub answers: Vec<Option<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCurrentLessonBody {
    pub lesson_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteBody {
    pub lesson_id: i64,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBookmarkBody {
    pub lesson_id: i64,
    /// Playback position in seconds, for video lessons.
    pub timestamp: Option<i64>,
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    pub is_available: bool,
    pub minimum_score: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    pub id: i64,
    pub title: String,
    pub title_ar: String,
    pub description: Option<String>,
    pub description_ar: Option<String>,
    pub price: i64,
    pub currency: String,
    pub is_free: bool,
    pub total_lessons: i64,
    pub certificate: CertificateInfo,
    pub number_of_enrollments: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBrief {
    pub id: i64,
    pub title: String,
    pub title_ar: String,
    pub total_lessons: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonBrief {
    pub id: i64,
    pub title: String,
    pub title_ar: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOptionPayload {
    pub text: String,
    pub text_ar: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionPayload {
    pub id: i64,
    pub question: String,
    pub question_ar: Option<String>,
    #[serde(rename = "type")]
    pub question_type: String,
    pub points: i64,
    pub options: Vec<QuizOptionPayload>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPayload {
    pub passing_score: i64,
    pub questions: Vec<QuizQuestionPayload>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPayload {
    pub id: i64,
    pub course: i64,
    pub title: String,
    pub title_ar: String,
    pub section: String,
    pub order: i64,
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub duration: i64,
    pub is_free: bool,
    pub views: i64,
    pub quiz: Option<QuizPayload>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLessonPayload {
    pub lesson: Option<LessonBrief>,
    pub completed_at: DateTime<Utc>,
    pub score: Option<i64>,
    pub time_spent: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScorePayload {
    pub lesson: i64,
    pub score: i64,
    pub max_score: i64,
    pub attempts: i64,
    pub last_attempt: DateTime<Utc>,
    pub passed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPayload {
    pub id: i64,
    pub user: i64,
    pub course: Option<CourseBrief>,
    pub current_lesson: Option<LessonBrief>,
    pub completed_lessons: Vec<CompletedLessonPayload>,
    pub overall_progress: i64,
    pub quiz_scores: Vec<QuizScorePayload>,
    pub streak_days: i64,
    pub total_time_spent: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed_at: DateTime<Utc>,
    pub certificate_issued: bool,
    pub certificate_issued_at: Option<DateTime<Utc>>,
    pub certificate_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedQuestionPayload {
    pub question: String,
    pub question_ar: Option<String>,
    pub user_answer: Option<String>,
    pub is_correct: bool,
    pub explanation: Option<String>,
    pub explanation_ar: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultPayload {
    pub score: i64,
    pub total_points: i64,
    pub percentage: i64,
    pub passed: bool,
    pub results: Vec<GradedQuestionPayload>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePayload {
    pub certificate_url: String,
    pub issued_at: DateTime<Utc>,
    pub course_name: String,
    pub course_name_ar: String,
    pub user_name: String,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsPayload {
    pub total_courses: i64,
    pub completed_courses: i64,
    pub in_progress_courses: i64,
    pub total_lessons_completed: i64,
    pub total_time_spent: i64,
    pub average_progress: i64,
    pub current_streak: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub id: i64,
    pub lesson: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPayload {
    pub id: i64,
    pub lesson: i64,
    pub timestamp: Option<i64>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
