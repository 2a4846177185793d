pub const USER_SESSION_COOKIE_NAME: &str = "user_session";

pub const REGISTER_URL: &str = "/auth/register";
pub const LOGIN_URL: &str = "/auth/login";
pub const LOGOUT_URL: &str = "/auth/logout";
pub const ME_URL: &str = "/auth/me";

pub const COURSES_URL: &str = "/courses";
pub const ENROLLED_COURSES_URL: &str = "/courses/enrolled";
pub const LESSONS_URL: &str = "/lessons";
pub const PROGRESS_URL: &str = "/progress";
pub const STATISTICS_URL: &str = "/progress/statistics";

pub fn course_url(course_id: i64) -> String {
    format!("/courses/{course_id}")
}

pub fn enroll_url(course_id: i64) -> String {
    format!("/courses/{course_id}/enroll")
}

pub fn course_lessons_url(course_id: i64) -> String {
    format!("/lessons/course/{course_id}")
}

pub fn lesson_url(lesson_id: i64) -> String {
    format!("/lessons/{lesson_id}")
}

pub fn complete_lesson_url(lesson_id: i64) -> String {
    format!("/lessons/{lesson_id}/complete")
}

pub fn submit_quiz_url(lesson_id: i64) -> String {
    format!("/lessons/{lesson_id}/quiz/submit")
}

pub fn course_progress_url(course_id: i64) -> String {
    format!("/progress/course/{course_id}")
}

pub fn certificate_request_url(course_id: i64) -> String {
    format!("/progress/course/{course_id}/certificate")
}

pub fn notes_url(course_id: i64) -> String {
    format!("/progress/course/{course_id}/notes")
}

pub fn bookmarks_url(course_id: i64) -> String {
    format!("/progress/course/{course_id}/bookmarks")
}

pub fn bookmark_url(course_id: i64, bookmark_id: i64) -> String {
    format!("/progress/course/{course_id}/bookmarks/{bookmark_id}")
}

/// Where an issued certificate can be fetched by the frontend.
pub fn certificate_url(progress_id: i64) -> String {
    format!("/certificates/{progress_id}")
}

pub const LESSON_TYPES: &[&str] = &["video", "text", "quiz", "assignment", "interactive"];
pub const QUIZ_LESSON_TYPE: &str = "quiz";
pub const MULTIPLE_CHOICE: &str = "multiple-choice";

// Grading defaults
pub const DEFAULT_PASSING_SCORE: i64 = 70;
pub const DEFAULT_MINIMUM_CERTIFICATE_SCORE: i64 = 70;
pub const QUIZ_MAX_SCORE: i64 = 100;

pub const DEFAULT_CURRENCY: &str = "SAR";

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_ADMIN: &str = "admin";
