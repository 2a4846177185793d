use manara::db::Db;
use manara::models::{CreateCourseBody, CreateLessonBody, OptionBody, QuestionBody, QuizBody};
use manara::names;

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("manara_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}?mode=rwc", path.display());
    Db::new(&url).await.expect("failed to create test database")
}

static EMAIL_COUNTER: std::sync::atomic::AtomicU32 = std::sync::atomic::AtomicU32::new(0);

fn unique_email(prefix: &str) -> String {
    let id = EMAIL_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    format!("{prefix}-{id}@example.com")
}

#[allow(dead_code)]
pub async fn create_student(db: &Db) -> i64 {
    db.create_user(&unique_email("student"), "password123", "Student", names::ROLE_STUDENT)
        .await
        .expect("create student")
}

#[allow(dead_code)]
pub async fn create_instructor(db: &Db) -> i64 {
    db.create_user(
        &unique_email("instructor"),
        "password123",
        "Instructor",
        names::ROLE_INSTRUCTOR,
    )
    .await
    .expect("create instructor")
}

#[allow(dead_code)]
pub fn course_body(price: i64, minimum_score: i64) -> CreateCourseBody {
    CreateCourseBody {
        title: "Intro to Rust".to_owned(),
        title_ar: "مقدمة في رست".to_owned(),
        description: None,
        description_ar: None,
        price,
        currency: None,
        certificate_available: true,
        certificate_minimum_score: minimum_score,
    }
}

#[allow(dead_code)]
pub async fn create_course(db: &Db, instructor_id: i64, price: i64, minimum_score: i64) -> i64 {
    db.create_course(&course_body(price, minimum_score), instructor_id)
        .await
        .expect("create course")
}

#[allow(dead_code)]
pub fn video_lesson(course_id: i64, title: &str, position: i64) -> CreateLessonBody {
    CreateLessonBody {
        course: course_id,
        title: title.to_owned(),
        title_ar: format!("{title} (ar)"),
        section: "Basics".to_owned(),
        order: position,
        lesson_type: "video".to_owned(),
        duration: 300,
        is_free: false,
        quiz: None,
    }
}

/// A quiz lesson with one multiple-choice and one short-answer question,
/// one point each.
#[allow(dead_code)]
pub fn quiz_lesson(course_id: i64, title: &str, passing_score: i64) -> CreateLessonBody {
    CreateLessonBody {
        course: course_id,
        title: title.to_owned(),
        title_ar: format!("{title} (ar)"),
        section: "Quizzes".to_owned(),
        order: 99,
        lesson_type: "quiz".to_owned(),
        duration: 0,
        is_free: false,
        quiz: Some(QuizBody {
            passing_score,
            questions: vec![
                QuestionBody {
                    question: "Which keyword declares an immutable binding?".to_owned(),
                    question_ar: None,
                    question_type: "multiple-choice".to_owned(),
                    options: vec![
                        OptionBody {
                            text: "var".to_owned(),
                            text_ar: None,
                            is_correct: false,
                        },
                        OptionBody {
                            text: "let".to_owned(),
                            text_ar: None,
                            is_correct: true,
                        },
                    ],
                    correct_answer: None,
                    explanation: Some("let bindings are immutable by default".to_owned()),
                    explanation_ar: None,
                    points: 1,
                },
                QuestionBody {
                    question: "Name the borrow checker's language.".to_owned(),
                    question_ar: None,
                    question_type: "short-answer".to_owned(),
                    options: vec![],
                    correct_answer: Some("rust".to_owned()),
                    explanation: None,
                    explanation_ar: None,
                    points: 1,
                },
            ],
        }),
    }
}

#[allow(dead_code)]
pub async fn add_video_lessons(db: &Db, course_id: i64, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let id = db
            .create_lesson(&video_lesson(course_id, &format!("Lesson {}", i + 1), i as i64))
            .await
            .expect("create lesson");
        ids.push(id);
    }
    ids
}
