use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use crate::{
    db::models::{LessonRow, QuizQuestion},
    db::Db,
    extractors::AuthGuard,
    models::{
        self, CompleteLessonBody, CreateLessonBody, GradedQuestionPayload, LessonPayload,
        QuizOptionPayload, QuizPayload, QuizQuestionPayload, QuizResultPayload, SubmitQuizBody,
    },
    names,
    rejections::{AppError, ResultExt},
    services::grading,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::LESSONS_URL, post(create_lesson))
        .route("/lessons/course/{course_id}", get(list_lessons))
        .route("/lessons/{id}", get(get_lesson).delete(delete_lesson))
        .route("/lessons/{id}/complete", post(complete_lesson))
        .route("/lessons/{id}/quiz/submit", post(submit_quiz))
}

/// Quiz payload with the answer key stripped: option texts only, no correct
/// flags, no stored answers.
fn quiz_payload(passing_score: i64, questions: Vec<QuizQuestion>) -> QuizPayload {
    QuizPayload {
        passing_score,
        questions: questions
            .into_iter()
            .map(|q| QuizQuestionPayload {
                id: q.id,
                question: q.question,
                question_ar: q.question_ar,
                question_type: q.question_type,
                points: q.points,
                options: q
                    .options
                    .into_iter()
                    .map(|o| QuizOptionPayload {
                        text: o.text,
                        text_ar: o.text_ar,
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn lesson_payload(lesson: LessonRow, quiz: Option<QuizPayload>) -> LessonPayload {
    LessonPayload {
        id: lesson.id,
        course: lesson.course_id,
        title: lesson.title,
        title_ar: lesson.title_ar,
        section: lesson.section,
        order: lesson.position,
        lesson_type: lesson.lesson_type,
        duration: lesson.duration,
        is_free: lesson.is_free,
        views: lesson.views,
        quiz,
    }
}

async fn lesson_with_quiz(db: &Db, lesson: LessonRow) -> Result<LessonPayload, AppError> {
    let quiz = if lesson.lesson_type == names::QUIZ_LESSON_TYPE {
        let questions = db
            .quiz_questions(lesson.id)
            .await
            .reject("could not get quiz questions")?;
        Some(quiz_payload(lesson.quiz_passing_score, questions))
    } else {
        None
    };

    Ok(lesson_payload(lesson, quiz))
}

async fn list_lessons(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lessons = state
        .db
        .lessons_for_course(course_id)
        .await
        .reject("could not list lessons")?;

    Ok(models::list(
        lessons
            .into_iter()
            .map(|lesson| lesson_payload(lesson, None))
            .collect(),
    ))
}

async fn get_lesson(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = state
        .db
        .get_lesson(lesson_id)
        .await
        .reject("could not get lesson")?
        .ok_or(AppError::LessonNotFound)?;

    let enrolled = state
        .db
        .find_progress(user.id, lesson.course_id)
        .await
        .reject("could not check enrollment")?
        .is_some();
    if !enrolled {
        return Err(AppError::NotEnrolled);
    }

    state
        .db
        .increment_views(lesson_id)
        .await
        .reject("could not count view")?;

    let payload = lesson_with_quiz(&state.db, lesson).await?;
    Ok(models::data(payload))
}

async fn create_lesson(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<CreateLessonBody>,
) -> Result<impl IntoResponse, AppError> {
    let course = state
        .db
        .get_course(body.course)
        .await
        .reject("could not get course")?
        .ok_or(AppError::CourseNotFound)?;

    if course.instructor_id != user.id && user.role != names::ROLE_ADMIN {
        return Err(AppError::Forbidden);
    }

    if body.title.trim().is_empty() || body.title_ar.trim().is_empty() {
        return Err(AppError::Input("error.empty_fields"));
    }
    if !names::LESSON_TYPES.contains(&body.lesson_type.as_str()) {
        return Err(AppError::Input("error.invalid_input"));
    }

    let lesson_id = state
        .db
        .create_lesson(&body)
        .await
        .reject("could not create lesson")?;

    let lesson = state
        .db
        .get_lesson(lesson_id)
        .await
        .reject("could not get lesson")?
        .ok_or(AppError::Internal("created lesson missing"))?;

    let payload = lesson_with_quiz(&state.db, lesson).await?;
    Ok((StatusCode::CREATED, models::data(payload)))
}

async fn delete_lesson(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = state
        .db
        .get_lesson(lesson_id)
        .await
        .reject("could not get lesson")?
        .ok_or(AppError::LessonNotFound)?;

    let course = state
        .db
        .get_course(lesson.course_id)
        .await
        .reject("could not get course")?
        .ok_or(AppError::CourseNotFound)?;

    if course.instructor_id != user.id && user.role != names::ROLE_ADMIN {
        return Err(AppError::Forbidden);
    }

    state
        .db
        .delete_lesson(lesson_id, lesson.course_id)
        .await
        .reject("could not delete lesson")?;

    Ok(models::data(serde_json::json!({})))
}

/// Record a lesson completion for the calling user. Completing the same
/// lesson twice is a no-op; the response carries the up-to-date progress
/// either way.
async fn complete_lesson(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(body): Json<CompleteLessonBody>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = state
        .db
        .get_lesson(lesson_id)
        .await
        .reject("could not get lesson")?
        .ok_or(AppError::LessonNotFound)?;

    let progress = state
        .db
        .find_progress(user.id, lesson.course_id)
        .await
        .reject("could not look up progress")?
        .ok_or(AppError::NotEnrolled)?;

    let progress = state
        .db
        .complete_lesson(progress.id, lesson_id, body.score, body.time_spent, Utc::now())
        .await
        .reject("could not record completion")?;

    let payload = super::progress::progress_payload(&state.db, progress).await?;
    Ok(models::data(payload))
}

/// Grade a quiz submission. Grading is pure and always returns the result;
/// the best-score bookkeeping only happens for enrolled users.
async fn submit_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Json(body): Json<SubmitQuizBody>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = state
        .db
        .get_lesson(lesson_id)
        .await
        .reject("could not get lesson")?
        .filter(|lesson| lesson.lesson_type == names::QUIZ_LESSON_TYPE)
        .ok_or(AppError::QuizNotFound)?;

    let questions = state
        .db
        .quiz_questions(lesson_id)
        .await
        .reject("could not get quiz questions")?;

    let outcome = grading::grade(&questions, &body.answers, lesson.quiz_passing_score);

    let progress = state
        .db
        .find_progress(user.id, lesson.course_id)
        .await
        .reject("could not look up progress")?;

    if let Some(progress) = progress {
        state
            .db
            .record_quiz_score(
                progress.id,
                lesson_id,
                outcome.percentage,
                outcome.passed,
                Utc::now(),
            )
            .await
            .reject("could not record quiz score")?;
    }

    Ok(models::data(QuizResultPayload {
        score: outcome.score,
        total_points: outcome.total_points,
        percentage: outcome.percentage,
        passed: outcome.passed,
        results: outcome
            .results
            .into_iter()
            .map(|r| GradedQuestionPayload {
                question: r.question,
                question_ar: r.question_ar,
                user_answer: r.user_answer,
                is_correct: r.is_correct,
                explanation: r.explanation,
                explanation_ar: r.explanation_ar,
            })
            .collect(),
    }))
}
