use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;

use crate::{
    db::models::ProgressRow,
    db::Db,
    extractors::AuthGuard,
    models::{
        self, AddBookmarkBody, AddNoteBody, BookmarkPayload, CertificatePayload, CourseBrief,
        CompletedLessonPayload, LessonBrief, NotePayload, ProgressPayload, QuizScorePayload,
        StatisticsPayload, UpdateCurrentLessonBody,
    },
    names,
    rejections::{AppError, ResultExt},
    services, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::PROGRESS_URL, get(all_progress))
        .route(names::STATISTICS_URL, get(statistics))
        .route(
            "/progress/course/{course_id}",
            get(course_progress).put(update_current_lesson),
        )
        .route("/progress/course/{course_id}/certificate", get(certificate))
        .route("/progress/course/{course_id}/notes", post(add_note))
        .route("/progress/course/{course_id}/bookmarks", post(add_bookmark))
        .route(
            "/progress/course/{course_id}/bookmarks/{bookmark_id}",
            delete(remove_bookmark),
        )
}

/// Assemble the full progress document: the progress row populated with
/// course and lesson summaries, completion entries, and quiz scores.
pub(crate) async fn progress_payload(
    db: &Db,
    progress: ProgressRow,
) -> Result<ProgressPayload, AppError> {
    let course = db
        .course_brief(progress.course_id)
        .await
        .reject("could not get course summary")?
        .map(|c| CourseBrief {
            id: c.id,
            title: c.title,
            title_ar: c.title_ar,
            total_lessons: c.total_lessons,
        });

    let current_lesson = match progress.current_lesson_id {
        Some(lesson_id) => db
            .lesson_brief(lesson_id)
            .await
            .reject("could not get lesson summary")?
            .map(|l| LessonBrief {
                id: l.id,
                title: l.title,
                title_ar: l.title_ar,
                lesson_type: l.lesson_type,
            }),
        None => None,
    };

    let completed_lessons = db
        .completed_lessons(progress.id)
        .await
        .reject("could not get completed lessons")?
        .into_iter()
        .map(|cl| CompletedLessonPayload {
            lesson: match (cl.title, cl.title_ar, cl.lesson_type) {
                (Some(title), Some(title_ar), Some(lesson_type)) => Some(LessonBrief {
                    id: cl.lesson_id,
                    title,
                    title_ar,
                    lesson_type,
                }),
                _ => None,
            },
            completed_at: cl.completed_at,
            score: cl.score,
            time_spent: cl.time_spent,
        })
        .collect();

    let quiz_scores = db
        .quiz_scores(progress.id)
        .await
        .reject("could not get quiz scores")?
        .into_iter()
        .map(|qs| QuizScorePayload {
            lesson: qs.lesson_id,
            score: qs.score,
            max_score: qs.max_score,
            attempts: qs.attempts,
            last_attempt: qs.last_attempt,
            passed: qs.passed,
        })
        .collect();

    let total_time_spent = db
        .total_time_spent(progress.id)
        .await
        .reject("could not get time spent")?;

    Ok(ProgressPayload {
        id: progress.id,
        user: progress.user_id,
        course,
        current_lesson,
        completed_lessons,
        overall_progress: progress.overall_progress,
        quiz_scores,
        streak_days: progress.streak_days,
        total_time_spent,
        started_at: progress.started_at,
        completed_at: progress.completed_at,
        last_accessed_at: progress.last_accessed_at,
        certificate_issued: progress.certificate_issued,
        certificate_issued_at: progress.certificate_issued_at,
        certificate_url: progress.certificate_url,
    })
}

async fn require_progress(
    db: &Db,
    user_id: i64,
    course_id: i64,
) -> Result<ProgressRow, AppError> {
    db.find_progress(user_id, course_id)
        .await
        .reject("could not look up progress")?
        .ok_or(AppError::ProgressNotFound)
}

async fn all_progress(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state
        .db
        .all_progress(user.id)
        .await
        .reject("could not list progress")?;

    let mut payloads = Vec::with_capacity(rows.len());
    for row in rows {
        payloads.push(progress_payload(&state.db, row).await?);
    }

    Ok(models::list(payloads))
}

async fn course_progress(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let progress = require_progress(&state.db, user.id, course_id).await?;
    let payload = progress_payload(&state.db, progress).await?;
    Ok(models::data(payload))
}

async fn update_current_lesson(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(body): Json<UpdateCurrentLessonBody>,
) -> Result<impl IntoResponse, AppError> {
    let progress = require_progress(&state.db, user.id, course_id).await?;

    state
        .db
        .set_current_lesson(progress.id, body.lesson_id, Utc::now())
        .await
        .reject("could not update current lesson")?;

    let progress = state
        .db
        .get_progress(progress.id)
        .await
        .reject("could not get progress")?;
    let payload = progress_payload(&state.db, progress).await?;
    Ok(models::data(payload))
}

/// Aggregate learning statistics across every course the user is enrolled
/// in. The streak reported is the longest current per-course streak.
async fn statistics(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state
        .db
        .progress_stats(user.id)
        .await
        .reject("could not get statistics")?;

    let mut stats = StatisticsPayload {
        total_courses: rows.len() as i64,
        completed_courses: 0,
        in_progress_courses: 0,
        total_lessons_completed: 0,
        total_time_spent: 0,
        average_progress: 0,
        current_streak: 0,
    };

    let mut progress_sum = 0;
    for row in &rows {
        if row.overall_progress == 100 {
            stats.completed_courses += 1;
        } else if row.overall_progress > 0 {
            stats.in_progress_courses += 1;
        }

        stats.total_lessons_completed += row.lessons_completed;
        stats.total_time_spent += row.time_spent;
        progress_sum += row.overall_progress;

        if row.streak_days > stats.current_streak {
            stats.current_streak = row.streak_days;
        }
    }

    if !rows.is_empty() {
        stats.average_progress =
            (progress_sum as f64 / rows.len() as f64).round() as i64;
    }

    Ok(models::data(stats))
}

/// Issue (or re-read) the course certificate. Issuance requires full
/// completion, an available certificate, and a quiz average at or above the
/// course minimum; the first successful call stamps the record and every
/// later call returns the same data.
async fn certificate(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let progress = require_progress(&state.db, user.id, course_id).await?;

    if progress.overall_progress < 100 {
        return Err(AppError::CourseNotCompleted);
    }

    let course = state
        .db
        .get_course(course_id)
        .await
        .reject("could not get course")?
        .ok_or(AppError::CourseNotFound)?;

    if !course.certificate_available {
        return Err(AppError::CertificateUnavailable);
    }

    let scores = state
        .db
        .quiz_score_values(progress.id)
        .await
        .reject("could not get quiz scores")?;

    // No quiz data means ineligible, never a vacuous pass.
    let average = services::progress::average_quiz_score(&scores).ok_or(
        AppError::ScoreTooLow {
            minimum: course.certificate_minimum_score,
        },
    )?;

    if average < course.certificate_minimum_score as f64 {
        return Err(AppError::ScoreTooLow {
            minimum: course.certificate_minimum_score,
        });
    }

    if !progress.certificate_issued {
        state
            .db
            .stamp_certificate(progress.id, Utc::now())
            .await
            .reject("could not issue certificate")?;
    }

    let progress = state
        .db
        .get_progress(progress.id)
        .await
        .reject("could not get progress")?;

    let certificate_url = progress
        .certificate_url
        .ok_or(AppError::Internal("certificate url missing after issue"))?;
    let issued_at = progress
        .certificate_issued_at
        .ok_or(AppError::Internal("certificate date missing after issue"))?;

    Ok(models::data(CertificatePayload {
        certificate_url,
        issued_at,
        course_name: course.title,
        course_name_ar: course.title_ar,
        user_name: user.display_name,
        completed_at: progress.completed_at,
    }))
}

async fn add_note(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(body): Json<AddNoteBody>,
) -> Result<impl IntoResponse, AppError> {
    if body.content.trim().is_empty() {
        return Err(AppError::Input("error.empty_fields"));
    }

    let progress = require_progress(&state.db, user.id, course_id).await?;

    state
        .db
        .upsert_note(progress.id, body.lesson_id, &body.content, Utc::now())
        .await
        .reject("could not save note")?;

    let notes = state
        .db
        .notes(progress.id)
        .await
        .reject("could not list notes")?
        .into_iter()
        .map(|n| NotePayload {
            id: n.id,
            lesson: n.lesson_id,
            content: n.content,
            created_at: n.created_at,
            updated_at: n.updated_at,
        })
        .collect::<Vec<_>>();

    Ok(models::list(notes))
}

async fn add_bookmark(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(body): Json<AddBookmarkBody>,
) -> Result<impl IntoResponse, AppError> {
    let progress = require_progress(&state.db, user.id, course_id).await?;

    state
        .db
        .add_bookmark(
            progress.id,
            body.lesson_id,
            body.timestamp,
            body.note.as_deref(),
            Utc::now(),
        )
        .await
        .reject("could not add bookmark")?;

    let bookmarks = bookmark_payloads(&state.db, progress.id).await?;
    Ok((StatusCode::CREATED, models::list(bookmarks)))
}

async fn remove_bookmark(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path((course_id, bookmark_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let progress = require_progress(&state.db, user.id, course_id).await?;

    let removed = state
        .db
        .delete_bookmark(progress.id, bookmark_id)
        .await
        .reject("could not delete bookmark")?;
    if !removed {
        return Err(AppError::BookmarkNotFound);
    }

    let bookmarks = bookmark_payloads(&state.db, progress.id).await?;
    Ok(models::list(bookmarks))
}

async fn bookmark_payloads(db: &Db, progress_id: i64) -> Result<Vec<BookmarkPayload>, AppError> {
    let bookmarks = db
        .bookmarks(progress_id)
        .await
        .reject("could not list bookmarks")?
        .into_iter()
        .map(|b| BookmarkPayload {
            id: b.id,
            lesson: b.lesson_id,
            timestamp: b.position_secs,
            note: b.note,
            created_at: b.created_at,
        })
        .collect();

    Ok(bookmarks)
}
