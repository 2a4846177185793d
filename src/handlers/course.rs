use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rust_i18n::t;
use serde_json::json;

use crate::{
    db::models::CourseRow,
    extractors::AuthGuard,
    models::{self, CertificateInfo, CoursePayload, CreateCourseBody},
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::COURSES_URL, get(list_courses).post(create_course))
        .route(names::ENROLLED_COURSES_URL, get(enrolled_courses))
        .route("/courses/{id}", get(get_course))
        .route("/courses/{id}/enroll", post(enroll))
}

pub(crate) fn course_payload(course: CourseRow) -> CoursePayload {
    CoursePayload {
        id: course.id,
        title: course.title,
        title_ar: course.title_ar,
        description: course.description,
        description_ar: course.description_ar,
        is_free: course.price == 0,
        price: course.price,
        currency: course.currency,
        total_lessons: course.total_lessons,
        certificate: CertificateInfo {
            is_available: course.certificate_available,
            minimum_score: course.certificate_minimum_score,
        },
        number_of_enrollments: course.num_enrollments,
    }
}

async fn list_courses(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let courses = state.db.courses().await.reject("could not list courses")?;

    Ok(models::list(
        courses.into_iter().map(course_payload).collect(),
    ))
}

async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course = state
        .db
        .get_course(course_id)
        .await
        .reject("could not get course")?
        .ok_or(AppError::CourseNotFound)?;

    Ok(models::data(course_payload(course)))
}

async fn create_course(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<CreateCourseBody>,
) -> Result<impl IntoResponse, AppError> {
    if user.role != names::ROLE_INSTRUCTOR && user.role != names::ROLE_ADMIN {
        return Err(AppError::Forbidden);
    }

    if body.title.trim().is_empty() || body.title_ar.trim().is_empty() {
        return Err(AppError::Input("error.empty_fields"));
    }

    let course_id = state
        .db
        .create_course(&body, user.id)
        .await
        .reject("could not create course")?;

    let course = state
        .db
        .get_course(course_id)
        .await
        .reject("could not get course")?
        .ok_or(AppError::Internal("created course missing"))?;

    Ok((StatusCode::CREATED, models::data(course_payload(course))))
}

async fn enrolled_courses(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let courses = state
        .db
        .enrolled_courses(user.id)
        .await
        .reject("could not list enrolled courses")?;

    Ok(models::list(
        courses.into_iter().map(course_payload).collect(),
    ))
}

/// Free courses enroll directly, creating the progress record. Priced
/// courses are handed off to the payment flow instead.
async fn enroll(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course = state
        .db
        .get_course(course_id)
        .await
        .reject("could not get course")?
        .ok_or(AppError::CourseNotFound)?;

    if state
        .db
        .is_enrolled(user.id, course_id)
        .await
        .reject("could not check enrollment")?
    {
        return Err(AppError::AlreadyEnrolled);
    }

    if course.price > 0 {
        return Err(AppError::PaymentRequired {
            course_id: course.id,
            price: course.price,
            currency: course.currency,
        });
    }

    state
        .db
        .create_progress(user.id, course_id, Utc::now())
        .await
        .reject("could not create progress")?;

    tracing::info!("user {} enrolled in course {course_id}", user.id);

    Ok(Json(json!({
        "success": true,
        "message": t!("message.enrolled", locale = "en"),
        "messageAr": t!("message.enrolled", locale = "ar"),
        "course": {
            "id": course.id,
            "title": course.title,
            "titleAr": course.title_ar,
        },
    })))
}
