use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_i18n::t;
use serde_json::json;

/// Every way a request can fail. Renders as a JSON body with the message in
/// both platform languages and the matching HTTP status.
#[derive(Debug)]
pub enum AppError {
    CourseNotFound,
    LessonNotFound,
    QuizNotFound,
    ProgressNotFound,
    BookmarkNotFound,
    NotEnrolled,
    CourseNotCompleted,
    CertificateUnavailable,
    ScoreTooLow {
        minimum: i64,
    },
    AlreadyEnrolled,
    PaymentRequired {
        course_id: i64,
        price: i64,
        currency: String,
    },
    Unauthorized,
    Forbidden,
    InvalidCredentials,
    EmailTaken,
    /// Bad request body; carries the locale key of the specific message.
    Input(&'static str),
    /// Unexpected failure; carries internal context for the log only.
    Internal(&'static str),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::CourseNotFound
            | AppError::LessonNotFound
            | AppError::QuizNotFound
            | AppError::ProgressNotFound
            | AppError::BookmarkNotFound => StatusCode::NOT_FOUND,
            AppError::NotEnrolled | AppError::Unauthorized | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::CourseNotCompleted
            | AppError::CertificateUnavailable
            | AppError::ScoreTooLow { .. }
            | AppError::AlreadyEnrolled
            | AppError::EmailTaken
            | AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::PaymentRequired { .. } => StatusCode::PAYMENT_REQUIRED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> &str {
        match self {
            AppError::CourseNotFound => "error.course_not_found",
            AppError::LessonNotFound => "error.lesson_not_found",
            AppError::QuizNotFound => "error.quiz_not_found",
            AppError::ProgressNotFound => "error.progress_not_found",
            AppError::BookmarkNotFound => "error.bookmark_not_found",
            AppError::NotEnrolled => "error.not_enrolled",
            AppError::CourseNotCompleted => "error.course_not_completed",
            AppError::CertificateUnavailable => "error.certificate_unavailable",
            AppError::ScoreTooLow { .. } => "error.score_too_low",
            AppError::AlreadyEnrolled => "error.already_enrolled",
            AppError::PaymentRequired { .. } => "error.payment_required",
            AppError::Unauthorized => "error.unauthorized",
            AppError::Forbidden => "error.forbidden",
            AppError::InvalidCredentials => "error.invalid_credentials",
            AppError::EmailTaken => "error.email_taken",
            AppError::Input(key) => key,
            AppError::Internal(_) => "error.internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let key = self.message_key();

        let (error, error_ar) = match &self {
            AppError::ScoreTooLow { minimum } => (
                t!(key, locale = "en", minimum = minimum).into_owned(),
                t!(key, locale = "ar", minimum = minimum).into_owned(),
            ),
            _ => (
                t!(key, locale = "en").into_owned(),
                t!(key, locale = "ar").into_owned(),
            ),
        };

        let mut body = json!({
            "success": false,
            "error": error,
            "errorAr": error_ar,
        });

        match &self {
            AppError::ScoreTooLow { minimum } => {
                body["minimumScore"] = json!(minimum);
            }
            AppError::PaymentRequired {
                course_id,
                price,
                currency,
            } => {
                body["courseId"] = json!(course_id);
                body["price"] = json!(price);
                body["currency"] = json!(currency);
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

/// Adapter for internal `Result`s at handler boundaries: log the underlying
/// error with context and map it to the generic variants.
pub trait ResultExt<T> {
    fn reject(self, context: &'static str) -> Result<T, AppError>;
    fn reject_input(self, key: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{context}: {e}");
            AppError::Internal(context)
        })
    }

    fn reject_input(self, key: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("input rejected ({key}): {e}");
            AppError::Input(key)
        })
    }
}
