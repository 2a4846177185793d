use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use rust_i18n::t;
use serde_json::json;

use crate::{
    db::models::AuthUser,
    extractors::AuthGuard,
    models::{self, LoginBody, RegisterBody, UserPayload},
    names,
    rejections::{AppError, ResultExt},
    utils, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::REGISTER_URL, post(register))
        .route(names::LOGIN_URL, post(login))
        .route(names::LOGOUT_URL, post(logout))
        .route(names::ME_URL, get(me))
}

fn user_payload(user: AuthUser) -> UserPayload {
    UserPayload {
        id: user.id,
        name: user.display_name,
        email: user.email,
        role: user.role,
    }
}

fn session_headers(state: &AppState, session: &str) -> HeaderMap {
    let cookie = utils::cookie(names::USER_SESSION_COOKIE_NAME, session, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie.parse().unwrap());
    headers
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(AppError::Input("error.empty_fields"));
    }

    if state
        .db
        .email_exists(&email)
        .await
        .reject("could not check email")?
    {
        return Err(AppError::EmailTaken);
    }

    let user_id = state
        .db
        .create_user(&email, &body.password, name, names::ROLE_STUDENT)
        .await
        .reject("could not create user")?;

    let session = state
        .db
        .create_user_session(user_id)
        .await
        .reject("could not create session")?;

    let user = AuthUser {
        id: user_id,
        email,
        display_name: name.to_owned(),
        role: names::ROLE_STUDENT.to_owned(),
    };

    Ok((
        session_headers(&state, &session),
        models::data(user_payload(user)),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let email = body.email.trim().to_lowercase();

    let valid = state
        .db
        .verify_user_password(&email, &body.password)
        .await
        .reject("could not verify password")?;

    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let user = state
        .db
        .find_user_by_email(&email)
        .await
        .reject("could not look up user")?
        .ok_or(AppError::InvalidCredentials)?;

    let session = state
        .db
        .create_user_session(user.id)
        .await
        .reject("could not create session")?;

    Ok((
        session_headers(&state, &session),
        models::data(user_payload(user)),
    ))
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session) = jar.get(names::USER_SESSION_COOKIE_NAME) {
        state
            .db
            .delete_user_session(session.value())
            .await
            .reject("could not delete session")?;
    }

    let cookie = utils::clear_cookie(names::USER_SESSION_COOKIE_NAME, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie.parse().unwrap());

    Ok((
        headers,
        Json(json!({
            "success": true,
            "message": t!("message.logged_out", locale = "en"),
            "messageAr": t!("message.logged_out", locale = "ar"),
        })),
    ))
}

async fn me(AuthGuard(user): AuthGuard) -> impl IntoResponse {
    models::data(user_payload(user))
}
