rust_i18n::i18n!("locales", fallback = "en");

pub mod db;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod utils;

use axum::Router;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::auth::routes())
        .merge(handlers::course::routes())
        .merge(handlers::lesson::routes())
        .merge(handlers::progress::routes())
        .with_state(state)
}
