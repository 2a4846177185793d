mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::create_test_db;
use manara::{names, router, AppState};
use tower::ServiceExt;

async fn app() -> axum::Router {
    let db = create_test_db().await;
    router(AppState {
        db,
        secure_cookies: false,
    })
}

#[tokio::test]
async fn protected_routes_reject_requests_without_a_session_cookie() {
    let app = app().await;

    let cases = [
        (Method::GET, "/auth/me"),
        (Method::GET, "/courses/enrolled"),
        (Method::POST, "/courses/1/enroll"),
        (Method::POST, "/courses"),
        (Method::POST, "/lessons"),
        (Method::GET, "/lessons/1"),
        (Method::DELETE, "/lessons/1"),
        (Method::POST, "/lessons/1/complete"),
        (Method::POST, "/lessons/1/quiz/submit"),
        (Method::GET, "/progress"),
        (Method::GET, "/progress/statistics"),
        (Method::GET, "/progress/course/1"),
        (Method::PUT, "/progress/course/1"),
        (Method::GET, "/progress/course/1/certificate"),
        (Method::POST, "/progress/course/1/notes"),
        (Method::POST, "/progress/course/1/bookmarks"),
        (Method::DELETE, "/progress/course/1/bookmarks/1"),
    ];

    for (method, uri) in cases {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .expect("request build should succeed");

        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "expected UNAUTHORIZED for {uri}",
        );
    }
}

#[tokio::test]
async fn public_catalog_routes_do_not_require_a_session() {
    let db = create_test_db().await;
    let instructor = common::create_instructor(&db).await;
    let course_id = common::create_course(&db, instructor, 0, 70).await;
    let app = router(AppState {
        db,
        secure_cookies: false,
    });

    for uri in [
        "/courses".to_owned(),
        format!("/courses/{course_id}"),
        format!("/lessons/course/{course_id}"),
    ] {
        let req = Request::builder()
            .method(Method::GET)
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "expected OK for {uri}");
    }
}

#[tokio::test]
async fn a_session_cookie_from_login_is_accepted() {
    let db = create_test_db().await;
    db.create_user("user@example.com", "password123", "User", names::ROLE_STUDENT)
        .await
        .expect("create user");
    let app = router(AppState {
        db,
        secure_cookies: false,
    });

    let login = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email": "user@example.com", "password": "password123"}"#,
        ))
        .unwrap();
    let resp = app.clone().oneshot(login).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_owned();

    let me = Request::builder()
        .method(Method::GET)
        .uri("/auth/me")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(me).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let db = create_test_db().await;
    db.create_user("user2@example.com", "password123", "User", names::ROLE_STUDENT)
        .await
        .expect("create user");
    let app = router(AppState {
        db,
        secure_cookies: false,
    });

    let login = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email": "user2@example.com", "password": "nope"}"#,
        ))
        .unwrap();
    let resp = app.clone().oneshot(login).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn students_cannot_create_courses() {
    let db = create_test_db().await;
    db.create_user("student@example.com", "password123", "Student", names::ROLE_STUDENT)
        .await
        .expect("create user");
    let app = router(AppState {
        db,
        secure_cookies: false,
    });

    let login = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email": "student@example.com", "password": "password123"}"#,
        ))
        .unwrap();
    let resp = app.clone().oneshot(login).await.unwrap();
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_owned();

    let create = Request::builder()
        .method(Method::POST)
        .uri("/courses")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from(r#"{"title": "X", "titleAr": "س"}"#))
        .unwrap();
    let resp = app.clone().oneshot(create).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
