use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use server::auth::session::{generate_token, hash_token};
use shared_types::UserRole;

use crate::common::{
    create_user_with_session, get_authed, post_json, request, send, send_with_headers, test_app,
};

fn session_cookie(headers: &axum::http::HeaderMap) -> String {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("estate_session="))
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string()
}

fn with_cookie(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn register_login_me_logout_round_trip() {
    let (app, _pool, _guard) = test_app().await;

    let body = json!({
        "email": "Probate.Client@Example.test",
        "password": "hunter2hunter2",
        "first_name": "Pat",
        "last_name": "Lee"
    });
    let (status, headers, response) =
        send_with_headers(&app, request("POST", "/api/register", Some(&body), None)).await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    assert_eq!(response["message"], "Registration successful");
    assert_eq!(response["user"]["email"], "probate.client@example.test");
    assert_eq!(response["user"]["role"], "client");
    assert!(response["user"].get("password_hash").is_none());
    let registered_cookie = session_cookie(&headers);

    let (status, _, me) = send_with_headers(&app, with_cookie("GET", "/api/me", &registered_cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["first_name"], "Pat");

    let login = json!({ "email": "PROBATE.CLIENT@example.test", "password": "hunter2hunter2" });
    let (status, headers, response) =
        send_with_headers(&app, request("POST", "/api/login", Some(&login), None)).await;
    assert_eq!(status, StatusCode::OK, "{response}");
    assert_eq!(response["message"], "Login successful");
    let login_cookie = session_cookie(&headers);
    assert_ne!(login_cookie, registered_cookie);

    let (status, headers, response) =
        send_with_headers(&app, with_cookie("POST", "/api/logout", &login_cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Logout successful");
    let cleared = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cleared.contains("Max-Age=0"), "{cleared}");

    // The logged-out session is gone; the registration session still works.
    let (status, _) = send(&app, with_cookie("GET", "/api/me", &login_cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, with_cookie("GET", "/api/me", &registered_cookie)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let (app, _pool, _guard) = test_app().await;

    let body = json!({ "email": "dup@example.test", "password": "longenough" });
    let (status, _) = post_json(&app, "/api/register", &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let again = json!({ "email": "DUP@example.test", "password": "longenough" });
    let (status, response) = post_json(&app, "/api/register", &again).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Email already registered");
}

#[tokio::test]
async fn register_ignores_requested_role() {
    let (app, _pool, _guard) = test_app().await;

    let body = json!({
        "email": "sneaky@example.test",
        "password": "longenough",
        "role": "super_admin"
    });
    let (status, response) = post_json(&app, "/api/register", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["user"]["role"], "client");
}

#[tokio::test]
async fn register_validates_email_and_password() {
    let (app, _pool, _guard) = test_app().await;

    let (status, response) =
        post_json(&app, "/api/register", &json!({ "email": "not-an-email", "password": "longenough" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response["field_errors"]["email"].is_string());

    let (status, response) =
        post_json(&app, "/api/register", &json!({ "email": "short@example.test", "password": "abc" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response["field_errors"]["password"].is_string());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let (app, _pool, _guard) = test_app().await;

    let body = json!({ "email": "known@example.test", "password": "longenough" });
    let (status, _) = post_json(&app, "/api/register", &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, wrong_password) = post_json(
        &app,
        "/api/login",
        &json!({ "email": "known@example.test", "password": "not-the-one" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown) = post_json(
        &app,
        "/api/login",
        &json!({ "email": "nobody@example.test", "password": "longenough" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], "Invalid email or password");
    assert_eq!(wrong_password, unknown);
}

#[tokio::test]
async fn bearer_token_is_accepted_when_no_cookie() {
    let (app, pool, _guard) = test_app().await;
    let (id, token) =
        crate::common::create_user_with_session(&pool, "bearer@example.test", shared_types::UserRole::Client).await;

    let (status, me) = crate::common::get_authed(&app, "/api/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);

    let (status, _) = crate::common::get_authed(&app, "/api/me", "not-a-real-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_sessions_are_ignored_and_purged() {
    let (app, pool, _guard) = test_app().await;
    let (user_id, live) =
        create_user_with_session(&pool, "heir@example.test", UserRole::Client).await;

    let expired = generate_token();
    server::repo::session::create(
        &pool,
        user_id,
        &hash_token(&expired),
        chrono::Utc::now() - chrono::Duration::hours(1),
    )
    .await
    .expect("Failed to create expired session");

    let (status, response) = get_authed(&app, "/api/me", &expired).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["error"], "Authentication required");

    let (status, me) = get_authed(&app, "/api/me", &live).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "heir@example.test");

    let purged = server::repo::session::delete_expired(&pool).await.unwrap();
    assert_eq!(purged, 1);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 1);

    let (status, _) = get_authed(&app, "/api/me", &live).await;
    assert_eq!(status, StatusCode::OK);
}
