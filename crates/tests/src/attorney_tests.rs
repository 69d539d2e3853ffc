use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use shared_types::UserRole;

use crate::common::{
    create_attorney, create_user_with_session, delete_authed, get_authed, patch_json_authed,
    post_json_authed, test_app,
};

fn attorney(first: &str, last: &str, state: &str, specialties: &[&str]) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "email": format!("{}@lawfirm.test", first.to_lowercase()),
        "phone": "555-0100",
        "state": state,
        "specialties": specialties,
    })
}

fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn attorney_roster_is_staff_only() {
    let (app, pool, _guard) = test_app().await;
    let (_, client) = create_user_with_session(&pool, "client@example.test", UserRole::Client).await;

    let (status, _) = get_authed(&app, "/api/attorneys", &client).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        post_json_authed(&app, "/api/attorneys", &attorney("Ada", "Byron", "TX", &[]), &client).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_and_read_attorney() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;

    let (status, response) = post_json_authed(
        &app,
        "/api/attorneys",
        &attorney("Ada", "Byron", "TX", &["probate", " trusts "]),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    assert_eq!(response["message"], "Attorney created successfully");
    let id = response["attorney_id"].as_i64().unwrap();

    let (status, found) = get_authed(&app, &format!("/api/attorneys/{}", id), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["name"], "Ada Byron");
    assert_eq!(found["specialties"], json!(["probate", "trusts"]));
    assert_eq!(found["is_active"], true);

    let (status, response) = get_authed(&app, "/api/attorneys/99999", &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Attorney 99999 not found");
}

#[tokio::test]
async fn create_requires_names_and_valid_email() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;

    let (status, response) = post_json_authed(
        &app,
        "/api/attorneys",
        &json!({ "first_name": "", "last_name": "Byron", "email": "nope" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response["field_errors"]["first_name"].is_string());
    assert!(response["field_errors"]["email"].is_string());
}

#[tokio::test]
async fn list_filters_by_state_and_exact_specialty() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;

    create_attorney(&app, &admin, attorney("Ada", "Byron", "TX", &["probate", "trusts"])).await;
    create_attorney(&app, &admin, attorney("Ben", "Cole", "TX", &["litigation"])).await;
    create_attorney(&app, &admin, attorney("Cy", "Avery", "CA", &["probate"])).await;
    let retired = create_attorney(&app, &admin, attorney("Dee", "Dunn", "TX", &["probate"])).await;

    let (status, _) = patch_json_authed(
        &app,
        &format!("/api/attorneys/{}", retired),
        &json!({ "is_active": false }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, all) = get_authed(&app, "/api/attorneys", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&all), vec!["Cy Avery", "Ada Byron", "Ben Cole"]);

    let (_, texas) = get_authed(&app, "/api/attorneys?state=TX", &admin).await;
    assert_eq!(names(&texas), vec!["Ada Byron", "Ben Cole"]);

    let (_, probate) = get_authed(&app, "/api/attorneys?specialty=probate", &admin).await;
    assert_eq!(names(&probate), vec!["Cy Avery", "Ada Byron"]);

    let (_, partial) = get_authed(&app, "/api/attorneys?specialty=prob", &admin).await;
    assert_eq!(names(&partial), Vec::<String>::new());

    let (_, both) = get_authed(&app, "/api/attorneys?state=TX&specialty=trusts", &admin).await;
    assert_eq!(names(&both), vec!["Ada Byron"]);

    // Inactive attorneys stay readable by id.
    let (status, found) = get_authed(&app, &format!("/api/attorneys/{}", retired), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["is_active"], false);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;
    let id = create_attorney(&app, &admin, attorney("Ada", "Byron", "TX", &["probate"])).await;
    let uri = format!("/api/attorneys/{}", id);

    let (status, updated) = patch_json_authed(
        &app,
        &uri,
        &json!({ "state": "NM", "specialties": ["estate planning", "probate"] }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["state"], "NM");
    assert_eq!(updated["first_name"], "Ada");
    assert_eq!(updated["phone"], "555-0100");
    assert_eq!(updated["specialties"], json!(["estate planning", "probate"]));

    let (status, response) = patch_json_authed(&app, &uri, &json!({ "last_name": "  " }), &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "last_name cannot be empty");

    let (status, _) = patch_json_authed(&app, "/api/attorneys/99999", &json!({ "state": "NM" }), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn null_clears_phone_and_state() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;
    let id = create_attorney(&app, &admin, attorney("Ada", "Byron", "TX", &["probate"])).await;
    let uri = format!("/api/attorneys/{}", id);

    let (status, updated) =
        patch_json_authed(&app, &uri, &json!({ "phone": null }), &admin).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert!(updated["phone"].is_null());
    assert_eq!(updated["state"], "TX");

    let (status, updated) =
        patch_json_authed(&app, &uri, &json!({ "state": null }), &admin).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert!(updated["state"].is_null());
    assert!(updated["phone"].is_null());
    assert_eq!(updated["first_name"], "Ada");
}

#[tokio::test]
async fn delete_attorney() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;
    let id = create_attorney(&app, &admin, attorney("Ada", "Byron", "TX", &[])).await;
    let uri = format!("/api/attorneys/{}", id);

    let (status, response) = delete_authed(&app, &uri, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Attorney deleted successfully");

    let (status, _) = get_authed(&app, &uri, &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete_authed(&app, &uri, &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
