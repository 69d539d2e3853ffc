use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use shared_types::UserRole;

use crate::common::{
    create_attorney, create_state_limit, create_submission, create_user_with_session,
    delete_authed, get_authed, patch_json_authed, test_app,
};

fn attorney_body() -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Counsel",
        "email": "ada@lawfirm.test",
        "state": "TX",
        "specialties": ["probate"]
    })
}

#[tokio::test]
async fn owner_edit_reclassifies_and_replaces_form_data() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;

    let (id, referral) = create_submission(
        &app,
        json!({ "decedent_state": "TX", "estate_value": 20000.0, "decedent_first_name": "Ann" }),
        Some(&owner),
    )
    .await;
    assert_eq!(referral, "affidavit");
    let uri = format!("/api/submissions/{}", id);

    let patch = json!({ "estate_value": 80000.0, "favorite_color": "green" });
    let (status, response) = patch_json_authed(&app, &uri, &patch, &owner).await;
    assert_eq!(status, StatusCode::OK, "{response}");
    assert_eq!(response["message"], "Submission updated successfully");
    assert_eq!(response["referral_type"], "informal");

    let (_, detail) = get_authed(&app, &uri, &owner).await;
    assert_eq!(detail["referral_type"], "informal");
    assert_eq!(detail["decedent_first_name"], "Ann");
    assert_eq!(detail["decedent_state"], "TX");
    assert_eq!(detail["form_data"]["favorite_color"], "green");
    assert!(detail["form_data"].get("decedent_first_name").is_none());

    let (status, response) =
        patch_json_authed(&app, &uri, &json!({ "has_trust": true }), &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["referral_type"], "trust");
}

#[tokio::test]
async fn null_clears_a_field() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;
    create_state_limit(&app, &admin, "CA", 184_500.0).await;

    let (id, referral) = create_submission(
        &app,
        json!({ "decedent_state": "CA", "estate_value": 100000.0 }),
        Some(&owner),
    )
    .await;
    assert_eq!(referral, "affidavit");
    let uri = format!("/api/submissions/{}", id);

    // Without a state the default threshold applies again.
    let (status, response) =
        patch_json_authed(&app, &uri, &json!({ "decedent_state": null }), &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["referral_type"], "informal");

    let (_, detail) = get_authed(&app, &uri, &owner).await;
    assert_eq!(detail["decedent_state"], Value::Null);
}

#[tokio::test]
async fn empty_patch_changes_nothing() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;

    let (id, _) = create_submission(&app, json!({ "has_disputes": true }), Some(&owner)).await;
    let uri = format!("/api/submissions/{}", id);

    let (status, response) = patch_json_authed(&app, &uri, &json!({}), &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["referral_type"], "formal");

    let (_, detail) = get_authed(&app, &uri, &owner).await;
    assert_eq!(detail["form_data"]["has_disputes"], true);
}

#[tokio::test]
async fn clients_cannot_touch_staff_fields() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;

    let (id, _) = create_submission(&app, json!({ "estate_value": 10.0 }), Some(&owner)).await;
    let uri = format!("/api/submissions/{}", id);

    for patch in [
        json!({ "status": "completed" }),
        json!({ "notes": "looks fine" }),
        json!({ "attorney_id": null }),
        json!({ "estate_value": 99999999.0, "status": "completed" }),
    ] {
        let (status, response) = patch_json_authed(&app, &uri, &patch, &owner).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{patch}");
        assert_eq!(response["error"], "Admin access required");
    }

    // Rejected patches leave the row untouched.
    let (_, detail) = get_authed(&app, &uri, &owner).await;
    assert_eq!(detail["estate_value"], 10.0);
    assert_eq!(detail["status"], "submitted");
}

#[tokio::test]
async fn strangers_cannot_patch() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;
    let (_, stranger) = create_user_with_session(&pool, "stranger@example.test", UserRole::Client).await;

    let (id, _) = create_submission(&app, json!({}), Some(&owner)).await;
    let (status, _) = patch_json_authed(
        &app,
        &format!("/api/submissions/{}", id),
        &json!({ "estate_value": 1.0 }),
        &stranger,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_workflow_updates() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "staff@example.test", UserRole::Admin).await;

    let (id, _) = create_submission(&app, json!({ "estate_value": 10.0 }), None).await;
    let uri = format!("/api/submissions/{}", id);

    let (status, response) =
        patch_json_authed(&app, &uri, &json!({ "status": "archived" }), &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().starts_with("Invalid status"));

    let (status, response) =
        patch_json_authed(&app, &uri, &json!({ "attorney_id": 987654 }), &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Attorney not found");

    let attorney_id = create_attorney(&app, &admin, attorney_body()).await;
    let (status, response) = patch_json_authed(
        &app,
        &uri,
        &json!({ "status": "assigned", "attorney_id": attorney_id, "notes": "called family" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{response}");
    assert_eq!(response["referral_type"], "affidavit");

    let (_, detail) = get_authed(&app, &uri, &admin).await;
    assert_eq!(detail["status"], "assigned");
    assert_eq!(detail["attorney_id"], attorney_id);
    assert_eq!(detail["notes"], "called family");

    // Staff edits to client fields go through classification too.
    let (status, response) =
        patch_json_authed(&app, &uri, &json!({ "has_disputes": true }), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["referral_type"], "formal");

    let (status, _) = delete_authed(&app, &format!("/api/attorneys/{}", attorney_id), &admin).await;
    assert_eq!(status, StatusCode::OK);
    let (_, detail) = get_authed(&app, &uri, &admin).await;
    assert_eq!(detail["attorney_id"], Value::Null);
    assert_eq!(detail["status"], "assigned");
}

#[tokio::test]
async fn bad_client_values_are_rejected_on_patch() {
    let (app, pool, _guard) = test_app().await;
    let (_, owner) = create_user_with_session(&pool, "owner@example.test", UserRole::Client).await;

    let (id, _) = create_submission(&app, json!({}), Some(&owner)).await;
    let uri = format!("/api/submissions/{}", id);

    let (status, _) = patch_json_authed(
        &app,
        &uri,
        &json!({ "decedent_date_of_death": "yesterday" }),
        &owner,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = patch_json_authed(&app, &uri, &json!({ "estate_value": -5.0 }), &owner).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
