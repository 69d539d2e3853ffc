use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::UserRole;

use crate::common::{
    create_submission, create_user_with_session, delete_authed, get_authed, patch_json_authed,
    test_app,
};

#[tokio::test]
async fn user_management_requires_super_admin() {
    let (app, pool, _guard) = test_app().await;
    let (_, admin) = create_user_with_session(&pool, "admin@example.test", UserRole::Admin).await;
    let (client_id, client) = create_user_with_session(&pool, "client@example.test", UserRole::Client).await;

    for token in [&admin, &client] {
        let (status, response) = get_authed(&app, "/api/users", token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(response["error"], "Super admin access required");
    }

    let (status, _) = patch_json_authed(
        &app,
        &format!("/api/users/{}", client_id),
        &json!({ "role": "admin" }),
        &admin,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn super_admin_lists_and_reads_users() {
    let (app, pool, _guard) = test_app().await;
    let (_, root) = create_user_with_session(&pool, "root@example.test", UserRole::SuperAdmin).await;
    let (client_id, _) = create_user_with_session(&pool, "client@example.test", UserRole::Client).await;

    let (status, users) = get_authed(&app, "/api/users", &root).await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let (status, user) = get_authed(&app, &format!("/api/users/{}", client_id), &root).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "client@example.test");
    assert_eq!(user["role"], "client");

    let (status, response) = get_authed(&app, "/api/users/999999", &root).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "User not found");
}

#[tokio::test]
async fn promote_client_to_admin_grants_staff_access() {
    let (app, pool, _guard) = test_app().await;
    let (_, root) = create_user_with_session(&pool, "root@example.test", UserRole::SuperAdmin).await;
    let (client_id, client) = create_user_with_session(&pool, "client@example.test", UserRole::Client).await;

    let (status, _) = get_authed(&app, "/api/submissions", &client).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, response) = patch_json_authed(
        &app,
        &format!("/api/users/{}", client_id),
        &json!({ "role": "admin" }),
        &root,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{response}");
    assert_eq!(response["message"], "User role updated successfully");
    assert_eq!(response["user"]["role"], "admin");

    // The existing session picks up the new role on the next request.
    let (status, _) = get_authed(&app, "/api/submissions", &client).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_role_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let (_, root) = create_user_with_session(&pool, "root@example.test", UserRole::SuperAdmin).await;
    let (client_id, _) = create_user_with_session(&pool, "client@example.test", UserRole::Client).await;

    for body in [json!({ "role": "owner" }), json!({})] {
        let (status, response) =
            patch_json_authed(&app, &format!("/api/users/{}", client_id), &body, &root).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().unwrap().starts_with("Invalid role"));
    }
}

#[tokio::test]
async fn super_admin_cannot_demote_self() {
    let (app, pool, _guard) = test_app().await;
    let (root_id, root) = create_user_with_session(&pool, "root@example.test", UserRole::SuperAdmin).await;
    create_user_with_session(&pool, "other-root@example.test", UserRole::SuperAdmin).await;

    let (status, response) = patch_json_authed(
        &app,
        &format!("/api/users/{}", root_id),
        &json!({ "role": "client" }),
        &root,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"], "Cannot change your own super admin role");

    // Re-asserting the same role is not a demotion.
    let (status, _) = patch_json_authed(
        &app,
        &format!("/api/users/{}", root_id),
        &json!({ "role": "super_admin" }),
        &root,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn super_admin_can_demote_another_super_admin() {
    let (app, pool, _guard) = test_app().await;
    let (_, root) = create_user_with_session(&pool, "root@example.test", UserRole::SuperAdmin).await;
    let (other_id, other) =
        create_user_with_session(&pool, "other-root@example.test", UserRole::SuperAdmin).await;

    let (status, response) = patch_json_authed(
        &app,
        &format!("/api/users/{}", other_id),
        &json!({ "role": "admin" }),
        &root,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{response}");
    assert_eq!(response["user"]["role"], "admin");

    let (status, _) = get_authed(&app, "/api/users", &other).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_user_rules() {
    let (app, pool, _guard) = test_app().await;
    let (root_id, root) = create_user_with_session(&pool, "root@example.test", UserRole::SuperAdmin).await;
    let (client_id, client) = create_user_with_session(&pool, "client@example.test", UserRole::Client).await;

    let (submission_id, _) = create_submission(&app, json!({ "estate_value": 1000.0 }), Some(&client)).await;

    let (status, response) = delete_authed(&app, &format!("/api/users/{}", root_id), &root).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"], "Cannot delete your own account");

    let (status, response) = delete_authed(&app, &format!("/api/users/{}", client_id), &root).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "User deleted successfully");

    // Owned submissions and sessions go with the user.
    let (status, _) = get_authed(&app, &format!("/api/submissions/{}", submission_id), &root).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_authed(&app, "/api/me", &client).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, response) = delete_authed(&app, &format!("/api/users/{}", client_id), &root).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "User not found");
}

#[tokio::test]
async fn concurrent_demotions_of_different_super_admins_both_succeed() {
    let (app, pool, _guard) = test_app().await;
    let (_, root) = create_user_with_session(&pool, "root@example.test", UserRole::SuperAdmin).await;
    let (b_id, _) = create_user_with_session(&pool, "b@example.test", UserRole::SuperAdmin).await;
    let (c_id, _) = create_user_with_session(&pool, "c@example.test", UserRole::SuperAdmin).await;

    for round in 0..20 {
        for id in [b_id, c_id] {
            server::repo::user::update_role(&pool, id, UserRole::SuperAdmin)
                .await
                .unwrap();
        }

        let demote = json!({ "role": "admin" });
        let b_uri = format!("/api/users/{}", b_id);
        let c_uri = format!("/api/users/{}", c_id);
        let ((b_status, b_body), (c_status, c_body)) = tokio::join!(
            patch_json_authed(&app, &b_uri, &demote, &root),
            patch_json_authed(&app, &c_uri, &demote, &root),
        );
        assert_eq!(b_status, StatusCode::OK, "round {round}: {b_body}");
        assert_eq!(c_status, StatusCode::OK, "round {round}: {c_body}");
    }
}
