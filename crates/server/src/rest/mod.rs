pub mod attorney;
pub mod auth;
pub mod document;
pub mod state_limit;
pub mod submission;
pub mod user;

use axum::{
    routing::{get, patch, post},
    Router,
};
use crate::db::AppState;

/// Build the combined REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Submissions
        .route(
            "/api/submissions",
            get(submission::list_submissions).post(submission::create_submission),
        )
        .route("/api/my-submissions", get(submission::my_submissions))
        .route(
            "/api/submissions/{id}",
            get(submission::get_submission).patch(submission::update_submission),
        )
        // Documents
        .route("/api/upload-document/{id}", post(document::upload_document))
        .route("/api/download-document/{id}", get(document::download_document))
        .route(
            "/api/submissions/{id}/summarize-document",
            post(document::summarize_document),
        )
        // Attorneys
        .route(
            "/api/attorneys",
            get(attorney::list_attorneys).post(attorney::create_attorney),
        )
        .route(
            "/api/attorneys/{id}",
            get(attorney::get_attorney)
                .patch(attorney::update_attorney)
                .delete(attorney::delete_attorney),
        )
        // State limits
        .route(
            "/api/state-limits",
            get(state_limit::list_state_limits).post(state_limit::create_state_limit),
        )
        .route(
            "/api/state-limits/{id}",
            patch(state_limit::update_state_limit).delete(state_limit::delete_state_limit),
        )
        // Auth
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/me", get(auth::me))
        // User management
        .route("/api/users", get(user::list_users))
        .route(
            "/api/users/{id}",
            get(user::get_user)
                .patch(user::update_user_role)
                .delete(user::delete_user),
        )
}
