use axum::Router;
use shared_types::{
    // Error
    AppError, AppErrorKind,
    // Auth & users
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UpdateUserRoleRequest,
    UpdateUserRoleResponse, UserResponse, UserRole,
    // Submissions
    CreateSubmissionRequest, CreateSubmissionResponse, MySubmissionSummary, ReferralType,
    SubmissionDetail, SubmissionPatch, SubmissionSummary, UpdateSubmissionResponse,
    // Attorneys
    AttorneyResponse, CreateAttorneyRequest, CreateAttorneyResponse, UpdateAttorneyRequest,
    // State limits
    CreateStateLimitRequest, StateLimitMutationResponse, StateLimitResponse,
    UpdateStateLimitRequest,
    // Documents
    DownloadDocumentResponse, SummarizeDocumentResponse, UploadDocumentResponse,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health;
use crate::rest;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Submissions
        rest::submission::create_submission,
        rest::submission::list_submissions,
        rest::submission::my_submissions,
        rest::submission::get_submission,
        rest::submission::update_submission,
        // Documents
        rest::document::upload_document,
        rest::document::download_document,
        rest::document::summarize_document,
        // Attorneys
        rest::attorney::list_attorneys,
        rest::attorney::create_attorney,
        rest::attorney::get_attorney,
        rest::attorney::update_attorney,
        rest::attorney::delete_attorney,
        // State limits
        rest::state_limit::list_state_limits,
        rest::state_limit::create_state_limit,
        rest::state_limit::update_state_limit,
        rest::state_limit::delete_state_limit,
        // Auth
        rest::auth::register,
        rest::auth::login,
        rest::auth::logout,
        rest::auth::me,
        // Users
        rest::user::list_users,
        rest::user::get_user,
        rest::user::update_user_role,
        rest::user::delete_user,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind,
        AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UpdateUserRoleRequest,
        UpdateUserRoleResponse, UserResponse, UserRole,
        CreateSubmissionRequest, CreateSubmissionResponse, MySubmissionSummary, ReferralType,
        SubmissionDetail, SubmissionPatch, SubmissionSummary, UpdateSubmissionResponse,
        AttorneyResponse, CreateAttorneyRequest, CreateAttorneyResponse, UpdateAttorneyRequest,
        CreateStateLimitRequest, StateLimitMutationResponse, StateLimitResponse,
        UpdateStateLimitRequest,
        DownloadDocumentResponse, SummarizeDocumentResponse, UploadDocumentResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "submissions", description = "Estate intake submissions and referral classification"),
        (name = "documents", description = "Trust and will upload, download and summarization"),
        (name = "attorneys", description = "Attorney roster management"),
        (name = "state-limits", description = "Per-state small-estate thresholds"),
        (name = "auth", description = "Registration and session endpoints"),
        (name = "users", description = "User role management"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Estate Intake API",
        description = "Estate settlement intake, referral classification and attorney routing",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`
/// and the REST API at `/api/*`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
