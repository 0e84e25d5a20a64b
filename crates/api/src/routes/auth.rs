//! Authentication routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, extractors::TenantScope};
use gatehouse_core::auth::verify_password;
use gatehouse_db::{RoleRepository, UserRepository};
use gatehouse_shared::auth::{LoginRequest, LoginResponse, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST /auth/login - Authenticate user and return a token.
async fn login(
    State(state): State<AppState>,
    tenant: TenantScope,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Look up within the tenant when one is resolved, else globally by
    // username. A missing user and a wrong password produce the same
    // response so accounts cannot be enumerated.
    let lookup = match tenant.0.tenant_id() {
        Some(tenant_id) => {
            user_repo
                .find_by_username_in_tenant(tenant_id, &payload.username)
                .await
        }
        None => user_repo.find_by_username(&payload.username).await,
    };

    let user = match lookup {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid username or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    // Verify password
    match verify_password(&payload.password, &user.credential()) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid username or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    }

    // Snapshot the user's role names for the token claims
    let role_ids = match user_repo.role_ids_for_user(user.id).await {
        Ok(ids) => ids,
        Err(e) => {
            error!(error = %e, "Failed to get user roles");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    let role_repo = RoleRepository::new((*state.db).clone());
    let role_names: Vec<String> = match role_repo.find_by_ids(role_ids).await {
        Ok(roles) => roles.into_iter().map(|r| r.name).collect(),
        Err(e) => {
            error!(error = %e, "Failed to resolve role names");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    // Issue the token
    let (token, expires_at) = match state.jwt_service.issue(
        user.id,
        user.tenant_id,
        &user.username,
        role_names.clone(),
    ) {
        Ok(issued) => issued,
        Err(e) => {
            error!(error = %e, "Failed to issue access token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    info!(user_id = %user.id, tenant_id = %user.tenant_id, "User logged in successfully");

    let response = LoginResponse {
        token,
        expires_at,
        user: UserInfo {
            user_id: user.id,
            username: user.username,
            email: user.email,
            roles: role_names,
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}
