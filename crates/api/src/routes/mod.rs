//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use gatehouse_shared::AppError;

pub mod auth;
pub mod health;
pub mod roles;
pub mod users;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(users::routes())
        .merge(roles::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Builds the JSON error response for an application error.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

/// Checks the Admin gate and resolves the tenant, in that order.
pub(crate) fn admin_guard(
    auth: &crate::middleware::AuthUser,
    tenant: &crate::extractors::TenantScope,
) -> Result<uuid::Uuid, Response> {
    if let Err(e) = gatehouse_core::auth::require_role(auth.claims(), gatehouse_core::auth::ADMIN_ROLE)
    {
        return Err(error_response(&e));
    }
    tenant.0.require().map_err(|e| error_response(&e))
}

/// Logs a database failure and builds its generic error response.
pub(crate) fn database_error(e: &sea_orm::DbErr, context: &str) -> Response {
    tracing::error!(error = %e, "{context}");
    error_response(&AppError::Database("a database error occurred".to_string()))
}
