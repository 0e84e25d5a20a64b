//! Role administration routes.
//!
//! Admin-gated and tenant-scoped. Roles created here are granted to
//! users through the users routes; deleting a role cascades to its
//! user links.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    extractors::TenantScope,
    middleware::AuthUser,
    routes::{admin_guard, database_error, error_response},
};
use gatehouse_db::{RoleRepository, entities::roles};
use gatehouse_shared::AppError;
use gatehouse_shared::auth::{CreateRoleRequest, RoleDto, UpdateRoleRequest};

/// Creates the roles router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles", post(create_role))
        .route("/roles/{role_id}", get(get_role))
        .route("/roles/{role_id}", put(update_role))
        .route("/roles/{role_id}", delete(delete_role))
}

fn to_dto(role: roles::Model) -> RoleDto {
    RoleDto {
        role_id: role.id,
        name: role.name,
    }
}

/// GET /roles - List roles in the active tenant.
async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let role_repo = RoleRepository::new((*state.db).clone());

    match role_repo.list_in_tenant(tenant_id).await {
        Ok(roles) => {
            let dtos: Vec<RoleDto> = roles.into_iter().map(to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(e) => database_error(&e, "Failed to list roles"),
    }
}

/// GET /roles/{role_id} - Fetch a single role.
async fn get_role(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Path(role_id): Path<Uuid>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let role_repo = RoleRepository::new((*state.db).clone());

    match role_repo.find_by_id(role_id).await {
        Ok(Some(role)) if role.tenant_id == tenant_id => {
            (StatusCode::OK, Json(to_dto(role))).into_response()
        }
        Ok(_) => error_response(&AppError::NotFound(format!("role {role_id}"))),
        Err(e) => database_error(&e, "Failed to fetch role"),
    }
}

/// POST /roles - Create a role.
async fn create_role(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Json(payload): Json<CreateRoleRequest>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let name = payload.name.trim();
    if name.is_empty() {
        return error_response(&AppError::Validation("role name cannot be empty".to_string()));
    }

    let role_repo = RoleRepository::new((*state.db).clone());

    match role_repo.name_exists(tenant_id, name).await {
        Ok(true) => {
            return error_response(&AppError::Conflict(format!(
                "role '{name}' already exists"
            )));
        }
        Ok(false) => {}
        Err(e) => return database_error(&e, "Failed to check role name"),
    }

    match role_repo.create(tenant_id, name).await {
        Ok(role) => {
            info!(role_id = %role.id, tenant_id = %tenant_id, name = %role.name, "Created role");
            (StatusCode::CREATED, Json(to_dto(role))).into_response()
        }
        Err(e) => database_error(&e, "Failed to create role"),
    }
}

/// PUT /roles/{role_id} - Rename a role.
async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Path(role_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let name = payload.name.trim();
    if name.is_empty() {
        return error_response(&AppError::Validation("role name cannot be empty".to_string()));
    }

    let role_repo = RoleRepository::new((*state.db).clone());

    let role = match role_repo.find_by_id(role_id).await {
        Ok(Some(r)) if r.tenant_id == tenant_id => r,
        Ok(_) => return error_response(&AppError::NotFound(format!("role {role_id}"))),
        Err(e) => return database_error(&e, "Failed to fetch role"),
    };

    if name != role.name {
        match role_repo.name_exists(tenant_id, name).await {
            Ok(true) => {
                return error_response(&AppError::Conflict(format!(
                    "role '{name}' already exists"
                )));
            }
            Ok(false) => {}
            Err(e) => return database_error(&e, "Failed to check role name"),
        }
    }

    match role_repo.rename(role.id, name).await {
        Ok(Some(role)) => {
            info!(role_id = %role.id, name = %role.name, "Renamed role");
            (StatusCode::OK, Json(to_dto(role))).into_response()
        }
        Ok(None) => error_response(&AppError::NotFound(format!("role {role_id}"))),
        Err(e) => database_error(&e, "Failed to rename role"),
    }
}

/// DELETE /roles/{role_id} - Remove a role; user links cascade.
async fn delete_role(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Path(role_id): Path<Uuid>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let role_repo = RoleRepository::new((*state.db).clone());

    match role_repo.find_by_id(role_id).await {
        Ok(Some(r)) if r.tenant_id == tenant_id => {}
        Ok(_) => return error_response(&AppError::NotFound(format!("role {role_id}"))),
        Err(e) => return database_error(&e, "Failed to fetch role"),
    }

    match role_repo.delete(role_id).await {
        Ok(true) => {
            info!(role_id = %role_id, "Deleted role");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(&AppError::NotFound(format!("role {role_id}"))),
        Err(e) => database_error(&e, "Failed to delete role"),
    }
}
