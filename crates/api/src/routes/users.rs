//! User administration routes.
//!
//! All operations here are Admin-gated and tenant-scoped. The gate runs
//! against the caller's token claims only; the directory is never
//! re-queried for the caller's own roles.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    extractors::TenantScope,
    middleware::AuthUser,
    routes::{admin_guard, database_error, error_response},
};
use gatehouse_core::auth::{PasswordError, hash_password};
use gatehouse_db::{RoleRepository, UserRepository, entities::users};
use gatehouse_shared::auth::{
    AssignRoleRequest, CreateUserRequest, RoleDto, UpdateUserRequest, UserDto,
};
use gatehouse_shared::{AppError, UserCreated};

/// Creates the users router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}", put(update_user))
        .route("/users/{user_id}", delete(delete_user))
        .route("/users/{user_id}/roles", post(add_role_to_user))
        .route(
            "/users/{user_id}/roles/{role_id}",
            delete(remove_role_from_user),
        )
}

/// Maps a user row plus its granted roles to the response shape.
async fn build_user_dto(
    user_repo: &UserRepository,
    role_repo: &RoleRepository,
    user: users::Model,
) -> Result<UserDto, sea_orm::DbErr> {
    let role_ids = user_repo.role_ids_for_user(user.id).await?;
    let roles = role_repo.find_by_ids(role_ids).await?;

    Ok(UserDto {
        user_id: user.id,
        username: user.username,
        email: user.email,
        roles: roles
            .into_iter()
            .map(|r| RoleDto {
                role_id: r.id,
                name: r.name,
            })
            .collect(),
    })
}

/// GET /users - List users in the active tenant.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let role_repo = RoleRepository::new((*state.db).clone());

    let users = match user_repo.list_in_tenant(tenant_id).await {
        Ok(users) => users,
        Err(e) => return database_error(&e, "Failed to list users"),
    };

    let mut dtos = Vec::with_capacity(users.len());
    for user in users {
        match build_user_dto(&user_repo, &role_repo, user).await {
            Ok(dto) => dtos.push(dto),
            Err(e) => return database_error(&e, "Failed to resolve user roles"),
        }
    }

    (StatusCode::OK, Json(dtos)).into_response()
}

/// GET /users/{user_id} - Fetch a single user.
async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let role_repo = RoleRepository::new((*state.db).clone());

    match user_repo.find_by_id(user_id).await {
        Ok(Some(user)) if user.tenant_id == tenant_id => {
            match build_user_dto(&user_repo, &role_repo, user).await {
                Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
                Err(e) => database_error(&e, "Failed to resolve user roles"),
            }
        }
        Ok(_) => error_response(&AppError::NotFound(format!("user {user_id}"))),
        Err(e) => database_error(&e, "Failed to fetch user"),
    }
}

/// POST /users - Create a user, then announce it best-effort.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let username = payload.username.trim();
    let email = payload.email.trim();
    if username.is_empty() {
        return error_response(&AppError::Validation("username cannot be empty".to_string()));
    }
    if email.is_empty() {
        return error_response(&AppError::Validation("email cannot be empty".to_string()));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let role_repo = RoleRepository::new((*state.db).clone());

    match user_repo.username_exists(tenant_id, username).await {
        Ok(true) => {
            return error_response(&AppError::Conflict(format!(
                "username '{username}' is already taken"
            )));
        }
        Ok(false) => {}
        Err(e) => return database_error(&e, "Failed to check username"),
    }

    match user_repo.email_exists(tenant_id, email).await {
        Ok(true) => {
            return error_response(&AppError::Conflict(format!(
                "email '{email}' is already registered"
            )));
        }
        Ok(false) => {}
        Err(e) => return database_error(&e, "Failed to check email"),
    }

    let credential = match hash_password(&payload.password) {
        Ok(c) => c,
        Err(PasswordError::EmptyPassword) => {
            return error_response(&AppError::Validation("password cannot be empty".to_string()));
        }
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return error_response(&AppError::Internal("failed to hash password".to_string()));
        }
    };

    let user = match user_repo.create(tenant_id, username, email, &credential).await {
        Ok(u) => u,
        Err(e) => return database_error(&e, "Failed to create user"),
    };

    // Grant the requested roles that exist in this tenant; unknown IDs
    // are skipped.
    let requested_roles = match role_repo.find_by_ids(payload.role_ids).await {
        Ok(roles) => roles,
        Err(e) => return database_error(&e, "Failed to resolve requested roles"),
    };
    for role in requested_roles.iter().filter(|r| r.tenant_id == tenant_id) {
        if let Err(e) = user_repo.add_role(tenant_id, user.id, role.id).await {
            return database_error(&e, "Failed to grant role");
        }
    }

    info!(user_id = %user.id, tenant_id = %tenant_id, "Created user");

    // Fire-and-forget: a failed publish is logged inside the publisher
    // and never fails this request.
    state
        .events
        .publish_user_created(UserCreated {
            user_id: user.id,
            tenant_id: user.tenant_id,
            username: user.username.clone(),
            email: user.email.clone(),
        })
        .await;

    match build_user_dto(&user_repo, &role_repo, user).await {
        Ok(dto) => (StatusCode::CREATED, Json(dto)).into_response(),
        Err(e) => database_error(&e, "Failed to resolve user roles"),
    }
}

/// PUT /users/{user_id} - Update profile fields and/or replace the password.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let role_repo = RoleRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(user_id).await {
        Ok(Some(u)) if u.tenant_id == tenant_id => u,
        Ok(_) => return error_response(&AppError::NotFound(format!("user {user_id}"))),
        Err(e) => return database_error(&e, "Failed to fetch user"),
    };

    // Whole-field replacements: provided fields must be non-empty.
    let username = payload.username.as_deref().map(str::trim);
    let email = payload.email.as_deref().map(str::trim);
    if username == Some("") {
        return error_response(&AppError::Validation("username cannot be empty".to_string()));
    }
    if email == Some("") {
        return error_response(&AppError::Validation("email cannot be empty".to_string()));
    }

    if let Some(new_username) = username {
        if new_username != user.username {
            match user_repo.username_exists(tenant_id, new_username).await {
                Ok(true) => {
                    return error_response(&AppError::Conflict(format!(
                        "username '{new_username}' is already taken"
                    )));
                }
                Ok(false) => {}
                Err(e) => return database_error(&e, "Failed to check username"),
            }
        }
    }

    if let Some(new_email) = email {
        if new_email != user.email {
            match user_repo.email_exists(tenant_id, new_email).await {
                Ok(true) => {
                    return error_response(&AppError::Conflict(format!(
                        "email '{new_email}' is already registered"
                    )));
                }
                Ok(false) => {}
                Err(e) => return database_error(&e, "Failed to check email"),
            }
        }
    }

    let updated = match user_repo.update_profile(user.id, username, email).await {
        Ok(Some(u)) => u,
        Ok(None) => return error_response(&AppError::NotFound(format!("user {user_id}"))),
        Err(e) => return database_error(&e, "Failed to update user"),
    };

    // Password change replaces the credential wholesale.
    let updated = if let Some(password) = payload.password.as_deref() {
        let credential = match hash_password(password) {
            Ok(c) => c,
            Err(PasswordError::EmptyPassword) => {
                return error_response(&AppError::Validation(
                    "password cannot be empty".to_string(),
                ));
            }
            Err(e) => {
                error!(error = %e, "Password hashing failed");
                return error_response(&AppError::Internal("failed to hash password".to_string()));
            }
        };
        match user_repo.set_password(updated.id, &credential).await {
            Ok(Some(u)) => u,
            Ok(None) => return error_response(&AppError::NotFound(format!("user {user_id}"))),
            Err(e) => return database_error(&e, "Failed to replace credential"),
        }
    } else {
        updated
    };

    info!(user_id = %updated.id, "Updated user");

    match build_user_dto(&user_repo, &role_repo, updated).await {
        Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
        Err(e) => database_error(&e, "Failed to resolve user roles"),
    }
}

/// DELETE /users/{user_id} - Remove a user; role links cascade.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(user_id).await {
        Ok(Some(u)) if u.tenant_id == tenant_id => {}
        Ok(_) => return error_response(&AppError::NotFound(format!("user {user_id}"))),
        Err(e) => return database_error(&e, "Failed to fetch user"),
    }

    match user_repo.delete(user_id).await {
        Ok(true) => {
            info!(user_id = %user_id, "Deleted user");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(&AppError::NotFound(format!("user {user_id}"))),
        Err(e) => database_error(&e, "Failed to delete user"),
    }
}

/// POST /users/{user_id}/roles - Grant a role to a user.
async fn add_role_to_user(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AssignRoleRequest>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let role_repo = RoleRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(user_id).await {
        Ok(Some(u)) if u.tenant_id == tenant_id => u,
        Ok(_) => return error_response(&AppError::NotFound(format!("user {user_id}"))),
        Err(e) => return database_error(&e, "Failed to fetch user"),
    };

    match role_repo.find_by_id(payload.role_id).await {
        Ok(Some(r)) if r.tenant_id == tenant_id => {}
        Ok(_) => return error_response(&AppError::NotFound(format!("role {}", payload.role_id))),
        Err(e) => return database_error(&e, "Failed to fetch role"),
    }

    if let Err(e) = user_repo.add_role(tenant_id, user.id, payload.role_id).await {
        return database_error(&e, "Failed to grant role");
    }

    info!(user_id = %user.id, role_id = %payload.role_id, "Granted role to user");

    match build_user_dto(&user_repo, &role_repo, user).await {
        Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
        Err(e) => database_error(&e, "Failed to resolve user roles"),
    }
}

/// DELETE /users/{user_id}/roles/{role_id} - Revoke a role from a user.
async fn remove_role_from_user(
    State(state): State<AppState>,
    auth: AuthUser,
    tenant: TenantScope,
    Path((user_id, role_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let tenant_id = match admin_guard(&auth, &tenant) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let role_repo = RoleRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(user_id).await {
        Ok(Some(u)) if u.tenant_id == tenant_id => u,
        Ok(_) => return error_response(&AppError::NotFound(format!("user {user_id}"))),
        Err(e) => return database_error(&e, "Failed to fetch user"),
    };

    // Revoking a role the user does not hold leaves the user unchanged.
    if let Err(e) = user_repo.remove_role(user.id, role_id).await {
        return database_error(&e, "Failed to revoke role");
    }

    info!(user_id = %user.id, role_id = %role_id, "Revoked role from user");

    match build_user_dto(&user_repo, &role_repo, user).await {
        Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
        Err(e) => database_error(&e, "Failed to resolve user roles"),
    }
}
