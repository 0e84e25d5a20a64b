//! Authentication types: token claims and API payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// Role membership is a point-in-time snapshot: the token carries role
/// *names* as granted at issuance, and authorization checks operate on
/// these claims without re-querying the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Tenant the token was issued for.
    pub tenant_id: Uuid,
    /// Username at issuance time.
    pub name: String,
    /// Role names granted within the tenant.
    pub roles: Vec<String>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        tenant_id: Uuid,
        username: &str,
        roles: Vec<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            tenant_id,
            name: username.to_string(),
            roles,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username to authenticate as.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Signed access token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Authenticated user info.
    pub user: UserInfo,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub user_id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Role names granted to the user.
    pub roles: Vec<String>,
}

/// Create user request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Username (unique within the tenant).
    pub username: String,
    /// Email address (unique within the tenant).
    pub email: String,
    /// Plaintext password to hash.
    pub password: String,
    /// Roles to grant at creation.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

/// Update user request. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    /// New username (whole-field replacement).
    pub username: Option<String>,
    /// New email (whole-field replacement).
    pub email: Option<String>,
    /// New password; replaces the stored credential wholesale.
    pub password: Option<String>,
}

/// Assign role request.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRoleRequest {
    /// Role to grant.
    pub role_id: Uuid,
}

/// Create role request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoleRequest {
    /// Role name (unique within the tenant).
    pub name: String,
}

/// Update role request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role name.
    pub name: String,
}

/// Role info returned in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct RoleDto {
    /// Role ID.
    pub role_id: Uuid,
    /// Role name.
    pub name: String,
}

/// User info returned in administration responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    /// User ID.
    pub user_id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Roles granted to the user.
    pub roles: Vec<RoleDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(
            user_id,
            tenant_id,
            "alice",
            vec!["Admin".to_string()],
            expires_at,
        );

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.tenant_id, tenant_id);
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.roles, vec!["Admin".to_string()]);
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_claims_user_id_returns_sub() {
        let user_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(user_id, Uuid::new_v4(), "bob", vec![], expires_at);

        assert_eq!(claims.user_id(), user_id);
    }

    #[test]
    fn test_claims_roundtrip_serde() {
        let claims = Claims::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "carol",
            vec!["User".to_string(), "Admin".to_string()],
            Utc::now() + Duration::hours(2),
        );

        let json = serde_json::to_string(&claims).unwrap();
        let decoded: Claims = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.tenant_id, claims.tenant_id);
        assert_eq!(decoded.roles, claims.roles);
    }
}
