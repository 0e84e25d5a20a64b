//! Role-based authorization decisions.
//!
//! Checks operate purely on the token's claims: role names were
//! snapshotted at issuance and the directory is never re-queried.

use gatehouse_shared::{AppError, AppResult, Claims};

/// Role name granting administrative access.
pub const ADMIN_ROLE: &str = "Admin";

/// Returns true iff `role_name` appears in the claims' role list.
///
/// The match is exact and case-sensitive: role names are unique per
/// tenant and the claims already reflect that tenant's roles.
#[must_use]
pub fn has_role(claims: &Claims, role_name: &str) -> bool {
    claims.roles.iter().any(|r| r == role_name)
}

/// Requires that the claims carry the given role.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the role is missing.
pub fn require_role(claims: &Claims, role_name: &str) -> AppResult<()> {
    if has_role(claims, role_name) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "requires the '{role_name}' role"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn claims_with_roles(roles: Vec<&str>) -> Claims {
        Claims::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "alice",
            roles.into_iter().map(String::from).collect(),
            Utc::now() + Duration::hours(1),
        )
    }

    #[rstest]
    #[case(vec!["Admin"], "Admin", true)]
    #[case(vec!["Admin", "User"], "User", true)]
    #[case(vec!["User"], "Admin", false)]
    #[case(vec![], "Admin", false)]
    #[case(vec!["admin"], "Admin", false)] // case-sensitive
    #[case(vec!["Administrator"], "Admin", false)] // no prefix match
    fn test_has_role(#[case] roles: Vec<&str>, #[case] wanted: &str, #[case] expected: bool) {
        let claims = claims_with_roles(roles);
        assert_eq!(has_role(&claims, wanted), expected);
    }

    #[test]
    fn test_require_role_passes_for_member() {
        let claims = claims_with_roles(vec![ADMIN_ROLE]);
        assert!(require_role(&claims, ADMIN_ROLE).is_ok());
    }

    #[test]
    fn test_require_role_forbidden_for_non_member() {
        let claims = claims_with_roles(vec!["User"]);
        let err = require_role(&claims, ADMIN_ROLE).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
