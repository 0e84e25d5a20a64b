//! Per-request tenant-context resolution.
//!
//! The active tenant is derived fresh for every request with strict
//! precedence: a `tenant_id` claim on the authenticated principal wins
//! over the explicit tenant header, which wins over nothing. The claim
//! is signed and tamper-resistant; the header is client-supplied
//! convenience and must never override a valid claim.

use gatehouse_shared::{AppError, AppResult};
use uuid::Uuid;

/// Header consulted when the principal carries no tenant claim.
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// The tenant an inbound request operates under.
///
/// Recomputed on every request from the current principal and headers;
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: Option<Uuid>,
}

impl TenantContext {
    /// A context with no tenant.
    #[must_use]
    pub const fn empty() -> Self {
        Self { tenant_id: None }
    }

    /// A context scoped to the given tenant.
    #[must_use]
    pub const fn new(tenant_id: Uuid) -> Self {
        Self {
            tenant_id: Some(tenant_id),
        }
    }

    /// Resolves the tenant from an optional claim and an optional header.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the header is present but not a
    /// valid UUID. This is rejected before any I/O.
    pub fn resolve(claim_tenant: Option<Uuid>, header: Option<&str>) -> AppResult<Self> {
        if let Some(tenant_id) = claim_tenant {
            return Ok(Self::new(tenant_id));
        }

        match header {
            Some(raw) => {
                let tenant_id = Uuid::parse_str(raw.trim())
                    .map_err(|_| AppError::Validation(format!("invalid tenant header: {raw}")))?;
                Ok(Self::new(tenant_id))
            }
            None => Ok(Self::empty()),
        }
    }

    /// Whether a tenant was resolved.
    #[must_use]
    pub const fn has_tenant(&self) -> bool {
        self.tenant_id.is_some()
    }

    /// The resolved tenant, if any.
    #[must_use]
    pub const fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    /// Returns the tenant ID or rejects the operation.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoTenantContext` if no tenant was resolved.
    pub fn require(&self) -> AppResult<Uuid> {
        self.tenant_id.ok_or(AppError::NoTenantContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TENANT_A: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
    const TENANT_B: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";

    fn uuid(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[test]
    fn test_claim_wins_over_header() {
        let ctx = TenantContext::resolve(Some(uuid(TENANT_A)), Some(TENANT_B)).unwrap();
        assert_eq!(ctx.tenant_id(), Some(uuid(TENANT_A)));
    }

    #[test]
    fn test_header_used_without_claim() {
        let ctx = TenantContext::resolve(None, Some(TENANT_B)).unwrap();
        assert_eq!(ctx.tenant_id(), Some(uuid(TENANT_B)));
    }

    #[test]
    fn test_neither_yields_empty_context() {
        let ctx = TenantContext::resolve(None, None).unwrap();
        assert!(!ctx.has_tenant());
        assert_eq!(ctx.tenant_id(), None);
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    #[case("1234")]
    fn test_malformed_header_is_validation_error(#[case] header: &str) {
        let result = TenantContext::resolve(None, Some(header));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_header_whitespace_is_trimmed() {
        let ctx = TenantContext::resolve(None, Some(&format!(" {TENANT_A} "))).unwrap();
        assert_eq!(ctx.tenant_id(), Some(uuid(TENANT_A)));
    }

    #[test]
    fn test_require_on_empty_context() {
        let ctx = TenantContext::empty();
        assert!(matches!(ctx.require(), Err(AppError::NoTenantContext)));
    }

    #[test]
    fn test_require_on_scoped_context() {
        let ctx = TenantContext::new(uuid(TENANT_A));
        assert_eq!(ctx.require().unwrap(), uuid(TENANT_A));
    }
}
