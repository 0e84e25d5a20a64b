//! Request extractors.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use serde_json::json;

use gatehouse_core::tenant::{TENANT_HEADER, TenantContext};
use gatehouse_shared::Claims;

/// Extractor for the request's tenant context.
///
/// Resolution precedence: the `tenant_id` claim of the authenticated
/// principal (when the auth middleware ran), then the `X-Tenant-Id`
/// header, else an empty context. The header never overrides a claim.
///
/// Rejects with 400 when the header is present but not a valid UUID.
#[derive(Debug, Clone, Copy)]
pub struct TenantScope(pub TenantContext);

impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claim_tenant = parts.extensions.get::<Claims>().map(|c| c.tenant_id);
        let header = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|h| h.to_str().ok());

        TenantContext::resolve(claim_tenant, header)
            .map(TenantScope)
            .map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_tenant_header",
                        "message": e.to_string()
                    })),
                )
            })
    }
}
