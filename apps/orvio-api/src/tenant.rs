//! Current-tenant extraction.
//!
//! Authentication and tenant resolution live outside this service; what
//! arrives here is an opaque tenant id in the `X-Tenant-Id` header. A
//! request without a resolvable tenant is unauthorized.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use orvio_core::{OrvioError, TenantId};

use crate::error::ApiError;

/// Header the upstream auth layer forwards the tenant id in.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// The tenant the request acts on behalf of.
#[derive(Debug, Clone, Copy)]
pub struct CurrentTenant(pub TenantId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| OrvioError::unauthorized("missing tenant"))?;

        let tenant_id = raw
            .parse::<TenantId>()
            .map_err(|_| OrvioError::unauthorized("malformed tenant id"))?;

        Ok(CurrentTenant(tenant_id))
    }
}
