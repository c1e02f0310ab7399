use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use zman_core::OwnerId;

use super::ApiError;

/// Identifies the calling owner from the `x-owner-id` header.
///
/// Authentication itself happens upstream; a missing or malformed header
/// is rejected here, before any engine call runs.
pub struct CurrentOwner(pub OwnerId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentOwner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-owner-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing x-owner-id header"))?;

        let id = header
            .parse::<i32>()
            .map_err(|_| ApiError::unauthorized("invalid x-owner-id header"))?;

        Ok(CurrentOwner(OwnerId::new(id)))
    }
}
