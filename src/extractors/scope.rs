//! Extract the active resource scope and its registered options.

use crate::config::ResourceOptions;
use crate::state::ResourceRegistry;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::sync::Arc;

/// Resource name inserted into request extensions by the `api-scope` middleware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceScope(pub String);

/// Options of the resource whose group matched the request.
#[derive(Clone, Debug)]
pub struct CurrentResource {
    pub name: String,
    pub options: Arc<ResourceOptions>,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentResource
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scope = parts
            .extensions
            .get::<ResourceScope>()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "route has no resource scope"))?;
        let registry = parts
            .extensions
            .get::<Arc<ResourceRegistry>>()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "resource registry not mounted"))?;
        let options = registry
            .get(&scope.0)
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "scope names no registered resource"))?;
        Ok(CurrentResource {
            name: scope.0.clone(),
            options,
        })
    }
}
