//! Internal grants view.
//!
//! Grant records come from the CRM through [`GrantSource`]; this module only
//! serves them, and only behind `require_internal_auth`.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use axum::{extract::State, Extension, Json};
use shared_types::InternalGrant;

use crate::auth::types::AuthPayload;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[async_trait]
pub trait GrantSource: Send + Sync {
    async fn internal_grants(&self) -> anyhow::Result<Vec<InternalGrant>>;
}

/// Grant records held in memory, typically loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGrantSource {
    grants: Vec<InternalGrant>,
}

impl InMemoryGrantSource {
    pub fn new(grants: Vec<InternalGrant>) -> Self {
        Self { grants }
    }

    /// Load a JSON array of grant records.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grants file {}", path.display()))?;
        let grants: Vec<InternalGrant> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid grants file {}", path.display()))?;
        Ok(Self { grants })
    }
}

#[async_trait]
impl GrantSource for InMemoryGrantSource {
    async fn internal_grants(&self) -> anyhow::Result<Vec<InternalGrant>> {
        Ok(self.grants.clone())
    }
}

/// List grants with their confidential fields.
pub async fn list_internal_grants(
    State(state): State<AppState>,
    Extension(viewer): Extension<AuthPayload>,
) -> ApiResult<Json<Vec<InternalGrant>>> {
    let grants = state
        .grants
        .internal_grants()
        .await
        .map_err(ApiError::Internal)?;

    tracing::info!(viewer = %viewer.email, count = grants.len(), "Served internal grants");

    Ok(Json(grants))
}
