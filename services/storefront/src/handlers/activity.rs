use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use asirex_core::identity::{IdentityHeaders, ROLE_CUSTOMER};
use asirex_domain::activity::ActivityKind;
use asirex_domain::pagination::PageRequest;

use crate::domain::repository::ActivityLog;
use crate::domain::types::ActivityRecord;
use crate::error::StorefrontError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub order_id: Option<Uuid>,
    pub subject: Option<String>,
    pub detail: serde_json::Value,
    #[serde(serialize_with = "asirex_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<ActivityRecord> for ActivityResponse {
    fn from(r: ActivityRecord) -> Self {
        Self {
            id: r.id,
            kind: r.kind,
            order_id: r.order_id,
            subject: r.subject,
            detail: r.detail,
            created_at: r.created_at,
        }
    }
}

/// `GET /admin/activity` — audit trail, newest first. Staff and admin.
pub async fn list_activity(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ActivityResponse>>, StorefrontError> {
    if identity.user_role == ROLE_CUSTOMER {
        return Err(StorefrontError::Forbidden);
    }
    let entries = state.activity_log().list(page.clamped()).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
