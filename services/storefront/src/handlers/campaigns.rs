use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use asirex_core::identity::{IdentityHeaders, ROLE_ADMIN};
use asirex_domain::money::Money;
use asirex_domain::pagination::PageRequest;

use crate::domain::repository::CampaignRepository;
use crate::domain::types::{AppliesTo, Campaign, DiscountType, LineItem};
use crate::error::StorefrontError;
use crate::state::AppState;
use crate::usecase::discount::{PreviewDiscountInput, PreviewDiscountUseCase};

#[derive(Serialize)]
pub struct CampaignResponse {
    pub id: Uuid,
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub min_order_amount: Money,
    pub max_discount_amount: Option<Money>,
    pub applies_to: AppliesTo,
    pub target_categories: Vec<String>,
    pub target_product_ids: Vec<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub order_cap: Option<i32>,
    pub orders_used: i32,
    pub active: bool,
}

impl From<Campaign> for CampaignResponse {
    fn from(c: Campaign) -> Self {
        Self {
            id: c.id,
            name: c.name,
            discount_type: c.discount_type,
            discount_value: c.discount_value,
            min_order_amount: c.min_order_amount,
            max_discount_amount: c.max_discount_amount,
            applies_to: c.applies_to,
            target_categories: c.target_categories,
            target_product_ids: c.target_product_ids,
            starts_at: c.starts_at,
            ends_at: c.ends_at,
            order_cap: c.order_cap,
            orders_used: c.orders_used,
            active: c.active,
        }
    }
}

/// `GET /campaigns` — campaigns currently live for the storefront banner.
pub async fn list_live_campaigns(
    State(state): State<AppState>,
) -> Result<Json<Vec<CampaignResponse>>, StorefrontError> {
    let live = state.campaign_repo().find_live(Utc::now()).await?;
    Ok(Json(live.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub items: Vec<LineItem>,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub campaign_id: Option<Uuid>,
    pub campaign_name: Option<String>,
}

/// `POST /checkout/preview` — resolve the discount for a cart without
/// creating an order. Must agree with what `POST /orders` will store.
pub async fn preview_checkout(
    State(state): State<AppState>,
    Json(body): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, StorefrontError> {
    if body.items.is_empty() {
        return Err(StorefrontError::MissingData);
    }
    let subtotal = body
        .items
        .iter()
        .fold(Money::ZERO, |acc, item| acc.saturating_add(item.line_total()));

    let usecase = PreviewDiscountUseCase {
        campaigns: state.campaign_repo(),
    };
    let resolution = usecase
        .execute(PreviewDiscountInput {
            order_amount: subtotal,
            categories: body.items.iter().map(|i| i.category.clone()).collect(),
            product_ids: body.items.iter().map(|i| i.product_id).collect(),
        })
        .await?;

    Ok(Json(PreviewResponse {
        subtotal,
        discount: resolution.discount,
        total: subtotal.saturating_sub(resolution.discount),
        campaign_id: resolution.campaign_id,
        campaign_name: resolution.campaign_name,
    }))
}

#[derive(Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    #[serde(default)]
    pub min_order_amount: Option<Money>,
    #[serde(default)]
    pub max_discount_amount: Option<Money>,
    pub applies_to: AppliesTo,
    #[serde(default)]
    pub target_categories: Vec<String>,
    #[serde(default)]
    pub target_product_ids: Vec<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub order_cap: Option<i32>,
}

/// `POST /admin/campaigns` — create a campaign.
pub async fn create_campaign(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Json(body): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<CampaignResponse>), StorefrontError> {
    if identity.user_role != ROLE_ADMIN {
        return Err(StorefrontError::Forbidden);
    }
    if body.name.trim().is_empty()
        || body.discount_value < 0
        || body.ends_at <= body.starts_at
    {
        return Err(StorefrontError::MissingData);
    }

    let campaign = Campaign {
        id: Uuid::now_v7(),
        name: body.name,
        discount_type: body.discount_type,
        discount_value: body.discount_value,
        min_order_amount: body.min_order_amount.unwrap_or(Money::ZERO),
        max_discount_amount: body.max_discount_amount,
        applies_to: body.applies_to,
        target_categories: body.target_categories,
        target_product_ids: body.target_product_ids,
        starts_at: body.starts_at,
        ends_at: body.ends_at,
        order_cap: body.order_cap,
        orders_used: 0,
        active: true,
        created_at: Utc::now(),
    };
    state.campaign_repo().create(&campaign).await?;
    Ok((StatusCode::CREATED, Json(campaign.into())))
}

/// `GET /admin/campaigns` — paginated campaign list for the back office.
pub async fn list_campaigns(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<CampaignResponse>>, StorefrontError> {
    if identity.user_role != ROLE_ADMIN {
        return Err(StorefrontError::Forbidden);
    }
    let campaigns = state.campaign_repo().list(page.clamped()).await?;
    Ok(Json(campaigns.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// `PATCH /admin/campaigns/{id}` — toggle the active flag.
pub async fn set_campaign_active(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(id): Path<Uuid>,
    Json(body): Json<SetActiveRequest>,
) -> Result<StatusCode, StorefrontError> {
    if identity.user_role != ROLE_ADMIN {
        return Err(StorefrontError::Forbidden);
    }
    if !state.campaign_repo().set_active(id, body.active).await? {
        return Err(StorefrontError::CampaignNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
