use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use asirex_core::identity::{IdentityHeaders, ROLE_ADMIN, ROLE_CUSTOMER};

use crate::domain::repository::OrderRepository;
use crate::domain::types::{Shipment, TrackingInfo};
use crate::error::StorefrontError;
use crate::state::AppState;
use crate::usecase::shipping::{CreateShipmentUseCase, TrackShipmentUseCase};

#[derive(Serialize)]
pub struct ShipmentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub aggregator_shipment_id: Option<String>,
    pub awb: Option<String>,
    pub courier: Option<String>,
    pub status: String,
    #[serde(serialize_with = "asirex_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Shipment> for ShipmentResponse {
    fn from(s: Shipment) -> Self {
        Self {
            id: s.id,
            order_id: s.order_id,
            aggregator_shipment_id: s.aggregator_shipment_id,
            awb: s.awb,
            courier: s.courier,
            status: s.status,
            created_at: s.created_at,
        }
    }
}

/// `POST /admin/orders/{id}/shipment` — register the order with the
/// courier aggregator.
pub async fn create_shipment(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(order_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ShipmentResponse>), StorefrontError> {
    if identity.user_role != ROLE_ADMIN {
        return Err(StorefrontError::Forbidden);
    }
    let usecase = CreateShipmentUseCase {
        orders: state.order_repo(),
        shipments: state.shipment_repo(),
        shipping: state.shipping(),
        activity: state.activity_log(),
    };
    let shipment = usecase.execute(order_id).await?;
    Ok((StatusCode::CREATED, Json(shipment.into())))
}

/// `GET /orders/{id}/tracking` — live tracking, owner or staff only.
pub async fn track_order(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(order_id): Path<Uuid>,
) -> Result<Json<TrackingInfo>, StorefrontError> {
    let order = state
        .order_repo()
        .find_by_id(order_id)
        .await?
        .ok_or(StorefrontError::OrderNotFound)?;
    if order.user_id != identity.user_id && identity.user_role == ROLE_CUSTOMER {
        return Err(StorefrontError::Forbidden);
    }

    let usecase = TrackShipmentUseCase {
        shipments: state.shipment_repo(),
        shipping: state.shipping(),
    };
    let tracking = usecase.execute(order_id).await?;
    Ok(Json(tracking))
}
