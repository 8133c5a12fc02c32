use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use asirex_core::identity::{IdentityHeaders, ROLE_ADMIN, ROLE_CUSTOMER};
use asirex_domain::money::Money;
use asirex_domain::order::OrderStatus;
use asirex_domain::pagination::PageRequest;

use crate::domain::repository::OrderRepository;
use crate::domain::types::{LineItem, Order};
use crate::error::StorefrontError;
use crate::state::AppState;
use crate::usecase::order::{
    ConfirmCancellationUseCase, CreateOrderInput, CreateOrderUseCase, GetOrderUseCase,
    RequestCancellationUseCase, UpdateOrderStatusUseCase,
};
use crate::usecase::otp::{IssueOtpUseCase, VerifyOtpUseCase};

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub campaign_id: Option<Uuid>,
    pub payment_method: String,
    pub payment_status: String,
    pub order_status: String,
    pub gateway_order_id: Option<String>,
    #[serde(serialize_with = "asirex_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            items: o.items,
            subtotal: o.subtotal,
            discount: o.discount,
            total: o.total,
            campaign_id: o.campaign_id,
            payment_method: o.payment_method.as_str().to_owned(),
            payment_status: o.payment_status.as_str().to_owned(),
            order_status: o.order_status.as_str().to_owned(),
            gateway_order_id: o.gateway_order_id,
            created_at: o.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    pub items: Vec<LineItem>,
    pub payment_method: String,
}

/// `POST /orders` — place an order with the discount resolved server-side.
pub async fn create_order(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), StorefrontError> {
    let payment_method = asirex_domain::order::PaymentMethod::parse(&body.payment_method)
        .ok_or(StorefrontError::MissingData)?;

    let usecase = CreateOrderUseCase {
        campaigns: state.campaign_repo(),
        orders: state.order_repo(),
        activity: state.activity_log(),
        gateway: state.payment_gateway(),
    };
    let order = usecase
        .execute(CreateOrderInput {
            user_id: identity.user_id,
            contact_email: body.contact_email,
            contact_phone: body.contact_phone,
            items: body.items,
            payment_method,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// `GET /orders` — the caller's own orders, newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<OrderResponse>>, StorefrontError> {
    let orders = state
        .order_repo()
        .list_by_user(identity.user_id, page.clamped())
        .await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// `GET /orders/{id}` — owner or back-office staff only.
pub async fn get_order(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, StorefrontError> {
    let usecase = GetOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase.execute(id).await?;
    if order.user_id != identity.user_id && identity.user_role == ROLE_CUSTOMER {
        return Err(StorefrontError::Forbidden);
    }
    Ok(Json(order.into()))
}

/// `POST /orders/{id}/cancel` — send the cancellation code to the
/// order's contact email.
pub async fn request_cancellation(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StorefrontError> {
    let usecase = RequestCancellationUseCase {
        orders: state.order_repo(),
        issue: IssueOtpUseCase {
            otps: state.otp_repo(),
            limiter: state.rate_limiter(),
            sender: state.otp_sender(),
        },
    };
    usecase.execute(id, identity.user_id).await?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
pub struct ConfirmCancellationRequest {
    pub code: String,
}

/// `POST /orders/{id}/cancel/confirm` — verify the code and cancel.
pub async fn confirm_cancellation(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(id): Path<Uuid>,
    Json(body): Json<ConfirmCancellationRequest>,
) -> Result<StatusCode, StorefrontError> {
    let usecase = ConfirmCancellationUseCase {
        verify: VerifyOtpUseCase {
            otps: state.otp_repo(),
        },
        orders: state.order_repo(),
        shipments: state.shipment_repo(),
        shipping: state.shipping(),
        activity: state.activity_log(),
    };
    usecase.execute(id, identity.user_id, body.code).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// `PATCH /admin/orders/{id}/status` — one-stage fulfilment transition.
pub async fn update_order_status(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<StatusCode, StorefrontError> {
    if identity.user_role != ROLE_ADMIN {
        return Err(StorefrontError::Forbidden);
    }
    let next = OrderStatus::parse(&body.status).ok_or(StorefrontError::MissingData)?;

    let usecase = UpdateOrderStatusUseCase {
        orders: state.order_repo(),
        activity: state.activity_log(),
    };
    usecase.execute(id, next).await?;
    Ok(StatusCode::NO_CONTENT)
}
