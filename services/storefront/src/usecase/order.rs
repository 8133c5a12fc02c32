//! Order creation, lifecycle transitions, and OTP-gated cancellation.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use asirex_domain::activity::ActivityKind;
use asirex_domain::money::Money;
use asirex_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use asirex_domain::otp::{OtpPurpose, Subject};

use crate::domain::repository::{
    ActivityLog, CampaignRepository, OrderRepository, OtpRepository, OtpSender, RateLimiter,
    PaymentGatewayPort, ShipmentRepository, ShippingPort,
};
use crate::domain::types::{ActivityRecord, LineItem, Order};
use crate::error::StorefrontError;
use crate::usecase::discount::resolve_discount;
use crate::usecase::otp::{IssueOtpInput, IssueOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

// ── CreateOrder ──────────────────────────────────────────────────────────────

pub struct CreateOrderInput {
    pub user_id: Uuid,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub items: Vec<LineItem>,
    pub payment_method: PaymentMethod,
}

pub struct CreateOrderUseCase<C, O, A, G>
where
    C: CampaignRepository,
    O: OrderRepository,
    A: ActivityLog,
    G: PaymentGatewayPort,
{
    pub campaigns: C,
    pub orders: O,
    pub activity: A,
    pub gateway: G,
}

impl<C, O, A, G> CreateOrderUseCase<C, O, A, G>
where
    C: CampaignRepository,
    O: OrderRepository,
    A: ActivityLog,
    G: PaymentGatewayPort,
{
    /// Create an order with the discount resolved server-side. Online
    /// methods register the order with the gateway up front; COD orders
    /// start confirmed with payment pending until delivery.
    pub async fn execute(&self, input: CreateOrderInput) -> Result<Order, StorefrontError> {
        if input.items.is_empty() {
            return Err(StorefrontError::MissingData);
        }

        let subtotal = input
            .items
            .iter()
            .fold(Money::ZERO, |acc, item| acc.saturating_add(item.line_total()));

        let categories: Vec<String> = input.items.iter().map(|i| i.category.clone()).collect();
        let product_ids: Vec<Uuid> = input.items.iter().map(|i| i.product_id).collect();

        let live = self.campaigns.find_live(Utc::now()).await?;
        let resolution = resolve_discount(&live, subtotal, &categories, &product_ids);
        let total = subtotal.saturating_sub(resolution.discount);

        let id = Uuid::now_v7();
        let gateway_order = match input.payment_method {
            PaymentMethod::Razorpay => Some(self.gateway.create_gateway_order(id, total).await?),
            // PayU posts back against our own order id; COD has no gateway leg.
            PaymentMethod::Payu | PaymentMethod::Cod => None,
        };

        let (order_status, payment_status) = match input.payment_method {
            PaymentMethod::Cod => (OrderStatus::Confirmed, PaymentStatus::Pending),
            _ => (OrderStatus::Pending, PaymentStatus::Pending),
        };

        let now = Utc::now();
        let order = Order {
            id,
            user_id: input.user_id,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            items: input.items,
            subtotal,
            discount: resolution.discount,
            total,
            campaign_id: resolution.campaign_id,
            payment_method: input.payment_method,
            payment_status,
            order_status,
            gateway_order_id: gateway_order.map(|g| g.gateway_order_id),
            payment_id: None,
            created_at: now,
            updated_at: now,
        };

        self.orders.create(&order).await?;
        if let Some(campaign_id) = resolution.campaign_id {
            self.campaigns.increment_orders_used(campaign_id).await?;
        }
        self.activity
            .record(&ActivityRecord::new(
                ActivityKind::OrderCreated,
                Some(order.id),
                json!({
                    "subtotal": order.subtotal,
                    "discount": order.discount,
                    "total": order.total,
                    "campaign_id": order.campaign_id,
                    "method": order.payment_method.as_str(),
                }),
            ))
            .await?;

        Ok(order)
    }
}

// ── GetOrder ─────────────────────────────────────────────────────────────────

pub struct GetOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> GetOrderUseCase<O> {
    pub async fn execute(&self, order_id: Uuid) -> Result<Order, StorefrontError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(StorefrontError::OrderNotFound)
    }
}

// ── UpdateOrderStatus ────────────────────────────────────────────────────────

pub struct UpdateOrderStatusUseCase<O, A>
where
    O: OrderRepository,
    A: ActivityLog,
{
    pub orders: O,
    pub activity: A,
}

impl<O, A> UpdateOrderStatusUseCase<O, A>
where
    O: OrderRepository,
    A: ActivityLog,
{
    pub async fn execute(
        &self,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<(), StorefrontError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StorefrontError::OrderNotFound)?;

        if !order.order_status.can_transition(next) {
            return Err(StorefrontError::InvalidTransition);
        }

        self.orders.update_status(order_id, next).await?;
        self.activity
            .record(&ActivityRecord::new(
                ActivityKind::OrderStatusChanged,
                Some(order_id),
                json!({ "from": order.order_status.as_str(), "to": next.as_str() }),
            ))
            .await?;
        Ok(())
    }
}

// ── Cancellation (OTP-gated) ─────────────────────────────────────────────────

pub struct RequestCancellationUseCase<O, R, L, S>
where
    O: OrderRepository,
    R: OtpRepository,
    L: RateLimiter,
    S: OtpSender,
{
    pub orders: O,
    pub issue: IssueOtpUseCase<R, L, S>,
}

impl<O, R, L, S> RequestCancellationUseCase<O, R, L, S>
where
    O: OrderRepository,
    R: OtpRepository,
    L: RateLimiter,
    S: OtpSender,
{
    /// Send an `order_cancel` code to the order's contact email. The
    /// cancellation itself only happens after the code is verified.
    pub async fn execute(&self, order_id: Uuid, user_id: Uuid) -> Result<(), StorefrontError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StorefrontError::OrderNotFound)?;
        if order.user_id != user_id {
            return Err(StorefrontError::Forbidden);
        }
        if !order.order_status.is_cancellable() {
            return Err(StorefrontError::InvalidTransition);
        }

        self.issue
            .execute(IssueOtpInput {
                subject: Subject::Email(order.contact_email),
                purpose: OtpPurpose::OrderCancel,
            })
            .await
    }
}

pub struct ConfirmCancellationUseCase<R, O, SR, P, A>
where
    R: OtpRepository,
    O: OrderRepository,
    SR: ShipmentRepository,
    P: ShippingPort,
    A: ActivityLog,
{
    pub verify: VerifyOtpUseCase<R>,
    pub orders: O,
    pub shipments: SR,
    pub shipping: P,
    pub activity: A,
}

impl<R, O, SR, P, A> ConfirmCancellationUseCase<R, O, SR, P, A>
where
    R: OtpRepository,
    O: OrderRepository,
    SR: ShipmentRepository,
    P: ShippingPort,
    A: ActivityLog,
{
    /// Verify the cancellation code, then cancel the order and any
    /// registered shipment. The aggregator cancel call degrades silently —
    /// the local cancellation is authoritative.
    pub async fn execute(
        &self,
        order_id: Uuid,
        user_id: Uuid,
        code: String,
    ) -> Result<(), StorefrontError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StorefrontError::OrderNotFound)?;
        if order.user_id != user_id {
            return Err(StorefrontError::Forbidden);
        }
        if !order.order_status.is_cancellable() {
            return Err(StorefrontError::InvalidTransition);
        }

        self.verify
            .execute(VerifyOtpInput {
                subject: Subject::Email(order.contact_email.clone()),
                purpose: OtpPurpose::OrderCancel,
                code,
            })
            .await?;

        self.orders
            .update_status(order_id, OrderStatus::Cancelled)
            .await?;

        if let Some(shipment) = self.shipments.find_by_order(order_id).await? {
            if let Some(aggregator_id) = shipment.aggregator_shipment_id.as_deref() {
                if let Err(e) = self.shipping.cancel_shipment(aggregator_id).await {
                    tracing::warn!(
                        order_id = %order_id,
                        shipment_id = aggregator_id,
                        error = %e,
                        "aggregator shipment cancel failed"
                    );
                }
            }
            self.shipments.update_status(shipment.id, "cancelled").await?;
        }

        self.activity
            .record(&ActivityRecord::new(
                ActivityKind::OrderCancelled,
                Some(order_id),
                json!({ "by": user_id }),
            ))
            .await?;
        Ok(())
    }
}
