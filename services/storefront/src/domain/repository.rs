#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use asirex_domain::order::OrderStatus;
use asirex_domain::otp::OtpPurpose;
use asirex_domain::pagination::PageRequest;

use crate::domain::types::{
    ActivityRecord, AggregatorShipment, Campaign, GatewayOrder, Order, OtpRecord, Shipment,
    TrackingInfo,
};
use crate::error::StorefrontError;

/// Repository for one-time verification codes.
pub trait OtpRepository: Send + Sync {
    /// Latest unverified code for a subject + purpose, if any.
    async fn find_latest_unverified(
        &self,
        subject_key: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, StorefrontError>;

    /// Insert a new code, deleting any prior rows for the same
    /// subject + purpose in the same transaction.
    async fn replace(&self, record: &OtpRecord) -> Result<(), StorefrontError>;

    /// Bump the wrong-attempt counter.
    async fn increment_attempts(&self, id: Uuid) -> Result<(), StorefrontError>;

    /// Mark a code verified (consumes it for future lookups).
    async fn mark_verified(&self, id: Uuid) -> Result<(), StorefrontError>;

    /// Remove a code (expired cleanup).
    async fn delete(&self, id: Uuid) -> Result<(), StorefrontError>;
}

/// Repository for sale campaigns.
pub trait CampaignRepository: Send + Sync {
    /// Campaigns that are active, inside their window, and under their
    /// order cap at `now`.
    async fn find_live(&self, now: DateTime<Utc>) -> Result<Vec<Campaign>, StorefrontError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>, StorefrontError>;

    async fn create(&self, campaign: &Campaign) -> Result<(), StorefrontError>;

    async fn list(&self, page: PageRequest) -> Result<Vec<Campaign>, StorefrontError>;

    /// Returns `false` if the campaign does not exist.
    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, StorefrontError>;

    /// Count an applied order against the campaign's cap.
    async fn increment_orders_used(&self, id: Uuid) -> Result<(), StorefrontError>;
}

/// Repository for customer orders.
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<(), StorefrontError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StorefrontError>;

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, StorefrontError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, StorefrontError>;

    /// Conditional update `pending -> paid` (+ order confirmed). Returns
    /// `true` only for the invocation that actually flipped the row, so
    /// duplicate gateway callbacks are harmless.
    async fn mark_paid_once(&self, id: Uuid, payment_id: &str) -> Result<bool, StorefrontError>;

    /// Conditional update `pending -> failed`; no-op if already settled.
    async fn mark_payment_failed(&self, id: Uuid) -> Result<(), StorefrontError>;

    /// Set the fulfilment status. Transition legality is the usecase's job.
    async fn update_status(&self, id: Uuid, next: OrderStatus) -> Result<(), StorefrontError>;
}

/// Append-only audit log.
pub trait ActivityLog: Send + Sync {
    async fn record(&self, entry: &ActivityRecord) -> Result<(), StorefrontError>;

    async fn list(&self, page: PageRequest) -> Result<Vec<ActivityRecord>, StorefrontError>;
}

/// Repository for shipments.
pub trait ShipmentRepository: Send + Sync {
    async fn create(&self, shipment: &Shipment) -> Result<(), StorefrontError>;

    async fn find_by_order(&self, order_id: Uuid) -> Result<Option<Shipment>, StorefrontError>;

    async fn update_status(&self, id: Uuid, status: &str) -> Result<(), StorefrontError>;
}

/// Store-backed counters (Redis). Centralized so lockout and rate limits
/// hold across server instances.
pub trait RateLimiter: Send + Sync {
    /// Atomically claim the right to issue a code for this subject.
    /// Returns `false` while a previous claim is still within the
    /// minimum inter-issue interval.
    async fn try_acquire_issue_slot(&self, subject_key: &str) -> Result<bool, StorefrontError>;

    /// Increment and return the consecutive-failure count for an order.
    async fn incr_payment_failures(&self, order_id: Uuid) -> Result<u32, StorefrontError>;

    async fn payment_failures(&self, order_id: Uuid) -> Result<u32, StorefrontError>;

    async fn clear_payment_failures(&self, order_id: Uuid) -> Result<(), StorefrontError>;
}

/// Outbound OTP delivery (email / SMS providers). Callers treat failures
/// as non-fatal: log and continue.
pub trait OtpSender: Send + Sync {
    async fn send_email_code(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), StorefrontError>;

    async fn send_sms_code(
        &self,
        to: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<(), StorefrontError>;
}

/// Outbound payment gateway calls.
pub trait PaymentGatewayPort: Send + Sync {
    /// Register the order with the gateway; the returned id is what the
    /// gateway echoes back in its payment callback.
    async fn create_gateway_order(
        &self,
        order_id: Uuid,
        amount: asirex_domain::money::Money,
    ) -> Result<GatewayOrder, StorefrontError>;
}

/// Outbound courier aggregator calls.
pub trait ShippingPort: Send + Sync {
    async fn create_shipment(&self, order: &Order) -> Result<AggregatorShipment, StorefrontError>;

    async fn cancel_shipment(&self, shipment_id: &str) -> Result<(), StorefrontError>;

    async fn track(&self, shipment_id: &str) -> Result<TrackingInfo, StorefrontError>;
}
