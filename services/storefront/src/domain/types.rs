use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use asirex_domain::money::Money;
use asirex_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use asirex_domain::otp::OtpPurpose;

/// Stored one-time code. Only the SHA-256 hex digest of the code is kept.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub id: Uuid,
    pub subject_key: String,
    pub purpose: OtpPurpose,
    pub code_hash: String,
    pub attempts: i32,
    pub verified: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn remaining_attempts(&self) -> i32 {
        (self.purpose.max_attempts() - self.attempts).max(0)
    }
}

/// How a campaign's discount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Which carts a campaign applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliesTo {
    All,
    Category,
    Products,
}

impl AppliesTo {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Category => "category",
            Self::Products => "products",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "category" => Some(Self::Category),
            "products" => Some(Self::Products),
            _ => None,
        }
    }
}

/// Festival sale campaign.
#[derive(Debug, Clone)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub discount_type: DiscountType,
    /// Percent points for `Percentage`, paise for `Fixed`.
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
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// Active flag set, inside the time window, order cap not exhausted.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active
            && self.starts_at <= now
            && now <= self.ends_at
            && self.order_cap.is_none_or(|cap| self.orders_used < cap)
    }

    /// Whether the campaign covers the given cart contents.
    pub fn covers(&self, categories: &[String], product_ids: &[Uuid]) -> bool {
        match self.applies_to {
            AppliesTo::All => true,
            AppliesTo::Category => categories
                .iter()
                .any(|c| self.target_categories.iter().any(|t| t == c)),
            AppliesTo::Products => product_ids
                .iter()
                .any(|p| self.target_product_ids.contains(p)),
        }
    }
}

/// Order line item as submitted by the storefront cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl LineItem {
    /// Unit price times quantity, saturating: both values arrive from the
    /// client and must not be able to overflow order math.
    pub fn line_total(&self) -> Money {
        Money(
            self.unit_price
                .paise()
                .saturating_mul(i64::from(self.quantity)),
        )
    }
}

/// Customer order.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub campaign_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub gateway_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit trail entry.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub kind: asirex_domain::activity::ActivityKind,
    pub order_id: Option<Uuid>,
    pub subject: Option<String>,
    pub detail: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn new(
        kind: asirex_domain::activity::ActivityKind,
        order_id: Option<Uuid>,
        detail: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            order_id,
            subject: None,
            detail,
            created_at: Utc::now(),
        }
    }
}

/// Local shipment row mirroring the aggregator's state.
#[derive(Debug, Clone)]
pub struct Shipment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub aggregator_shipment_id: Option<String>,
    pub awb: Option<String>,
    pub courier: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of an outbound gateway order-creation call.
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub gateway_order_id: String,
    pub amount: Money,
    pub currency: String,
}

/// Shipment as registered with the courier aggregator.
#[derive(Debug, Clone)]
pub struct AggregatorShipment {
    pub shipment_id: String,
    pub awb: Option<String>,
    pub courier: Option<String>,
    pub status: String,
}

/// Live tracking state for a shipment.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingInfo {
    pub awb: Option<String>,
    pub courier: Option<String>,
    pub current_status: String,
}

/// Consecutive signature failures before payment verification locks.
pub const MAX_PAYMENT_FAILURES: u32 = 5;

/// TTL for the payment-failure lockout counter (24 h).
pub const PAYMENT_FAILURE_TTL_SECS: i64 = 86_400;

/// Shipping aggregator auth tokens stay valid for 10 days; re-login after 9.
pub const SHIPPING_TOKEN_TTL_SECS: u64 = 9 * 24 * 3600;
