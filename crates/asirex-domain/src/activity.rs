//! Activity log domain types: financial and lifecycle audit events.

use serde::{Deserialize, Serialize};

/// Category of an audit log entry. Financial kinds are written by the
/// payment verification path; lifecycle kinds by order/shipment flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    PaymentVerified,
    PaymentFailed,
    OrderCreated,
    OrderStatusChanged,
    OrderCancelled,
    ShipmentCreated,
    ShipmentCancelled,
    PhoneVerified,
}
