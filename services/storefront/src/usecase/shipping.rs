//! Shipment creation and tracking via the courier aggregator.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use asirex_domain::activity::ActivityKind;

use crate::domain::repository::{
    ActivityLog, OrderRepository, ShipmentRepository, ShippingPort,
};
use crate::domain::types::{ActivityRecord, Shipment, TrackingInfo};
use crate::error::StorefrontError;

pub struct CreateShipmentUseCase<O, S, P, A>
where
    O: OrderRepository,
    S: ShipmentRepository,
    P: ShippingPort,
    A: ActivityLog,
{
    pub orders: O,
    pub shipments: S,
    pub shipping: P,
    pub activity: A,
}

impl<O, S, P, A> CreateShipmentUseCase<O, S, P, A>
where
    O: OrderRepository,
    S: ShipmentRepository,
    P: ShippingPort,
    A: ActivityLog,
{
    /// Register the order with the aggregator and persist the shipment row.
    pub async fn execute(&self, order_id: Uuid) -> Result<Shipment, StorefrontError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(StorefrontError::OrderNotFound)?;

        if !matches!(
            order.order_status,
            asirex_domain::order::OrderStatus::Confirmed
                | asirex_domain::order::OrderStatus::Processing
        ) {
            return Err(StorefrontError::InvalidTransition);
        }

        let registered = self.shipping.create_shipment(&order).await?;

        let now = Utc::now();
        let shipment = Shipment {
            id: Uuid::now_v7(),
            order_id,
            aggregator_shipment_id: Some(registered.shipment_id),
            awb: registered.awb,
            courier: registered.courier,
            status: registered.status,
            created_at: now,
            updated_at: now,
        };
        self.shipments.create(&shipment).await?;

        self.activity
            .record(&ActivityRecord::new(
                ActivityKind::ShipmentCreated,
                Some(order_id),
                json!({
                    "shipment_id": shipment.aggregator_shipment_id,
                    "awb": shipment.awb,
                }),
            ))
            .await?;

        Ok(shipment)
    }
}

pub struct TrackShipmentUseCase<S, P>
where
    S: ShipmentRepository,
    P: ShippingPort,
{
    pub shipments: S,
    pub shipping: P,
}

impl<S, P> TrackShipmentUseCase<S, P>
where
    S: ShipmentRepository,
    P: ShippingPort,
{
    /// Fetch live tracking from the aggregator and mirror the status locally.
    pub async fn execute(&self, order_id: Uuid) -> Result<TrackingInfo, StorefrontError> {
        let shipment = self
            .shipments
            .find_by_order(order_id)
            .await?
            .ok_or(StorefrontError::ShipmentNotFound)?;

        let aggregator_id = shipment
            .aggregator_shipment_id
            .as_deref()
            .ok_or(StorefrontError::ShipmentNotFound)?;

        let tracking = self.shipping.track(aggregator_id).await?;
        if tracking.current_status != shipment.status {
            self.shipments
                .update_status(shipment.id, &tracking.current_status)
                .await?;
        }
        Ok(tracking)
    }
}
