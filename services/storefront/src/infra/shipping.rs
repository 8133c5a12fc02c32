//! ShipRocket courier aggregator client. Auth tokens from the login
//! endpoint are valid for 10 days; we cache them in Redis for 9 and
//! re-login on expiry.

use anyhow::Context;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::json;

use asirex_domain::order::PaymentMethod;

use crate::domain::repository::ShippingPort;
use crate::domain::types::{AggregatorShipment, Order, TrackingInfo, SHIPPING_TOKEN_TTL_SECS};
use crate::error::StorefrontError;

const TOKEN_KEY: &str = "shiprocket:token";

#[derive(Clone)]
pub struct ShipRocketClient {
    pub http: reqwest::Client,
    pub redis: Pool,
    pub base_url: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginReply {
    token: String,
}

#[derive(Deserialize)]
struct CreateReply {
    shipment_id: serde_json::Value,
    #[serde(default)]
    awb_code: Option<String>,
    #[serde(default)]
    courier_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct TrackReply {
    #[serde(default)]
    awb_code: Option<String>,
    #[serde(default)]
    courier_name: Option<String>,
    #[serde(default)]
    current_status: Option<String>,
}

impl ShipRocketClient {
    async fn token(&self) -> Result<String, StorefrontError> {
        let mut conn = self
            .redis
            .get()
            .await
            .map_err(|e| StorefrontError::Internal(e.into()))?;

        let cached: Option<String> = conn
            .get(TOKEN_KEY)
            .await
            .map_err(|e| StorefrontError::Internal(anyhow::Error::from(e)))?;
        if let Some(token) = cached {
            return Ok(token);
        }

        let url = format!("{}/v1/external/auth/login", self.base_url);
        let reply: LoginReply = self
            .http
            .post(&url)
            .json(&LoginBody {
                email: &self.email,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "aggregator login request failed");
                StorefrontError::UpstreamUnavailable
            })?
            .error_for_status()
            .map_err(|e| {
                tracing::warn!(error = %e, "aggregator login rejected");
                StorefrontError::UpstreamUnavailable
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "aggregator login reply was not parseable");
                StorefrontError::UpstreamUnavailable
            })?;

        let (): () = conn
            .set_ex(TOKEN_KEY, &reply.token, SHIPPING_TOKEN_TTL_SECS)
            .await
            .map_err(|e| StorefrontError::Internal(anyhow::Error::from(e)))?;

        Ok(reply.token)
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, StorefrontError> {
        let token = self.token().await?;
        self.http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, path, "aggregator request failed");
                StorefrontError::UpstreamUnavailable
            })?
            .error_for_status()
            .map_err(|e| {
                tracing::warn!(error = %e, path, "aggregator rejected request");
                StorefrontError::UpstreamUnavailable
            })
    }
}

impl ShippingPort for ShipRocketClient {
    async fn create_shipment(&self, order: &Order) -> Result<AggregatorShipment, StorefrontError> {
        let items: Vec<serde_json::Value> = order
            .items
            .iter()
            .map(|item| {
                json!({
                    "name": item.name,
                    "sku": item.product_id,
                    "units": item.quantity,
                    "selling_price": item.unit_price,
                })
            })
            .collect();

        let body = json!({
            "order_id": order.id,
            "order_date": order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            "payment_method": if matches!(order.payment_method, PaymentMethod::Cod) { "COD" } else { "Prepaid" },
            "sub_total": order.total,
            "order_items": items,
        });

        let reply: CreateReply = self
            .post_json("/v1/external/orders/create/adhoc", &body)
            .await?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "aggregator create reply was not parseable");
                StorefrontError::UpstreamUnavailable
            })?;

        // The aggregator returns shipment_id as a number; keep it as text.
        let shipment_id = match reply.shipment_id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        Ok(AggregatorShipment {
            shipment_id,
            awb: reply.awb_code,
            courier: reply.courier_name,
            status: reply.status.unwrap_or_else(|| "created".to_owned()),
        })
    }

    async fn cancel_shipment(&self, shipment_id: &str) -> Result<(), StorefrontError> {
        let id: i64 = shipment_id
            .parse()
            .context("aggregator shipment id was not numeric")?;
        self.post_json("/v1/external/orders/cancel/shipment", &json!({ "ids": [id] }))
            .await?;
        Ok(())
    }

    async fn track(&self, shipment_id: &str) -> Result<TrackingInfo, StorefrontError> {
        let token = self.token().await?;
        let url = format!(
            "{}/v1/external/courier/track/shipment/{shipment_id}",
            self.base_url
        );
        let reply: TrackReply = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "aggregator track request failed");
                StorefrontError::UpstreamUnavailable
            })?
            .error_for_status()
            .map_err(|e| {
                tracing::warn!(error = %e, "aggregator rejected track request");
                StorefrontError::UpstreamUnavailable
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "aggregator track reply was not parseable");
                StorefrontError::UpstreamUnavailable
            })?;

        Ok(TrackingInfo {
            awb: reply.awb_code,
            courier: reply.courier_name,
            current_status: reply.current_status.unwrap_or_else(|| "unknown".to_owned()),
        })
    }
}
