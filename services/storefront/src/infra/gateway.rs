//! Razorpay HTTP client. Orders are registered with the gateway before
//! the customer is shown the payment widget; the gateway echoes the
//! order id back in its payment callback.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use asirex_domain::money::Money;

use crate::domain::repository::PaymentGatewayPort;
use crate::domain::types::GatewayOrder;
use crate::error::StorefrontError;

#[derive(Clone)]
pub struct RazorpayClient {
    pub http: reqwest::Client,
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    /// Smallest currency unit (paise).
    amount: i64,
    currency: &'a str,
    receipt: String,
}

#[derive(Deserialize)]
struct CreateOrderReply {
    id: String,
    amount: i64,
    currency: String,
}

impl PaymentGatewayPort for RazorpayClient {
    async fn create_gateway_order(
        &self,
        order_id: Uuid,
        amount: Money,
    ) -> Result<GatewayOrder, StorefrontError> {
        let url = format!("{}/v1/orders", self.base_url);
        let body = CreateOrderBody {
            amount: amount.paise(),
            currency: "INR",
            receipt: order_id.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "gateway order creation request failed");
                StorefrontError::UpstreamUnavailable
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "gateway rejected order creation");
            return Err(StorefrontError::UpstreamUnavailable);
        }

        let reply: CreateOrderReply = response
            .json()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "gateway order reply was not parseable");
                StorefrontError::UpstreamUnavailable
            })?;

        Ok(GatewayOrder {
            gateway_order_id: reply.id,
            amount: Money(reply.amount),
            currency: reply.currency,
        })
    }
}
