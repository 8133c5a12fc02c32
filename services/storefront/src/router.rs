use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use asirex_core::health::{healthz, readyz};
use asirex_core::middleware::request_id_layer;

use crate::handlers::{
    activity::list_activity,
    campaigns::{
        create_campaign, list_campaigns, list_live_campaigns, preview_checkout,
        set_campaign_active,
    },
    orders::{
        confirm_cancellation, create_order, get_order, list_orders, request_cancellation,
        update_order_status,
    },
    otp::{issue_otp, verify_otp},
    payments::{payu_callback, razorpay_callback, unlock_payment},
    shipments::{create_shipment, track_order},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // OTP
        .route("/otp", post(issue_otp))
        .route("/otp/verify", post(verify_otp))
        // Campaigns / checkout
        .route("/campaigns", get(list_live_campaigns))
        .route("/checkout/preview", post(preview_checkout))
        .route("/admin/campaigns", post(create_campaign))
        .route("/admin/campaigns", get(list_campaigns))
        .route("/admin/campaigns/{id}", patch(set_campaign_active))
        // Orders
        .route("/orders", post(create_order))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/cancel", post(request_cancellation))
        .route("/orders/{id}/cancel/confirm", post(confirm_cancellation))
        .route("/admin/orders/{id}/status", patch(update_order_status))
        // Payments
        .route("/payments/razorpay/callback", post(razorpay_callback))
        .route("/payments/payu/callback", post(payu_callback))
        .route("/admin/orders/{id}/payment-unlock", post(unlock_payment))
        // Shipments
        .route("/admin/orders/{id}/shipment", post(create_shipment))
        .route("/orders/{id}/tracking", get(track_order))
        // Activity
        .route("/admin/activity", get(list_activity))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
