use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use asirex_core::identity::{IdentityHeaders, ROLE_ADMIN};

use crate::error::StorefrontError;
use crate::state::AppState;
use crate::usecase::payment::{
    PaymentCallback, PayuCallback, UnlockPaymentUseCase, VerifyPaymentUseCase,
};

fn verify_usecase(
    state: &AppState,
) -> VerifyPaymentUseCase<
    crate::infra::db::DbOrderRepository,
    crate::infra::counters::RedisRateLimiter,
    crate::infra::db::DbActivityLog,
> {
    VerifyPaymentUseCase {
        orders: state.order_repo(),
        limiter: state.rate_limiter(),
        activity: state.activity_log(),
        razorpay_secret: state.razorpay_key_secret.clone(),
        payu_merchant_key: state.payu_merchant_key.clone(),
        payu_salt: state.payu_salt.clone(),
    }
}

#[derive(Deserialize)]
pub struct RazorpayCallbackRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// `POST /payments/razorpay/callback` — verify the checkout signature
/// and settle the order.
pub async fn razorpay_callback(
    State(state): State<AppState>,
    Json(body): Json<RazorpayCallbackRequest>,
) -> Result<Json<serde_json::Value>, StorefrontError> {
    let order_id = verify_usecase(&state)
        .execute(PaymentCallback::Razorpay {
            gateway_order_id: body.razorpay_order_id,
            payment_id: body.razorpay_payment_id,
            signature: body.razorpay_signature,
        })
        .await?;
    Ok(Json(json!({ "order_id": order_id, "payment_status": "paid" })))
}

/// PayU posts its callback as a form; `mihpayid` is its payment id.
#[derive(Deserialize)]
pub struct PayuCallbackRequest {
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub status: String,
    pub mihpayid: String,
    pub hash: String,
}

/// `POST /payments/payu/callback` — verify the reverse response hash
/// and settle the order.
pub async fn payu_callback(
    State(state): State<AppState>,
    Form(body): Form<PayuCallbackRequest>,
) -> Result<Json<serde_json::Value>, StorefrontError> {
    let order_id = verify_usecase(&state)
        .execute(PaymentCallback::Payu(PayuCallback {
            txnid: body.txnid,
            amount: body.amount,
            productinfo: body.productinfo,
            firstname: body.firstname,
            email: body.email,
            status: body.status,
            payment_id: body.mihpayid,
            hash: body.hash,
        }))
        .await?;
    Ok(Json(json!({ "order_id": order_id, "payment_status": "paid" })))
}

/// `POST /admin/orders/{id}/payment-unlock` — clear the lockout counter
/// after manual review.
pub async fn unlock_payment(
    State(state): State<AppState>,
    identity: IdentityHeaders,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StorefrontError> {
    if identity.user_role != ROLE_ADMIN {
        return Err(StorefrontError::Forbidden);
    }
    let usecase = UnlockPaymentUseCase {
        orders: state.order_repo(),
        limiter: state.rate_limiter(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
