//! Payment gateway signature verification.
//!
//! Signature math is pure so it can be tested without a gateway; the
//! usecase wraps it with the lockout counter and the exactly-once paid
//! transition.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use asirex_domain::activity::ActivityKind;
use asirex_domain::order::PaymentStatus;

use crate::domain::repository::{ActivityLog, OrderRepository, RateLimiter};
use crate::domain::types::{ActivityRecord, MAX_PAYMENT_FAILURES};
use crate::error::StorefrontError;

type HmacSha256 = Hmac<sha2::Sha256>;

/// Razorpay callback signature: hex HMAC-SHA256 over `order_id|payment_id`.
pub fn razorpay_signature(gateway_order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a supplied hex signature.
pub fn verify_razorpay_signature(
    gateway_order_id: &str,
    payment_id: &str,
    supplied_hex: &str,
    secret: &str,
) -> bool {
    let Ok(supplied) = hex::decode(supplied_hex) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.verify_slice(&supplied).is_ok()
}

/// Fields echoed back by PayU that participate in the response hash.
#[derive(Debug, Clone)]
pub struct PayuCallback {
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub status: String,
    pub payment_id: String,
    pub hash: String,
}

/// PayU response hash: SHA-512 over the reverse pipe-delimited field list,
/// salt first. The eleven empty segments are the unused udf10..udf1 slots.
pub fn payu_response_hash(cb: &PayuCallback, merchant_key: &str, salt: &str) -> String {
    let message = format!(
        "{salt}|{status}|||||||||||{email}|{firstname}|{productinfo}|{amount}|{txnid}|{key}",
        status = cb.status,
        email = cb.email,
        firstname = cb.firstname,
        productinfo = cb.productinfo,
        amount = cb.amount,
        txnid = cb.txnid,
        key = merchant_key,
    );
    hex::encode(Sha512::digest(message.as_bytes()))
}

pub fn verify_payu_hash(cb: &PayuCallback, merchant_key: &str, salt: &str) -> bool {
    let expected = payu_response_hash(cb, merchant_key, salt);
    let supplied = cb.hash.to_ascii_lowercase();
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}

/// Gateway-specific callback payloads.
pub enum PaymentCallback {
    Razorpay {
        gateway_order_id: String,
        payment_id: String,
        signature: String,
    },
    Payu(PayuCallback),
}

pub struct VerifyPaymentUseCase<O, L, A>
where
    O: OrderRepository,
    L: RateLimiter,
    A: ActivityLog,
{
    pub orders: O,
    pub limiter: L,
    pub activity: A,
    pub razorpay_secret: String,
    pub payu_merchant_key: String,
    pub payu_salt: String,
}

impl<O, L, A> VerifyPaymentUseCase<O, L, A>
where
    O: OrderRepository,
    L: RateLimiter,
    A: ActivityLog,
{
    /// Validate the callback signature and settle the order.
    ///
    /// Fail-closed: after `MAX_PAYMENT_FAILURES` consecutive mismatches the
    /// order is locked for verification until support clears the counter,
    /// and a settlement that ended in `failed` is terminal — a later
    /// callback cannot revive it even with a genuine signature.
    /// Returns the order id on success.
    pub async fn execute(&self, callback: PaymentCallback) -> Result<Uuid, StorefrontError> {
        let (order, payment_id, signature_ok) = match &callback {
            PaymentCallback::Razorpay {
                gateway_order_id,
                payment_id,
                signature,
            } => {
                let order = self
                    .orders
                    .find_by_gateway_order_id(gateway_order_id)
                    .await?
                    .ok_or(StorefrontError::OrderNotFound)?;
                let ok = verify_razorpay_signature(
                    gateway_order_id,
                    payment_id,
                    signature,
                    &self.razorpay_secret,
                );
                (order, payment_id.clone(), ok)
            }
            PaymentCallback::Payu(cb) => {
                let order_id: Uuid = cb
                    .txnid
                    .parse()
                    .map_err(|_| StorefrontError::OrderNotFound)?;
                let order = self
                    .orders
                    .find_by_id(order_id)
                    .await?
                    .ok_or(StorefrontError::OrderNotFound)?;
                let ok = cb.status == "success"
                    && verify_payu_hash(cb, &self.payu_merchant_key, &self.payu_salt);
                (order, cb.payment_id.clone(), ok)
            }
        };

        if self.limiter.payment_failures(order.id).await? >= MAX_PAYMENT_FAILURES {
            return Err(StorefrontError::VerificationLocked);
        }

        if !signature_ok {
            let failures = self.limiter.incr_payment_failures(order.id).await?;
            self.orders.mark_payment_failed(order.id).await?;
            self.activity
                .record(&ActivityRecord::new(
                    ActivityKind::PaymentFailed,
                    Some(order.id),
                    json!({ "payment_id": payment_id, "consecutive_failures": failures }),
                ))
                .await?;
            return Err(StorefrontError::SignatureInvalid);
        }

        self.limiter.clear_payment_failures(order.id).await?;
        let newly_paid = self.orders.mark_paid_once(order.id, &payment_id).await?;
        if !newly_paid && order.payment_status != PaymentStatus::Paid {
            // Already settled as failed; a late valid callback cannot revive it.
            return Err(StorefrontError::InvalidTransition);
        }
        if newly_paid {
            self.activity
                .record(&ActivityRecord::new(
                    ActivityKind::PaymentVerified,
                    Some(order.id),
                    json!({
                        "payment_id": payment_id,
                        "amount": order.total,
                        "method": order.payment_method.as_str(),
                    }),
                ))
                .await?;
        }
        Ok(order.id)
    }
}

/// Support action: clear the lockout counter after manual review.
pub struct UnlockPaymentUseCase<O, L>
where
    O: OrderRepository,
    L: RateLimiter,
{
    pub orders: O,
    pub limiter: L,
}

impl<O, L> UnlockPaymentUseCase<O, L>
where
    O: OrderRepository,
    L: RateLimiter,
{
    pub async fn execute(&self, order_id: Uuid) -> Result<(), StorefrontError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(StorefrontError::OrderNotFound)?;
        self.limiter.clear_payment_failures(order_id).await
    }
}
