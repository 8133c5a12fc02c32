use asirex_domain::activity::ActivityKind;
use asirex_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use asirex_storefront::error::StorefrontError;
use asirex_storefront::usecase::payment::{
    PaymentCallback, PayuCallback, UnlockPaymentUseCase, VerifyPaymentUseCase,
    payu_response_hash, razorpay_signature,
};
use uuid::Uuid;

use crate::helpers::{MockActivityLog, MockOrderRepo, MockRateLimiter, test_order};

const RZP_SECRET: &str = "rzp-test-secret";
const PAYU_KEY: &str = "payu-merchant";
const PAYU_SALT: &str = "payu-salt";

fn usecase(
    orders: MockOrderRepo,
    limiter: MockRateLimiter,
    activity: MockActivityLog,
) -> VerifyPaymentUseCase<MockOrderRepo, MockRateLimiter, MockActivityLog> {
    VerifyPaymentUseCase {
        orders,
        limiter,
        activity,
        razorpay_secret: RZP_SECRET.to_owned(),
        payu_merchant_key: PAYU_KEY.to_owned(),
        payu_salt: PAYU_SALT.to_owned(),
    }
}

fn razorpay_callback(gateway_order_id: &str, payment_id: &str) -> PaymentCallback {
    PaymentCallback::Razorpay {
        gateway_order_id: gateway_order_id.to_owned(),
        payment_id: payment_id.to_owned(),
        signature: razorpay_signature(gateway_order_id, payment_id, RZP_SECRET),
    }
}

#[tokio::test]
async fn should_settle_order_on_valid_razorpay_signature() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Razorpay);
    let gateway_id = order.gateway_order_id.clone().unwrap();
    let repo = MockOrderRepo::with(vec![order.clone()]);
    let orders = repo.orders_handle();
    let activity = MockActivityLog::empty();
    let entries = activity.entries_handle();

    let uc = usecase(repo, MockRateLimiter::open(), activity);
    let settled_id = uc
        .execute(razorpay_callback(&gateway_id, "pay_001"))
        .await
        .unwrap();
    assert_eq!(settled_id, order.id);

    let orders = orders.lock().unwrap();
    assert_eq!(orders[0].payment_status, PaymentStatus::Paid);
    assert_eq!(orders[0].order_status, OrderStatus::Confirmed);
    assert_eq!(orders[0].payment_id.as_deref(), Some("pay_001"));

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, ActivityKind::PaymentVerified);
}

#[tokio::test]
async fn should_count_failure_and_mark_failed_on_bad_signature() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Razorpay);
    let gateway_id = order.gateway_order_id.clone().unwrap();
    let repo = MockOrderRepo::with(vec![order.clone()]);
    let orders = repo.orders_handle();
    let limiter = MockRateLimiter::open();
    let failures = limiter.failures_handle();
    let activity = MockActivityLog::empty();
    let entries = activity.entries_handle();

    let uc = usecase(repo, limiter, activity);
    let result = uc
        .execute(PaymentCallback::Razorpay {
            gateway_order_id: gateway_id,
            payment_id: "pay_001".to_owned(),
            signature: "deadbeef".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(StorefrontError::SignatureInvalid)));
    assert_eq!(*failures.lock().unwrap().get(&order.id).unwrap(), 1);
    assert_eq!(
        orders.lock().unwrap()[0].payment_status,
        PaymentStatus::Failed
    );
    assert_eq!(entries.lock().unwrap()[0].kind, ActivityKind::PaymentFailed);
}

#[tokio::test]
async fn should_lock_verification_after_consecutive_failures() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Razorpay);
    let gateway_id = order.gateway_order_id.clone().unwrap();
    let limiter = MockRateLimiter::with_failures(order.id, 5);

    let uc = usecase(
        MockOrderRepo::with(vec![order]),
        limiter,
        MockActivityLog::empty(),
    );
    // Locked even when the signature is genuine.
    let result = uc.execute(razorpay_callback(&gateway_id, "pay_001")).await;
    assert!(matches!(result, Err(StorefrontError::VerificationLocked)));
}

#[tokio::test]
async fn should_settle_payu_order_on_valid_response_hash() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Payu);
    let repo = MockOrderRepo::with(vec![order.clone()]);
    let orders = repo.orders_handle();

    let mut cb = PayuCallback {
        txnid: order.id.to_string(),
        amount: "5000.00".to_owned(),
        productinfo: "asirex order".to_owned(),
        firstname: "Asha".to_owned(),
        email: "asha@example.in".to_owned(),
        status: "success".to_owned(),
        payment_id: "403993715531".to_owned(),
        hash: String::new(),
    };
    cb.hash = payu_response_hash(&cb, PAYU_KEY, PAYU_SALT);

    let uc = usecase(repo, MockRateLimiter::open(), MockActivityLog::empty());
    uc.execute(PaymentCallback::Payu(cb)).await.unwrap();

    let orders = orders.lock().unwrap();
    assert_eq!(orders[0].payment_status, PaymentStatus::Paid);
    assert_eq!(orders[0].payment_id.as_deref(), Some("403993715531"));
}

#[tokio::test]
async fn should_reject_payu_callback_with_failure_status() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Payu);
    let repo = MockOrderRepo::with(vec![order.clone()]);

    // Hash is consistent with the payload, but the status is not success.
    let mut cb = PayuCallback {
        txnid: order.id.to_string(),
        amount: "5000.00".to_owned(),
        productinfo: "asirex order".to_owned(),
        firstname: "Asha".to_owned(),
        email: "asha@example.in".to_owned(),
        status: "failure".to_owned(),
        payment_id: "403993715531".to_owned(),
        hash: String::new(),
    };
    cb.hash = payu_response_hash(&cb, PAYU_KEY, PAYU_SALT);

    let uc = usecase(repo, MockRateLimiter::open(), MockActivityLog::empty());
    let result = uc.execute(PaymentCallback::Payu(cb)).await;
    assert!(matches!(result, Err(StorefrontError::SignatureInvalid)));
}

#[tokio::test]
async fn should_settle_exactly_once_on_duplicate_callbacks() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Razorpay);
    let gateway_id = order.gateway_order_id.clone().unwrap();
    let activity = MockActivityLog::empty();
    let entries = activity.entries_handle();

    let uc = usecase(
        MockOrderRepo::with(vec![order.clone()]),
        MockRateLimiter::open(),
        activity,
    );
    let first = uc.execute(razorpay_callback(&gateway_id, "pay_001")).await;
    let second = uc.execute(razorpay_callback(&gateway_id, "pay_001")).await;

    assert_eq!(first.unwrap(), order.id);
    assert_eq!(second.unwrap(), order.id, "duplicate callback still succeeds");
    assert_eq!(
        entries.lock().unwrap().len(),
        1,
        "only the settling callback is logged"
    );
}

#[tokio::test]
async fn should_refuse_valid_callback_after_failed_settlement() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Razorpay);
    let gateway_id = order.gateway_order_id.clone().unwrap();
    let repo = MockOrderRepo::with(vec![order.clone()]);
    let orders = repo.orders_handle();
    let activity = MockActivityLog::empty();
    let entries = activity.entries_handle();

    let uc = usecase(repo, MockRateLimiter::open(), activity);

    // First callback carries a tampered signature and settles the order failed.
    let tampered = uc
        .execute(PaymentCallback::Razorpay {
            gateway_order_id: gateway_id.clone(),
            payment_id: "pay_001".to_owned(),
            signature: "deadbeef".to_owned(),
        })
        .await;
    assert!(matches!(tampered, Err(StorefrontError::SignatureInvalid)));
    assert_eq!(
        orders.lock().unwrap()[0].payment_status,
        PaymentStatus::Failed
    );

    // A later callback with a genuine signature must not report paid.
    let late = uc.execute(razorpay_callback(&gateway_id, "pay_001")).await;
    assert!(matches!(late, Err(StorefrontError::InvalidTransition)));

    let orders = orders.lock().unwrap();
    assert_eq!(orders[0].payment_status, PaymentStatus::Failed);
    assert!(orders[0].payment_id.is_none());

    let entries = entries.lock().unwrap();
    assert!(
        entries.iter().all(|e| e.kind != ActivityKind::PaymentVerified),
        "no settlement may be logged for a failed order"
    );
}

#[tokio::test]
async fn should_return_not_found_for_unknown_gateway_order() {
    let uc = usecase(
        MockOrderRepo::empty(),
        MockRateLimiter::open(),
        MockActivityLog::empty(),
    );
    let result = uc.execute(razorpay_callback("order_missing", "pay_001")).await;
    assert!(matches!(result, Err(StorefrontError::OrderNotFound)));
}

#[tokio::test]
async fn should_clear_lockout_counter_on_unlock() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Razorpay);
    let limiter = MockRateLimiter::with_failures(order.id, 5);
    let failures = limiter.failures_handle();

    let uc = UnlockPaymentUseCase {
        orders: MockOrderRepo::with(vec![order.clone()]),
        limiter,
    };
    uc.execute(order.id).await.unwrap();
    assert!(failures.lock().unwrap().get(&order.id).is_none());
}
