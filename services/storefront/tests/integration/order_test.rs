use chrono::{Duration, Utc};
use uuid::Uuid;

use asirex_domain::activity::ActivityKind;
use asirex_domain::money::Money;
use asirex_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use asirex_storefront::domain::types::{AppliesTo, Campaign, DiscountType, Shipment};
use asirex_storefront::error::StorefrontError;
use asirex_storefront::usecase::order::{
    ConfirmCancellationUseCase, CreateOrderInput, CreateOrderUseCase,
    RequestCancellationUseCase, UpdateOrderStatusUseCase,
};
use asirex_storefront::usecase::otp::{IssueOtpUseCase, VerifyOtpUseCase};

use crate::helpers::{
    MockActivityLog, MockCampaignRepo, MockGatewayPort, MockOrderRepo, MockOtpRepo,
    MockRateLimiter, MockSender, MockShipmentRepo, MockShippingPort, test_item, test_order,
};

fn live_campaign(percent: i64, cap_rupees: Option<i64>) -> Campaign {
    let now = Utc::now();
    Campaign {
        id: Uuid::now_v7(),
        name: "Diwali Dhamaka".to_owned(),
        discount_type: DiscountType::Percentage,
        discount_value: percent,
        min_order_amount: Money::ZERO,
        max_discount_amount: cap_rupees.map(Money::from_rupees),
        applies_to: AppliesTo::All,
        target_categories: vec![],
        target_product_ids: vec![],
        starts_at: now - Duration::days(1),
        ends_at: now + Duration::days(1),
        order_cap: None,
        orders_used: 0,
        active: true,
        created_at: now,
    }
}

fn create_input(
    user_id: Uuid,
    items: Vec<asirex_storefront::domain::types::LineItem>,
    method: PaymentMethod,
) -> CreateOrderInput {
    CreateOrderInput {
        user_id,
        contact_email: "asha@example.in".to_owned(),
        contact_phone: None,
        items,
        payment_method: method,
    }
}

#[tokio::test]
async fn should_apply_capped_campaign_discount_on_create() {
    let campaign = live_campaign(10, Some(200));
    let campaign_id = campaign.id;
    let campaigns = MockCampaignRepo::with(vec![campaign]);
    let usage = campaigns.usage_handle();
    let activity = MockActivityLog::empty();
    let entries = activity.entries_handle();

    let uc = CreateOrderUseCase {
        campaigns,
        orders: MockOrderRepo::empty(),
        activity,
        gateway: MockGatewayPort::working(),
    };
    // ₹5000 cart: 10% would be ₹500, cap brings it to ₹200.
    let order = uc
        .execute(create_input(
            Uuid::now_v7(),
            vec![test_item(2500, 2)],
            PaymentMethod::Razorpay,
        ))
        .await
        .unwrap();

    assert_eq!(order.subtotal, Money::from_rupees(5000));
    assert_eq!(order.discount, Money::from_rupees(200));
    assert_eq!(order.total, Money::from_rupees(4800));
    assert_eq!(order.campaign_id, Some(campaign_id));
    assert!(order.gateway_order_id.is_some());

    assert_eq!(usage.lock().unwrap().as_slice(), &[campaign_id]);
    assert_eq!(entries.lock().unwrap()[0].kind, ActivityKind::OrderCreated);
}

#[tokio::test]
async fn should_create_cod_order_confirmed_without_gateway_call() {
    let uc = CreateOrderUseCase {
        campaigns: MockCampaignRepo::empty(),
        orders: MockOrderRepo::empty(),
        activity: MockActivityLog::empty(),
        // A down gateway proves the COD path never reaches it.
        gateway: MockGatewayPort::down(),
    };
    let order = uc
        .execute(create_input(
            Uuid::now_v7(),
            vec![test_item(1200, 1)],
            PaymentMethod::Cod,
        ))
        .await
        .unwrap();

    assert_eq!(order.order_status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert!(order.gateway_order_id.is_none());
}

#[tokio::test]
async fn should_propagate_gateway_outage_without_storing_the_order() {
    let repo = MockOrderRepo::empty();
    let orders = repo.orders_handle();

    let uc = CreateOrderUseCase {
        campaigns: MockCampaignRepo::empty(),
        orders: repo,
        activity: MockActivityLog::empty(),
        gateway: MockGatewayPort::down(),
    };
    let result = uc
        .execute(create_input(
            Uuid::now_v7(),
            vec![test_item(1200, 1)],
            PaymentMethod::Razorpay,
        ))
        .await;

    assert!(matches!(result, Err(StorefrontError::UpstreamUnavailable)));
    assert!(orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_empty_cart() {
    let uc = CreateOrderUseCase {
        campaigns: MockCampaignRepo::empty(),
        orders: MockOrderRepo::empty(),
        activity: MockActivityLog::empty(),
        gateway: MockGatewayPort::working(),
    };
    let result = uc
        .execute(create_input(Uuid::now_v7(), vec![], PaymentMethod::Cod))
        .await;
    assert!(matches!(result, Err(StorefrontError::MissingData)));
}

#[tokio::test]
async fn should_enforce_one_stage_fulfilment_transitions() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Cod);
    let repo = MockOrderRepo::with(vec![order.clone()]);
    let orders = repo.orders_handle();
    let activity = MockActivityLog::empty();
    let entries = activity.entries_handle();

    let uc = UpdateOrderStatusUseCase {
        orders: repo,
        activity,
    };

    // Pending cannot jump straight to Shipped.
    let skip = uc.execute(order.id, OrderStatus::Shipped).await;
    assert!(matches!(skip, Err(StorefrontError::InvalidTransition)));

    uc.execute(order.id, OrderStatus::Confirmed).await.unwrap();
    assert_eq!(
        orders.lock().unwrap()[0].order_status,
        OrderStatus::Confirmed
    );
    assert_eq!(
        entries.lock().unwrap()[0].kind,
        ActivityKind::OrderStatusChanged
    );
}

#[tokio::test]
async fn should_cancel_order_through_the_emailed_code() {
    let user_id = Uuid::now_v7();
    let order = test_order(user_id, PaymentMethod::Cod);
    let order_repo = MockOrderRepo::with(vec![order.clone()]);
    let otp_repo = MockOtpRepo::empty();
    let sender = MockSender::working();
    let sent = sender.sent_handle();

    let request = RequestCancellationUseCase {
        orders: order_repo.clone_handle(),
        issue: IssueOtpUseCase {
            otps: otp_repo.clone_handle(),
            limiter: MockRateLimiter::open(),
            sender,
        },
    };
    request.execute(order.id, user_id).await.unwrap();

    let code = {
        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].0, order.contact_email);
        sent[0].1.clone()
    };

    let now = Utc::now();
    let shipment = Shipment {
        id: Uuid::now_v7(),
        order_id: order.id,
        aggregator_shipment_id: Some("88001122".to_owned()),
        awb: Some("AWB0001".to_owned()),
        courier: Some("Delhivery".to_owned()),
        status: "created".to_owned(),
        created_at: now,
        updated_at: now,
    };
    let shipments = MockShipmentRepo::with(vec![shipment]);
    let shipments_handle = shipments.shipments_handle();
    let shipping = MockShippingPort::working();
    let cancelled = shipping.cancelled_handle();
    let activity = MockActivityLog::empty();
    let entries = activity.entries_handle();

    let confirm = ConfirmCancellationUseCase {
        verify: VerifyOtpUseCase { otps: otp_repo },
        orders: order_repo.clone_handle(),
        shipments,
        shipping,
        activity,
    };
    confirm.execute(order.id, user_id, code).await.unwrap();

    assert_eq!(
        order_repo.orders.lock().unwrap()[0].order_status,
        OrderStatus::Cancelled
    );
    assert_eq!(cancelled.lock().unwrap().as_slice(), &["88001122".to_owned()]);
    assert_eq!(shipments_handle.lock().unwrap()[0].status, "cancelled");
    assert_eq!(entries.lock().unwrap()[0].kind, ActivityKind::OrderCancelled);
}

#[tokio::test]
async fn should_cancel_locally_even_when_aggregator_cancel_fails() {
    let user_id = Uuid::now_v7();
    let order = test_order(user_id, PaymentMethod::Cod);
    let order_repo = MockOrderRepo::with(vec![order.clone()]);
    let otp_repo = MockOtpRepo::empty();
    let sender = MockSender::working();
    let sent = sender.sent_handle();

    let request = RequestCancellationUseCase {
        orders: order_repo.clone_handle(),
        issue: IssueOtpUseCase {
            otps: otp_repo.clone_handle(),
            limiter: MockRateLimiter::open(),
            sender,
        },
    };
    request.execute(order.id, user_id).await.unwrap();
    let code = sent.lock().unwrap()[0].1.clone();

    let now = Utc::now();
    let shipments = MockShipmentRepo::with(vec![Shipment {
        id: Uuid::now_v7(),
        order_id: order.id,
        aggregator_shipment_id: Some("88001122".to_owned()),
        awb: None,
        courier: None,
        status: "created".to_owned(),
        created_at: now,
        updated_at: now,
    }]);

    let confirm = ConfirmCancellationUseCase {
        verify: VerifyOtpUseCase { otps: otp_repo },
        orders: order_repo.clone_handle(),
        shipments,
        shipping: MockShippingPort::cancel_broken(),
        activity: MockActivityLog::empty(),
    };
    confirm.execute(order.id, user_id, code).await.unwrap();

    assert_eq!(
        order_repo.orders.lock().unwrap()[0].order_status,
        OrderStatus::Cancelled
    );
}

#[tokio::test]
async fn should_forbid_cancellation_of_another_users_order() {
    let order = test_order(Uuid::now_v7(), PaymentMethod::Cod);

    let uc = RequestCancellationUseCase {
        orders: MockOrderRepo::with(vec![order.clone()]),
        issue: IssueOtpUseCase {
            otps: MockOtpRepo::empty(),
            limiter: MockRateLimiter::open(),
            sender: MockSender::working(),
        },
    };
    let result = uc.execute(order.id, Uuid::now_v7()).await;
    assert!(matches!(result, Err(StorefrontError::Forbidden)));
}

#[tokio::test]
async fn should_not_request_cancellation_for_delivered_order() {
    let user_id = Uuid::now_v7();
    let mut order = test_order(user_id, PaymentMethod::Cod);
    order.order_status = OrderStatus::Delivered;

    let uc = RequestCancellationUseCase {
        orders: MockOrderRepo::with(vec![order.clone()]),
        issue: IssueOtpUseCase {
            otps: MockOtpRepo::empty(),
            limiter: MockRateLimiter::open(),
            sender: MockSender::working(),
        },
    };
    let result = uc.execute(order.id, user_id).await;
    assert!(matches!(result, Err(StorefrontError::InvalidTransition)));
}

#[tokio::test]
async fn should_reject_cancellation_confirm_with_wrong_code() {
    let user_id = Uuid::now_v7();
    let order = test_order(user_id, PaymentMethod::Cod);
    let order_repo = MockOrderRepo::with(vec![order.clone()]);
    let otp_repo = MockOtpRepo::empty();
    let sender = MockSender::working();
    let sent = sender.sent_handle();

    let request = RequestCancellationUseCase {
        orders: order_repo.clone_handle(),
        issue: IssueOtpUseCase {
            otps: otp_repo.clone_handle(),
            limiter: MockRateLimiter::open(),
            sender,
        },
    };
    request.execute(order.id, user_id).await.unwrap();

    // Any code other than the one that was sent.
    let wrong_code = if sent.lock().unwrap()[0].1 == "000000" {
        "000001".to_owned()
    } else {
        "000000".to_owned()
    };

    let confirm = ConfirmCancellationUseCase {
        verify: VerifyOtpUseCase { otps: otp_repo },
        orders: order_repo.clone_handle(),
        shipments: MockShipmentRepo::empty(),
        shipping: MockShippingPort::working(),
        activity: MockActivityLog::empty(),
    };
    let result = confirm.execute(order.id, user_id, wrong_code).await;

    assert!(matches!(result, Err(StorefrontError::InvalidOtp { .. })));
    assert_eq!(
        order_repo.orders.lock().unwrap()[0].order_status,
        OrderStatus::Pending,
        "order is untouched until the code verifies"
    );
}
