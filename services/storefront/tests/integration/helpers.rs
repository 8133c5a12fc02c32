use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use asirex_domain::money::Money;
use asirex_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use asirex_domain::otp::OtpPurpose;
use asirex_domain::pagination::PageRequest;

use asirex_storefront::domain::repository::{
    ActivityLog, CampaignRepository, OrderRepository, OtpRepository, OtpSender,
    PaymentGatewayPort, RateLimiter, ShipmentRepository, ShippingPort,
};
use asirex_storefront::domain::types::{
    ActivityRecord, AggregatorShipment, Campaign, GatewayOrder, LineItem, Order, OtpRecord,
    Shipment, TrackingInfo,
};
use asirex_storefront::error::StorefrontError;

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockOtpRepo {
    pub records: Arc<Mutex<Vec<OtpRecord>>>,
}

impl MockOtpRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(records: Vec<OtpRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn records_handle(&self) -> Arc<Mutex<Vec<OtpRecord>>> {
        Arc::clone(&self.records)
    }

    /// Shares the same backing store, so issue and verify usecases can
    /// operate on one set of records in a test.
    pub fn clone_handle(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl OtpRepository for MockOtpRepo {
    async fn find_latest_unverified(
        &self,
        subject_key: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, StorefrontError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.subject_key == subject_key && r.purpose == purpose && !r.verified)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn replace(&self, record: &OtpRecord) -> Result<(), StorefrontError> {
        let mut records = self.records.lock().unwrap();
        records.retain(|r| !(r.subject_key == record.subject_key && r.purpose == record.purpose));
        records.push(record.clone());
        Ok(())
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<(), StorefrontError> {
        let mut records = self.records.lock().unwrap();
        if let Some(r) = records.iter_mut().find(|r| r.id == id) {
            r.attempts += 1;
        }
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StorefrontError> {
        let mut records = self.records.lock().unwrap();
        if let Some(r) = records.iter_mut().find(|r| r.id == id) {
            r.verified = true;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorefrontError> {
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

// ── MockRateLimiter ──────────────────────────────────────────────────────────

pub struct MockRateLimiter {
    pub allow_issue: bool,
    pub failures: Arc<Mutex<HashMap<Uuid, u32>>>,
}

impl MockRateLimiter {
    pub fn open() -> Self {
        Self {
            allow_issue: true,
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn throttled() -> Self {
        Self {
            allow_issue: false,
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_failures(order_id: Uuid, count: u32) -> Self {
        let limiter = Self::open();
        limiter.failures.lock().unwrap().insert(order_id, count);
        limiter
    }

    pub fn failures_handle(&self) -> Arc<Mutex<HashMap<Uuid, u32>>> {
        Arc::clone(&self.failures)
    }

    pub fn clone_handle(&self) -> Self {
        Self {
            allow_issue: self.allow_issue,
            failures: Arc::clone(&self.failures),
        }
    }
}

impl RateLimiter for MockRateLimiter {
    async fn try_acquire_issue_slot(&self, _subject_key: &str) -> Result<bool, StorefrontError> {
        Ok(self.allow_issue)
    }

    async fn incr_payment_failures(&self, order_id: Uuid) -> Result<u32, StorefrontError> {
        let mut failures = self.failures.lock().unwrap();
        let count = failures.entry(order_id).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn payment_failures(&self, order_id: Uuid) -> Result<u32, StorefrontError> {
        Ok(*self.failures.lock().unwrap().get(&order_id).unwrap_or(&0))
    }

    async fn clear_payment_failures(&self, order_id: Uuid) -> Result<(), StorefrontError> {
        self.failures.lock().unwrap().remove(&order_id);
        Ok(())
    }
}

// ── MockSender ───────────────────────────────────────────────────────────────

pub struct MockSender {
    pub fail: bool,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockSender {
    pub fn working() -> Self {
        Self {
            fail: false,
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn broken() -> Self {
        Self {
            fail: true,
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }
}

impl OtpSender for MockSender {
    async fn send_email_code(
        &self,
        to: &str,
        code: &str,
        _purpose: OtpPurpose,
    ) -> Result<(), StorefrontError> {
        if self.fail {
            return Err(StorefrontError::Internal(anyhow::anyhow!(
                "email provider down"
            )));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), code.to_owned()));
        Ok(())
    }

    async fn send_sms_code(
        &self,
        to: &str,
        code: &str,
        _purpose: OtpPurpose,
    ) -> Result<(), StorefrontError> {
        if self.fail {
            return Err(StorefrontError::Internal(anyhow::anyhow!(
                "sms provider down"
            )));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── MockCampaignRepo ─────────────────────────────────────────────────────────

pub struct MockCampaignRepo {
    pub campaigns: Arc<Mutex<Vec<Campaign>>>,
    pub usage_bumps: Arc<Mutex<Vec<Uuid>>>,
}

impl MockCampaignRepo {
    pub fn with(campaigns: Vec<Campaign>) -> Self {
        Self {
            campaigns: Arc::new(Mutex::new(campaigns)),
            usage_bumps: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::with(vec![])
    }

    pub fn usage_handle(&self) -> Arc<Mutex<Vec<Uuid>>> {
        Arc::clone(&self.usage_bumps)
    }
}

impl CampaignRepository for MockCampaignRepo {
    async fn find_live(&self, now: DateTime<Utc>) -> Result<Vec<Campaign>, StorefrontError> {
        Ok(self
            .campaigns
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_live(now))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>, StorefrontError> {
        Ok(self
            .campaigns
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, campaign: &Campaign) -> Result<(), StorefrontError> {
        self.campaigns.lock().unwrap().push(campaign.clone());
        Ok(())
    }

    async fn list(&self, _page: PageRequest) -> Result<Vec<Campaign>, StorefrontError> {
        Ok(self.campaigns.lock().unwrap().clone())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, StorefrontError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        match campaigns.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_orders_used(&self, id: Uuid) -> Result<(), StorefrontError> {
        self.usage_bumps.lock().unwrap().push(id);
        let mut campaigns = self.campaigns.lock().unwrap();
        if let Some(c) = campaigns.iter_mut().find(|c| c.id == id) {
            c.orders_used += 1;
        }
        Ok(())
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
}

impl MockOrderRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
        }
    }

    pub fn orders_handle(&self) -> Arc<Mutex<Vec<Order>>> {
        Arc::clone(&self.orders)
    }

    pub fn clone_handle(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
        }
    }
}

impl OrderRepository for MockOrderRepo {
    async fn create(&self, order: &Order) -> Result<(), StorefrontError> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StorefrontError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, StorefrontError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.gateway_order_id.as_deref() == Some(gateway_order_id))
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Order>, StorefrontError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_paid_once(&self, id: Uuid, payment_id: &str) -> Result<bool, StorefrontError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(false);
        };
        if order.payment_status != PaymentStatus::Pending {
            return Ok(false);
        }
        order.payment_status = PaymentStatus::Paid;
        order.order_status = OrderStatus::Confirmed;
        order.payment_id = Some(payment_id.to_owned());
        Ok(true)
    }

    async fn mark_payment_failed(&self, id: Uuid) -> Result<(), StorefrontError> {
        let mut orders = self.orders.lock().unwrap();
        if let Some(order) = orders.iter_mut().find(|o| o.id == id) {
            if order.payment_status == PaymentStatus::Pending {
                order.payment_status = PaymentStatus::Failed;
            }
        }
        Ok(())
    }

    async fn update_status(&self, id: Uuid, next: OrderStatus) -> Result<(), StorefrontError> {
        let mut orders = self.orders.lock().unwrap();
        if let Some(order) = orders.iter_mut().find(|o| o.id == id) {
            order.order_status = next;
        }
        Ok(())
    }
}

// ── MockActivityLog ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockActivityLog {
    pub entries: Arc<Mutex<Vec<ActivityRecord>>>,
}

impl MockActivityLog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries_handle(&self) -> Arc<Mutex<Vec<ActivityRecord>>> {
        Arc::clone(&self.entries)
    }
}

impl ActivityLog for MockActivityLog {
    async fn record(&self, entry: &ActivityRecord) -> Result<(), StorefrontError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn list(&self, _page: PageRequest) -> Result<Vec<ActivityRecord>, StorefrontError> {
        Ok(self.entries.lock().unwrap().clone())
    }
}

// ── MockShipmentRepo ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockShipmentRepo {
    pub shipments: Arc<Mutex<Vec<Shipment>>>,
}

impl MockShipmentRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(shipments: Vec<Shipment>) -> Self {
        Self {
            shipments: Arc::new(Mutex::new(shipments)),
        }
    }

    pub fn shipments_handle(&self) -> Arc<Mutex<Vec<Shipment>>> {
        Arc::clone(&self.shipments)
    }
}

impl ShipmentRepository for MockShipmentRepo {
    async fn create(&self, shipment: &Shipment) -> Result<(), StorefrontError> {
        self.shipments.lock().unwrap().push(shipment.clone());
        Ok(())
    }

    async fn find_by_order(&self, order_id: Uuid) -> Result<Option<Shipment>, StorefrontError> {
        Ok(self
            .shipments
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.order_id == order_id)
            .cloned())
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<(), StorefrontError> {
        let mut shipments = self.shipments.lock().unwrap();
        if let Some(s) = shipments.iter_mut().find(|s| s.id == id) {
            s.status = status.to_owned();
        }
        Ok(())
    }
}

// ── MockShippingPort ─────────────────────────────────────────────────────────

pub struct MockShippingPort {
    pub fail_cancel: bool,
    pub cancelled: Arc<Mutex<Vec<String>>>,
    pub tracked_status: String,
}

impl MockShippingPort {
    pub fn working() -> Self {
        Self {
            fail_cancel: false,
            cancelled: Arc::new(Mutex::new(vec![])),
            tracked_status: "in_transit".to_owned(),
        }
    }

    pub fn cancel_broken() -> Self {
        Self {
            fail_cancel: true,
            ..Self::working()
        }
    }

    pub fn cancelled_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.cancelled)
    }
}

impl ShippingPort for MockShippingPort {
    async fn create_shipment(&self, _order: &Order) -> Result<AggregatorShipment, StorefrontError> {
        Ok(AggregatorShipment {
            shipment_id: "88001122".to_owned(),
            awb: Some("AWB0001".to_owned()),
            courier: Some("Delhivery".to_owned()),
            status: "created".to_owned(),
        })
    }

    async fn cancel_shipment(&self, shipment_id: &str) -> Result<(), StorefrontError> {
        if self.fail_cancel {
            return Err(StorefrontError::UpstreamUnavailable);
        }
        self.cancelled.lock().unwrap().push(shipment_id.to_owned());
        Ok(())
    }

    async fn track(&self, _shipment_id: &str) -> Result<TrackingInfo, StorefrontError> {
        Ok(TrackingInfo {
            awb: Some("AWB0001".to_owned()),
            courier: Some("Delhivery".to_owned()),
            current_status: self.tracked_status.clone(),
        })
    }
}

// ── MockGatewayPort ──────────────────────────────────────────────────────────

pub struct MockGatewayPort {
    pub fail: bool,
}

impl MockGatewayPort {
    pub fn working() -> Self {
        Self { fail: false }
    }

    pub fn down() -> Self {
        Self { fail: true }
    }
}

impl PaymentGatewayPort for MockGatewayPort {
    async fn create_gateway_order(
        &self,
        order_id: Uuid,
        amount: Money,
    ) -> Result<GatewayOrder, StorefrontError> {
        if self.fail {
            return Err(StorefrontError::UpstreamUnavailable);
        }
        Ok(GatewayOrder {
            gateway_order_id: format!("order_{}", order_id.simple()),
            amount,
            currency: "INR".to_owned(),
        })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_item(price_rupees: i64, quantity: u32) -> LineItem {
    LineItem {
        product_id: Uuid::now_v7(),
        name: "NVMe SSD 1TB".to_owned(),
        category: "ssd".to_owned(),
        unit_price: Money::from_rupees(price_rupees),
        quantity,
    }
}

pub fn test_order(user_id: Uuid, method: PaymentMethod) -> Order {
    let now = Utc::now();
    let item = test_item(2500, 2);
    let subtotal = item.line_total();
    Order {
        id: Uuid::now_v7(),
        user_id,
        contact_email: "asha@example.in".to_owned(),
        contact_phone: Some("+919800011122".to_owned()),
        items: vec![item],
        subtotal,
        discount: Money::ZERO,
        total: subtotal,
        campaign_id: None,
        payment_method: method,
        payment_status: PaymentStatus::Pending,
        order_status: OrderStatus::Pending,
        gateway_order_id: match method {
            PaymentMethod::Razorpay => Some("order_rzp001".to_owned()),
            _ => None,
        },
        payment_id: None,
        created_at: now,
        updated_at: now,
    }
}
