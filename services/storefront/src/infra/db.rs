use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use asirex_domain::activity::ActivityKind;
use asirex_domain::money::Money;
use asirex_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use asirex_domain::otp::OtpPurpose;
use asirex_domain::pagination::PageRequest;

use asirex_storefront_schema::{activity_logs, campaigns, orders, otp_codes, shipments};

use crate::domain::repository::{
    ActivityLog, CampaignRepository, OrderRepository, OtpRepository, ShipmentRepository,
};
use crate::domain::types::{
    ActivityRecord, AppliesTo, Campaign, DiscountType, Order, OtpRecord, Shipment,
};
use crate::error::StorefrontError;

// ── OTP repository ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn find_latest_unverified(
        &self,
        subject_key: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpRecord>, StorefrontError> {
        let model = otp_codes::Entity::find()
            .filter(otp_codes::Column::SubjectKey.eq(subject_key))
            .filter(otp_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(otp_codes::Column::Verified.eq(false))
            .order_by_desc(otp_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest unverified otp")?;
        Ok(model.map(otp_from_model).transpose()?)
    }

    async fn replace(&self, record: &OtpRecord) -> Result<(), StorefrontError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let record = record.clone();
                Box::pin(async move {
                    otp_codes::Entity::delete_many()
                        .filter(otp_codes::Column::SubjectKey.eq(record.subject_key.clone()))
                        .filter(otp_codes::Column::Purpose.eq(record.purpose.as_str()))
                        .filter(otp_codes::Column::Verified.eq(false))
                        .exec(txn)
                        .await?;
                    otp_codes::ActiveModel {
                        id: Set(record.id),
                        subject_key: Set(record.subject_key.clone()),
                        purpose: Set(record.purpose.as_str().to_owned()),
                        code_hash: Set(record.code_hash.clone()),
                        attempts: Set(record.attempts),
                        verified: Set(record.verified),
                        expires_at: Set(record.expires_at),
                        created_at: Set(record.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("replace otp record")?;
        Ok(())
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<(), StorefrontError> {
        otp_codes::Entity::update_many()
            .col_expr(
                otp_codes::Column::Attempts,
                Expr::col(otp_codes::Column::Attempts).add(1),
            )
            .filter(otp_codes::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("increment otp attempts")?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StorefrontError> {
        otp_codes::ActiveModel {
            id: Set(id),
            verified: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark otp verified")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorefrontError> {
        otp_codes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete otp record")?;
        Ok(())
    }
}

fn otp_from_model(model: otp_codes::Model) -> Result<OtpRecord, anyhow::Error> {
    Ok(OtpRecord {
        id: model.id,
        subject_key: model.subject_key,
        purpose: OtpPurpose::parse(&model.purpose)
            .ok_or_else(|| anyhow!("unknown otp purpose {:?}", model.purpose))?,
        code_hash: model.code_hash,
        attempts: model.attempts,
        verified: model.verified,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}

// ── Campaign repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCampaignRepository {
    pub db: DatabaseConnection,
}

impl CampaignRepository for DbCampaignRepository {
    async fn find_live(&self, now: DateTime<Utc>) -> Result<Vec<Campaign>, StorefrontError> {
        let models = campaigns::Entity::find()
            .filter(campaigns::Column::Active.eq(true))
            .filter(campaigns::Column::StartsAt.lte(now))
            .filter(campaigns::Column::EndsAt.gte(now))
            .all(&self.db)
            .await
            .context("find live campaigns")?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(campaign_from_model(model)?);
        }
        // Order-cap exhaustion is a column-vs-column comparison; cheaper here.
        out.retain(|c| c.is_live(now));
        Ok(out)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>, StorefrontError> {
        let model = campaigns::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find campaign by id")?;
        Ok(model.map(campaign_from_model).transpose()?)
    }

    async fn create(&self, campaign: &Campaign) -> Result<(), StorefrontError> {
        campaigns::ActiveModel {
            id: Set(campaign.id),
            name: Set(campaign.name.clone()),
            discount_type: Set(campaign.discount_type.as_str().to_owned()),
            discount_value: Set(campaign.discount_value),
            min_order_amount: Set(campaign.min_order_amount.paise()),
            max_discount_amount: Set(campaign.max_discount_amount.map(Money::paise)),
            applies_to: Set(campaign.applies_to.as_str().to_owned()),
            target_categories: Set(serde_json::json!(campaign.target_categories)),
            target_product_ids: Set(serde_json::json!(campaign.target_product_ids)),
            starts_at: Set(campaign.starts_at),
            ends_at: Set(campaign.ends_at),
            order_cap: Set(campaign.order_cap),
            orders_used: Set(campaign.orders_used),
            active: Set(campaign.active),
            created_at: Set(campaign.created_at),
        }
        .insert(&self.db)
        .await
        .context("create campaign")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Campaign>, StorefrontError> {
        let models = campaigns::Entity::find()
            .order_by_desc(campaigns::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .context("list campaigns")?;
        models
            .into_iter()
            .map(|m| campaign_from_model(m).map_err(StorefrontError::Internal))
            .collect()
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, StorefrontError> {
        let result = campaigns::Entity::update_many()
            .col_expr(campaigns::Column::Active, Expr::value(active))
            .filter(campaigns::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set campaign active")?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_orders_used(&self, id: Uuid) -> Result<(), StorefrontError> {
        campaigns::Entity::update_many()
            .col_expr(
                campaigns::Column::OrdersUsed,
                Expr::col(campaigns::Column::OrdersUsed).add(1),
            )
            .filter(campaigns::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("increment campaign orders_used")?;
        Ok(())
    }
}

fn campaign_from_model(model: campaigns::Model) -> Result<Campaign, anyhow::Error> {
    Ok(Campaign {
        id: model.id,
        name: model.name,
        discount_type: DiscountType::parse(&model.discount_type)
            .ok_or_else(|| anyhow!("unknown discount type {:?}", model.discount_type))?,
        discount_value: model.discount_value,
        min_order_amount: Money(model.min_order_amount),
        max_discount_amount: model.max_discount_amount.map(Money),
        applies_to: AppliesTo::parse(&model.applies_to)
            .ok_or_else(|| anyhow!("unknown applies_to {:?}", model.applies_to))?,
        target_categories: serde_json::from_value(model.target_categories)
            .context("parse campaign target categories")?,
        target_product_ids: serde_json::from_value(model.target_product_ids)
            .context("parse campaign target product ids")?,
        starts_at: model.starts_at,
        ends_at: model.ends_at,
        order_cap: model.order_cap,
        orders_used: model.orders_used,
        active: model.active,
        created_at: model.created_at,
    })
}

// ── Order repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), StorefrontError> {
        orders::ActiveModel {
            id: Set(order.id),
            user_id: Set(order.user_id),
            contact_email: Set(order.contact_email.clone()),
            contact_phone: Set(order.contact_phone.clone()),
            items: Set(serde_json::json!(order.items)),
            subtotal: Set(order.subtotal.paise()),
            discount: Set(order.discount.paise()),
            total: Set(order.total.paise()),
            campaign_id: Set(order.campaign_id),
            payment_method: Set(order.payment_method.as_str().to_owned()),
            payment_status: Set(order.payment_status.as_str().to_owned()),
            order_status: Set(order.order_status.as_str().to_owned()),
            gateway_order_id: Set(order.gateway_order_id.clone()),
            payment_id: Set(order.payment_id.clone()),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create order")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StorefrontError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, StorefrontError> {
        let model = orders::Entity::find()
            .filter(orders::Column::GatewayOrderId.eq(gateway_order_id))
            .one(&self.db)
            .await
            .context("find order by gateway order id")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, StorefrontError> {
        let models = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .context("list orders by user")?;
        models
            .into_iter()
            .map(|m| order_from_model(m).map_err(StorefrontError::Internal))
            .collect()
    }

    async fn mark_paid_once(&self, id: Uuid, payment_id: &str) -> Result<bool, StorefrontError> {
        let result = orders::Entity::update_many()
            .col_expr(
                orders::Column::PaymentStatus,
                Expr::value(PaymentStatus::Paid.as_str()),
            )
            .col_expr(
                orders::Column::OrderStatus,
                Expr::value(OrderStatus::Confirmed.as_str()),
            )
            .col_expr(orders::Column::PaymentId, Expr::value(payment_id))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(id))
            .filter(orders::Column::PaymentStatus.eq(PaymentStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("mark order paid")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_payment_failed(&self, id: Uuid) -> Result<(), StorefrontError> {
        orders::Entity::update_many()
            .col_expr(
                orders::Column::PaymentStatus,
                Expr::value(PaymentStatus::Failed.as_str()),
            )
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(id))
            .filter(orders::Column::PaymentStatus.eq(PaymentStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("mark order payment failed")?;
        Ok(())
    }

    async fn update_status(&self, id: Uuid, next: OrderStatus) -> Result<(), StorefrontError> {
        orders::ActiveModel {
            id: Set(id),
            order_status: Set(next.as_str().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update order status")?;
        Ok(())
    }
}

fn order_from_model(model: orders::Model) -> Result<Order, anyhow::Error> {
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        contact_email: model.contact_email,
        contact_phone: model.contact_phone,
        items: serde_json::from_value(model.items).context("parse order items")?,
        subtotal: Money(model.subtotal),
        discount: Money(model.discount),
        total: Money(model.total),
        campaign_id: model.campaign_id,
        payment_method: PaymentMethod::parse(&model.payment_method)
            .ok_or_else(|| anyhow!("unknown payment method {:?}", model.payment_method))?,
        payment_status: PaymentStatus::parse(&model.payment_status)
            .ok_or_else(|| anyhow!("unknown payment status {:?}", model.payment_status))?,
        order_status: OrderStatus::parse(&model.order_status)
            .ok_or_else(|| anyhow!("unknown order status {:?}", model.order_status))?,
        gateway_order_id: model.gateway_order_id,
        payment_id: model.payment_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Activity log ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbActivityLog {
    pub db: DatabaseConnection,
}

impl ActivityLog for DbActivityLog {
    async fn record(&self, entry: &ActivityRecord) -> Result<(), StorefrontError> {
        activity_logs::ActiveModel {
            id: Set(entry.id),
            kind: Set(kind_tag(entry.kind)?),
            order_id: Set(entry.order_id),
            subject: Set(entry.subject.clone()),
            detail: Set(entry.detail.clone()),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("record activity")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<ActivityRecord>, StorefrontError> {
        let models = activity_logs::Entity::find()
            .order_by_desc(activity_logs::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .context("list activity")?;
        models
            .into_iter()
            .map(|m| activity_from_model(m).map_err(StorefrontError::Internal))
            .collect()
    }
}

fn kind_tag(kind: ActivityKind) -> Result<String, anyhow::Error> {
    let value = serde_json::to_value(kind).context("serialize activity kind")?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("activity kind is not a string"))
}

fn activity_from_model(model: activity_logs::Model) -> Result<ActivityRecord, anyhow::Error> {
    Ok(ActivityRecord {
        id: model.id,
        kind: serde_json::from_value(serde_json::Value::String(model.kind.clone()))
            .with_context(|| format!("unknown activity kind {:?}", model.kind))?,
        order_id: model.order_id,
        subject: model.subject,
        detail: model.detail,
        created_at: model.created_at,
    })
}

// ── Shipment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShipmentRepository {
    pub db: DatabaseConnection,
}

impl ShipmentRepository for DbShipmentRepository {
    async fn create(&self, shipment: &Shipment) -> Result<(), StorefrontError> {
        shipments::ActiveModel {
            id: Set(shipment.id),
            order_id: Set(shipment.order_id),
            aggregator_shipment_id: Set(shipment.aggregator_shipment_id.clone()),
            awb: Set(shipment.awb.clone()),
            courier: Set(shipment.courier.clone()),
            status: Set(shipment.status.clone()),
            created_at: Set(shipment.created_at),
            updated_at: Set(shipment.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create shipment")?;
        Ok(())
    }

    async fn find_by_order(&self, order_id: Uuid) -> Result<Option<Shipment>, StorefrontError> {
        let model = shipments::Entity::find()
            .filter(shipments::Column::OrderId.eq(order_id))
            .order_by_desc(shipments::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find shipment by order")?;
        Ok(model.map(shipment_from_model))
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<(), StorefrontError> {
        shipments::ActiveModel {
            id: Set(id),
            status: Set(status.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update shipment status")?;
        Ok(())
    }
}

fn shipment_from_model(model: shipments::Model) -> Shipment {
    Shipment {
        id: model.id,
        order_id: model.order_id,
        aggregator_shipment_id: model.aggregator_shipment_id,
        awb: model.awb,
        courier: model.courier,
        status: model.status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
