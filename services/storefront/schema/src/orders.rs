use sea_orm::entity::prelude::*;

/// Customer order. `payment_status` is mutated exclusively by the
/// server-side verification path (conditional update, never from
/// client-supplied fields).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    /// JSON array of line items `{product_id, name, category, unit_price, quantity}`.
    pub items: Json,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub campaign_id: Option<Uuid>,
    /// `razorpay` | `payu` | `cod`
    pub payment_method: String,
    /// `pending` | `paid` | `failed`
    pub payment_status: String,
    /// `pending` | `confirmed` | `processing` | `shipped` | `delivered` | `cancelled`
    pub order_status: String,
    pub gateway_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
