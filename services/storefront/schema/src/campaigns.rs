use sea_orm::entity::prelude::*;

/// Festival sale campaign. Amount columns are integer paise;
/// `discount_value` is percent points for percentage campaigns and paise
/// for fixed ones.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// `percentage` | `fixed`
    pub discount_type: String,
    pub discount_value: i64,
    pub min_order_amount: i64,
    pub max_discount_amount: Option<i64>,
    /// `all` | `category` | `products`
    pub applies_to: String,
    /// JSON array of category slugs.
    pub target_categories: Json,
    /// JSON array of product UUIDs.
    pub target_product_ids: Json,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    /// Max orders the campaign may be applied to (null = uncapped).
    pub order_cap: Option<i32>,
    pub orders_used: i32,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
