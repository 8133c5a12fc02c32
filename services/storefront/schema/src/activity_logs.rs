use sea_orm::entity::prelude::*;

/// Append-only audit trail of financial and lifecycle events.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// `ActivityKind` snake_case tag.
    pub kind: String,
    pub order_id: Option<Uuid>,
    /// Subject key for OTP-related entries.
    pub subject: Option<String>,
    pub detail: Json,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
