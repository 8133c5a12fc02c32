use sea_orm::entity::prelude::*;

/// One-time verification code, stored as a SHA-256 hex digest.
/// At most one unverified row per `(subject_key, purpose)` — issuance
/// replaces any prior row in the same transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "otp_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Channel-qualified subject, e.g. `email:a@b.in` or `phone:+91...`.
    pub subject_key: String,
    pub purpose: String,
    pub code_hash: String,
    pub attempts: i32,
    pub verified: bool,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
