use sea_orm_migration::prelude::*;

mod m20260801_000001_create_otp_codes;
mod m20260801_000002_create_campaigns;
mod m20260801_000003_create_orders;
mod m20260801_000004_create_activity_logs;
mod m20260801_000005_create_shipments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_otp_codes::Migration),
            Box::new(m20260801_000002_create_campaigns::Migration),
            Box::new(m20260801_000003_create_orders::Migration),
            Box::new(m20260801_000004_create_activity_logs::Migration),
            Box::new(m20260801_000005_create_shipments::Migration),
        ]
    }
}
