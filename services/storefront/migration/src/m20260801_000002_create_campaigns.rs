use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaigns::Name).string().not_null())
                    .col(ColumnDef::new(Campaigns::DiscountType).string().not_null())
                    .col(
                        ColumnDef::new(Campaigns::DiscountValue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::MinOrderAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Campaigns::MaxDiscountAmount).big_integer())
                    .col(ColumnDef::new(Campaigns::AppliesTo).string().not_null())
                    .col(
                        ColumnDef::new(Campaigns::TargetCategories)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::TargetProductIds)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Campaigns::OrderCap).integer())
                    .col(
                        ColumnDef::new(Campaigns::OrdersUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaigns::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Storefront queries filter on the active window.
        manager
            .create_index(
                Index::create()
                    .table(Campaigns::Table)
                    .col(Campaigns::Active)
                    .col(Campaigns::EndsAt)
                    .name("idx_campaigns_active_window")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Campaigns {
    Table,
    Id,
    Name,
    DiscountType,
    DiscountValue,
    MinOrderAmount,
    MaxDiscountAmount,
    AppliesTo,
    TargetCategories,
    TargetProductIds,
    StartsAt,
    EndsAt,
    OrderCap,
    OrdersUsed,
    Active,
    CreatedAt,
}
