//! Create `offer` table (percentage discounts with a validity window).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offer::Table)
                    .if_not_exists()
                    .col(uuid(Offer::Id).primary_key())
                    .col(string_len(Offer::Title, 128))
                    .col(text_null(Offer::Description))
                    .col(integer(Offer::DiscountPercent))
                    .col(date(Offer::ValidFrom))
                    .col(date(Offer::ValidTo))
                    .col(boolean(Offer::Active))
                    .col(timestamp_with_time_zone(Offer::CreatedAt))
                    .col(timestamp_with_time_zone(Offer::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Offer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Offer { Table, Id, Title, Description, DiscountPercent, ValidFrom, ValidTo, Active, CreatedAt, UpdatedAt }
