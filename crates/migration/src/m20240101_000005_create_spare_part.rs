//! Create `spare_part` table; part numbers are unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SparePart::Table)
                    .if_not_exists()
                    .col(uuid(SparePart::Id).primary_key())
                    .col(string_len(SparePart::Name, 128))
                    .col(string_len(SparePart::PartNumber, 64).unique_key())
                    .col(integer(SparePart::Quantity))
                    .col(big_integer(SparePart::UnitPriceCents))
                    .col(integer(SparePart::ReorderLevel))
                    .col(timestamp_with_time_zone(SparePart::CreatedAt))
                    .col(timestamp_with_time_zone(SparePart::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SparePart::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SparePart { Table, Id, Name, PartNumber, Quantity, UnitPriceCents, ReorderLevel, CreatedAt, UpdatedAt }
