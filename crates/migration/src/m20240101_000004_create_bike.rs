//! Create `bike` table (vehicle inventory).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bike::Table)
                    .if_not_exists()
                    .col(uuid(Bike::Id).primary_key())
                    .col(string_len(Bike::Brand, 64))
                    .col(string_len(Bike::ModelName, 128))
                    .col(string_len(Bike::Category, 64))
                    .col(string_len_null(Bike::Color, 32))
                    .col(integer(Bike::EngineCc))
                    .col(big_integer(Bike::PriceCents))
                    .col(integer(Bike::Stock))
                    .col(string_len_null(Bike::ImagePath, 255))
                    .col(timestamp_with_time_zone(Bike::CreatedAt))
                    .col(timestamp_with_time_zone(Bike::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Bike::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Bike {
    Table,
    Id,
    Brand,
    ModelName,
    Category,
    Color,
    EngineCc,
    PriceCents,
    Stock,
    ImagePath,
    CreatedAt,
    UpdatedAt,
}
