//! Create `expense` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expense::Table)
                    .if_not_exists()
                    .col(uuid(Expense::Id).primary_key())
                    .col(string_len(Expense::Category, 64))
                    .col(text_null(Expense::Description))
                    .col(big_integer(Expense::AmountCents))
                    .col(date(Expense::SpentOn))
                    .col(timestamp_with_time_zone(Expense::CreatedAt))
                    .col(timestamp_with_time_zone(Expense::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Expense::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Expense { Table, Id, Category, Description, AmountCents, SpentOn, CreatedAt, UpdatedAt }
