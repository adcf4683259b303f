//! Create `loyalty_account` table; one account per customer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoyaltyAccount::Table)
                    .if_not_exists()
                    .col(uuid(LoyaltyAccount::Id).primary_key())
                    .col(uuid(LoyaltyAccount::CustomerId).unique_key())
                    .col(big_integer(LoyaltyAccount::Points))
                    .col(big_integer(LoyaltyAccount::LifetimePoints))
                    .col(timestamp_with_time_zone(LoyaltyAccount::CreatedAt))
                    .col(timestamp_with_time_zone(LoyaltyAccount::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loyalty_account_customer")
                            .from(LoyaltyAccount::Table, LoyaltyAccount::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LoyaltyAccount::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LoyaltyAccount { Table, Id, CustomerId, Points, LifetimePoints, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Customer { Table, Id }
