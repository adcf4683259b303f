//! Create `insurance_policy` table with FK to `customer`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InsurancePolicy::Table)
                    .if_not_exists()
                    .col(uuid(InsurancePolicy::Id).primary_key())
                    .col(uuid(InsurancePolicy::CustomerId))
                    .col(string_len(InsurancePolicy::VehicleNumber, 32))
                    .col(string_len(InsurancePolicy::Provider, 128))
                    .col(string_len(InsurancePolicy::PolicyNumber, 64).unique_key())
                    .col(big_integer(InsurancePolicy::PremiumCents))
                    .col(date(InsurancePolicy::StartDate))
                    .col(date(InsurancePolicy::EndDate))
                    .col(timestamp_with_time_zone(InsurancePolicy::CreatedAt))
                    .col(timestamp_with_time_zone(InsurancePolicy::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_insurance_policy_customer")
                            .from(InsurancePolicy::Table, InsurancePolicy::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(InsurancePolicy::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum InsurancePolicy {
    Table,
    Id,
    CustomerId,
    VehicleNumber,
    Provider,
    PolicyNumber,
    PremiumCents,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }
