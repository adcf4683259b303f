//! Create `bill` table with FKs to `customer`, `service_job` and `offer`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bill::Table)
                    .if_not_exists()
                    .col(uuid(Bill::Id).primary_key())
                    .col(string_len(Bill::BillNumber, 32).unique_key())
                    .col(uuid(Bill::CustomerId))
                    .col(uuid_null(Bill::ServiceJobId))
                    .col(uuid_null(Bill::OfferId))
                    .col(big_integer(Bill::SubtotalCents))
                    .col(big_integer(Bill::DiscountCents))
                    .col(big_integer(Bill::TotalCents))
                    .col(string_len(Bill::Status, 16))
                    .col(timestamp_with_time_zone(Bill::IssuedAt))
                    .col(timestamp_with_time_zone_null(Bill::PaidAt))
                    .col(timestamp_with_time_zone(Bill::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_customer")
                            .from(Bill::Table, Bill::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_service_job")
                            .from(Bill::Table, Bill::ServiceJobId)
                            .to(ServiceJob::Table, ServiceJob::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_offer")
                            .from(Bill::Table, Bill::OfferId)
                            .to(Offer::Table, Offer::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Bill::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Bill {
    Table,
    Id,
    BillNumber,
    CustomerId,
    ServiceJobId,
    OfferId,
    SubtotalCents,
    DiscountCents,
    TotalCents,
    Status,
    IssuedAt,
    PaidAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }

#[derive(DeriveIden)]
enum ServiceJob { Table, Id }

#[derive(DeriveIden)]
enum Offer { Table, Id }
