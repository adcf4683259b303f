//! Create `service_job` table with FK to `customer`.
//!
//! Tracks repair jobs from reception to delivery.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceJob::Table)
                    .if_not_exists()
                    .col(uuid(ServiceJob::Id).primary_key())
                    .col(uuid(ServiceJob::CustomerId))
                    .col(string_len(ServiceJob::VehicleNumber, 32))
                    .col(text(ServiceJob::Description))
                    .col(string_len(ServiceJob::Status, 32))
                    .col(big_integer(ServiceJob::LabourCents))
                    .col(big_integer(ServiceJob::PartsCents))
                    .col(timestamp_with_time_zone(ServiceJob::ReceivedAt))
                    .col(timestamp_with_time_zone_null(ServiceJob::CompletedAt))
                    .col(timestamp_with_time_zone_null(ServiceJob::DeliveredAt))
                    .col(timestamp_with_time_zone(ServiceJob::CreatedAt))
                    .col(timestamp_with_time_zone(ServiceJob::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_job_customer")
                            .from(ServiceJob::Table, ServiceJob::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceJob::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceJob {
    Table,
    Id,
    CustomerId,
    VehicleNumber,
    Description,
    Status,
    LabourCents,
    PartsCents,
    ReceivedAt,
    CompletedAt,
    DeliveredAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }
