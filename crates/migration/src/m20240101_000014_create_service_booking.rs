//! Create `service_booking` table.
//!
//! Customer-requested service dates; a booking stays `pending_verification`
//! until the SMS code is confirmed.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceBooking::Table)
                    .if_not_exists()
                    .col(uuid(ServiceBooking::Id).primary_key())
                    .col(string_len(ServiceBooking::CustomerName, 128))
                    .col(string_len(ServiceBooking::Phone, 16))
                    .col(string_len(ServiceBooking::VehicleNumber, 32))
                    .col(date(ServiceBooking::PreferredDate))
                    .col(text_null(ServiceBooking::Notes))
                    .col(string_len(ServiceBooking::Status, 32))
                    .col(timestamp_with_time_zone_null(ServiceBooking::VerifiedAt))
                    .col(timestamp_with_time_zone(ServiceBooking::CreatedAt))
                    .col(timestamp_with_time_zone(ServiceBooking::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceBooking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceBooking {
    Table,
    Id,
    CustomerName,
    Phone,
    VehicleNumber,
    PreferredDate,
    Notes,
    Status,
    VerifiedAt,
    CreatedAt,
    UpdatedAt,
}
