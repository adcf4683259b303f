//! Create `vehicle_registration` table with FKs to `customer` and `bike`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VehicleRegistration::Table)
                    .if_not_exists()
                    .col(uuid(VehicleRegistration::Id).primary_key())
                    .col(uuid(VehicleRegistration::CustomerId))
                    .col(uuid_null(VehicleRegistration::BikeId))
                    .col(string_len(VehicleRegistration::VehicleNumber, 32).unique_key())
                    .col(string_len(VehicleRegistration::ChassisNumber, 64))
                    .col(string_len(VehicleRegistration::EngineNumber, 64))
                    .col(date(VehicleRegistration::RegisteredOn))
                    .col(timestamp_with_time_zone(VehicleRegistration::CreatedAt))
                    .col(timestamp_with_time_zone(VehicleRegistration::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_registration_customer")
                            .from(VehicleRegistration::Table, VehicleRegistration::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_registration_bike")
                            .from(VehicleRegistration::Table, VehicleRegistration::BikeId)
                            .to(Bike::Table, Bike::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(VehicleRegistration::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum VehicleRegistration {
    Table,
    Id,
    CustomerId,
    BikeId,
    VehicleNumber,
    ChassisNumber,
    EngineNumber,
    RegisteredOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }

#[derive(DeriveIden)]
enum Bike { Table, Id }
