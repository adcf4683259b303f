//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user;
mod m20240101_000002_create_user_credentials;
mod m20240101_000003_create_customer;
mod m20240101_000004_create_bike;
mod m20240101_000005_create_spare_part;
mod m20240101_000006_create_service_job;
mod m20240101_000007_create_offer;
mod m20240101_000008_create_bill;
mod m20240101_000009_create_bill_item;
mod m20240101_000010_create_insurance_policy;
mod m20240101_000011_create_loyalty_account;
mod m20240101_000012_create_expense;
mod m20240101_000013_create_vehicle_registration;
mod m20240101_000014_create_service_booking;
mod m20240101_000015_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user::Migration),
            Box::new(m20240101_000002_create_user_credentials::Migration),
            Box::new(m20240101_000003_create_customer::Migration),
            Box::new(m20240101_000004_create_bike::Migration),
            Box::new(m20240101_000005_create_spare_part::Migration),
            Box::new(m20240101_000006_create_service_job::Migration),
            Box::new(m20240101_000007_create_offer::Migration),
            Box::new(m20240101_000008_create_bill::Migration),
            Box::new(m20240101_000009_create_bill_item::Migration),
            Box::new(m20240101_000010_create_insurance_policy::Migration),
            Box::new(m20240101_000011_create_loyalty_account::Migration),
            Box::new(m20240101_000012_create_expense::Migration),
            Box::new(m20240101_000013_create_vehicle_registration::Migration),
            Box::new(m20240101_000014_create_service_booking::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000015_add_indexes::Migration),
        ]
    }
}
