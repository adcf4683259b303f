use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Customers: lookup by phone
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_phone")
                    .table(Customer::Table)
                    .col(Customer::Phone)
                    .to_owned(),
            )
            .await?;

        // ServiceJob: filter by customer and status
        manager
            .create_index(
                Index::create()
                    .name("idx_service_job_customer")
                    .table(ServiceJob::Table)
                    .col(ServiceJob::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_job_status")
                    .table(ServiceJob::Table)
                    .col(ServiceJob::Status)
                    .to_owned(),
            )
            .await?;

        // Bill: customer, plus paid_at for revenue statistics
        manager
            .create_index(
                Index::create()
                    .name("idx_bill_customer")
                    .table(Bill::Table)
                    .col(Bill::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_bill_paid_at")
                    .table(Bill::Table)
                    .col(Bill::PaidAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bill_item_bill")
                    .table(BillItem::Table)
                    .col(BillItem::BillId)
                    .to_owned(),
            )
            .await?;

        // InsurancePolicy: expiry lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_insurance_policy_end_date")
                    .table(InsurancePolicy::Table)
                    .col(InsurancePolicy::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expense_spent_on")
                    .table(Expense::Table)
                    .col(Expense::SpentOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_booking_date")
                    .table(ServiceBooking::Table)
                    .col(ServiceBooking::PreferredDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_customer_phone").table(Customer::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_service_job_customer").table(ServiceJob::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_service_job_status").table(ServiceJob::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_bill_customer").table(Bill::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_bill_paid_at").table(Bill::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_bill_item_bill").table(BillItem::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_insurance_policy_end_date").table(InsurancePolicy::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_expense_spent_on").table(Expense::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_service_booking_date").table(ServiceBooking::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Customer { Table, Phone }

#[derive(DeriveIden)]
enum ServiceJob { Table, CustomerId, Status }

#[derive(DeriveIden)]
enum Bill { Table, CustomerId, PaidAt }

#[derive(DeriveIden)]
enum BillItem { Table, BillId }

#[derive(DeriveIden)]
enum InsurancePolicy { Table, EndDate }

#[derive(DeriveIden)]
enum Expense { Table, SpentOn }

#[derive(DeriveIden)]
enum ServiceBooking { Table, PreferredDate }
