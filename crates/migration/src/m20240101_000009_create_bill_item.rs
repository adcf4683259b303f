//! Create `bill_item` table; items are removed together with their bill.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BillItem::Table)
                    .if_not_exists()
                    .col(uuid(BillItem::Id).primary_key())
                    .col(uuid(BillItem::BillId))
                    .col(string_len(BillItem::Description, 255))
                    .col(integer(BillItem::Quantity))
                    .col(big_integer(BillItem::UnitPriceCents))
                    .col(big_integer(BillItem::LineTotalCents))
                    .col(uuid_null(BillItem::SparePartId))
                    .col(uuid_null(BillItem::BikeId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_item_bill")
                            .from(BillItem::Table, BillItem::BillId)
                            .to(Bill::Table, Bill::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BillItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BillItem {
    Table,
    Id,
    BillId,
    Description,
    Quantity,
    UnitPriceCents,
    LineTotalCents,
    SparePartId,
    BikeId,
}

#[derive(DeriveIden)]
enum Bill { Table, Id }
