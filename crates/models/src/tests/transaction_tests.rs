use anyhow::Result;
use chrono::Utc;
use sea_orm::{EntityTrait, TransactionTrait};

use super::{setup_test_db, unique_phone};
use crate::{bill, bill_item, customer, service_booking};

#[tokio::test]
async fn test_bill_with_items_commit() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let c = customer::create(&db, customer::NewCustomer {
        name: "Bill Tx".into(),
        phone: unique_phone(),
        email: None,
        address: None,
    })
    .await?;

    let lines = vec![
        bill_item::Line::new("Oil", 2, 45_000)?,
        bill_item::Line::new("Labour", 1, 60_000)?,
    ];
    let line_totals: Vec<i64> = lines.iter().map(|l| l.line_total()).collect::<Result<_, _>>()?;
    let totals = bill::totals(line_totals, Some(10))?;

    let txn = db.begin().await?;
    let header = bill::insert_header(&txn, c.id, None, None, totals).await?;
    for line in lines {
        bill_item::insert(&txn, header.id, line).await?;
    }
    txn.commit().await?;

    let items = bill_item::find_by_bill(&db, header.id).await?;
    assert_eq!(items.len(), 2);
    assert_eq!(header.total_cents, 135_000);
    assert!(header.bill_number.starts_with("BILL-"));

    bill::Entity::delete_by_id(header.id).exec(&db).await?;
    assert!(bill_item::find_by_bill(&db, header.id).await?.is_empty());
    customer::Entity::delete_by_id(c.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_rollback_discards_booking() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let today = Utc::now().date_naive();
    let booking = service_booking::NewBooking {
        customer_name: "Rollback".into(),
        phone: unique_phone(),
        vehicle_number: "KA01RB1".into(),
        preferred_date: today,
        notes: None,
    }
    .into_model(today)?;

    let txn = db.begin().await?;
    let stored = service_booking::insert(&txn, booking).await?;
    txn.rollback().await?;

    assert!(service_booking::Entity::find_by_id(stored.id).one(&db).await?.is_none());
    Ok(())
}
