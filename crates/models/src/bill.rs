use std::fmt;

use sea_orm::{entity::prelude::*, sea_query::StringLen, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{bill_item, customer, errors::ModelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BillStatus::Unpaid => "unpaid",
            BillStatus::Paid => "paid",
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bill")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub bill_number: String,
    pub customer_id: Uuid,
    pub service_job_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub status: BillStatus,
    pub issued_at: DateTimeWithTimeZone,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Customer, Items }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Items => Entity::has_many(bill_item::Entity).into(),
        }
    }
}

impl Related<bill_item::Entity> for Entity {
    fn to() -> RelationDef { Relation::Items.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillTotals {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Sum line totals and apply an optional percentage discount (rounded down).
pub fn totals<I>(line_totals: I, discount_percent: Option<i32>) -> Result<BillTotals, ModelError>
where
    I: IntoIterator<Item = i64>,
{
    let subtotal = line_totals
        .into_iter()
        .try_fold(0i64, |acc, v| acc.checked_add(v))
        .ok_or_else(|| ModelError::validation("bill total overflow"))?;
    let discount = match discount_percent {
        Some(p) => subtotal
            .checked_mul(i64::from(p.clamp(0, 100)))
            .map(|v| v / 100)
            .ok_or_else(|| ModelError::validation("bill total overflow"))?,
        None => 0,
    };
    Ok(BillTotals { subtotal_cents: subtotal, discount_cents: discount, total_cents: subtotal - discount })
}

/// `BILL-YYYYMMDD-XXXXXX`, suffix taken from the bill id.
pub fn bill_number(issued_at: DateTime<Utc>, id: Uuid) -> String {
    let simple = id.simple().to_string().to_uppercase();
    format!("BILL-{}-{}", issued_at.format("%Y%m%d"), &simple[..6])
}

/// Insert the bill header; items are inserted separately by the caller's transaction.
pub async fn insert_header<C: ConnectionTrait>(
    db: &C,
    customer_id: Uuid,
    service_job_id: Option<Uuid>,
    offer_id: Option<Uuid>,
    totals: BillTotals,
) -> Result<Model, ModelError> {
    let id = Uuid::new_v4();
    let issued = Utc::now();
    let am = ActiveModel {
        id: Set(id),
        bill_number: Set(bill_number(issued, id)),
        customer_id: Set(customer_id),
        service_job_id: Set(service_job_id),
        offer_id: Set(offer_id),
        subtotal_cents: Set(totals.subtotal_cents),
        discount_cents: Set(totals.discount_cents),
        total_cents: Set(totals.total_cents),
        status: Set(BillStatus::Unpaid),
        issued_at: Set(issued.into()),
        paid_at: Set(None),
        created_at: Set(issued.into()),
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn totals_without_discount() {
        let t = totals([10_000, 2_500], None).unwrap();
        assert_eq!(t, BillTotals { subtotal_cents: 12_500, discount_cents: 0, total_cents: 12_500 });
    }

    #[test]
    fn totals_with_discount_round_down() {
        let t = totals([999], Some(10)).unwrap();
        assert_eq!(t.discount_cents, 99);
        assert_eq!(t.total_cents, 900);
    }

    #[test]
    fn totals_detect_overflow() {
        assert!(totals([i64::MAX, 1], None).is_err());
    }

    #[test]
    fn discount_on_huge_subtotal_is_rejected_not_panicking() {
        let err = totals([i64::MAX / 10], Some(50)).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        let full = totals([i64::MAX / 100], Some(100)).unwrap();
        assert_eq!(full.total_cents, 0);
    }

    #[test]
    fn bill_number_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap();
        let id = Uuid::parse_str("a1b2c3d4-0000-0000-0000-000000000000").unwrap();
        assert_eq!(bill_number(at, id), "BILL-20260309-A1B2C3");
    }
}
