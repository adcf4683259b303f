//! Billing: bills are created and paid inside a single transaction each.
//!
//! Creating a bill prices every line (catalog price for parts and bikes unless
//! overridden), takes the sold units out of stock and applies at most one
//! offer. Paying a bill credits the customer's loyalty account.

use uuid::Uuid;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use common::pagination::{Page, Pagination};
use models::{
    bike, bill::{self, BillStatus}, bill_item, customer, loyalty_account, offer, service_job, spare_part,
};
use crate::{errors::ServiceError, paging::fetch_page};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillItemInput {
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i32,
    /// Required for free-form lines; defaults to the catalog price otherwise.
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
    #[serde(default)]
    pub spare_part_id: Option<Uuid>,
    #[serde(default)]
    pub bike_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateBill {
    pub customer_id: Uuid,
    #[serde(default)]
    pub service_job_id: Option<Uuid>,
    #[serde(default)]
    pub offer_id: Option<Uuid>,
    pub items: Vec<BillItemInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillWithItems {
    #[serde(flatten)]
    pub bill: bill::Model,
    pub items: Vec<bill_item::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaidBill {
    pub bill: bill::Model,
    pub points_earned: i64,
    pub loyalty: loyalty_account::Model,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BillFilter {
    /// `unpaid` or `paid`
    #[param(value_type = Option<String>)]
    pub status: Option<BillStatus>,
    pub customer_id: Option<Uuid>,
    /// Inclusive range on the issue date.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Resolve one input line into a priced line, moving stock as a side effect.
async fn price_line(txn: &DatabaseTransaction, input: BillItemInput) -> Result<bill_item::Line, ServiceError> {
    if input.quantity < 1 {
        return Err(ServiceError::validation("quantity must be at least 1"));
    }
    match (input.spare_part_id, input.bike_id) {
        (Some(_), Some(_)) => Err(ServiceError::validation("an item can reference a spare part or a bike, not both")),
        (Some(part_id), None) => {
            let part = spare_part::Entity::find_by_id(part_id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::validation(format!("spare part {} does not exist", part_id)))?;
            let description = input.description.unwrap_or_else(|| format!("{} ({})", part.name, part.part_number));
            let mut line = bill_item::Line::new(&description, input.quantity, input.unit_price_cents.unwrap_or(part.unit_price_cents))?;
            spare_part::adjust_quantity(txn, part_id, -input.quantity).await?;
            line.spare_part_id = Some(part_id);
            Ok(line)
        }
        (None, Some(bike_id)) => {
            let found = bike::Entity::find_by_id(bike_id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::validation(format!("bike {} does not exist", bike_id)))?;
            let description = input.description.unwrap_or_else(|| format!("{} {}", found.brand, found.model_name));
            let mut line = bill_item::Line::new(&description, input.quantity, input.unit_price_cents.unwrap_or(found.price_cents))?;
            bike::take_stock(txn, bike_id, input.quantity).await?;
            line.bike_id = Some(bike_id);
            Ok(line)
        }
        (None, None) => {
            let description = input.description.unwrap_or_default();
            let price = input
                .unit_price_cents
                .ok_or_else(|| ServiceError::validation("unit_price_cents required for items without a catalog reference"))?;
            Ok(bill_item::Line::new(&description, input.quantity, price)?)
        }
    }
}

async fn check_references(txn: &DatabaseTransaction, input: &CreateBill, today: NaiveDate) -> Result<Option<i32>, ServiceError> {
    if !customer::exists(txn, input.customer_id).await? {
        return Err(ServiceError::validation("customer does not exist"));
    }
    if let Some(job_id) = input.service_job_id {
        let job = service_job::Entity::find_by_id(job_id)
            .one(txn)
            .await?
            .ok_or_else(|| ServiceError::validation("service job does not exist"))?;
        if job.customer_id != input.customer_id {
            return Err(ServiceError::validation("service job belongs to another customer"));
        }
    }
    match input.offer_id {
        None => Ok(None),
        Some(offer_id) => {
            let o = offer::Entity::find_by_id(offer_id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::validation("offer does not exist"))?;
            if !o.applies_on(today) {
                return Err(ServiceError::validation(format!("offer '{}' is not valid today", o.title)));
            }
            Ok(Some(o.discount_percent))
        }
    }
}

#[instrument(skip(db, input), fields(customer_id = %input.customer_id, items = input.items.len()))]
pub async fn create_bill(db: &DatabaseConnection, input: CreateBill) -> Result<BillWithItems, ServiceError> {
    if input.items.is_empty() {
        return Err(ServiceError::validation("a bill needs at least one item"));
    }
    let today = Utc::now().date_naive();
    let txn = db.begin().await?;
    let discount_percent = check_references(&txn, &input, today).await?;

    let mut lines = Vec::with_capacity(input.items.len());
    for item in input.items {
        lines.push(price_line(&txn, item).await?);
    }
    let line_totals = lines.iter().map(|l| l.line_total()).collect::<Result<Vec<_>, _>>()?;
    let totals = bill::totals(line_totals, discount_percent)?;

    let header = bill::insert_header(&txn, input.customer_id, input.service_job_id, input.offer_id, totals).await?;
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        items.push(bill_item::insert(&txn, header.id, line).await?);
    }
    txn.commit().await?;

    info!(bill_id = %header.id, bill_number = %header.bill_number, total_cents = header.total_cents, "bill_created");
    Ok(BillWithItems { bill: header, items })
}

pub async fn get_bill(db: &DatabaseConnection, id: Uuid) -> Result<BillWithItems, ServiceError> {
    let found = bill::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("bill"))?;
    let items = bill_item::find_by_bill(db, id).await?;
    Ok(BillWithItems { bill: found, items })
}

/// Newest first.
pub async fn list_bills(db: &DatabaseConnection, filter: BillFilter, opts: Pagination) -> Result<Page<bill::Model>, ServiceError> {
    let mut q = bill::Entity::find().order_by_desc(bill::Column::IssuedAt);
    if let Some(status) = filter.status {
        q = q.filter(bill::Column::Status.eq(status));
    }
    if let Some(customer_id) = filter.customer_id {
        q = q.filter(bill::Column::CustomerId.eq(customer_id));
    }
    if let Some(from) = filter.from {
        q = q.filter(bill::Column::IssuedAt.gte(Utc.from_utc_datetime(&from.and_time(NaiveTime::MIN))));
    }
    if let Some(to) = filter.to.and_then(|d| d.succ_opt()) {
        q = q.filter(bill::Column::IssuedAt.lt(Utc.from_utc_datetime(&to.and_time(NaiveTime::MIN))));
    }
    fetch_page(db, q, opts).await
}

/// Unpaid bills only; the stock taken by the bill is not returned.
pub async fn delete_bill(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = bill::Entity::delete_many()
        .filter(bill::Column::Id.eq(id))
        .filter(bill::Column::Status.eq(BillStatus::Unpaid))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return match bill::Entity::find_by_id(id).one(db).await? {
            Some(_) => Err(ServiceError::validation("paid bills cannot be deleted")),
            None => Err(ServiceError::not_found("bill")),
        };
    }
    Ok(())
}

#[instrument(skip(db))]
pub async fn pay_bill(db: &DatabaseConnection, id: Uuid) -> Result<PaidBill, ServiceError> {
    let txn = db.begin().await?;
    // row lock: a concurrent payment waits here and then sees `paid`
    let found = bill::Entity::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("bill"))?;
    if found.status == BillStatus::Paid {
        return Err(ServiceError::Conflict(format!("bill {} is already paid", found.bill_number)));
    }
    let customer_id = found.customer_id;
    let points = loyalty_account::points_for_amount(found.total_cents);

    let mut am: bill::ActiveModel = found.into();
    am.status = Set(BillStatus::Paid);
    am.paid_at = Set(Some(Utc::now().into()));
    let paid = am.update(&txn).await?;
    let loyalty = loyalty_account::earn(&txn, customer_id, points).await?;
    txn.commit().await?;

    info!(bill_id = %paid.id, points_earned = points, "bill_paid");
    Ok(PaidBill { bill: paid, points_earned: points, loyalty })
}
