//! Loyalty points per customer.
//!
//! One point is earned per full 100.00 of paid bill total. `points` is the
//! spendable balance, `lifetime_points` only grows and decides the tier.

use sea_orm::{entity::prelude::*, sea_query::{Expr, OnConflict}, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{customer, errors::ModelError};

pub const CENTS_PER_POINT: i64 = 10_000;
pub const SILVER_THRESHOLD: i64 = 100;
pub const GOLD_THRESHOLD: i64 = 500;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loyalty_account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub customer_id: Uuid,
    pub points: i64,
    pub lifetime_points: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub fn for_lifetime_points(points: i64) -> Tier {
        if points >= GOLD_THRESHOLD {
            Tier::Gold
        } else if points >= SILVER_THRESHOLD {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }
}

impl Model {
    pub fn tier(&self) -> Tier {
        Tier::for_lifetime_points(self.lifetime_points)
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Customer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn points_for_amount(total_cents: i64) -> i64 {
    if total_cents <= 0 { 0 } else { total_cents / CENTS_PER_POINT }
}

pub async fn find_by_customer<C: ConnectionTrait>(db: &C, customer_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::CustomerId.eq(customer_id)).one(db).await?)
}

fn missing_account() -> ModelError {
    ModelError::NotFound("loyalty account".into())
}

/// Fetch the customer's account, creating an empty one on first use.
///
/// Concurrent first lookups race on the unique `customer_id`; the losing
/// insert is skipped and both callers read the same row.
pub async fn find_or_create<C: ConnectionTrait>(db: &C, customer_id: Uuid) -> Result<Model, ModelError> {
    if let Some(acc) = find_by_customer(db, customer_id).await? {
        return Ok(acc);
    }
    if !customer::exists(db, customer_id).await? {
        return Err(ModelError::NotFound("customer".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        points: Set(0),
        lifetime_points: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Entity::insert(am)
        .on_conflict(OnConflict::column(Column::CustomerId).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    find_by_customer(db, customer_id).await?.ok_or_else(missing_account)
}

/// Credit points with a single in-place `UPDATE` on the balance columns.
pub async fn earn<C: ConnectionTrait>(db: &C, customer_id: Uuid, points: i64) -> Result<Model, ModelError> {
    let acc = find_or_create(db, customer_id).await?;
    if points <= 0 {
        return Ok(acc);
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    Entity::update_many()
        .col_expr(Column::Points, Expr::col(Column::Points).add(points))
        .col_expr(Column::LifetimePoints, Expr::col(Column::LifetimePoints).add(points))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(acc.id))
        .exec(db)
        .await?;
    Entity::find_by_id(acc.id).one(db).await?.ok_or_else(missing_account)
}

/// Spend points; the balance check is part of the `UPDATE` condition.
pub async fn redeem<C: ConnectionTrait>(db: &C, customer_id: Uuid, points: i64) -> Result<Model, ModelError> {
    if points <= 0 {
        return Err(ModelError::validation("points must be positive"));
    }
    let acc = find_or_create(db, customer_id).await?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::Points, Expr::col(Column::Points).sub(points))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(acc.id))
        .filter(Column::Points.gte(points))
        .exec(db)
        .await?;
    let current = Entity::find_by_id(acc.id).one(db).await?.ok_or_else(missing_account)?;
    if res.rows_affected == 0 {
        return Err(ModelError::validation(format!("insufficient points: balance is {}", current.points)));
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_per_full_hundred() {
        assert_eq!(points_for_amount(9_999), 0);
        assert_eq!(points_for_amount(10_000), 1);
        assert_eq!(points_for_amount(125_050), 12);
        assert_eq!(points_for_amount(-5), 0);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(Tier::for_lifetime_points(0), Tier::Bronze);
        assert_eq!(Tier::for_lifetime_points(99), Tier::Bronze);
        assert_eq!(Tier::for_lifetime_points(100), Tier::Silver);
        assert_eq!(Tier::for_lifetime_points(499), Tier::Silver);
        assert_eq!(Tier::for_lifetime_points(500), Tier::Gold);
    }
}
