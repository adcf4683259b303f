use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{bill, errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bill_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bill_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    pub spare_part_id: Option<Uuid>,
    pub bike_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Bill }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Bill => Entity::belongs_to(bill::Entity)
                .from(Column::BillId)
                .to(bill::Column::Id)
                .into(),
        }
    }
}

impl Related<bill::Entity> for Entity {
    fn to() -> RelationDef { Relation::Bill.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// A priced line ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub description: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub spare_part_id: Option<Uuid>,
    pub bike_id: Option<Uuid>,
}

impl Line {
    pub fn new(description: &str, quantity: i32, unit_price_cents: i64) -> Result<Self, ModelError> {
        if quantity < 1 {
            return Err(ModelError::validation("quantity must be at least 1"));
        }
        Ok(Self {
            description: validate::required_text("description", description, 255)?,
            quantity,
            unit_price_cents: validate::non_negative("unit_price_cents", unit_price_cents)?,
            spare_part_id: None,
            bike_id: None,
        })
    }

    pub fn line_total(&self) -> Result<i64, ModelError> {
        self.unit_price_cents
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| ModelError::validation("line total overflow"))
    }
}

pub async fn insert<C: ConnectionTrait>(db: &C, bill_id: Uuid, line: Line) -> Result<Model, ModelError> {
    let total = line.line_total()?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        bill_id: Set(bill_id),
        description: Set(line.description),
        quantity: Set(line.quantity),
        unit_price_cents: Set(line.unit_price_cents),
        line_total_cents: Set(total),
        spare_part_id: Set(line.spare_part_id),
        bike_id: Set(line.bike_id),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_bill<C: ConnectionTrait>(db: &C, bill_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().filter(Column::BillId.eq(bill_id)).all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(Line::new("Oil change", 0, 50_000).is_err());
    }

    #[test]
    fn line_total_multiplies() {
        let l = Line::new("Brake pad", 3, 45_000).unwrap();
        assert_eq!(l.line_total().unwrap(), 135_000);
    }

    #[test]
    fn line_total_overflow_is_error() {
        let l = Line::new("x", 2, i64::MAX).unwrap();
        assert!(l.line_total().is_err());
    }
}
