use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "spare_part")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub part_number: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub reorder_level: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewSparePart {
    pub name: String,
    pub part_number: String,
    #[serde(default)]
    pub quantity: i32,
    pub unit_price_cents: i64,
    #[serde(default = "default_reorder_level")]
    pub reorder_level: i32,
}

fn default_reorder_level() -> i32 { 5 }

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SparePartPatch {
    pub name: Option<String>,
    pub part_number: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price_cents: Option<i64>,
    pub reorder_level: Option<i32>,
}

pub fn validate_part_number(v: &str) -> Result<String, ModelError> {
    Ok(validate::required_text("part_number", v, 64)?.to_uppercase())
}

impl SparePartPatch {
    pub fn apply(self, am: &mut ActiveModel) -> Result<(), ModelError> {
        if let Some(v) = self.name { am.name = Set(validate::required_text("name", &v, 128)?); }
        if let Some(v) = self.part_number { am.part_number = Set(validate_part_number(&v)?); }
        if let Some(v) = self.quantity { am.quantity = Set(validate::non_negative("quantity", v.into())? as i32); }
        if let Some(v) = self.unit_price_cents { am.unit_price_cents = Set(validate::positive("unit_price_cents", v)?); }
        if let Some(v) = self.reorder_level { am.reorder_level = Set(validate::non_negative("reorder_level", v.into())? as i32); }
        am.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewSparePart) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(validate::required_text("name", &input.name, 128)?),
        part_number: Set(validate_part_number(&input.part_number)?),
        quantity: Set(validate::non_negative("quantity", input.quantity.into())? as i32),
        unit_price_cents: Set(validate::positive("unit_price_cents", input.unit_price_cents)?),
        reorder_level: Set(validate::non_negative("reorder_level", input.reorder_level.into())? as i32),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Apply a signed stock movement; the resulting quantity may not go below zero.
///
/// The check and the write are one conditional `UPDATE`, so concurrent
/// movements on the same part cannot overwrite each other.
pub async fn adjust_quantity<C: ConnectionTrait>(db: &C, id: Uuid, delta: i32) -> Result<Model, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::Quantity, Expr::col(Column::Quantity).add(delta))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Expr::expr(Expr::col(Column::Quantity).add(delta)).gte(0))
        .exec(db)
        .await?;
    let found = Entity::find_by_id(id).one(db).await?.ok_or_else(|| ModelError::NotFound("spare part".into()))?;
    if res.rows_affected == 0 {
        return Err(ModelError::validation(format!(
            "insufficient stock for {} (available {}, requested {})",
            found.part_number, found.quantity, -i64::from(delta)
        )));
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_number_is_uppercased() {
        assert_eq!(validate_part_number(" bp-102 ").unwrap(), "BP-102");
        assert!(validate_part_number("").is_err());
    }

    #[test]
    fn reorder_threshold_is_inclusive() {
        let now = Utc::now().into();
        let part = Model {
            id: Uuid::new_v4(),
            name: "Brake pad".into(),
            part_number: "BP-1".into(),
            quantity: 5,
            unit_price_cents: 45_000,
            reorder_level: 5,
            created_at: now,
            updated_at: now,
        };
        assert!(part.needs_reorder());
        assert!(!Model { quantity: 6, ..part }.needs_reorder());
    }
}
