use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bike")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand: String,
    pub model_name: String,
    pub category: String,
    pub color: Option<String>,
    pub engine_cc: i32,
    pub price_cents: i64,
    pub stock: i32,
    pub image_path: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewBike {
    pub brand: String,
    pub model_name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub engine_cc: i32,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i32,
}

fn default_category() -> String { "motorcycle".into() }

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BikePatch {
    pub brand: Option<String>,
    pub model_name: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub engine_cc: Option<i32>,
    pub price_cents: Option<i64>,
    pub stock: Option<i32>,
}

impl BikePatch {
    pub fn apply(self, am: &mut ActiveModel) -> Result<(), ModelError> {
        if let Some(v) = self.brand { am.brand = Set(validate::required_text("brand", &v, 64)?); }
        if let Some(v) = self.model_name { am.model_name = Set(validate::required_text("model_name", &v, 128)?); }
        if let Some(v) = self.category { am.category = Set(validate::required_text("category", &v, 64)?); }
        if let Some(v) = self.color { am.color = Set(validate::optional_text("color", Some(&v), 32)?); }
        if let Some(v) = self.engine_cc { am.engine_cc = Set(validate::non_negative("engine_cc", v.into())? as i32); }
        if let Some(v) = self.price_cents { am.price_cents = Set(validate::positive("price_cents", v)?); }
        if let Some(v) = self.stock { am.stock = Set(validate::non_negative("stock", v.into())? as i32); }
        am.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewBike) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        brand: Set(validate::required_text("brand", &input.brand, 64)?),
        model_name: Set(validate::required_text("model_name", &input.model_name, 128)?),
        category: Set(validate::required_text("category", &input.category, 64)?),
        color: Set(validate::optional_text("color", input.color.as_deref(), 32)?),
        engine_cc: Set(validate::non_negative("engine_cc", input.engine_cc.into())? as i32),
        price_cents: Set(validate::positive("price_cents", input.price_cents)?),
        stock: Set(validate::non_negative("stock", input.stock.into())? as i32),
        image_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Remove `quantity` units from stock; fails when not enough bikes are left.
pub async fn take_stock<C: ConnectionTrait>(db: &C, id: Uuid, quantity: i32) -> Result<Model, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::Stock, Expr::col(Column::Stock).sub(quantity))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::Stock.gte(quantity))
        .exec(db)
        .await?;
    let found = Entity::find_by_id(id).one(db).await?.ok_or_else(|| ModelError::NotFound("bike".into()))?;
    if res.rows_affected == 0 {
        return Err(ModelError::validation(format!(
            "insufficient stock for {} {} (available {}, requested {})",
            found.brand, found.model_name, found.stock, quantity
        )));
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_rejects_negative_stock() {
        let mut am = <ActiveModel as Default>::default();
        let res = BikePatch { stock: Some(-2), ..Default::default() }.apply(&mut am);
        assert!(matches!(res, Err(ModelError::Validation(_))));
    }

    #[test]
    fn patch_sets_price() {
        let mut am = <ActiveModel as Default>::default();
        BikePatch { price_cents: Some(9_500_000), ..Default::default() }.apply(&mut am).unwrap();
        assert_eq!(am.price_cents, Set(9_500_000));
    }

    #[test]
    fn new_bike_defaults_category() {
        let b: NewBike = serde_json::from_str(r#"{"brand":"Hero","model_name":"Splendor","price_cents":7500000}"#).unwrap();
        assert_eq!(b.category, "motorcycle");
        assert_eq!(b.stock, 0);
    }
}
