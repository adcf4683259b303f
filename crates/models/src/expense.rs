use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub spent_on: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewExpense {
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount_cents: i64,
    pub spent_on: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExpensePatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
    pub spent_on: Option<NaiveDate>,
}

fn category(v: &str) -> Result<String, ModelError> {
    validate::required_text("category", v, 64).map(|s| s.to_lowercase())
}

impl ExpensePatch {
    pub fn apply(self, am: &mut ActiveModel) -> Result<(), ModelError> {
        if let Some(v) = self.category { am.category = Set(category(&v)?); }
        if let Some(v) = self.description { am.description = Set(validate::optional_text("description", Some(&v), 2000)?); }
        if let Some(v) = self.amount_cents { am.amount_cents = Set(validate::positive("amount_cents", v)?); }
        if let Some(v) = self.spent_on { am.spent_on = Set(v); }
        am.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewExpense) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        category: Set(category(&input.category)?),
        description: Set(validate::optional_text("description", input.description.as_deref(), 2000)?),
        amount_cents: Set(validate::positive("amount_cents", input.amount_cents)?),
        spent_on: Set(input.spent_on),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
