use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub valid_from: Date,
    pub valid_to: Date,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn applies_on(&self, day: NaiveDate) -> bool {
        self.active && self.valid_from <= day && day <= self.valid_to
    }

    /// Discount for `subtotal_cents`, rounded down to whole cents.
    pub fn discount_for(&self, subtotal_cents: i64) -> i64 {
        subtotal_cents * i64::from(self.discount_percent) / 100
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewOffer {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub discount_percent: i32,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool { true }

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OfferPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub discount_percent: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub active: Option<bool>,
}

pub fn validate_discount(percent: i32) -> Result<i32, ModelError> {
    if !(1..=100).contains(&percent) {
        return Err(ModelError::validation("discount_percent must be between 1 and 100"));
    }
    Ok(percent)
}

pub fn validate_window(from: NaiveDate, to: NaiveDate) -> Result<(), ModelError> {
    if to < from {
        return Err(ModelError::validation("valid_to must not be before valid_from"));
    }
    Ok(())
}

impl OfferPatch {
    /// Needs the current row to re-check the validity window.
    pub fn apply(self, current: &Model, am: &mut ActiveModel) -> Result<(), ModelError> {
        let from = self.valid_from.unwrap_or(current.valid_from);
        let to = self.valid_to.unwrap_or(current.valid_to);
        validate_window(from, to)?;
        if let Some(v) = self.title { am.title = Set(validate::required_text("title", &v, 128)?); }
        if let Some(v) = self.description { am.description = Set(validate::optional_text("description", Some(&v), 2000)?); }
        if let Some(v) = self.discount_percent { am.discount_percent = Set(validate_discount(v)?); }
        if let Some(v) = self.active { am.active = Set(v); }
        am.valid_from = Set(from);
        am.valid_to = Set(to);
        am.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewOffer) -> Result<Model, ModelError> {
    validate_window(input.valid_from, input.valid_to)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(validate::required_text("title", &input.title, 128)?),
        description: Set(validate::optional_text("description", input.description.as_deref(), 2000)?),
        discount_percent: Set(validate_discount(input.discount_percent)?),
        valid_from: Set(input.valid_from),
        valid_to: Set(input.valid_to),
        active: Set(input.active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
