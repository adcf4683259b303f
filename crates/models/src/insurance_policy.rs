use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{customer, errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insurance_policy")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_number: String,
    pub provider: String,
    #[sea_orm(unique)]
    pub policy_number: String,
    pub premium_cents: i64,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Days left until `end_date`, negative once lapsed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
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

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewInsurancePolicy {
    pub customer_id: Uuid,
    pub vehicle_number: String,
    pub provider: String,
    pub policy_number: String,
    pub premium_cents: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InsurancePolicyPatch {
    pub vehicle_number: Option<String>,
    pub provider: Option<String>,
    pub policy_number: Option<String>,
    pub premium_cents: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), ModelError> {
    if end <= start {
        return Err(ModelError::validation("end_date must be after start_date"));
    }
    Ok(())
}

fn policy_number(v: &str) -> Result<String, ModelError> {
    validate::required_text("policy_number", v, 64).map(|s| s.to_uppercase())
}

impl InsurancePolicyPatch {
    pub fn apply(self, current: &Model, am: &mut ActiveModel) -> Result<(), ModelError> {
        let start = self.start_date.unwrap_or(current.start_date);
        let end = self.end_date.unwrap_or(current.end_date);
        validate_period(start, end)?;
        if let Some(v) = self.vehicle_number { am.vehicle_number = Set(validate::vehicle_number(&v)?); }
        if let Some(v) = self.provider { am.provider = Set(validate::required_text("provider", &v, 128)?); }
        if let Some(v) = self.policy_number { am.policy_number = Set(policy_number(&v)?); }
        if let Some(v) = self.premium_cents { am.premium_cents = Set(validate::positive("premium_cents", v)?); }
        am.start_date = Set(start);
        am.end_date = Set(end);
        am.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewInsurancePolicy) -> Result<Model, ModelError> {
    validate_period(input.start_date, input.end_date)?;
    let vehicle_number = validate::vehicle_number(&input.vehicle_number)?;
    let provider = validate::required_text("provider", &input.provider, 128)?;
    let number = policy_number(&input.policy_number)?;
    let premium = validate::positive("premium_cents", input.premium_cents)?;
    if !customer::exists(db, input.customer_id).await? {
        return Err(ModelError::validation("customer does not exist"));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(input.customer_id),
        vehicle_number: Set(vehicle_number),
        provider: Set(provider),
        policy_number: Set(number),
        premium_cents: Set(premium),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
