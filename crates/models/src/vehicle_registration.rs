use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{bike, customer, errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicle_registration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub bike_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub vehicle_number: String,
    pub chassis_number: String,
    pub engine_number: String,
    pub registered_on: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Customer, Bike }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Bike => Entity::belongs_to(bike::Entity)
                .from(Column::BikeId)
                .to(bike::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewRegistration {
    pub customer_id: Uuid,
    #[serde(default)]
    pub bike_id: Option<Uuid>,
    pub vehicle_number: String,
    pub chassis_number: String,
    pub engine_number: String,
    pub registered_on: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegistrationPatch {
    pub vehicle_number: Option<String>,
    pub chassis_number: Option<String>,
    pub engine_number: Option<String>,
    pub registered_on: Option<NaiveDate>,
}

fn serial(field: &str, v: &str) -> Result<String, ModelError> {
    validate::required_text(field, v, 64).map(|s| s.to_uppercase())
}

impl RegistrationPatch {
    pub fn apply(self, am: &mut ActiveModel) -> Result<(), ModelError> {
        if let Some(v) = self.vehicle_number { am.vehicle_number = Set(validate::vehicle_number(&v)?); }
        if let Some(v) = self.chassis_number { am.chassis_number = Set(serial("chassis_number", &v)?); }
        if let Some(v) = self.engine_number { am.engine_number = Set(serial("engine_number", &v)?); }
        if let Some(v) = self.registered_on { am.registered_on = Set(v); }
        am.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewRegistration) -> Result<Model, ModelError> {
    let vehicle_number = validate::vehicle_number(&input.vehicle_number)?;
    let chassis = serial("chassis_number", &input.chassis_number)?;
    let engine = serial("engine_number", &input.engine_number)?;
    if !customer::exists(db, input.customer_id).await? {
        return Err(ModelError::validation("customer does not exist"));
    }
    if let Some(bike_id) = input.bike_id {
        if bike::Entity::find_by_id(bike_id).one(db).await?.is_none() {
            return Err(ModelError::validation("bike does not exist"));
        }
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(input.customer_id),
        bike_id: Set(input.bike_id),
        vehicle_number: Set(vehicle_number),
        chassis_number: Set(chassis),
        engine_number: Set(engine),
        registered_on: Set(input.registered_on),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_uppercases_identifiers() {
        let mut am = <ActiveModel as Default>::default();
        RegistrationPatch {
            vehicle_number: Some("mh 12 de 1433".into()),
            chassis_number: Some("ma3ewdf1s00123".into()),
            ..Default::default()
        }
        .apply(&mut am)
        .unwrap();
        assert_eq!(am.vehicle_number, Set("MH12DE1433".to_string()));
        assert_eq!(am.chassis_number, Set("MA3EWDF1S00123".to_string()));
    }

    #[test]
    fn blank_engine_number_is_rejected() {
        let mut am = <ActiveModel as Default>::default();
        assert!(RegistrationPatch { engine_number: Some(" ".into()), ..Default::default() }.apply(&mut am).is_err());
    }
}
