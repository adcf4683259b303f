use uuid::Uuid;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use common::pagination::{Page, Pagination};
use models::vehicle_registration::{self, NewRegistration, RegistrationPatch};
use crate::{errors::ServiceError, paging::fetch_page};

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegistrationFilter {
    pub customer_id: Option<Uuid>,
    pub vehicle_number: Option<String>,
}

pub async fn create_registration(db: &DatabaseConnection, input: NewRegistration) -> Result<vehicle_registration::Model, ServiceError> {
    Ok(vehicle_registration::create(db, input).await?)
}

pub async fn get_registration(db: &DatabaseConnection, id: Uuid) -> Result<vehicle_registration::Model, ServiceError> {
    vehicle_registration::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("registration"))
}

pub async fn update_registration(
    db: &DatabaseConnection,
    id: Uuid,
    patch: RegistrationPatch,
) -> Result<vehicle_registration::Model, ServiceError> {
    let mut am: vehicle_registration::ActiveModel = get_registration(db, id).await?.into();
    patch.apply(&mut am)?;
    Ok(am.update(db).await?)
}

pub async fn delete_registration(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = vehicle_registration::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("registration"));
    }
    Ok(())
}

pub async fn list_registrations(
    db: &DatabaseConnection,
    filter: RegistrationFilter,
    opts: Pagination,
) -> Result<Page<vehicle_registration::Model>, ServiceError> {
    let mut q = vehicle_registration::Entity::find().order_by_desc(vehicle_registration::Column::RegisteredOn);
    if let Some(customer_id) = filter.customer_id {
        q = q.filter(vehicle_registration::Column::CustomerId.eq(customer_id));
    }
    if let Some(number) = filter.vehicle_number.as_deref().filter(|s| !s.trim().is_empty()) {
        let normalized = models::validate::vehicle_number(number)?;
        q = q.filter(vehicle_registration::Column::VehicleNumber.eq(normalized));
    }
    fetch_page(db, q, opts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::test_support::{db_tests_disabled, get_db, unique_phone};
    use models::{customer::{self, NewCustomer}, errors::ModelError};

    #[tokio::test]
    async fn registration_service_flow() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        let c = customer::create(&db, NewCustomer { name: "Reg".into(), phone: unique_phone(), email: None, address: None }).await?;
        let number = format!("AP{}", &Uuid::new_v4().simple().to_string()[..8]);
        let input = NewRegistration {
            customer_id: c.id,
            bike_id: None,
            vehicle_number: number.to_lowercase(),
            chassis_number: "CH-1".into(),
            engine_number: "EN-1".into(),
            registered_on: Utc::now().date_naive(),
        };
        let r = create_registration(&db, input.clone()).await?;
        assert_eq!(r.vehicle_number, number.to_uppercase());
        assert!(matches!(create_registration(&db, input).await, Err(ServiceError::Model(ModelError::Conflict(_)))));

        let filter = RegistrationFilter { customer_id: None, vehicle_number: Some(number.to_lowercase()) };
        assert_eq!(list_registrations(&db, filter, Pagination::default()).await?.total, 1);

        delete_registration(&db, r.id).await?;
        customer::Entity::delete_by_id(c.id).exec(&db).await?;
        Ok(())
    }
}
