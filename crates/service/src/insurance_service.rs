use uuid::Uuid;
use chrono::{Duration, NaiveDate};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use common::pagination::{Page, Pagination};
use models::insurance_policy::{self, InsurancePolicyPatch, NewInsurancePolicy};
use crate::{errors::ServiceError, paging::fetch_page};

pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InsuranceFilter {
    pub customer_id: Option<Uuid>,
}

pub async fn create_policy(db: &DatabaseConnection, input: NewInsurancePolicy) -> Result<insurance_policy::Model, ServiceError> {
    Ok(insurance_policy::create(db, input).await?)
}

pub async fn get_policy(db: &DatabaseConnection, id: Uuid) -> Result<insurance_policy::Model, ServiceError> {
    insurance_policy::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("insurance policy"))
}

pub async fn update_policy(db: &DatabaseConnection, id: Uuid, patch: InsurancePolicyPatch) -> Result<insurance_policy::Model, ServiceError> {
    let current = get_policy(db, id).await?;
    let mut am: insurance_policy::ActiveModel = current.clone().into();
    patch.apply(&current, &mut am)?;
    Ok(am.update(db).await?)
}

pub async fn delete_policy(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = insurance_policy::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("insurance policy"));
    }
    Ok(())
}

pub async fn list_policies(
    db: &DatabaseConnection,
    filter: InsuranceFilter,
    opts: Pagination,
) -> Result<Page<insurance_policy::Model>, ServiceError> {
    let mut q = insurance_policy::Entity::find().order_by_asc(insurance_policy::Column::EndDate);
    if let Some(customer_id) = filter.customer_id {
        q = q.filter(insurance_policy::Column::CustomerId.eq(customer_id));
    }
    fetch_page(db, q, opts).await
}

/// Policies ending between `today` and `today + days`, soonest first.
pub async fn expiring_policies(db: &DatabaseConnection, today: NaiveDate, days: i64) -> Result<Vec<insurance_policy::Model>, ServiceError> {
    if days < 0 {
        return Err(ServiceError::validation("days must not be negative"));
    }
    let until = today + Duration::days(days);
    let policies = insurance_policy::Entity::find()
        .filter(insurance_policy::Column::EndDate.gte(today))
        .filter(insurance_policy::Column::EndDate.lte(until))
        .order_by_asc(insurance_policy::Column::EndDate)
        .all(db)
        .await?;
    Ok(policies)
}
