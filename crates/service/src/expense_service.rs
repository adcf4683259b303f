use uuid::Uuid;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use common::pagination::{Page, Pagination};
use models::expense::{self, ExpensePatch, NewExpense};
use crate::{errors::ServiceError, paging::fetch_page};

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpenseFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
}

pub async fn create_expense(db: &DatabaseConnection, input: NewExpense) -> Result<expense::Model, ServiceError> {
    Ok(expense::create(db, input).await?)
}

pub async fn get_expense(db: &DatabaseConnection, id: Uuid) -> Result<expense::Model, ServiceError> {
    expense::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("expense"))
}

pub async fn update_expense(db: &DatabaseConnection, id: Uuid, patch: ExpensePatch) -> Result<expense::Model, ServiceError> {
    let mut am: expense::ActiveModel = get_expense(db, id).await?.into();
    patch.apply(&mut am)?;
    Ok(am.update(db).await?)
}

pub async fn delete_expense(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = expense::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("expense"));
    }
    Ok(())
}

pub async fn list_expenses(db: &DatabaseConnection, filter: ExpenseFilter, opts: Pagination) -> Result<Page<expense::Model>, ServiceError> {
    let mut q = expense::Entity::find().order_by_desc(expense::Column::SpentOn);
    if let Some(from) = filter.from {
        q = q.filter(expense::Column::SpentOn.gte(from));
    }
    if let Some(to) = filter.to {
        q = q.filter(expense::Column::SpentOn.lte(to));
    }
    if let Some(category) = filter.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        q = q.filter(expense::Column::Category.eq(category.to_lowercase()));
    }
    fetch_page(db, q, opts).await
}
