use uuid::Uuid;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::instrument;

use common::pagination::{Page, Pagination};
use models::customer::{self, CustomerPatch, NewCustomer};
use crate::{errors::{delete_error, ServiceError}, paging::fetch_page};

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerFilter {
    /// Case-insensitive match on name or phone.
    pub search: Option<String>,
}

pub async fn create_customer(db: &DatabaseConnection, input: NewCustomer) -> Result<customer::Model, ServiceError> {
    Ok(customer::create(db, input).await?)
}

pub async fn get_customer(db: &DatabaseConnection, id: Uuid) -> Result<customer::Model, ServiceError> {
    customer::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("customer"))
}

#[instrument(skip(db, patch))]
pub async fn update_customer(db: &DatabaseConnection, id: Uuid, patch: CustomerPatch) -> Result<customer::Model, ServiceError> {
    let mut am: customer::ActiveModel = get_customer(db, id).await?.into();
    patch.apply(&mut am)?;
    Ok(am.update(db).await?)
}

/// Customers with jobs or bills cannot be removed.
pub async fn delete_customer(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = customer::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| delete_error("customer", e))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("customer"));
    }
    Ok(())
}

pub async fn list_customers(
    db: &DatabaseConnection,
    filter: CustomerFilter,
    opts: Pagination,
) -> Result<Page<customer::Model>, ServiceError> {
    let mut q = customer::Entity::find().order_by_asc(customer::Column::Name);
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", term.to_lowercase());
        q = q.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(customer::Column::Name))).like(pattern))
                .add(customer::Column::Phone.contains(term)),
        );
    }
    fetch_page(db, q, opts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_disabled, get_db, unique_phone};

    #[tokio::test]
    async fn customer_crud_service() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        let phone = unique_phone();
        let c = create_customer(&db, NewCustomer {
            name: "Zebediah Search".into(),
            phone: phone.clone(),
            email: None,
            address: None,
        })
        .await?;

        let page = list_customers(&db, CustomerFilter { search: Some("zebediah".into()) }, Pagination::default()).await?;
        assert!(page.items.iter().any(|x| x.id == c.id));
        let page = list_customers(&db, CustomerFilter { search: Some(phone[2..8].to_string()) }, Pagination::default()).await?;
        assert!(page.items.iter().any(|x| x.id == c.id));

        let updated = update_customer(&db, c.id, CustomerPatch { name: Some("Zeb".into()), ..Default::default() }).await?;
        assert_eq!(updated.name, "Zeb");

        delete_customer(&db, c.id).await?;
        assert!(matches!(get_customer(&db, c.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete_customer(&db, c.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
