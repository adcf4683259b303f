use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use common::pagination::{Page, Pagination};
use models::bike::{self, BikePatch, NewBike};
use crate::{errors::{delete_error, ServiceError}, paging::fetch_page};

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BikeFilter {
    pub brand: Option<String>,
    /// Only bikes with stock > 0
    #[serde(default)]
    pub in_stock: Option<bool>,
}

pub async fn create_bike(db: &DatabaseConnection, input: NewBike) -> Result<bike::Model, ServiceError> {
    Ok(bike::create(db, input).await?)
}

pub async fn get_bike(db: &DatabaseConnection, id: Uuid) -> Result<bike::Model, ServiceError> {
    bike::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("bike"))
}

pub async fn update_bike(db: &DatabaseConnection, id: Uuid, patch: BikePatch) -> Result<bike::Model, ServiceError> {
    let mut am: bike::ActiveModel = get_bike(db, id).await?.into();
    patch.apply(&mut am)?;
    Ok(am.update(db).await?)
}

/// Returns the removed row so the caller can clean up its image.
pub async fn delete_bike(db: &DatabaseConnection, id: Uuid) -> Result<bike::Model, ServiceError> {
    let found = get_bike(db, id).await?;
    bike::Entity::delete_by_id(id).exec(db).await.map_err(|e| delete_error("bike", e))?;
    Ok(found)
}

pub async fn list_bikes(db: &DatabaseConnection, filter: BikeFilter, opts: Pagination) -> Result<Page<bike::Model>, ServiceError> {
    let mut q = bike::Entity::find()
        .order_by_asc(bike::Column::Brand)
        .order_by_asc(bike::Column::ModelName);
    if let Some(brand) = filter.brand.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        q = q.filter(Expr::expr(Func::lower(Expr::col(bike::Column::Brand))).eq(brand.to_lowercase()));
    }
    if filter.in_stock == Some(true) {
        q = q.filter(bike::Column::Stock.gt(0));
    }
    fetch_page(db, q, opts).await
}

/// Point the bike at a newly stored image; returns the previous file name, if any.
pub async fn set_bike_image(db: &DatabaseConnection, id: Uuid, file_name: &str) -> Result<(bike::Model, Option<String>), ServiceError> {
    let found = get_bike(db, id).await?;
    let previous = found.image_path.clone();
    let mut am: bike::ActiveModel = found.into();
    am.image_path = Set(Some(file_name.to_string()));
    am.updated_at = Set(Utc::now().into());
    Ok((am.update(db).await?, previous))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_disabled, get_db};

    #[tokio::test]
    async fn bike_crud_service() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        let brand = format!("Brand{}", &Uuid::new_v4().simple().to_string()[..6]);
        let b = create_bike(&db, NewBike {
            brand: brand.clone(),
            model_name: "Classic 350".into(),
            category: "cruiser".into(),
            color: Some("black".into()),
            engine_cc: 349,
            price_cents: 19_000_000,
            stock: 0,
        })
        .await?;

        let filter = BikeFilter { brand: Some(brand.to_uppercase()), in_stock: Some(true) };
        assert!(list_bikes(&db, filter, Pagination::default()).await?.items.is_empty());
        let updated = update_bike(&db, b.id, BikePatch { stock: Some(3), ..Default::default() }).await?;
        assert_eq!(updated.stock, 3);
        let filter = BikeFilter { brand: Some(brand.to_uppercase()), in_stock: Some(true) };
        assert_eq!(list_bikes(&db, filter, Pagination::default()).await?.total, 1);

        let (_, prev) = set_bike_image(&db, b.id, "a.png").await?;
        assert!(prev.is_none());
        let (_, prev) = set_bike_image(&db, b.id, "b.png").await?;
        assert_eq!(prev.as_deref(), Some("a.png"));

        let removed = delete_bike(&db, b.id).await?;
        assert_eq!(removed.image_path.as_deref(), Some("b.png"));
        assert!(matches!(get_bike(&db, b.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
