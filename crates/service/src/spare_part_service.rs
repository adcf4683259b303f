use uuid::Uuid;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::{info, instrument};

use common::pagination::{Page, Pagination};
use models::spare_part::{self, NewSparePart, SparePartPatch};
use crate::{errors::{delete_error, ServiceError}, paging::fetch_page};

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SparePartFilter {
    /// Matches name (case-insensitive) or part number prefix.
    pub search: Option<String>,
}

pub async fn create_spare_part(db: &DatabaseConnection, input: NewSparePart) -> Result<spare_part::Model, ServiceError> {
    Ok(spare_part::create(db, input).await?)
}

pub async fn get_spare_part(db: &DatabaseConnection, id: Uuid) -> Result<spare_part::Model, ServiceError> {
    spare_part::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("spare part"))
}

pub async fn update_spare_part(db: &DatabaseConnection, id: Uuid, patch: SparePartPatch) -> Result<spare_part::Model, ServiceError> {
    let mut am: spare_part::ActiveModel = get_spare_part(db, id).await?.into();
    patch.apply(&mut am)?;
    Ok(am.update(db).await?)
}

pub async fn delete_spare_part(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = spare_part::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| delete_error("spare part", e))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("spare part"));
    }
    Ok(())
}

pub async fn list_spare_parts(
    db: &DatabaseConnection,
    filter: SparePartFilter,
    opts: Pagination,
) -> Result<Page<spare_part::Model>, ServiceError> {
    let mut q = spare_part::Entity::find().order_by_asc(spare_part::Column::Name);
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        q = q.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(spare_part::Column::Name))).like(format!("%{}%", term.to_lowercase())))
                .add(spare_part::Column::PartNumber.starts_with(term.to_uppercase())),
        );
    }
    fetch_page(db, q, opts).await
}

#[instrument(skip(db))]
pub async fn adjust_stock(db: &DatabaseConnection, id: Uuid, delta: i32) -> Result<spare_part::Model, ServiceError> {
    let updated = spare_part::adjust_quantity(db, id, delta).await?;
    if updated.needs_reorder() {
        info!(part_number = %updated.part_number, quantity = updated.quantity, "spare_part_low_stock");
    }
    Ok(updated)
}

/// Parts at or below their reorder level, scarcest first.
pub async fn low_stock(db: &DatabaseConnection) -> Result<Vec<spare_part::Model>, ServiceError> {
    let parts = spare_part::Entity::find()
        .filter(Expr::col(spare_part::Column::Quantity).lte(Expr::col(spare_part::Column::ReorderLevel)))
        .order_by_asc(spare_part::Column::Quantity)
        .all(db)
        .await?;
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_disabled, get_db};
    use models::errors::ModelError;

    #[tokio::test]
    async fn spare_part_stock_service() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        let pn = format!("SP-{}", &Uuid::new_v4().simple().to_string()[..8]);
        let p = create_spare_part(&db, NewSparePart {
            name: "Air filter".into(),
            part_number: pn.clone(),
            quantity: 10,
            unit_price_cents: 35_000,
            reorder_level: 4,
        })
        .await?;
        assert!(!low_stock(&db).await?.iter().any(|x| x.id == p.id));

        let p2 = adjust_stock(&db, p.id, -6).await?;
        assert_eq!(p2.quantity, 4);
        assert!(low_stock(&db).await?.iter().any(|x| x.id == p.id));
        assert!(matches!(adjust_stock(&db, p.id, -5).await, Err(ServiceError::Model(ModelError::Validation(_)))));

        let dup = create_spare_part(&db, NewSparePart {
            name: "Dup".into(),
            part_number: pn.to_lowercase(),
            quantity: 0,
            unit_price_cents: 1,
            reorder_level: 0,
        })
        .await;
        assert!(matches!(dup, Err(ServiceError::Model(ModelError::Conflict(_)))));

        let found = list_spare_parts(&db, SparePartFilter { search: Some(pn.clone()) }, Pagination::default()).await?;
        assert_eq!(found.total, 1);

        delete_spare_part(&db, p.id).await?;
        assert!(matches!(delete_spare_part(&db, p.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
