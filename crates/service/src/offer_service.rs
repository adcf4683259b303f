use uuid::Uuid;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use common::pagination::{Page, Pagination};
use models::offer::{self, NewOffer, OfferPatch};
use crate::{errors::{delete_error, ServiceError}, paging::fetch_page};

pub async fn create_offer(db: &DatabaseConnection, input: NewOffer) -> Result<offer::Model, ServiceError> {
    Ok(offer::create(db, input).await?)
}

pub async fn get_offer(db: &DatabaseConnection, id: Uuid) -> Result<offer::Model, ServiceError> {
    offer::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("offer"))
}

pub async fn update_offer(db: &DatabaseConnection, id: Uuid, patch: OfferPatch) -> Result<offer::Model, ServiceError> {
    let current = get_offer(db, id).await?;
    let mut am: offer::ActiveModel = current.clone().into();
    patch.apply(&current, &mut am)?;
    Ok(am.update(db).await?)
}

pub async fn delete_offer(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = offer::Entity::delete_by_id(id).exec(db).await.map_err(|e| delete_error("offer", e))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("offer"));
    }
    Ok(())
}

pub async fn list_offers(db: &DatabaseConnection, opts: Pagination) -> Result<Page<offer::Model>, ServiceError> {
    let q = offer::Entity::find().order_by_desc(offer::Column::ValidFrom);
    fetch_page(db, q, opts).await
}

/// Active offers whose window contains `day`.
pub async fn active_offers(db: &DatabaseConnection, day: NaiveDate) -> Result<Vec<offer::Model>, ServiceError> {
    let offers = offer::Entity::find()
        .filter(offer::Column::Active.eq(true))
        .filter(offer::Column::ValidFrom.lte(day))
        .filter(offer::Column::ValidTo.gte(day))
        .order_by_desc(offer::Column::DiscountPercent)
        .all(db)
        .await?;
    Ok(offers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crate::test_support::{db_tests_disabled, get_db};

    #[tokio::test]
    async fn active_window_service() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        let today = Utc::now().date_naive();
        let o = create_offer(&db, NewOffer {
            title: "Monsoon service".into(),
            description: None,
            discount_percent: 12,
            valid_from: today,
            valid_to: today + Duration::days(7),
            active: true,
        })
        .await?;
        assert!(active_offers(&db, today).await?.iter().any(|x| x.id == o.id));
        assert!(!active_offers(&db, today + Duration::days(8)).await?.iter().any(|x| x.id == o.id));

        update_offer(&db, o.id, OfferPatch { active: Some(false), ..Default::default() }).await?;
        assert!(!active_offers(&db, today).await?.iter().any(|x| x.id == o.id));

        delete_offer(&db, o.id).await?;
        assert!(matches!(get_offer(&db, o.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
