use uuid::Uuid;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;
use tracing::info;

use common::pagination::{Page, Pagination};
use models::{errors::ModelError, loyalty_account::{self, Tier}};
use crate::{errors::ServiceError, paging::fetch_page};

/// Account plus its derived tier.
#[derive(Debug, Clone, Serialize)]
pub struct LoyaltyView {
    #[serde(flatten)]
    pub account: loyalty_account::Model,
    pub tier: Tier,
}

impl From<loyalty_account::Model> for LoyaltyView {
    fn from(account: loyalty_account::Model) -> Self {
        let tier = account.tier();
        Self { account, tier }
    }
}

fn customer_missing(e: ModelError) -> ServiceError {
    match e {
        ModelError::NotFound(what) => ServiceError::not_found(&what),
        other => other.into(),
    }
}

pub async fn list_accounts(db: &DatabaseConnection, opts: Pagination) -> Result<Page<LoyaltyView>, ServiceError> {
    let q = loyalty_account::Entity::find().order_by_desc(loyalty_account::Column::LifetimePoints);
    Ok(fetch_page(db, q, opts).await?.map(LoyaltyView::from))
}

/// The account is created with zero points on first lookup.
pub async fn account_for_customer(db: &DatabaseConnection, customer_id: Uuid) -> Result<LoyaltyView, ServiceError> {
    let acc = loyalty_account::find_or_create(db, customer_id).await.map_err(customer_missing)?;
    Ok(acc.into())
}

pub async fn redeem_points(db: &DatabaseConnection, customer_id: Uuid, points: i64) -> Result<LoyaltyView, ServiceError> {
    let acc = loyalty_account::redeem(db, customer_id, points).await.map_err(customer_missing)?;
    info!(customer_id = %customer_id, points, balance = acc.points, "loyalty_points_redeemed");
    Ok(acc.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_disabled, get_db, unique_phone};
    use models::customer::{self, NewCustomer};

    #[tokio::test]
    async fn loyalty_account_service() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        assert!(matches!(account_for_customer(&db, Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));

        let c = customer::create(&db, NewCustomer { name: "Loyal".into(), phone: unique_phone(), email: None, address: None }).await?;
        let view = account_for_customer(&db, c.id).await?;
        assert_eq!((view.account.points, view.tier), (0, Tier::Bronze));

        assert!(matches!(redeem_points(&db, c.id, 1).await, Err(ServiceError::Model(ModelError::Validation(_)))));
        loyalty_account::earn(&db, c.id, 600).await?;
        let view = redeem_points(&db, c.id, 100).await?;
        assert_eq!(view.account.points, 500);
        assert_eq!(view.tier, Tier::Gold);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_redeems_never_overdraw() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        let c = customer::create(&db, NewCustomer { name: "Spender".into(), phone: unique_phone(), email: None, address: None }).await?;
        let (first, second) = tokio::join!(account_for_customer(&db, c.id), account_for_customer(&db, c.id));
        assert_eq!(first?.account.id, second?.account.id);

        loyalty_account::earn(&db, c.id, 600).await?;
        let (a, b) = tokio::join!(redeem_points(&db, c.id, 400), redeem_points(&db, c.id, 400));
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        let view = account_for_customer(&db, c.id).await?;
        assert_eq!((view.account.points, view.account.lifetime_points), (200, 600));
        Ok(())
    }
}
