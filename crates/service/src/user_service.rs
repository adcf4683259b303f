use uuid::Uuid;
use chrono::Utc;
use sea_orm::{DatabaseConnection, ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use common::pagination::{Page, Pagination};
use models::user::{self, Role};
use crate::{errors::ServiceError, paging::fetch_page};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("user"))
}

/// Update a user's name and/or role.
pub async fn update_user(db: &DatabaseConnection, id: Uuid, patch: UserPatch) -> Result<user::Model, ServiceError> {
    let mut am: user::ActiveModel = get_user(db, id).await?.into();
    if let Some(name) = patch.name {
        am.name = Set(user::validate_name(&name)?);
    }
    if let Some(role) = patch.role {
        am.role = Set(role);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Hard-delete a user; `actor_id` may not remove their own account.
pub async fn delete_user(db: &DatabaseConnection, actor_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
    if actor_id == id {
        return Err(ServiceError::validation("you cannot delete your own account"));
    }
    if !user::hard_delete(db, id).await? {
        return Err(ServiceError::not_found("user"));
    }
    info!(user_id = %id, actor_id = %actor_id, "user_deleted");
    Ok(())
}

/// List users with pagination.
pub async fn list_users(db: &DatabaseConnection, opts: Pagination) -> Result<Page<user::Model>, ServiceError> {
    let q = user::Entity::find().order_by_asc(user::Column::Email);
    fetch_page(db, q, opts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_disabled, get_db};

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        let email = format!("svc_{}@example.com", Uuid::new_v4());
        let u = user::create(&db, &email, "Svc User", Role::Staff).await?;

        let found = get_user(&db, u.id).await?;
        assert_eq!(found.email, email);

        let updated = update_user(&db, u.id, UserPatch { name: Some("New Name".into()), role: Some(Role::Admin) }).await?;
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.role, Role::Admin);

        assert!(matches!(delete_user(&db, u.id, u.id).await, Err(ServiceError::Validation(_))));
        delete_user(&db, Uuid::new_v4(), u.id).await?;
        assert!(matches!(get_user(&db, u.id).await, Err(ServiceError::NotFound(_))));

        // pagination test
        let page = list_users(&db, Pagination { page: 1, per_page: 2 }).await?;
        assert!(page.items.len() <= 2);
        Ok(())
    }
}
