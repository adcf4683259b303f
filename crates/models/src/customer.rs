use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

fn validate_email(email: Option<&str>) -> Result<Option<String>, ModelError> {
    match email.map(str::trim) {
        None | Some("") => Ok(None),
        Some(e) => validate::email(e).map(Some),
    }
}

impl CustomerPatch {
    /// Validate and copy the provided fields onto `am`. An empty string clears email/address.
    pub fn apply(self, am: &mut ActiveModel) -> Result<(), ModelError> {
        if let Some(name) = self.name {
            am.name = Set(validate::required_text("name", &name, 128)?);
        }
        if let Some(phone) = self.phone {
            am.phone = Set(validate::phone(&phone)?);
        }
        if let Some(email) = self.email {
            am.email = Set(validate_email(Some(&email))?);
        }
        if let Some(address) = self.address {
            am.address = Set(validate::optional_text("address", Some(&address), 512)?);
        }
        am.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewCustomer) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(validate::required_text("name", &input.name, 128)?),
        phone: Set(validate::phone(&input.phone)?),
        email: Set(validate_email(input.email.as_deref())?),
        address: Set(validate::optional_text("address", input.address.as_deref(), 512)?),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_active() -> ActiveModel {
        ActiveModel {
            name: Set("Old".into()),
            email: Set(Some("old@example.com".into())),
            ..Default::default()
        }
    }

    #[test]
    fn patch_clears_email_with_empty_string() {
        let mut am = blank_active();
        CustomerPatch { email: Some(String::new()), ..Default::default() }.apply(&mut am).unwrap();
        assert_eq!(am.email, Set(None));
    }

    #[test]
    fn patch_rejects_bad_phone() {
        let mut am = blank_active();
        let err = CustomerPatch { phone: Some("123".into()), ..Default::default() }.apply(&mut am);
        assert!(matches!(err, Err(ModelError::Validation(_))));
    }

    #[test]
    fn patch_trims_name() {
        let mut am = blank_active();
        CustomerPatch { name: Some("  Ravi  ".into()), ..Default::default() }.apply(&mut am).unwrap();
        assert_eq!(am.name, Set("Ravi".to_string()));
    }
}
