use std::fmt;

use sea_orm::{entity::prelude::*, sea_query::StringLen, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{customer, errors::ModelError, validate};

/// Lifecycle of a repair job.
///
/// `pending -> in_progress -> completed -> delivered`, and any job that has
/// not been completed yet may be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl JobStatus {
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (InProgress, Completed)
                | (Completed, Delivered)
                | (Pending, Cancelled)
                | (InProgress, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Delivered => "delivered",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_job")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_number: String,
    pub description: String,
    pub status: JobStatus,
    pub labour_cents: i64,
    pub parts_cents: i64,
    pub received_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub delivered_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn total_cents(&self) -> i64 {
        self.labour_cents + self.parts_cents
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Customer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
        }
    }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewServiceJob {
    pub customer_id: Uuid,
    pub vehicle_number: String,
    pub description: String,
    #[serde(default)]
    pub labour_cents: i64,
    #[serde(default)]
    pub parts_cents: i64,
}

/// Editable fields; status moves only through [`transition`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceJobPatch {
    pub vehicle_number: Option<String>,
    pub description: Option<String>,
    pub labour_cents: Option<i64>,
    pub parts_cents: Option<i64>,
}

impl ServiceJobPatch {
    pub fn apply(self, am: &mut ActiveModel) -> Result<(), ModelError> {
        if let Some(v) = self.vehicle_number { am.vehicle_number = Set(validate::vehicle_number(&v)?); }
        if let Some(v) = self.description { am.description = Set(validate::required_text("description", &v, 2000)?); }
        if let Some(v) = self.labour_cents { am.labour_cents = Set(validate::non_negative("labour_cents", v)?); }
        if let Some(v) = self.parts_cents { am.parts_cents = Set(validate::non_negative("parts_cents", v)?); }
        am.updated_at = Set(Utc::now().into());
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewServiceJob) -> Result<Model, ModelError> {
    if !customer::exists(db, input.customer_id).await? {
        return Err(ModelError::validation("customer does not exist"));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(input.customer_id),
        vehicle_number: Set(validate::vehicle_number(&input.vehicle_number)?),
        description: Set(validate::required_text("description", &input.description, 2000)?),
        status: Set(JobStatus::Pending),
        labour_cents: Set(validate::non_negative("labour_cents", input.labour_cents)?),
        parts_cents: Set(validate::non_negative("parts_cents", input.parts_cents)?),
        received_at: Set(now),
        completed_at: Set(None),
        delivered_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Move a job to `next`, stamping completion/delivery times.
pub fn transition(job: Model, next: JobStatus) -> Result<ActiveModel, ModelError> {
    if !job.status.can_transition_to(next) {
        return Err(ModelError::validation(format!("cannot move job from {} to {}", job.status, next)));
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut am: ActiveModel = job.into();
    am.status = Set(next);
    match next {
        JobStatus::Completed => am.completed_at = Set(Some(now)),
        JobStatus::Delivered => am.delivered_at = Set(Some(now)),
        _ => {}
    }
    am.updated_at = Set(now);
    Ok(am)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn job(status: JobStatus) -> Model {
        let now = Utc::now().into();
        Model {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            vehicle_number: "KA01AB1234".into(),
            description: "General service".into(),
            status,
            labour_cents: 50_000,
            parts_cents: 20_000,
            received_at: now,
            completed_at: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn forward_path_is_allowed() {
        use JobStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Delivered));
    }

    #[test]
    fn skipping_and_reversing_are_rejected() {
        use JobStatus::*;
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn completing_stamps_completed_at() {
        let am = transition(job(JobStatus::InProgress), JobStatus::Completed).unwrap();
        assert_eq!(am.status, Set(JobStatus::Completed));
        assert!(matches!(am.completed_at, ActiveValue::Set(Some(_))));
    }

    #[test]
    fn invalid_transition_is_validation_error() {
        let err = transition(job(JobStatus::Pending), JobStatus::Delivered).unwrap_err();
        assert!(err.to_string().contains("pending"));
    }

    #[test]
    fn total_sums_labour_and_parts() {
        assert_eq!(job(JobStatus::Pending).total_cents(), 70_000);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&JobStatus::InProgress).unwrap(), "\"in_progress\"");
    }
}
