use uuid::Uuid;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use tracing::{info, instrument};

use common::pagination::{Page, Pagination};
use models::service_job::{self, JobStatus, NewServiceJob, ServiceJobPatch};
use crate::{errors::{delete_error, ServiceError}, paging::fetch_page};

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceJobFilter {
    /// `pending`, `in_progress`, `completed`, `delivered` or `cancelled`
    #[param(value_type = Option<String>)]
    pub status: Option<JobStatus>,
    pub customer_id: Option<Uuid>,
}

#[instrument(skip(db, input), fields(customer_id = %input.customer_id))]
pub async fn create_service_job(db: &DatabaseConnection, input: NewServiceJob) -> Result<service_job::Model, ServiceError> {
    let job = service_job::create(db, input).await?;
    info!(job_id = %job.id, "service_job_received");
    Ok(job)
}

pub async fn get_service_job(db: &DatabaseConnection, id: Uuid) -> Result<service_job::Model, ServiceError> {
    service_job::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("service job"))
}

pub async fn update_service_job(db: &DatabaseConnection, id: Uuid, patch: ServiceJobPatch) -> Result<service_job::Model, ServiceError> {
    let mut am: service_job::ActiveModel = get_service_job(db, id).await?.into();
    patch.apply(&mut am)?;
    Ok(am.update(db).await?)
}

pub async fn delete_service_job(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = service_job::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| delete_error("service job", e))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("service job"));
    }
    Ok(())
}

/// Newest first.
pub async fn list_service_jobs(
    db: &DatabaseConnection,
    filter: ServiceJobFilter,
    opts: Pagination,
) -> Result<Page<service_job::Model>, ServiceError> {
    let mut q = service_job::Entity::find().order_by_desc(service_job::Column::ReceivedAt);
    if let Some(status) = filter.status {
        q = q.filter(service_job::Column::Status.eq(status));
    }
    if let Some(customer_id) = filter.customer_id {
        q = q.filter(service_job::Column::CustomerId.eq(customer_id));
    }
    fetch_page(db, q, opts).await
}

#[instrument(skip(db))]
pub async fn change_status(db: &DatabaseConnection, id: Uuid, next: JobStatus) -> Result<service_job::Model, ServiceError> {
    let job = get_service_job(db, id).await?;
    let from = job.status;
    let updated = service_job::transition(job, next)?.update(db).await?;
    info!(job_id = %id, from = %from, to = %next, "service_job_status_changed");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_service;
    use crate::test_support::{db_tests_disabled, get_db, unique_phone};
    use models::{customer::NewCustomer, errors::ModelError};

    #[tokio::test]
    async fn job_lifecycle_service() -> Result<(), anyhow::Error> {
        if db_tests_disabled() { return Ok(()); }
        let db = get_db().await?;

        let c = customer_service::create_customer(&db, NewCustomer {
            name: "Job Owner".into(),
            phone: unique_phone(),
            email: None,
            address: None,
        })
        .await?;
        let job = create_service_job(&db, NewServiceJob {
            customer_id: c.id,
            vehicle_number: "KA 02 JB 7".into(),
            description: "Clutch plate".into(),
            labour_cents: 80_000,
            parts_cents: 120_000,
        })
        .await?;
        assert_eq!(job.status, JobStatus::Pending);

        let skip = change_status(&db, job.id, JobStatus::Completed).await;
        assert!(matches!(skip, Err(ServiceError::Model(ModelError::Validation(_)))));

        change_status(&db, job.id, JobStatus::InProgress).await?;
        let done = change_status(&db, job.id, JobStatus::Completed).await?;
        assert!(done.completed_at.is_some());

        let filter = ServiceJobFilter { status: Some(JobStatus::Completed), customer_id: Some(c.id) };
        assert_eq!(list_service_jobs(&db, filter, Pagination::default()).await?.total, 1);

        // customer is still referenced by the job
        assert!(matches!(customer_service::delete_customer(&db, c.id).await, Err(ServiceError::Conflict(_))));

        delete_service_job(&db, job.id).await?;
        customer_service::delete_customer(&db, c.id).await?;
        Ok(())
    }
}
