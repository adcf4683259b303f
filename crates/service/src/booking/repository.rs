use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::service_booking::{self, BookingStatus};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingFilter {
    /// `pending_verification`, `confirmed`, `completed` or `cancelled`
    #[param(value_type = Option<String>)]
    pub status: Option<BookingStatus>,
    /// Preferred service date.
    pub date: Option<NaiveDate>,
}

/// Persistence seam for bookings so the OTP flow can run against memory in tests.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: service_booking::Model) -> Result<service_booking::Model, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<service_booking::Model>, ServiceError>;
    async fn save(&self, booking: service_booking::Model) -> Result<service_booking::Model, ServiceError>;
    async fn list(&self, filter: BookingFilter, opts: Pagination) -> Result<Page<service_booking::Model>, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

pub mod seaorm {
    use super::*;
    use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

    use crate::paging::fetch_page;

    pub struct SeaOrmBookingRepository {
        pub db: DatabaseConnection,
    }

    impl SeaOrmBookingRepository {
        pub fn new(db: DatabaseConnection) -> Self { Self { db } }
    }

    #[async_trait]
    impl BookingRepository for SeaOrmBookingRepository {
        async fn insert(&self, booking: service_booking::Model) -> Result<service_booking::Model, ServiceError> {
            Ok(service_booking::insert(&self.db, booking).await?)
        }

        async fn get(&self, id: Uuid) -> Result<Option<service_booking::Model>, ServiceError> {
            Ok(service_booking::Entity::find_by_id(id).one(&self.db).await?)
        }

        async fn save(&self, booking: service_booking::Model) -> Result<service_booking::Model, ServiceError> {
            let mut am: service_booking::ActiveModel = booking.clone().into();
            am.status = Set(booking.status);
            am.verified_at = Set(booking.verified_at);
            am.updated_at = Set(booking.updated_at);
            Ok(am.update(&self.db).await?)
        }

        async fn list(&self, filter: BookingFilter, opts: Pagination) -> Result<Page<service_booking::Model>, ServiceError> {
            let mut q = service_booking::Entity::find()
                .order_by_asc(service_booking::Column::PreferredDate)
                .order_by_asc(service_booking::Column::CreatedAt);
            if let Some(status) = filter.status {
                q = q.filter(service_booking::Column::Status.eq(status));
            }
            if let Some(date) = filter.date {
                q = q.filter(service_booking::Column::PreferredDate.eq(date));
            }
            fetch_page(&self.db, q, opts).await
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let res = service_booking::Entity::delete_by_id(id).exec(&self.db).await?;
            Ok(res.rows_affected > 0)
        }
    }
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockBookingRepository {
        rows: Mutex<HashMap<Uuid, service_booking::Model>>,
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> ServiceError {
        ServiceError::Db(e.to_string())
    }

    #[async_trait]
    impl BookingRepository for MockBookingRepository {
        async fn insert(&self, booking: service_booking::Model) -> Result<service_booking::Model, ServiceError> {
            let mut rows = self.rows.lock().map_err(poisoned)?;
            rows.insert(booking.id, booking.clone());
            Ok(booking)
        }

        async fn get(&self, id: Uuid) -> Result<Option<service_booking::Model>, ServiceError> {
            Ok(self.rows.lock().map_err(poisoned)?.get(&id).cloned())
        }

        async fn save(&self, booking: service_booking::Model) -> Result<service_booking::Model, ServiceError> {
            let mut rows = self.rows.lock().map_err(poisoned)?;
            if !rows.contains_key(&booking.id) {
                return Err(ServiceError::not_found("service booking"));
            }
            rows.insert(booking.id, booking.clone());
            Ok(booking)
        }

        async fn list(&self, filter: BookingFilter, opts: Pagination) -> Result<Page<service_booking::Model>, ServiceError> {
            let rows = self.rows.lock().map_err(poisoned)?;
            let mut matching: Vec<_> = rows
                .values()
                .filter(|b| filter.status.map_or(true, |s| b.status == s))
                .filter(|b| filter.date.map_or(true, |d| b.preferred_date == d))
                .cloned()
                .collect();
            matching.sort_by(|a, b| (a.preferred_date, a.created_at).cmp(&(b.preferred_date, b.created_at)));
            let (page_idx, per_page) = opts.normalize();
            let total = matching.len() as u64;
            let items = matching.into_iter().skip((page_idx * per_page) as usize).take(per_page as usize).collect();
            Ok(Page { items, page: page_idx + 1, per_page, total })
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().map_err(poisoned)?.remove(&id).is_some())
        }
    }
}
