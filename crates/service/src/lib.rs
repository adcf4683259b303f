//! Service layer: dealership operations on top of the `models` entities.
//! - Keeps business rules out of the HTTP handlers.
//! - Reuses validation and entity definitions from the `models` crate.
//! - Reports failures through [`errors::ServiceError`] and the auth/booking error types.

pub mod errors;
pub mod paging;
pub mod auth;
pub mod booking;
pub mod customer_service;
pub mod bike_service;
pub mod spare_part_service;
pub mod service_job_service;
pub mod offer_service;
pub mod bill_service;
pub mod loyalty_service;
pub mod insurance_service;
pub mod expense_service;
pub mod registration_service;
pub mod user_service;
pub mod statistics;
pub mod uploads;
#[cfg(test)]
pub mod test_support;
