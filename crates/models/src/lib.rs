pub mod errors;
pub mod db;
pub mod validate;
pub mod user;
pub mod user_credentials;
pub mod customer;
pub mod bike;
pub mod spare_part;
pub mod service_job;
pub mod offer;
pub mod bill;
pub mod bill_item;
pub mod insurance_policy;
pub mod loyalty_account;
pub mod expense;
pub mod vehicle_registration;
pub mod service_booking;

#[cfg(test)]
mod tests;
