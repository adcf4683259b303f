//! Customer service-date bookings confirmed by an SMS one-time code.

pub mod otp;
pub mod sms;
pub mod repository;
pub mod service;

pub use otp::{OtpError, OtpPolicy, OtpStore};
pub use service::{BookingError, BookingReceipt, BookingService};
