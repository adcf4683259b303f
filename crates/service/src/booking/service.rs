use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::service_booking::{self, BookingStatus, NewBooking};
use crate::errors::ServiceError;
use super::otp::{OtpError, OtpStore};
use super::repository::{BookingFilter, BookingRepository};
use super::sms::{SmsError, SmsSender};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Otp(#[from] OtpError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("booking is {0}, not awaiting verification")]
    NotPending(BookingStatus),
    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },
    #[error(transparent)]
    Sms(#[from] SmsError),
}

impl From<models::errors::ModelError> for BookingError {
    fn from(e: models::errors::ModelError) -> Self { BookingError::Service(e.into()) }
}

/// What the customer gets back; never includes the code itself.
#[derive(Debug, Clone, Serialize)]
pub struct BookingReceipt {
    #[serde(flatten)]
    pub booking: service_booking::Model,
    pub otp_expires_in_secs: i64,
    pub resend_after_secs: i64,
}

pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
    otp: OtpStore,
    sms: Arc<dyn SmsSender>,
}

fn otp_message(code: &str, booking: &service_booking::Model, ttl_mins: i64) -> String {
    format!(
        "Your service booking code is {} for {} on {}. It expires in {} minutes.",
        code, booking.vehicle_number, booking.preferred_date, ttl_mins
    )
}

impl BookingService {
    pub fn new(repo: Arc<dyn BookingRepository>, otp: OtpStore, sms: Arc<dyn SmsSender>) -> Self {
        Self { repo, otp, sms }
    }

    pub fn otp(&self) -> &OtpStore { &self.otp }

    fn receipt(&self, booking: service_booking::Model) -> BookingReceipt {
        let p = self.otp.policy();
        BookingReceipt { booking, otp_expires_in_secs: p.ttl.num_seconds(), resend_after_secs: p.resend_cooldown.num_seconds() }
    }

    async fn deliver(&self, booking: &service_booking::Model, code: &str) -> Result<(), BookingError> {
        let msg = otp_message(code, booking, self.otp.policy().ttl.num_minutes().max(1));
        if let Err(e) = self.sms.send(&booking.phone, &msg).await {
            // the code is void but the send still counts against cooldown and resend limit
            self.otp.revoke(booking.id);
            warn!(booking_id = %booking.id, error = %e, "otp_delivery_failed");
            return Err(e.into());
        }
        Ok(())
    }

    async fn pending(&self, id: Uuid) -> Result<service_booking::Model, BookingError> {
        let booking = self.get(id).await?;
        if booking.status != BookingStatus::PendingVerification {
            return Err(BookingError::NotPending(booking.status));
        }
        Ok(booking)
    }

    /// Store the booking as pending and text a code to the customer.
    #[instrument(skip(self, input), fields(preferred_date = %input.preferred_date))]
    pub async fn request(&self, input: NewBooking) -> Result<BookingReceipt, BookingError> {
        let now = Utc::now();
        let booking = input.into_model(now.date_naive())?;
        let booking = self.repo.insert(booking).await?;
        let code = self.otp.issue(booking.id, now);
        self.deliver(&booking, &code).await?;
        info!(booking_id = %booking.id, "service_booking_requested");
        Ok(self.receipt(booking))
    }

    #[instrument(skip(self))]
    pub async fn resend(&self, id: Uuid) -> Result<BookingReceipt, BookingError> {
        let booking = self.pending(id).await?;
        let code = self.otp.resend(id, Utc::now())?;
        self.deliver(&booking, &code).await?;
        info!(booking_id = %id, "service_booking_code_resent");
        Ok(self.receipt(booking))
    }

    #[instrument(skip(self, code))]
    pub async fn verify(&self, id: Uuid, code: &str) -> Result<service_booking::Model, BookingError> {
        let mut booking = self.pending(id).await?;
        let now = Utc::now();
        self.otp.verify(id, code, now)?;
        booking.status = BookingStatus::Confirmed;
        booking.verified_at = Some(now.into());
        booking.updated_at = now.into();
        let saved = self.repo.save(booking).await?;
        info!(booking_id = %id, "service_booking_confirmed");
        Ok(saved)
    }

    pub async fn get(&self, id: Uuid) -> Result<service_booking::Model, BookingError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("service booking").into())
    }

    pub async fn list(&self, filter: BookingFilter, opts: Pagination) -> Result<Page<service_booking::Model>, BookingError> {
        Ok(self.repo.list(filter, opts).await?)
    }

    /// Staff moves: complete or cancel a confirmed booking, or cancel an unverified one.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: Uuid, next: BookingStatus) -> Result<service_booking::Model, BookingError> {
        let mut booking = self.get(id).await?;
        if !booking.status.staff_can_move_to(next) {
            return Err(BookingError::InvalidTransition { from: booking.status, to: next });
        }
        if booking.status == BookingStatus::PendingVerification {
            self.otp.discard(id);
        }
        booking.status = next;
        booking.updated_at = Utc::now().into();
        Ok(self.repo.save(booking).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BookingError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("service booking").into());
        }
        self.otp.discard(id);
        Ok(())
    }
}
