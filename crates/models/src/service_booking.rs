use std::fmt;

use sea_orm::{entity::prelude::*, sea_query::StringLen, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[sea_orm(string_value = "pending_verification")]
    PendingVerification,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    /// Moves staff may make. Confirmation only happens through OTP verification.
    pub fn staff_can_move_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Confirmed, Completed) | (Confirmed, Cancelled) | (PendingVerification, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::PendingVerification => "pending_verification",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_name: String,
    pub phone: String,
    pub vehicle_number: String,
    pub preferred_date: Date,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub verified_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewBooking {
    pub customer_name: String,
    pub phone: String,
    pub vehicle_number: String,
    pub preferred_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewBooking {
    /// Validate against `today`; the returned row is ready to insert.
    pub fn into_model(self, today: NaiveDate) -> Result<Model, ModelError> {
        if self.preferred_date < today {
            return Err(ModelError::validation("preferred_date must not be in the past"));
        }
        let now = Utc::now().into();
        Ok(Model {
            id: Uuid::new_v4(),
            customer_name: validate::required_text("customer_name", &self.customer_name, 128)?,
            phone: validate::phone(&self.phone)?,
            vehicle_number: validate::vehicle_number(&self.vehicle_number)?,
            preferred_date: self.preferred_date,
            notes: validate::optional_text("notes", self.notes.as_deref(), 2000)?,
            status: BookingStatus::PendingVerification,
            verified_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}

pub async fn insert<C: ConnectionTrait>(db: &C, booking: Model) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(booking.id),
        customer_name: Set(booking.customer_name),
        phone: Set(booking.phone),
        vehicle_number: Set(booking.vehicle_number),
        preferred_date: Set(booking.preferred_date),
        notes: Set(booking.notes),
        status: Set(booking.status),
        verified_at: Set(booking.verified_at),
        created_at: Set(booking.created_at),
        updated_at: Set(booking.updated_at),
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input(date: NaiveDate) -> NewBooking {
        NewBooking {
            customer_name: " Meera ".into(),
            phone: "98450 12345".into(),
            vehicle_number: "ka05 mn 2020".into(),
            preferred_date: date,
            notes: Some("".into()),
        }
    }

    #[test]
    fn booking_is_normalized_and_pending() {
        let m = input(d(2026, 10, 20)).into_model(d(2026, 10, 19)).unwrap();
        assert_eq!(m.customer_name, "Meera");
        assert_eq!(m.phone, "9845012345");
        assert_eq!(m.vehicle_number, "KA05MN2020");
        assert_eq!(m.notes, None);
        assert_eq!(m.status, BookingStatus::PendingVerification);
    }

    #[test]
    fn past_dates_are_rejected_but_today_is_fine() {
        assert!(input(d(2026, 10, 18)).into_model(d(2026, 10, 19)).is_err());
        assert!(input(d(2026, 10, 19)).into_model(d(2026, 10, 19)).is_ok());
    }

    #[test]
    fn staff_transitions() {
        use BookingStatus::*;
        assert!(Confirmed.staff_can_move_to(Completed));
        assert!(Confirmed.staff_can_move_to(Cancelled));
        assert!(PendingVerification.staff_can_move_to(Cancelled));
        assert!(!PendingVerification.staff_can_move_to(Confirmed));
        assert!(!Completed.staff_can_move_to(Cancelled));
        assert!(!Cancelled.staff_can_move_to(Confirmed));
    }
}
