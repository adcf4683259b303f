use chrono::NaiveDate;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub name: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct UserPatchDoc {
    pub name: Option<String>,
    /// `admin` or `staff`
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct CustomerDoc {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(ToSchema)]
pub struct BikeDoc {
    pub brand: String,
    pub model_name: String,
    pub category: Option<String>,
    pub color: Option<String>,
    pub engine_cc: Option<i32>,
    pub price_cents: i64,
    pub stock: Option<i32>,
}

#[derive(ToSchema)]
pub struct SparePartDoc {
    pub name: String,
    pub part_number: String,
    pub quantity: Option<i32>,
    pub unit_price_cents: i64,
    pub reorder_level: Option<i32>,
}

#[derive(ToSchema)]
pub struct StockAdjustmentDoc { pub delta: i32 }

#[derive(ToSchema)]
pub struct ServiceJobDoc {
    pub customer_id: Uuid,
    pub vehicle_number: String,
    pub description: String,
    pub labour_cents: Option<i64>,
    pub parts_cents: Option<i64>,
}

#[derive(ToSchema)]
pub struct StatusChangeDoc { pub status: String }

#[derive(ToSchema)]
pub struct OfferDoc {
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub active: Option<bool>,
}

#[derive(ToSchema)]
pub struct BillItemDoc {
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price_cents: Option<i64>,
    pub spare_part_id: Option<Uuid>,
    pub bike_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct CreateBillDoc {
    pub customer_id: Uuid,
    pub service_job_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub items: Vec<BillItemDoc>,
}

#[derive(ToSchema)]
pub struct RedeemDoc { pub points: i64 }

#[derive(ToSchema)]
pub struct InsuranceDoc {
    pub customer_id: Uuid,
    pub vehicle_number: String,
    pub provider: String,
    pub policy_number: String,
    pub premium_cents: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(ToSchema)]
pub struct ExpenseDoc {
    pub category: String,
    pub description: Option<String>,
    pub amount_cents: i64,
    pub spent_on: NaiveDate,
}

#[derive(ToSchema)]
pub struct RegistrationDoc {
    pub customer_id: Uuid,
    pub bike_id: Option<Uuid>,
    pub vehicle_number: String,
    pub chassis_number: String,
    pub engine_number: String,
    pub registered_on: NaiveDate,
}

#[derive(ToSchema)]
pub struct BookingRequestDoc {
    pub customer_name: String,
    pub phone: String,
    pub vehicle_number: String,
    pub preferred_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
pub struct VerifyCodeDoc { pub code: String }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::metrics::metrics,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::customers::list,
        crate::routes::customers::create,
        crate::routes::customers::get,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::bikes::list,
        crate::routes::bikes::create,
        crate::routes::bikes::get,
        crate::routes::bikes::update,
        crate::routes::bikes::delete,
        crate::routes::bikes::upload_image,
        crate::routes::spare_parts::list,
        crate::routes::spare_parts::low_stock,
        crate::routes::spare_parts::create,
        crate::routes::spare_parts::get,
        crate::routes::spare_parts::update,
        crate::routes::spare_parts::adjust_stock,
        crate::routes::spare_parts::delete,
        crate::routes::service_jobs::list,
        crate::routes::service_jobs::create,
        crate::routes::service_jobs::get,
        crate::routes::service_jobs::update,
        crate::routes::service_jobs::change_status,
        crate::routes::service_jobs::delete,
        crate::routes::offers::list,
        crate::routes::offers::active,
        crate::routes::offers::create,
        crate::routes::offers::get,
        crate::routes::offers::update,
        crate::routes::offers::delete,
        crate::routes::bills::list,
        crate::routes::bills::create,
        crate::routes::bills::get,
        crate::routes::bills::pay,
        crate::routes::bills::delete,
        crate::routes::loyalty::list,
        crate::routes::loyalty::for_customer,
        crate::routes::loyalty::redeem,
        crate::routes::insurance::list,
        crate::routes::insurance::expiring,
        crate::routes::insurance::create,
        crate::routes::insurance::get,
        crate::routes::insurance::update,
        crate::routes::insurance::delete,
        crate::routes::expenses::list,
        crate::routes::expenses::create,
        crate::routes::expenses::get,
        crate::routes::expenses::update,
        crate::routes::expenses::delete,
        crate::routes::registrations::list,
        crate::routes::registrations::create,
        crate::routes::registrations::get,
        crate::routes::registrations::update,
        crate::routes::registrations::delete,
        crate::routes::bookings::public_request,
        crate::routes::bookings::public_verify,
        crate::routes::bookings::public_resend,
        crate::routes::bookings::list,
        crate::routes::bookings::get,
        crate::routes::bookings::update_status,
        crate::routes::bookings::delete,
        crate::routes::statistics::revenue,
        crate::routes::statistics::jobs,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            UserPatchDoc,
            CustomerDoc,
            BikeDoc,
            SparePartDoc,
            StockAdjustmentDoc,
            ServiceJobDoc,
            StatusChangeDoc,
            OfferDoc,
            BillItemDoc,
            CreateBillDoc,
            RedeemDoc,
            InsuranceDoc,
            ExpenseDoc,
            RegistrationDoc,
            BookingRequestDoc,
            VerifyCodeDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "platform"),
        (name = "auth"),
        (name = "users"),
        (name = "customers"),
        (name = "bikes"),
        (name = "spare-parts"),
        (name = "service-jobs"),
        (name = "offers"),
        (name = "bills"),
        (name = "loyalty"),
        (name = "insurance"),
        (name = "expenses"),
        (name = "registrations"),
        (name = "bookings"),
        (name = "statistics")
    )
)]
pub struct ApiDoc;
