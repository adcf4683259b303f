use axum::{extract::{Query, State}, Json};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use service::statistics::{self, JobReport, RevenueReport};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    /// Calendar year (default current)
    pub year: Option<i32>,
}

impl YearQuery {
    fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Utc::now().year())
    }
}

#[utoipa::path(get, path = "/api/statistics/revenue", tag = "statistics", security(("bearer" = [])),
    params(YearQuery),
    responses((status = 200, description = "Monthly revenue, expenses and profit")))]
pub async fn revenue(State(state): State<ServerState>, Query(q): Query<YearQuery>) -> Result<Json<RevenueReport>, JsonApiError> {
    Ok(Json(statistics::revenue_report(&state.db, q.year()).await?))
}

#[utoipa::path(get, path = "/api/statistics/jobs", tag = "statistics", security(("bearer" = [])),
    params(YearQuery),
    responses((status = 200, description = "Job counts and turnaround")))]
pub async fn jobs(State(state): State<ServerState>, Query(q): Query<YearQuery>) -> Result<Json<JobReport>, JsonApiError> {
    Ok(Json(statistics::job_report(&state.db, q.year()).await?))
}
