//! Monthly revenue and workshop statistics.
//!
//! Rows for one calendar year are fetched and aggregated in memory; the pure
//! `monthly_revenue` / `job_statistics` functions hold all of the arithmetic.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;

use models::{bill::{self, BillStatus}, expense, service_job::{self, JobStatus}};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: u32,
    pub bills: u64,
    pub revenue_cents: i64,
    pub expense_cents: i64,
    pub profit_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    pub year: i32,
    pub months: Vec<MonthlyRevenue>,
    pub total_bills: u64,
    pub total_revenue_cents: i64,
    pub total_expense_cents: i64,
    pub total_profit_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyCompleted {
    pub month: u32,
    pub completed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub year: i32,
    pub total_jobs: u64,
    pub by_status: BTreeMap<&'static str, u64>,
    pub completed_per_month: Vec<MonthlyCompleted>,
    /// `None` when no job received this year has been completed.
    pub average_turnaround_hours: Option<f64>,
}

/// Minimal view of a service job for aggregation.
#[derive(Debug, Clone, Copy)]
pub struct JobRow {
    pub status: JobStatus,
    pub received_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// `paid` holds `(paid_at, total_cents)`, `expenses` holds `(spent_on, amount_cents)`.
/// Rows outside `year` are ignored.
pub fn monthly_revenue(year: i32, paid: &[(DateTime<Utc>, i64)], expenses: &[(NaiveDate, i64)]) -> RevenueReport {
    let mut months: Vec<MonthlyRevenue> = (1..=12).map(|month| MonthlyRevenue { month, ..Default::default() }).collect();
    for (at, total) in paid.iter().filter(|(at, _)| at.year() == year) {
        let m = &mut months[at.month0() as usize];
        m.bills += 1;
        m.revenue_cents += total;
    }
    for (day, amount) in expenses.iter().filter(|(day, _)| day.year() == year) {
        months[day.month0() as usize].expense_cents += amount;
    }
    for m in months.iter_mut() {
        m.profit_cents = m.revenue_cents - m.expense_cents;
    }
    let total_bills = months.iter().map(|m| m.bills).sum();
    let total_revenue_cents: i64 = months.iter().map(|m| m.revenue_cents).sum();
    let total_expense_cents: i64 = months.iter().map(|m| m.expense_cents).sum();
    RevenueReport {
        year,
        months,
        total_bills,
        total_revenue_cents,
        total_expense_cents,
        total_profit_cents: total_revenue_cents - total_expense_cents,
    }
}

pub fn job_statistics(year: i32, jobs: &[JobRow]) -> JobReport {
    let mut by_status: BTreeMap<&'static str, u64> = [
        JobStatus::Pending,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Delivered,
        JobStatus::Cancelled,
    ]
    .into_iter()
    .map(|s| (s.as_str(), 0))
    .collect();
    let mut completed_per_month: Vec<MonthlyCompleted> = (1..=12).map(|month| MonthlyCompleted { month, completed: 0 }).collect();
    let mut turnaround_secs: i64 = 0;
    let mut finished: i64 = 0;
    let mut total_jobs = 0u64;

    for job in jobs.iter().filter(|j| j.received_at.year() == year) {
        total_jobs += 1;
        *by_status.entry(job.status.as_str()).or_default() += 1;
        if let Some(done) = job.completed_at {
            if done.year() == year {
                completed_per_month[done.month0() as usize].completed += 1;
            }
            turnaround_secs += (done - job.received_at).num_seconds().max(0);
            finished += 1;
        }
    }

    let average_turnaround_hours = (finished > 0).then(|| {
        let hours = turnaround_secs as f64 / 3600.0 / finished as f64;
        (hours * 100.0).round() / 100.0
    });
    JobReport { year, total_jobs, by_status, completed_per_month, average_turnaround_hours }
}

/// `[Jan 1 of year, Jan 1 of year + 1)` in UTC.
pub fn year_bounds(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| ServiceError::validation(format!("invalid year {}", year)))?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(|| ServiceError::validation(format!("invalid year {}", year)))?;
    Ok((Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN)), Utc.from_utc_datetime(&end.and_time(NaiveTime::MIN))))
}

pub async fn revenue_report(db: &DatabaseConnection, year: i32) -> Result<RevenueReport, ServiceError> {
    let (start, end) = year_bounds(year)?;
    let paid: Vec<(DateTime<Utc>, i64)> = bill::Entity::find()
        .filter(bill::Column::Status.eq(BillStatus::Paid))
        .filter(bill::Column::PaidAt.gte(start))
        .filter(bill::Column::PaidAt.lt(end))
        .all(db)
        .await?
        .into_iter()
        .filter_map(|b| b.paid_at.map(|at| (at.with_timezone(&Utc), b.total_cents)))
        .collect();
    let expenses: Vec<(NaiveDate, i64)> = expense::Entity::find()
        .filter(expense::Column::SpentOn.gte(start.date_naive()))
        .filter(expense::Column::SpentOn.lt(end.date_naive()))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.spent_on, e.amount_cents))
        .collect();
    Ok(monthly_revenue(year, &paid, &expenses))
}

pub async fn job_report(db: &DatabaseConnection, year: i32) -> Result<JobReport, ServiceError> {
    let (start, end) = year_bounds(year)?;
    let rows: Vec<JobRow> = service_job::Entity::find()
        .filter(service_job::Column::ReceivedAt.gte(start))
        .filter(service_job::Column::ReceivedAt.lt(end))
        .all(db)
        .await?
        .into_iter()
        .map(|j| JobRow {
            status: j.status,
            received_at: j.received_at.with_timezone(&Utc),
            completed_at: j.completed_at.map(|t| t.with_timezone(&Utc)),
        })
        .collect();
    Ok(job_statistics(year, &rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn revenue_buckets_by_month() {
        let paid = vec![(at(2026, 1, 5, 10), 100_000), (at(2026, 1, 20, 9), 50_000), (at(2026, 12, 31, 23), 10_000), (at(2025, 12, 31, 23), 999)];
        let expenses = vec![(day(2026, 1, 2), 30_000), (day(2026, 3, 1), 5_000)];
        let r = monthly_revenue(2026, &paid, &expenses);

        assert_eq!(r.months.len(), 12);
        assert_eq!(r.months[0], MonthlyRevenue { month: 1, bills: 2, revenue_cents: 150_000, expense_cents: 30_000, profit_cents: 120_000 });
        assert_eq!(r.months[2].profit_cents, -5_000);
        assert_eq!(r.months[11].bills, 1);
        assert_eq!(r.total_bills, 3);
        assert_eq!(r.total_revenue_cents, 160_000);
        assert_eq!(r.total_expense_cents, 35_000);
        assert_eq!(r.total_profit_cents, 125_000);
    }

    #[test]
    fn empty_year_is_all_zero() {
        let r = monthly_revenue(2026, &[], &[]);
        assert!(r.months.iter().all(|m| m.bills == 0 && m.profit_cents == 0));
        assert_eq!(r.total_profit_cents, 0);
    }

    #[test]
    fn job_counts_and_turnaround() {
        let jobs = vec![
            JobRow { status: JobStatus::Completed, received_at: at(2026, 2, 1, 8), completed_at: Some(at(2026, 2, 1, 20)) },
            JobRow { status: JobStatus::Delivered, received_at: at(2026, 2, 3, 8), completed_at: Some(at(2026, 3, 4, 8)) },
            JobRow { status: JobStatus::Pending, received_at: at(2026, 5, 1, 8), completed_at: None },
            JobRow { status: JobStatus::Cancelled, received_at: at(2025, 5, 1, 8), completed_at: None },
        ];
        let r = job_statistics(2026, &jobs);

        assert_eq!(r.total_jobs, 3);
        assert_eq!(r.by_status["completed"], 1);
        assert_eq!(r.by_status["delivered"], 1);
        assert_eq!(r.by_status["pending"], 1);
        assert_eq!(r.by_status["cancelled"], 0);
        assert_eq!(r.completed_per_month[1].completed, 1);
        assert_eq!(r.completed_per_month[2].completed, 1);
        // (12h + 696h) / 2
        assert_eq!(r.average_turnaround_hours, Some(354.0));
    }

    #[test]
    fn no_completed_jobs_has_no_average() {
        let jobs = vec![JobRow { status: JobStatus::InProgress, received_at: at(2026, 7, 1, 8), completed_at: None }];
        let r = job_statistics(2026, &jobs);
        assert_eq!(r.average_turnaround_hours, None);
        assert_eq!(r.by_status["in_progress"], 1);
    }

    #[test]
    fn year_bounds_are_half_open() {
        let (s, e) = year_bounds(2026).unwrap();
        assert_eq!(s, at(2026, 1, 1, 0));
        assert_eq!(e, at(2027, 1, 1, 0));
    }
}
