//! Aggregate reports over clients and appointments, plus CSV export.
//! All queries run over already-validated records; nothing here writes.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::booking::ProposedTime;
use crate::dtos::report::{DailyCount, GeneralStats, ServiceBreakdown, TopClientEntry};
use crate::error::AppError;

// Occupancy is estimated against an 8h day, 20 working days a month,
// one hour per booked service.
const WORK_HOURS_PER_MONTH: f64 = 8.0 * 20.0;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let first = today.with_day(1).unwrap_or(today);
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

pub async fn general_stats(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> Result<GeneralStats, sqlx::Error> {
    let total_clients: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM clients")
        .fetch_one(pool)
        .await?;

    let total_appointments: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM appointments")
        .fetch_one(pool)
        .await?;

    let month_start = month_start(now);
    let appointments_this_month: i64 =
        sqlx::query_scalar("SELECT COUNT(id) FROM appointments WHERE scheduled_at >= $1")
            .bind(month_start)
            .fetch_one(pool)
            .await?;

    let new_clients_this_month: i64 =
        sqlx::query_scalar("SELECT COUNT(id) FROM clients WHERE created_at >= $1")
            .bind(month_start)
            .fetch_one(pool)
            .await?;

    let day_start = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
    let day_end = day_start + Duration::days(1);
    let appointments_today: i64 = sqlx::query_scalar(
        "SELECT COUNT(id) FROM appointments WHERE scheduled_at >= $1 AND scheduled_at < $2",
    )
    .bind(day_start)
    .bind(day_end)
    .fetch_one(pool)
    .await?;

    Ok(GeneralStats {
        total_clients,
        total_appointments,
        appointments_this_month,
        new_clients_this_month,
        appointments_today,
        occupancy_rate: round1(appointments_this_month as f64 / WORK_HOURS_PER_MONTH * 100.0),
    })
}

pub async fn appointments_by_service(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    days: i64,
) -> Result<Vec<ServiceBreakdown>, sqlx::Error> {
    let since = now - Duration::days(days);
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT service, COUNT(id) FROM appointments
         WHERE scheduled_at >= $1
         GROUP BY service
         ORDER BY COUNT(id) DESC",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    let total: i64 = rows.iter().map(|(_, count)| count).sum();
    Ok(rows
        .into_iter()
        .map(|(service, count)| ServiceBreakdown {
            service,
            count,
            percent: if total > 0 {
                round1(count as f64 / total as f64 * 100.0)
            } else {
                0.0
            },
        })
        .collect())
}

/// Per-day counts over the trailing window, zero-filled so the series
/// always has `days + 1` entries, oldest first.
async fn daily_series(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    now: DateTime<Utc>,
    days: i64,
) -> Result<Vec<DailyCount>, sqlx::Error> {
    let since = now - Duration::days(days);
    let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
        "SELECT date({column}), COUNT(id) FROM {table}
         WHERE {column} >= $1
         GROUP BY date({column})"
    ))
    .bind(since)
    .fetch_all(pool)
    .await?;

    let mut series = Vec::with_capacity((days + 1) as usize);
    for i in 0..=days {
        let date = (now - Duration::days(days - i)).date_naive();
        let iso = date.format("%Y-%m-%d").to_string();
        let count = rows
            .iter()
            .find(|(day, _)| *day == iso)
            .map(|(_, count)| *count)
            .unwrap_or(0);
        series.push(DailyCount {
            label: date.format("%d/%m").to_string(),
            date: iso,
            count,
        });
    }
    Ok(series)
}

pub async fn daily_appointments(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    days: i64,
) -> Result<Vec<DailyCount>, sqlx::Error> {
    daily_series(pool, "appointments", "scheduled_at", now, days).await
}

pub async fn new_clients_by_day(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    days: i64,
) -> Result<Vec<DailyCount>, sqlx::Error> {
    daily_series(pool, "clients", "created_at", now, days).await
}

pub async fn top_clients(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<TopClientEntry>, sqlx::Error> {
    let rows: Vec<(String, String, i64)> = sqlx::query_as(
        "SELECT c.name, c.email, COUNT(a.id)
         FROM clients c
         JOIN appointments a ON a.client_id = c.id
         GROUP BY c.id
         ORDER BY COUNT(a.id) DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(idx, (name, email, total_appointments))| TopClientEntry {
            name,
            email,
            total_appointments,
            position: idx + 1,
        })
        .collect())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn parse_export_bound(raw: &str) -> Result<DateTime<Utc>, AppError> {
    ProposedTime::parse(raw)
        .map(ProposedTime::to_utc)
        .map_err(|_| AppError::validation(format!("Invalid datetime filter: {raw}")))
}

/// Build a CSV export. Returns the suggested filename and the body; the
/// handler wraps them in a `text/csv` attachment response.
pub async fn export_csv(
    pool: &SqlitePool,
    kind: &str,
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(String, String), AppError> {
    match kind {
        "clients" => {
            let rows: Vec<(i64, String, String, String, DateTime<Utc>)> = sqlx::query_as(
                "SELECT id, name, phone, email, created_at FROM clients ORDER BY id",
            )
            .fetch_all(pool)
            .await?;

            let mut out = String::from("ID,Name,Phone,Email,Created At\n");
            for (id, name, phone, email, created_at) in rows {
                out.push_str(&format!(
                    "{},{},{},{},{}\n",
                    id,
                    csv_field(&name),
                    csv_field(&phone),
                    csv_field(&email),
                    created_at.format("%Y-%m-%d %H:%M"),
                ));
            }
            Ok(("clients.csv".to_string(), out))
        }
        "appointments" => {
            let start = match start {
                Some(raw) => parse_export_bound(raw)?,
                None => Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).single().ok_or_else(|| {
                    AppError::internal("invalid default export range")
                })?,
            };
            let end = match end {
                Some(raw) => parse_export_bound(raw)?,
                None => Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).single().ok_or_else(
                    || AppError::internal("invalid default export range"),
                )?,
            };

            let rows: Vec<(i64, String, DateTime<Utc>, String, Option<String>)> = sqlx::query_as(
                "SELECT a.id, c.name, a.scheduled_at, a.service, a.notes
                 FROM appointments a
                 JOIN clients c ON a.client_id = c.id
                 WHERE a.scheduled_at >= $1 AND a.scheduled_at <= $2
                 ORDER BY a.scheduled_at",
            )
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?;

            let mut out = String::from("ID,Client,Date/Time,Service,Notes\n");
            for (id, client, scheduled_at, service, notes) in rows {
                out.push_str(&format!(
                    "{},{},{},{},{}\n",
                    id,
                    csv_field(&client),
                    scheduled_at.format("%Y-%m-%d %H:%M"),
                    csv_field(&service),
                    csv_field(notes.as_deref().unwrap_or("")),
                ));
            }
            let filename = format!("appointments_{}.csv", now.format("%Y%m%d"));
            Ok((filename, out))
        }
        "services" => {
            // Summary over the last year.
            let breakdown = appointments_by_service(pool, now, 365).await?;

            let mut out = String::from("Service,Count,Percent\n");
            for entry in breakdown {
                out.push_str(&format!(
                    "{},{},{}%\n",
                    csv_field(&entry.service),
                    entry.count,
                    entry.percent,
                ));
            }
            Ok(("services.csv".to_string(), out))
        }
        other => Err(AppError::validation(format!("Unknown report type: {other}"))),
    }
}
