use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::booking::AdmittedAppointment;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub service: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

const APPOINTMENT_COLUMNS: &str = "id, client_id, scheduled_at, service, notes, created_at";

impl Appointment {
    /// Persist an admitted proposal. The UNIQUE constraint on
    /// `scheduled_at` can still fire here if a concurrent request won the
    /// slot between the admission check and this insert; callers map that
    /// to the same conflict error.
    pub async fn create(
        pool: &SqlitePool,
        admitted: &AdmittedAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "INSERT INTO appointments (client_id, scheduled_at, service, notes, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(admitted.client_id)
        .bind(admitted.scheduled_at)
        .bind(&admitted.service)
        .bind(admitted.notes.as_deref())
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY scheduled_at"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_client(
        pool: &SqlitePool,
        client_id: i64,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE client_id = $1 ORDER BY scheduled_at"
        ))
        .bind(client_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_between(
        pool: &SqlitePool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE scheduled_at >= $1 AND scheduled_at < $2
             ORDER BY scheduled_at"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        admitted: &AdmittedAppointment,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        sqlx::query_as::<_, Appointment>(&format!(
            "UPDATE appointments
             SET client_id = $1, scheduled_at = $2, service = $3, notes = $4
             WHERE id = $5
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(admitted.client_id)
        .bind(admitted.scheduled_at)
        .bind(&admitted.service)
        .bind(admitted.notes.as_deref())
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
