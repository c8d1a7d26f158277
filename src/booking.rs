//! Appointment admission: decides whether a proposed booking may be
//! persisted. Pure decision logic over a `ScheduleLookup` snapshot; the
//! caller applies the resulting write.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("client not found")]
    ClientNotFound,
    #[error("appointment is in the past")]
    AppointmentInPast,
    #[error("time slot already booked")]
    TimeSlotConflict,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// A proposed appointment instant, which may or may not carry an offset.
/// Offset-less timestamps are taken as UTC rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProposedTime {
    Zoned(DateTime<chrono::FixedOffset>),
    Floating(NaiveDateTime),
}

impl ProposedTime {
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s)
            .map(ProposedTime::Zoned)
            .or_else(|_| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(ProposedTime::Floating)
            })
            .or_else(|_| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").map(ProposedTime::Floating)
            })
    }

    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            ProposedTime::Zoned(dt) => dt.with_timezone(&Utc),
            ProposedTime::Floating(naive) => Utc.from_utc_datetime(&naive),
        }
    }
}

impl<'de> Deserialize<'de> for ProposedTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ProposedTime::parse(&raw)
            .map_err(|_| de::Error::custom(format!("invalid datetime: {raw}")))
    }
}

#[derive(Debug, Clone)]
pub struct AppointmentProposal {
    pub client_id: i64,
    pub scheduled_at: ProposedTime,
    pub service: String,
    pub notes: Option<String>,
}

/// An admitted proposal with its timestamp normalized to UTC, ready to
/// be written.
#[derive(Debug, Clone)]
pub struct AdmittedAppointment {
    pub client_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub service: String,
    pub notes: Option<String>,
}

/// The two store questions the admission check asks. Implemented for the
/// real pool below and faked in tests.
#[async_trait]
pub trait ScheduleLookup: Send + Sync {
    async fn client_exists(&self, client_id: i64) -> Result<bool, sqlx::Error>;

    /// Is some appointment other than `exclude` already at `at`?
    async fn slot_taken(
        &self,
        at: DateTime<Utc>,
        exclude: Option<i64>,
    ) -> Result<bool, sqlx::Error>;
}

/// Decide whether a proposal may be persisted. Checks run in a fixed
/// order and short-circuit: client existence, then temporal validity
/// (`>= now`, boundary inclusive), then the global slot conflict.
///
/// For updates, pass the id of the appointment being updated as
/// `exclude` so it does not conflict with its own current slot.
pub async fn admit<L: ScheduleLookup + ?Sized>(
    lookup: &L,
    proposal: AppointmentProposal,
    now: DateTime<Utc>,
    exclude: Option<i64>,
) -> Result<AdmittedAppointment, AdmissionError> {
    let scheduled_at = proposal.scheduled_at.to_utc();

    if !lookup.client_exists(proposal.client_id).await? {
        return Err(AdmissionError::ClientNotFound);
    }

    if scheduled_at < now {
        return Err(AdmissionError::AppointmentInPast);
    }

    if lookup.slot_taken(scheduled_at, exclude).await? {
        return Err(AdmissionError::TimeSlotConflict);
    }

    Ok(AdmittedAppointment {
        client_id: proposal.client_id,
        scheduled_at,
        service: proposal.service,
        notes: proposal.notes,
    })
}

#[async_trait]
impl ScheduleLookup for SqlitePool {
    async fn client_exists(&self, client_id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
            .bind(client_id)
            .fetch_one(self)
            .await
    }

    async fn slot_taken(
        &self,
        at: DateTime<Utc>,
        exclude: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        match exclude {
            Some(id) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM appointments WHERE scheduled_at = $1 AND id <> $2)",
                )
                .bind(at)
                .bind(id)
                .fetch_one(self)
                .await
            }
            None => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM appointments WHERE scheduled_at = $1)",
                )
                .bind(at)
                .fetch_one(self)
                .await
            }
        }
    }
}
