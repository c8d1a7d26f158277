use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::{AppointmentProposal, ProposedTime};
use crate::models::appointment::Appointment;

/// Shared by create and update; `scheduled_at` accepts RFC 3339 or an
/// offset-less timestamp (taken as UTC).
#[derive(Deserialize)]
pub struct AppointmentRequest {
    pub client_id: i64,
    pub scheduled_at: ProposedTime,
    pub service: String,
    pub notes: Option<String>,
}

impl From<AppointmentRequest> for AppointmentProposal {
    fn from(req: AppointmentRequest) -> Self {
        Self {
            client_id: req.client_id,
            scheduled_at: req.scheduled_at,
            service: req.service,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: i64,
    pub client_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub service: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            client_id: appointment.client_id,
            scheduled_at: appointment.scheduled_at,
            service: appointment.service,
            notes: appointment.notes,
            created_at: appointment.created_at,
        }
    }
}
