use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SystemStats {
    pub total_users: i64,
    pub total_clients: i64,
    pub total_appointments: i64,
}

#[derive(Debug, Serialize)]
pub struct GeneralStats {
    pub total_clients: i64,
    pub total_appointments: i64,
    pub appointments_this_month: i64,
    pub new_clients_this_month: i64,
    pub appointments_today: i64,
    /// Booked hours over an 8h x 20 day working month, one hour per
    /// service, as a percentage with one decimal.
    pub occupancy_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct ServiceBreakdown {
    pub service: String,
    pub count: i64,
    pub percent: f64,
}

#[derive(Debug, Serialize)]
pub struct DailyCount {
    /// ISO date, e.g. "2025-06-16".
    pub date: String,
    /// Short display label, e.g. "16/06".
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct TopClientEntry {
    pub name: String,
    pub email: String,
    pub total_appointments: i64,
    pub position: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub general_stats: GeneralStats,
    pub appointments_by_service: Vec<ServiceBreakdown>,
    pub daily_appointments: Vec<DailyCount>,
    pub new_clients: Vec<DailyCount>,
    pub top_clients: Vec<TopClientEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub kind: String,
    pub start: Option<String>,
    pub end: Option<String>,
}
