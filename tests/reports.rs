mod common;

use axum::extract::{Extension, State};
use chrono::{DateTime, Duration, Utc};

use salon_backend::booking::AdmittedAppointment;
use salon_backend::error::AppError;
use salon_backend::handlers::report;
use salon_backend::models::appointment::Appointment;
use salon_backend::models::user::Role;
use salon_backend::reports;
use salon_backend::state::AppState;

use common::{auth_as, seed_client, seed_user, test_state};

async fn book(state: &AppState, client_id: i64, at: DateTime<Utc>, service: &str) {
    let admitted = AdmittedAppointment {
        client_id,
        scheduled_at: at,
        service: service.to_string(),
        notes: None,
    };
    Appointment::create(&state.db_pool, &admitted)
        .await
        .expect("seed booking should succeed");
}

/// Two clients; Maria has three upcoming appointments and one two days
/// ago, Carlos has one upcoming. Haircut 4x, Manicure 1x.
async fn seeded_state() -> (AppState, i64, i64) {
    let state = test_state().await;
    let maria = seed_client(&state, "Maria Silva", "maria@email.com").await;
    let carlos = seed_client(&state, "Carlos Santos", "carlos@email.com").await;

    let now = Utc::now();
    book(&state, maria.id, now + Duration::days(1), "Haircut").await;
    book(&state, maria.id, now + Duration::days(1) + Duration::hours(1), "Haircut").await;
    book(&state, maria.id, now + Duration::days(2), "Manicure").await;
    book(&state, carlos.id, now + Duration::days(3), "Haircut").await;
    book(&state, maria.id, now - Duration::days(2), "Haircut").await;

    (state, maria.id, carlos.id)
}

#[tokio::test]
async fn general_stats_count_the_seeded_data() {
    let (state, _, _) = seeded_state().await;

    let stats = reports::general_stats(&state.db_pool, Utc::now())
        .await
        .expect("stats should succeed");
    assert_eq!(stats.total_clients, 2);
    assert_eq!(stats.total_appointments, 5);
    // The four upcoming appointments are always on or after the start of
    // the current month; the past one depends on the calendar.
    assert!(stats.appointments_this_month >= 4);
    assert_eq!(stats.new_clients_this_month, 2);
    assert!(stats.occupancy_rate > 0.0);
}

#[tokio::test]
async fn service_breakdown_has_counts_and_percentages() {
    let (state, _, _) = seeded_state().await;

    let breakdown = reports::appointments_by_service(&state.db_pool, Utc::now(), 30)
        .await
        .expect("breakdown should succeed");
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].service, "Haircut");
    assert_eq!(breakdown[0].count, 4);
    assert_eq!(breakdown[0].percent, 80.0);
    assert_eq!(breakdown[1].service, "Manicure");
    assert_eq!(breakdown[1].count, 1);
    assert_eq!(breakdown[1].percent, 20.0);
}

#[tokio::test]
async fn breakdown_over_an_empty_store_is_empty() {
    let state = test_state().await;

    let breakdown = reports::appointments_by_service(&state.db_pool, Utc::now(), 30)
        .await
        .expect("breakdown should succeed");
    assert!(breakdown.is_empty());
}

#[tokio::test]
async fn daily_series_is_zero_filled_over_the_window() {
    let (state, _, _) = seeded_state().await;

    let now = Utc::now();
    let series = reports::daily_appointments(&state.db_pool, now, 7)
        .await
        .expect("series should succeed");
    assert_eq!(series.len(), 8);

    // The appointment two days ago shows up on its day...
    let two_days_ago = (now - Duration::days(2)).date_naive().format("%Y-%m-%d").to_string();
    let entry = series
        .iter()
        .find(|e| e.date == two_days_ago)
        .expect("window should include the day before yesterday");
    assert_eq!(entry.count, 1);

    // ...and days with no appointments report zero.
    assert!(series.iter().any(|e| e.count == 0));
}

#[tokio::test]
async fn new_client_series_counts_todays_registrations() {
    let (state, _, _) = seeded_state().await;

    let series = reports::new_clients_by_day(&state.db_pool, Utc::now(), 7)
        .await
        .expect("series should succeed");
    let today = series.last().expect("series should not be empty");
    assert_eq!(today.count, 2);
}

#[tokio::test]
async fn top_clients_rank_by_appointment_count() {
    let (state, _, _) = seeded_state().await;

    let top = reports::top_clients(&state.db_pool, 10)
        .await
        .expect("ranking should succeed");
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "Maria Silva");
    assert_eq!(top[0].total_appointments, 4);
    assert_eq!(top[0].position, 1);
    assert_eq!(top[1].name, "Carlos Santos");
    assert_eq!(top[1].total_appointments, 1);
    assert_eq!(top[1].position, 2);

    let only_one = reports::top_clients(&state.db_pool, 1)
        .await
        .expect("ranking should succeed");
    assert_eq!(only_one.len(), 1);
}

#[tokio::test]
async fn csv_exports_cover_all_three_kinds() {
    let (state, _, _) = seeded_state().await;
    let now = Utc::now();

    let (filename, body) = reports::export_csv(&state.db_pool, "clients", None, None, now)
        .await
        .expect("client export should succeed");
    assert_eq!(filename, "clients.csv");
    assert!(body.starts_with("ID,Name,Phone,Email"));
    assert!(body.contains("Maria Silva"));

    let (filename, body) = reports::export_csv(&state.db_pool, "appointments", None, None, now)
        .await
        .expect("appointment export should succeed");
    assert!(filename.starts_with("appointments_"));
    // Header plus the five seeded bookings.
    assert_eq!(body.lines().count(), 6);
    assert!(body.contains("Haircut"));
    assert!(body.contains("Carlos Santos"));

    let (filename, body) = reports::export_csv(&state.db_pool, "services", None, None, now)
        .await
        .expect("service export should succeed");
    assert_eq!(filename, "services.csv");
    assert!(body.contains("Haircut,4,80%"));
}

#[tokio::test]
async fn appointment_export_honors_date_filters() {
    let (state, _, _) = seeded_state().await;
    let now = Utc::now();

    // A window starting yesterday keeps the four upcoming bookings and
    // drops the one from two days ago.
    let start = (now - Duration::days(1)).to_rfc3339();
    let (_, body) = reports::export_csv(&state.db_pool, "appointments", Some(&start), None, now)
        .await
        .expect("filtered export should succeed");
    assert_eq!(body.lines().count(), 5);

    let err = reports::export_csv(&state.db_pool, "appointments", Some("not-a-date"), None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn unknown_export_kind_is_a_validation_error() {
    let state = test_state().await;

    let err = reports::export_csv(&state.db_pool, "invoices", None, None, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn report_endpoints_are_admin_only() {
    let (state, _, _) = seeded_state().await;
    let plain = seed_user(&state, "ana", Role::User).await;
    let admin = seed_user(&state, "boss", Role::Admin).await;

    let err = report::general_stats(State(state.clone()), Extension(auth_as(plain)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let stats = report::general_stats(State(state.clone()), Extension(auth_as(admin)))
        .await
        .expect("admin should see stats");
    assert_eq!(stats.0.total_appointments, 5);
}
