mod common;

use axum::extract::{Extension, Json, Path, State};
use chrono::NaiveDate;

use salon_backend::booking::{AdmittedAppointment, ProposedTime};
use salon_backend::dtos::appointment::AppointmentRequest;
use salon_backend::error::AppError;
use salon_backend::handlers::appointment::{
    create_appointment, delete_appointment, get_appointment, list_appointments,
    list_appointments_by_client, list_appointments_by_date, update_appointment,
};
use salon_backend::models::appointment::Appointment;
use salon_backend::models::user::Role;

use common::{auth_as, seed_client, seed_user, test_state};

fn appointment_payload(client_id: i64, raw_time: &str, service: &str) -> AppointmentRequest {
    AppointmentRequest {
        client_id,
        scheduled_at: ProposedTime::parse(raw_time).expect("test timestamp should parse"),
        service: service.to_string(),
        notes: None,
    }
}

#[tokio::test]
async fn booking_a_valid_appointment_works() {
    let state = test_state().await;
    let user = seed_user(&state, "ana", Role::User).await;
    let carlos = seed_client(&state, "Carlos Santos", "carlos@email.com").await;

    let (status, Json(created)) = create_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Json(appointment_payload(carlos.id, "2030-05-10T10:00:00", "Haircut")),
    )
    .await
    .expect("booking should succeed");
    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(created.service, "Haircut");
    assert_eq!(created.client_id, carlos.id);

    let Json(fetched) = get_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Path(created.id),
    )
    .await
    .expect("appointment should be found");
    assert_eq!(fetched.id, created.id);

    let Json(all) = list_appointments(State(state.clone()), Extension(auth_as(user)))
        .await
        .expect("listing should succeed");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn the_same_instant_cannot_be_booked_twice() {
    let state = test_state().await;
    let user = seed_user(&state, "ana", Role::User).await;
    let carlos = seed_client(&state, "Carlos Santos", "carlos@email.com").await;
    let julia = seed_client(&state, "Julia Lima", "julia@email.com").await;

    create_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Json(appointment_payload(carlos.id, "2030-05-10T10:00:00", "Haircut")),
    )
    .await
    .expect("first booking should succeed");

    // Different client, different service, same instant - and the
    // UTC-suffixed form of the offset-less timestamp above.
    let err = create_appointment(
        State(state.clone()),
        Extension(auth_as(user)),
        Json(appointment_payload(julia.id, "2030-05-10T10:00:00Z", "Manicure")),
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("time slot"), "{msg}"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn booking_in_the_past_is_rejected() {
    let state = test_state().await;
    let user = seed_user(&state, "ana", Role::User).await;
    let carlos = seed_client(&state, "Carlos Santos", "carlos@email.com").await;

    let err = create_appointment(
        State(state.clone()),
        Extension(auth_as(user)),
        Json(appointment_payload(carlos.id, "2020-05-10T10:00:00", "Haircut")),
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("past"), "{msg}"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn booking_for_a_missing_client_is_a_404() {
    let state = test_state().await;
    let user = seed_user(&state, "ana", Role::User).await;

    let err = create_appointment(
        State(state.clone()),
        Extension(auth_as(user)),
        Json(appointment_payload(9999, "2030-05-10T10:00:00", "Haircut")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn timestamps_deserialize_with_and_without_offset() {
    let with_offset: AppointmentRequest = serde_json::from_value(serde_json::json!({
        "client_id": 1,
        "scheduled_at": "2030-05-10T12:00:00+02:00",
        "service": "Haircut",
    }))
    .expect("offset timestamp should deserialize");

    let offsetless: AppointmentRequest = serde_json::from_value(serde_json::json!({
        "client_id": 1,
        "scheduled_at": "2030-05-10T10:00:00",
        "service": "Haircut",
    }))
    .expect("offset-less timestamp should deserialize");

    // +02:00 noon and offset-less 10:00 are the same instant under the
    // assume-UTC policy.
    assert_eq!(
        with_offset.scheduled_at.to_utc(),
        offsetless.scheduled_at.to_utc()
    );

    let err = serde_json::from_value::<AppointmentRequest>(serde_json::json!({
        "client_id": 1,
        "scheduled_at": "next tuesday",
        "service": "Haircut",
    }));
    assert!(err.is_err());
}

#[tokio::test]
async fn an_update_may_keep_its_own_slot_but_not_take_anothers() {
    let state = test_state().await;
    let user = seed_user(&state, "ana", Role::User).await;
    let carlos = seed_client(&state, "Carlos Santos", "carlos@email.com").await;

    let (_, Json(first)) = create_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Json(appointment_payload(carlos.id, "2030-05-10T10:00:00", "Haircut")),
    )
    .await
    .expect("first booking should succeed");

    create_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Json(appointment_payload(carlos.id, "2030-05-10T11:00:00", "Manicure")),
    )
    .await
    .expect("second booking should succeed");

    // Changing the service while keeping the original time must not
    // conflict with itself.
    let Json(updated) = update_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Path(first.id),
        Json(appointment_payload(carlos.id, "2030-05-10T10:00:00", "Beard Trim")),
    )
    .await
    .expect("update onto its own slot should succeed");
    assert_eq!(updated.service, "Beard Trim");
    assert_eq!(updated.scheduled_at, first.scheduled_at);

    // Moving onto the other appointment's slot is still a conflict.
    let err = update_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Path(first.id),
        Json(appointment_payload(carlos.id, "2030-05-10T11:00:00", "Beard Trim")),
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("time slot"), "{msg}"),
        other => panic!("expected a validation error, got {other:?}"),
    }

    let err = update_appointment(
        State(state.clone()),
        Extension(auth_as(user)),
        Path(9999),
        Json(appointment_payload(carlos.id, "2030-06-10T10:00:00", "Haircut")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn appointments_can_be_listed_by_client_and_by_date() {
    let state = test_state().await;
    let user = seed_user(&state, "ana", Role::User).await;
    let carlos = seed_client(&state, "Carlos Santos", "carlos@email.com").await;
    let julia = seed_client(&state, "Julia Lima", "julia@email.com").await;

    for (client_id, raw) in [
        (carlos.id, "2030-05-10T10:00:00"),
        (carlos.id, "2030-05-11T10:00:00"),
        (julia.id, "2030-05-10T14:00:00"),
    ] {
        create_appointment(
            State(state.clone()),
            Extension(auth_as(user.clone())),
            Json(appointment_payload(client_id, raw, "Haircut")),
        )
        .await
        .expect("booking should succeed");
    }

    let Json(for_carlos) = list_appointments_by_client(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Path(carlos.id),
    )
    .await
    .expect("listing by client should succeed");
    assert_eq!(for_carlos.len(), 2);

    let err = list_appointments_by_client(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Path(9999),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let day = NaiveDate::from_ymd_opt(2030, 5, 10).expect("valid date");
    let Json(on_day) = list_appointments_by_date(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Path(day),
    )
    .await
    .expect("listing by date should succeed");
    assert_eq!(on_day.len(), 2);

    let empty_day = NaiveDate::from_ymd_opt(2030, 5, 12).expect("valid date");
    let Json(none) = list_appointments_by_date(
        State(state.clone()),
        Extension(auth_as(user)),
        Path(empty_day),
    )
    .await
    .expect("listing by date should succeed");
    assert!(none.is_empty());
}

#[tokio::test]
async fn deleting_an_appointment_frees_nothing_else() {
    let state = test_state().await;
    let user = seed_user(&state, "ana", Role::User).await;
    let carlos = seed_client(&state, "Carlos Santos", "carlos@email.com").await;

    let (_, Json(created)) = create_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Json(appointment_payload(carlos.id, "2030-05-10T10:00:00", "Haircut")),
    )
    .await
    .expect("booking should succeed");

    delete_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Path(created.id),
    )
    .await
    .expect("delete should succeed");

    let err = get_appointment(
        State(state.clone()),
        Extension(auth_as(user.clone())),
        Path(created.id),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // The slot is free again after the delete.
    create_appointment(
        State(state.clone()),
        Extension(auth_as(user)),
        Json(appointment_payload(carlos.id, "2030-05-10T10:00:00", "Haircut")),
    )
    .await
    .expect("rebooking the freed slot should succeed");
}

#[tokio::test]
async fn the_store_itself_rejects_duplicate_slots() {
    let state = test_state().await;
    let carlos = seed_client(&state, "Carlos Santos", "carlos@email.com").await;

    let admitted = AdmittedAppointment {
        client_id: carlos.id,
        scheduled_at: ProposedTime::parse("2030-05-10T10:00:00")
            .expect("test timestamp should parse")
            .to_utc(),
        service: "Haircut".to_string(),
        notes: None,
    };

    Appointment::create(&state.db_pool, &admitted)
        .await
        .expect("first insert should succeed");

    // Bypassing the admission check still cannot double-book: the UNIQUE
    // constraint on scheduled_at holds.
    let err = Appointment::create(&state.db_pool, &admitted)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
        other => panic!("expected a database error, got {other:?}"),
    }
}
