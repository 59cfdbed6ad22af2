mod common;

use std::sync::Arc;

use common::{at, date, setup};
use salon_server::{AppointmentNotifier, Config, CurrentUser, DbService, LogNotifier, ServerState};
use shared::error::ErrorCode;
use shared::models::{
    AppointmentCreate, AppointmentStatus, ServiceCreate, StaffCreate, TimeOffCreate, TimeOffType,
    WorkingHoursInput,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
    let app = setup().await;
    let service = app.create_service("Color", 60, 250.0).await;
    let s1 = app.create_weekday_staff("Dana", vec![service.id]).await;

    let mut handles = Vec::new();
    for client_id in 100..116 {
        let appointments = app.state.appointments.clone();
        // Staggered starts that all overlap 10:00-11:00
        let starts_at = at(2024, 1, 15, 10, 0) + (client_id % 4) * 15 * 60_000;
        handles.push(tokio::spawn(async move {
            appointments
                .create(
                    &CurrentUser::client(client_id),
                    AppointmentCreate {
                        service_id: service.id,
                        staff_id: Some(s1.id),
                        starts_at,
                        notes: None,
                    },
                )
                .await
        }));
    }

    let mut booked = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => booked += 1,
            Err(e) => {
                assert_eq!(e.code, ErrorCode::AppointmentConflict);
                conflicts += 1;
            }
        }
    }
    assert_eq!(booked, 1);
    assert_eq!(conflicts, 15);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn time_off_and_booking_do_not_interleave() {
    let app = setup().await;
    let service = app.create_service("Color", 60, 250.0).await;
    let s1 = app.create_weekday_staff("Dana", vec![service.id]).await;
    let start = at(2024, 1, 15, 10, 0);

    let appointments = app.state.appointments.clone();
    let booking = tokio::spawn(async move {
        appointments
            .create(
                &CurrentUser::client(10),
                AppointmentCreate {
                    service_id: service.id,
                    staff_id: Some(s1.id),
                    starts_at: start,
                    notes: None,
                },
            )
            .await
    });
    let staff = app.state.staff.clone();
    let admin = app.admin.clone();
    let time_off = tokio::spawn(async move {
        staff
            .register_time_off(
                &admin,
                s1.id,
                TimeOffCreate {
                    time_off_type: TimeOffType::SickLeave,
                    starts_at: at(2024, 1, 15, 0, 0),
                    ends_at: at(2024, 1, 16, 0, 0),
                    reason: None,
                },
            )
            .await
    });

    let created = booking.await.unwrap().unwrap();
    let registration = time_off.await.unwrap().unwrap();

    // Both writes hold the staff lock, so one fully precedes the other
    let status = app.status_of(created.appointment.id).await;
    if registration.appointment_ids.contains(&created.appointment.id) {
        assert_eq!(status, AppointmentStatus::ReschedulePending);
    } else {
        // Booking landed after the time off, which bookings do not consult
        assert_eq!(status, AppointmentStatus::Pending);
        assert_eq!(registration.affected_appointments, 0);
    }
}

/// Server state over a WAL database file with a multi-connection pool
async fn file_backed(dir: &tempfile::TempDir, max_connections: u32) -> (ServerState, String) {
    let db_path = dir.path().join("salon.db").to_string_lossy().into_owned();
    let db = DbService::new(&db_path, max_connections).await.unwrap();
    let mut config = Config::with_work_dir(dir.path().to_string_lossy().into_owned());
    config.database_path = db_path.clone();
    let notifier: Arc<dyn AppointmentNotifier> = Arc::new(LogNotifier);
    (ServerState::new(config, db, notifier), db_path)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn file_backed_database_serializes_writers() {
    let dir = tempfile::tempdir().unwrap();
    let (state, db_path) = file_backed(&dir, 4).await;
    let admin = CurrentUser::admin(1);

    let service = state
        .catalog
        .create(
            &admin,
            ServiceCreate {
                name: "Haircut".into(),
                description: None,
                duration_min: 30,
                price_ils: 90.0,
            },
        )
        .await
        .unwrap();
    let s1 = state
        .staff
        .create(
            &admin,
            StaffCreate {
                name: "Dana".into(),
                bio: None,
                service_ids: vec![service.id],
            },
        )
        .await
        .unwrap();
    state
        .staff
        .set_working_hours(&admin, s1.id, vec![WorkingHoursInput::new(1, "09:00", "18:00")])
        .await
        .unwrap();

    // Eight clients race for four half-hour slots
    let mut handles = Vec::new();
    for client_id in 0..8 {
        let appointments = state.appointments.clone();
        let starts_at = at(2024, 1, 15, 9, 0) + (client_id % 4) * 30 * 60_000;
        handles.push(tokio::spawn(async move {
            appointments
                .create(
                    &CurrentUser::client(client_id),
                    AppointmentCreate {
                        service_id: service.id,
                        staff_id: Some(s1.id),
                        starts_at,
                        notes: None,
                    },
                )
                .await
        }));
    }
    let mut booked = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            booked += 1;
        }
    }
    assert_eq!(booked, 4);

    let day = state
        .availability
        .get_availability(s1.id, date(2024, 1, 15), Some(30))
        .await
        .unwrap();
    assert_eq!(day.open_slots().count(), day.slots.len() - 8);

    // Reopening the file keeps the data and skips applied migrations
    state.db.pool.close().await;
    let reopened = DbService::new(&db_path, 1).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointment")
        .fetch_one(&reopened.pool)
        .await
        .unwrap();
    assert_eq!(count, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn writes_for_different_staff_run_concurrently_on_a_pool() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = file_backed(&dir, 8).await;
    let admin = CurrentUser::admin(1);

    let service = state
        .catalog
        .create(
            &admin,
            ServiceCreate {
                name: "Haircut".into(),
                description: None,
                duration_min: 30,
                price_ils: 90.0,
            },
        )
        .await
        .unwrap();
    let mut staff_ids = Vec::new();
    for n in 0..16 {
        let member = state
            .staff
            .create(
                &admin,
                StaffCreate {
                    name: format!("Stylist {n}"),
                    bio: None,
                    service_ids: vec![service.id],
                },
            )
            .await
            .unwrap();
        staff_ids.push(member.id);
    }

    // Per-staff locks do not serialize these; the database has to
    let mut handles = Vec::new();
    for (client_id, staff_id) in (0..).zip(staff_ids.iter().copied()) {
        let appointments = state.appointments.clone();
        handles.push(tokio::spawn(async move {
            appointments
                .create(
                    &CurrentUser::client(client_id),
                    AppointmentCreate {
                        service_id: service.id,
                        staff_id: Some(staff_id),
                        starts_at: at(2024, 1, 15, 10, 0),
                        notes: None,
                    },
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Mixed writers across staff: schedules and time off in parallel
    let mut handles = Vec::new();
    for staff_id in staff_ids.iter().copied() {
        let staff = state.staff.clone();
        let admin = admin.clone();
        handles.push(tokio::spawn(async move {
            staff
                .set_working_hours(
                    &admin,
                    staff_id,
                    vec![
                        WorkingHoursInput::new(1, "09:00", "13:00"),
                        WorkingHoursInput::new(1, "14:00", "18:00"),
                    ],
                )
                .await
                .unwrap();
            staff
                .register_time_off(
                    &admin,
                    staff_id,
                    TimeOffCreate {
                        time_off_type: TimeOffType::Vacation,
                        starts_at: at(2024, 2, 1, 0, 0),
                        ends_at: at(2024, 2, 2, 0, 0),
                        reason: None,
                    },
                )
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let appointments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointment")
        .fetch_one(&state.db.pool)
        .await
        .unwrap();
    assert_eq!(appointments, 16);
    let windows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM working_hours")
        .fetch_one(&state.db.pool)
        .await
        .unwrap();
    assert_eq!(windows, 32);
}
