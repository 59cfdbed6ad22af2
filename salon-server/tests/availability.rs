mod common;

use common::{at, date, setup};
use shared::error::ErrorCode;
use shared::models::{DayBlockReason, SlotBlockReason, TimeOffCreate, TimeOffType, WorkingHoursInput};

#[tokio::test]
async fn working_day_without_bookings_is_fully_open() {
    let app = setup().await;
    let service = app.create_service("Haircut", 60, 120.0).await;
    let s1 = app.create_weekday_staff("Dana", vec![service.id]).await;

    // 2024-01-14 is a Sunday
    let day = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 14), None)
        .await
        .unwrap();

    assert!(day.available);
    assert_eq!(day.reason, None);
    assert_eq!(day.slots.len(), 36);
    assert!(day.slots.iter().all(|s| s.available));
    assert_eq!(day.slots.first().unwrap().time, "2024-01-14T09:00:00.000Z");
    assert_eq!(day.slots.last().unwrap().time, "2024-01-14T17:45:00.000Z");
}

#[tokio::test]
async fn day_without_working_hours_is_not_working() {
    let app = setup().await;
    let s1 = app.create_weekday_staff("Dana", vec![]).await;

    // 2024-01-19 is a Friday
    let day = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 19), Some(30))
        .await
        .unwrap();

    assert!(!day.available);
    assert_eq!(day.reason, Some(DayBlockReason::NotWorking));
    assert!(day.slots.is_empty());
    assert!(day.time_off.is_none());
}

#[tokio::test]
async fn time_off_blocks_the_whole_day() {
    let app = setup().await;
    let s1 = app.create_weekday_staff("Dana", vec![]).await;

    // Two hours of sick leave on Monday afternoon still blocks the whole day
    app.state
        .staff
        .register_time_off(
            &app.admin,
            s1.id,
            TimeOffCreate {
                time_off_type: TimeOffType::SickLeave,
                starts_at: at(2024, 1, 15, 14, 0),
                ends_at: at(2024, 1, 15, 16, 0),
                reason: Some("dentist".into()),
            },
        )
        .await
        .unwrap();

    let day = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 15), None)
        .await
        .unwrap();
    assert!(!day.available);
    assert_eq!(day.reason, Some(DayBlockReason::TimeOff));
    assert!(day.slots.is_empty());
    assert_eq!(
        day.time_off.unwrap().time_off_type,
        TimeOffType::SickLeave
    );

    // The neighbouring days are unaffected
    let next = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 16), None)
        .await
        .unwrap();
    assert!(next.available);
}

#[tokio::test]
async fn time_off_touching_midnight_counts_for_that_day() {
    let app = setup().await;
    let s1 = app.create_weekday_staff("Dana", vec![]).await;

    app.state
        .staff
        .register_time_off(
            &app.admin,
            s1.id,
            TimeOffCreate {
                time_off_type: TimeOffType::Other,
                starts_at: at(2024, 1, 14, 20, 0),
                ends_at: at(2024, 1, 15, 0, 0),
                reason: None,
            },
        )
        .await
        .unwrap();

    let monday = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 15), None)
        .await
        .unwrap();
    assert_eq!(monday.reason, Some(DayBlockReason::TimeOff));
}

#[tokio::test]
async fn bookings_mark_slots_booked_and_insufficient() {
    let mut app = setup().await;
    let service = app.create_service("Color", 60, 250.0).await;
    let s1 = app.create_weekday_staff("Dana", vec![service.id]).await;

    app.book_confirmed(10, service.id, s1.id, at(2024, 1, 15, 10, 0))
        .await;

    let day = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 15), Some(60))
        .await
        .unwrap();
    let slot = |h: u32, m: u32| {
        day.slots
            .iter()
            .find(|s| s.starts_at == at(2024, 1, 15, h, m))
            .unwrap()
    };

    assert!(slot(9, 0).available);
    assert_eq!(slot(9, 30).reason, Some(SlotBlockReason::InsufficientTime));
    assert_eq!(slot(10, 0).reason, Some(SlotBlockReason::Booked));
    assert_eq!(slot(10, 45).reason, Some(SlotBlockReason::Booked));
    assert!(slot(11, 0).available);
    assert_eq!(day.open_slots().count(), 36 - 4 - 3);
}

#[tokio::test]
async fn cancelled_and_floating_bookings_do_not_block() {
    let app = setup().await;
    let service = app.create_service("Haircut", 30, 90.0).await;
    let s1 = app.create_weekday_staff("Dana", vec![service.id]).await;

    let booked = app
        .book(20, service.id, Some(s1.id), at(2024, 1, 15, 9, 0))
        .await
        .unwrap();
    app.state
        .appointments
        .cancel(&salon_server::CurrentUser::client(20), booked.appointment.id)
        .await
        .unwrap();
    app.book(21, service.id, None, at(2024, 1, 15, 9, 0))
        .await
        .unwrap();

    let day = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 15), None)
        .await
        .unwrap();
    assert!(day.slots.iter().all(|s| s.available));
}

#[tokio::test]
async fn split_shift_produces_both_windows() {
    let app = setup().await;
    let s1 = app.create_staff("Noa", vec![]).await;
    app.state
        .staff
        .set_working_hours(
            &app.admin,
            s1.id,
            vec![
                WorkingHoursInput::new(1, "13:00", "14:00"),
                WorkingHoursInput::new(1, "09:00", "10:00"),
            ],
        )
        .await
        .unwrap();

    let day = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 15), None)
        .await
        .unwrap();
    let times: Vec<&str> = day.slots.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(
        times,
        [
            "2024-01-15T09:00:00.000Z",
            "2024-01-15T09:15:00.000Z",
            "2024-01-15T09:30:00.000Z",
            "2024-01-15T09:45:00.000Z",
            "2024-01-15T13:00:00.000Z",
            "2024-01-15T13:15:00.000Z",
            "2024-01-15T13:30:00.000Z",
            "2024-01-15T13:45:00.000Z",
        ]
    );
}

#[tokio::test]
async fn check_overlap_scenario() {
    let mut app = setup().await;
    let service = app.create_service("Color", 60, 250.0).await;
    let s1 = app.create_weekday_staff("Dana", vec![service.id]).await;
    let a = app
        .book_confirmed(10, service.id, s1.id, at(2024, 1, 15, 10, 0))
        .await;

    let engine = &app.state.availability;
    // partial overlap
    assert!(engine
        .check_overlap(s1.id, at(2024, 1, 15, 10, 30), at(2024, 1, 15, 11, 30), None)
        .await
        .unwrap());
    // containment both ways
    assert!(engine
        .check_overlap(s1.id, at(2024, 1, 15, 10, 15), at(2024, 1, 15, 10, 45), None)
        .await
        .unwrap());
    assert!(engine
        .check_overlap(s1.id, at(2024, 1, 15, 9, 0), at(2024, 1, 15, 12, 0), None)
        .await
        .unwrap());
    // adjacency on either side
    assert!(!engine
        .check_overlap(s1.id, at(2024, 1, 15, 11, 0), at(2024, 1, 15, 12, 0), None)
        .await
        .unwrap());
    assert!(!engine
        .check_overlap(s1.id, at(2024, 1, 15, 9, 0), at(2024, 1, 15, 10, 0), None)
        .await
        .unwrap());
    // excluding the appointment itself
    assert!(!engine
        .check_overlap(
            s1.id,
            at(2024, 1, 15, 10, 30),
            at(2024, 1, 15, 11, 30),
            Some(a.appointment.id)
        )
        .await
        .unwrap());
}

#[tokio::test]
async fn unknown_staff_and_bad_duration_are_rejected() {
    let app = setup().await;
    let err = app
        .state
        .availability
        .get_availability(404, date(2024, 1, 15), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StaffNotFound);

    let s1 = app.create_weekday_staff("Dana", vec![]).await;
    let err = app
        .state
        .availability
        .get_availability(s1.id, date(2024, 1, 15), Some(0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ServiceInvalidDuration);
}
