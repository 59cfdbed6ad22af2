//! Shared fixtures for integration tests
//!
//! Every test gets its own in-memory database and a notifier that records
//! events on a channel.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use salon_server::notify::AppointmentEvent;
use salon_server::{AppointmentNotifier, Config, CurrentUser, DbService, NotifyError, ServerState};
use shared::models::{
    AppointmentCreate, AppointmentDetail, AppointmentStatus, Service, ServiceCreate, Staff, StaffCreate,
    WorkingHoursInput,
};
use tokio::sync::mpsc;

/// Notifier that forwards `(event, appointment_id)` to the test
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<(AppointmentEvent, i64)>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn record(&self, event: AppointmentEvent, apt: &AppointmentDetail) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("smtp unreachable".into()));
        }
        self.tx
            .send((event, apt.appointment.id))
            .map_err(|_| NotifyError::ChannelClosed)
    }
}

#[async_trait]
impl AppointmentNotifier for RecordingNotifier {
    async fn appointment_created(&self, apt: &AppointmentDetail) -> Result<(), NotifyError> {
        self.record(AppointmentEvent::Created, apt)
    }

    async fn appointment_cancelled(&self, apt: &AppointmentDetail) -> Result<(), NotifyError> {
        self.record(AppointmentEvent::Cancelled, apt)
    }

    async fn appointment_reminder(&self, apt: &AppointmentDetail) -> Result<(), NotifyError> {
        self.record(AppointmentEvent::Reminder, apt)
    }
}

pub struct TestApp {
    pub state: ServerState,
    pub notifier: Arc<RecordingNotifier>,
    pub events: mpsc::UnboundedReceiver<(AppointmentEvent, i64)>,
    pub admin: CurrentUser,
}

impl TestApp {
    /// Next recorded notification, or `None` after a short wait
    pub async fn next_event(&mut self) -> Option<(AppointmentEvent, i64)> {
        tokio::time::timeout(Duration::from_secs(2), self.events.recv())
            .await
            .ok()
            .flatten()
    }

    /// Assert that no notification arrives within a short window
    pub async fn assert_no_event(&mut self) {
        let got = tokio::time::timeout(Duration::from_millis(100), self.events.recv()).await;
        assert!(got.is_err(), "unexpected notification: {got:?}");
    }

    pub async fn create_service(&self, name: &str, duration_min: i32, price_ils: f64) -> Service {
        self.state
            .catalog
            .create(
                &self.admin,
                ServiceCreate {
                    name: name.into(),
                    description: None,
                    duration_min,
                    price_ils,
                },
            )
            .await
            .unwrap()
    }

    pub async fn create_staff(&self, name: &str, service_ids: Vec<i64>) -> Staff {
        self.state
            .staff
            .create(
                &self.admin,
                StaffCreate {
                    name: name.into(),
                    bio: None,
                    service_ids,
                },
            )
            .await
            .unwrap()
    }

    /// Staff member working Sunday..Thursday 09:00-18:00
    pub async fn create_weekday_staff(&self, name: &str, service_ids: Vec<i64>) -> Staff {
        let staff = self.create_staff(name, service_ids).await;
        let hours = (0..=4)
            .map(|day| WorkingHoursInput::new(day, "09:00", "18:00"))
            .collect();
        self.state
            .staff
            .set_working_hours(&self.admin, staff.id, hours)
            .await
            .unwrap();
        staff
    }

    pub async fn book(
        &self,
        client_id: i64,
        service_id: i64,
        staff_id: Option<i64>,
        starts_at: i64,
    ) -> salon_server::AppResult<AppointmentDetail> {
        self.state
            .appointments
            .create(
                &CurrentUser::client(client_id),
                AppointmentCreate {
                    service_id,
                    staff_id,
                    starts_at,
                    notes: None,
                },
            )
            .await
    }

    pub async fn status_of(&self, appointment_id: i64) -> AppointmentStatus {
        self.state
            .appointments
            .find_detail(appointment_id)
            .await
            .unwrap()
            .appointment
            .status
    }

    /// Book and confirm, draining the created notification
    pub async fn book_confirmed(
        &mut self,
        client_id: i64,
        service_id: i64,
        staff_id: i64,
        starts_at: i64,
    ) -> AppointmentDetail {
        let created = self
            .book(client_id, service_id, Some(staff_id), starts_at)
            .await
            .unwrap();
        self.next_event().await;
        self.state
            .appointments
            .confirm(&self.admin, created.appointment.id)
            .await
            .unwrap()
    }
}

pub async fn setup() -> TestApp {
    let db = DbService::in_memory().await.unwrap();
    let (tx, events) = mpsc::unbounded_channel();
    let notifier = Arc::new(RecordingNotifier {
        tx,
        fail: AtomicBool::new(false),
    });
    let config = Config::with_work_dir(std::env::temp_dir().to_string_lossy().into_owned());
    let state = ServerState::new(config, db, notifier.clone());
    TestApp {
        state,
        notifier,
        events,
        admin: CurrentUser::admin(1),
    }
}

/// UTC instant in Unix millis
pub fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, hh, mm, 0)
        .single()
        .unwrap()
        .timestamp_millis()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
