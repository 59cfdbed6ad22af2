//! Appointment notifications
//!
//! Email/push delivery lives outside this crate. The core only calls an
//! [`AppointmentNotifier`]; delivery is best effort and failures are logged
//! and swallowed, never surfaced to the caller of a booking operation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use shared::models::AppointmentDetail;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Notification channel closed")]
    ChannelClosed,
}

/// Outbound notification sink
#[async_trait]
pub trait AppointmentNotifier: Send + Sync {
    async fn appointment_created(&self, appointment: &AppointmentDetail) -> Result<(), NotifyError>;

    async fn appointment_cancelled(
        &self,
        appointment: &AppointmentDetail,
    ) -> Result<(), NotifyError>;

    async fn appointment_reminder(&self, appointment: &AppointmentDetail)
    -> Result<(), NotifyError>;
}

/// Which notification to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentEvent {
    Created,
    Cancelled,
    Reminder,
}

impl fmt::Display for AppointmentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentEvent::Created => write!(f, "created"),
            AppointmentEvent::Cancelled => write!(f, "cancelled"),
            AppointmentEvent::Reminder => write!(f, "reminder"),
        }
    }
}

/// Deliver one notification and report whether it went out
pub async fn deliver(
    notifier: &dyn AppointmentNotifier,
    event: AppointmentEvent,
    appointment: &AppointmentDetail,
) -> bool {
    let result = match event {
        AppointmentEvent::Created => notifier.appointment_created(appointment).await,
        AppointmentEvent::Cancelled => notifier.appointment_cancelled(appointment).await,
        AppointmentEvent::Reminder => notifier.appointment_reminder(appointment).await,
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                appointment_id = appointment.appointment.id,
                event = %event,
                error = %e,
                "Appointment notification failed"
            );
            false
        }
    }
}

/// Fire-and-forget delivery on a background task
pub fn dispatch(
    notifier: &Arc<dyn AppointmentNotifier>,
    event: AppointmentEvent,
    appointment: AppointmentDetail,
) {
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        deliver(notifier.as_ref(), event, &appointment).await;
    });
}

/// Notifier that only writes a log line
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    fn log(event: AppointmentEvent, apt: &AppointmentDetail) {
        tracing::info!(
            target: "notify",
            event = %event,
            appointment_id = apt.appointment.id,
            client_id = apt.appointment.client_id,
            staff_id = ?apt.appointment.staff_id,
            service = %apt.service.name,
            starts_at = apt.appointment.starts_at,
            "Appointment notification"
        );
    }
}

#[async_trait]
impl AppointmentNotifier for LogNotifier {
    async fn appointment_created(&self, appointment: &AppointmentDetail) -> Result<(), NotifyError> {
        Self::log(AppointmentEvent::Created, appointment);
        Ok(())
    }

    async fn appointment_cancelled(
        &self,
        appointment: &AppointmentDetail,
    ) -> Result<(), NotifyError> {
        Self::log(AppointmentEvent::Cancelled, appointment);
        Ok(())
    }

    async fn appointment_reminder(
        &self,
        appointment: &AppointmentDetail,
    ) -> Result<(), NotifyError> {
        Self::log(AppointmentEvent::Reminder, appointment);
        Ok(())
    }
}
