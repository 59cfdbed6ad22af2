//! Periodic appointment reminders
//!
//! Every tick finds PENDING/CONFIRMED appointments starting within the lead
//! window that have not been reminded yet. An appointment is only flagged
//! once its reminder was delivered, so failed deliveries are retried on the
//! next tick.

use std::sync::Arc;
use std::time::Duration;

use shared::error::AppResult;
use tokio_util::sync::CancellationToken;

use crate::db::DbService;
use crate::db::repository::appointment;
use crate::notify::{AppointmentEvent, AppointmentNotifier, deliver};
use crate::utils::time::MINUTE_MS;

pub struct ReminderScheduler {
    db: DbService,
    notifier: Arc<dyn AppointmentNotifier>,
    interval: Duration,
    lead_minutes: i64,
}

impl ReminderScheduler {
    pub fn new(
        db: DbService,
        notifier: Arc<dyn AppointmentNotifier>,
        interval: Duration,
        lead_minutes: i64,
    ) -> Self {
        Self {
            db,
            notifier,
            interval,
            lead_minutes,
        }
    }

    /// Tick until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            lead_minutes = self.lead_minutes,
            "Reminder scheduler started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Reminder scheduler stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep(shared::util::now_millis()).await {
                        tracing::error!(error = %e, "Reminder sweep failed");
                    }
                }
            }
        }
    }

    /// Send due reminders as of `now`; returns how many were delivered
    pub async fn sweep(&self, now: i64) -> AppResult<usize> {
        let until = now + self.lead_minutes * MINUTE_MS;
        let due = appointment::find_due_reminders(&self.db.pool, now, until).await?;
        if due.is_empty() {
            return Ok(0);
        }

        let mut sent = 0;
        for detail in &due {
            if deliver(self.notifier.as_ref(), AppointmentEvent::Reminder, detail).await {
                appointment::mark_reminded(&self.db.pool, detail.appointment.id, now).await?;
                sent += 1;
            }
        }
        tracing::info!(due = due.len(), sent, "Reminder sweep finished");
        Ok(sent)
    }
}
