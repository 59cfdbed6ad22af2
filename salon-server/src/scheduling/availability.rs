//! Availability engine
//!
//! Builds the 15-minute slot grid of one staff member on one UTC day:
//!
//! 1. no working-hours row for the weekday → `not working`
//! 2. any time off touching the day → `time off` (whole day, overrides hours)
//! 3. otherwise every window contributes slots over `[start, end)`, each
//!    tagged `booked`, `insufficient_time` or available
//!
//! Reads only; nothing here takes a staff lock or a transaction.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AvailabilitySlot, DayAvailability, SlotBlockReason, WorkingHours};

use crate::db::DbService;
use crate::db::repository::{appointment, staff, time_off, working_hours};
use crate::utils::time::{
    MINUTE_MS, at_time_millis, day_end_inclusive_millis, day_start_millis, parse_hhmm,
    to_iso_millis, weekday_index,
};

/// Slot granularity
pub const SLOT_MINUTES: i64 = 15;

/// Half-open interval intersection: `[a_start, a_end)` vs `[b_start, b_end)`
///
/// Touching intervals (`a_end == b_start`) do not overlap.
pub fn intervals_overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && b_start < a_end
}

/// Lay out slots for the working windows of `date`
///
/// `booked` holds `[starts_at, ends_at)` of blocking appointments. Windows
/// with malformed times are skipped with a warning; slots produced by
/// several windows are merged by start time.
pub fn build_slots(
    date: NaiveDate,
    windows: &[WorkingHours],
    booked: &[(i64, i64)],
    duration_min: Option<i64>,
) -> Vec<AvailabilitySlot> {
    let step = SLOT_MINUTES * MINUTE_MS;
    let mut slots = BTreeMap::new();

    for window in windows {
        let (Some(start), Some(end)) = (parse_hhmm(&window.start_time), parse_hhmm(&window.end_time))
        else {
            tracing::warn!(
                staff_id = window.staff_id,
                working_hours_id = window.id,
                start = %window.start_time,
                end = %window.end_time,
                "Skipping working hours with malformed time"
            );
            continue;
        };

        let window_end = at_time_millis(date, end);
        let mut slot_start = at_time_millis(date, start);
        while slot_start < window_end {
            slots
                .entry(slot_start)
                .or_insert_with(|| classify_slot(slot_start, step, booked, duration_min));
            slot_start += step;
        }
    }

    slots.into_values().collect()
}

fn classify_slot(
    slot_start: i64,
    step: i64,
    booked: &[(i64, i64)],
    duration_min: Option<i64>,
) -> AvailabilitySlot {
    let slot_end = slot_start + step;
    let reason = if booked
        .iter()
        .any(|&(s, e)| intervals_overlap(slot_start, slot_end, s, e))
    {
        Some(SlotBlockReason::Booked)
    } else if let Some(minutes) = duration_min
        && booked.iter().any(|&(s, _)| {
            s > slot_start && s < slot_start + minutes * MINUTE_MS
        })
    {
        Some(SlotBlockReason::InsufficientTime)
    } else {
        None
    };

    AvailabilitySlot {
        time: to_iso_millis(slot_start),
        starts_at: slot_start,
        available: reason.is_none(),
        reason,
    }
}

/// Read-side scheduling queries
#[derive(Clone)]
pub struct AvailabilityService {
    db: DbService,
}

impl AvailabilityService {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Slot grid for `staff_id` on the UTC day `date`
    ///
    /// With `duration_min`, slots that would run into a later booking are
    /// reported as `insufficient_time`.
    pub async fn get_availability(
        &self,
        staff_id: i64,
        date: NaiveDate,
        duration_min: Option<i32>,
    ) -> AppResult<DayAvailability> {
        if let Some(minutes) = duration_min
            && minutes <= 0
        {
            return Err(AppError::with_message(
                ErrorCode::ServiceInvalidDuration,
                format!("Duration must be positive, got {minutes}"),
            ));
        }
        let pool = &self.db.pool;
        if staff::find_by_id(pool, staff_id).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::StaffNotFound,
                format!("Staff {staff_id} not found"),
            ));
        }

        let windows =
            working_hours::find_by_staff_weekday(pool, staff_id, weekday_index(date)).await?;
        if windows.is_empty() {
            return Ok(DayAvailability::not_working(staff_id, date));
        }

        let day_start = day_start_millis(date);
        let day_end = day_end_inclusive_millis(date);

        let time_off = time_off::find_intersecting(pool, staff_id, day_start, day_end).await?;
        if let Some(first) = time_off.into_iter().next() {
            return Ok(DayAvailability::time_off(staff_id, date, first));
        }

        let booked: Vec<(i64, i64)> =
            appointment::find_blocking_starting_between(pool, staff_id, day_start, day_end)
                .await?
                .into_iter()
                .map(|apt| (apt.starts_at, apt.ends_at))
                .collect();

        let slots = build_slots(date, &windows, &booked, duration_min.map(i64::from));
        tracing::debug!(
            staff_id,
            %date,
            slots = slots.len(),
            booked = booked.len(),
            "Computed availability"
        );
        Ok(DayAvailability::working(staff_id, date, slots))
    }

    /// Whether a blocking appointment of `staff_id` overlaps `[starts_at, ends_at)`
    pub async fn check_overlap(
        &self,
        staff_id: i64,
        starts_at: i64,
        ends_at: i64,
        exclude_id: Option<i64>,
    ) -> AppResult<bool> {
        Ok(appointment::has_overlap(&self.db.pool, staff_id, starts_at, ends_at, exclude_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> WorkingHours {
        WorkingHours {
            id: 1,
            staff_id: 1,
            weekday: 0,
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()
    }

    fn at(hh: u32, mm: u32) -> i64 {
        at_time_millis(date(), chrono::NaiveTime::from_hms_opt(hh, mm, 0).unwrap())
    }

    #[test]
    fn overlap_is_half_open() {
        assert!(intervals_overlap(0, 10, 5, 15));
        assert!(intervals_overlap(0, 10, 2, 8));
        assert!(intervals_overlap(2, 8, 0, 10));
        assert!(!intervals_overlap(0, 10, 10, 20));
        assert!(!intervals_overlap(10, 20, 0, 10));
    }

    #[test]
    fn full_day_of_free_slots() {
        let slots = build_slots(date(), &[window("09:00", "18:00")], &[], None);
        assert_eq!(slots.len(), 36);
        assert!(slots.iter().all(|s| s.available && s.reason.is_none()));
        assert_eq!(slots[0].time, "2024-01-14T09:00:00.000Z");
        assert_eq!(slots[35].time, "2024-01-14T17:45:00.000Z");
    }

    #[test]
    fn booked_and_insufficient_time() {
        let booked = [(at(10, 0), at(11, 0))];
        let slots = build_slots(date(), &[window("09:00", "12:00")], &booked, Some(60));
        let by_time = |h, m| slots.iter().find(|s| s.starts_at == at(h, m)).unwrap();

        assert!(by_time(9, 0).available);
        assert_eq!(by_time(9, 15).reason, Some(SlotBlockReason::InsufficientTime));
        assert_eq!(by_time(9, 45).reason, Some(SlotBlockReason::InsufficientTime));
        assert_eq!(by_time(10, 0).reason, Some(SlotBlockReason::Booked));
        assert_eq!(by_time(10, 45).reason, Some(SlotBlockReason::Booked));
        assert!(by_time(11, 0).available);
    }

    #[test]
    fn without_duration_only_booked_slots_are_blocked() {
        let booked = [(at(10, 0), at(11, 0))];
        let slots = build_slots(date(), &[window("09:00", "12:00")], &booked, None);
        assert_eq!(slots.iter().filter(|s| !s.available).count(), 4);
    }

    #[test]
    fn split_and_duplicate_windows_merge() {
        let windows = [
            window("09:00", "10:00"),
            window("13:00", "14:00"),
            window("09:00", "10:00"),
        ];
        let slots = build_slots(date(), &windows, &[], None);
        assert_eq!(slots.len(), 8);
        assert!(slots.windows(2).all(|w| w[0].starts_at < w[1].starts_at));
    }

    #[test]
    fn malformed_window_is_skipped() {
        let windows = [window("9am", "18:00"), window("09:00", "09:30")];
        let slots = build_slots(date(), &windows, &[], None);
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn partial_slot_at_window_end_is_included() {
        let slots = build_slots(date(), &[window("09:00", "09:20")], &[], None);
        assert_eq!(slots.len(), 2);
    }
}
