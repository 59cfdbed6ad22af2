//! Availability Model (slot grid for one staff member on one day)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time_off::TimeOff;

/// Why a whole day cannot be booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayBlockReason {
    #[serde(rename = "not working")]
    NotWorking,
    #[serde(rename = "time off")]
    TimeOff,
}

/// Why a single slot cannot be booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotBlockReason {
    /// Slot overlaps an existing booking
    Booked,
    /// A later booking starts before the requested service would finish
    InsufficientTime,
}

/// One 15-minute slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilitySlot {
    /// Slot start as an ISO-8601 instant, e.g. `2024-01-14T09:00:00.000Z`
    pub time: String,
    /// Slot start in Unix millis
    pub starts_at: i64,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SlotBlockReason>,
}

/// Availability of a staff member on a calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayAvailability {
    pub staff_id: i64,
    pub date: NaiveDate,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DayBlockReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_off: Option<TimeOff>,
    pub slots: Vec<AvailabilitySlot>,
}

impl DayAvailability {
    pub fn not_working(staff_id: i64, date: NaiveDate) -> Self {
        Self {
            staff_id,
            date,
            available: false,
            reason: Some(DayBlockReason::NotWorking),
            time_off: None,
            slots: Vec::new(),
        }
    }

    pub fn time_off(staff_id: i64, date: NaiveDate, time_off: TimeOff) -> Self {
        Self {
            staff_id,
            date,
            available: false,
            reason: Some(DayBlockReason::TimeOff),
            time_off: Some(time_off),
            slots: Vec::new(),
        }
    }

    pub fn working(staff_id: i64, date: NaiveDate, slots: Vec<AvailabilitySlot>) -> Self {
        Self {
            staff_id,
            date,
            available: true,
            reason: None,
            time_off: None,
            slots,
        }
    }

    /// Slots that can still be booked
    pub fn open_slots(&self) -> impl Iterator<Item = &AvailabilitySlot> {
        self.slots.iter().filter(|slot| slot.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_reasons_serialize_as_phrases() {
        assert_eq!(
            serde_json::to_string(&DayBlockReason::NotWorking).unwrap(),
            "\"not working\""
        );
        assert_eq!(
            serde_json::to_string(&DayBlockReason::TimeOff).unwrap(),
            "\"time off\""
        );
        assert_eq!(
            serde_json::to_string(&SlotBlockReason::InsufficientTime).unwrap(),
            "\"insufficient_time\""
        );
    }

    #[test]
    fn not_working_day_has_no_slots() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 13).unwrap();
        let day = DayAvailability::not_working(1, date);
        assert!(!day.available);
        assert!(day.slots.is_empty());
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["reason"], "not working");
        assert!(json.get("time_off").is_none());
    }
}
