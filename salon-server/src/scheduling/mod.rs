//! Scheduling core: availability, appointment lifecycle, reminders
//!
//! # Module structure
//!
//! - [`availability`] - slot grid and overlap primitive
//! - [`appointments`] - create / reschedule / cancel / status changes
//! - [`locks`] - per-staff write serialization
//! - [`reminder`] - periodic reminder sweep

pub mod appointments;
pub mod availability;
pub mod locks;
pub mod reminder;

pub use appointments::AppointmentService;
pub use availability::{AvailabilityService, SLOT_MINUTES, build_slots, intervals_overlap};
pub use locks::StaffLocks;
pub use reminder::ReminderScheduler;
