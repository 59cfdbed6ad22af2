//! Staff Model

use serde::{Deserialize, Serialize};

/// Staff member entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Staff reference embedded in appointment responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffSummary {
    pub id: i64,
    pub name: String,
}

impl From<&Staff> for StaffSummary {
    fn from(staff: &Staff) -> Self {
        Self {
            id: staff.id,
            name: staff.name.clone(),
        }
    }
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub name: String,
    pub bio: Option<String>,
    /// Services this staff member provides
    #[serde(default)]
    pub service_ids: Vec<i64>,
}

/// Update staff payload
///
/// Activation changes go through the staff lifecycle (deactivation cascades
/// onto future appointments), so the active flag is not part of this payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Outcome of deactivating or deleting a staff member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRemoval {
    pub staff_id: i64,
    /// `true` when the staff row was removed, `false` when only deactivated
    pub deleted: bool,
    /// Number of future appointments moved to CANCELLED
    pub affected_appointments: u64,
    pub appointment_ids: Vec<i64>,
}
