//! Service Model (catalog entry: haircut, manicure, ...)

use serde::{Deserialize, Serialize};

/// Service catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Drives appointment end-time computation
    pub duration_min: i32,
    pub price_ils: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Service reference embedded in appointment responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ServiceSummary {
    pub id: i64,
    pub name: String,
    pub duration_min: i32,
    pub price_ils: f64,
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            duration_min: service.duration_min,
            price_ils: service.price_ils,
        }
    }
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub description: Option<String>,
    pub duration_min: i32,
    pub price_ils: f64,
}

/// Update service payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_min: Option<i32>,
    pub price_ils: Option<f64>,
    pub is_active: Option<bool>,
}
