use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An upcoming appointment slot synced from the public health-queue API.
/// `queue_id` is the upstream identifier and is unique per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingAppointment {
    pub id: Uuid,
    pub queue_id: String,
    pub place: String,
    pub provider: String,
    pub phone: Option<String>,
    pub address: String,
    pub locality: String,
    pub date: NaiveDate,
    pub benefit: String,
    pub waiting_people: i64,
    pub average_wait_days: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Query filters for listing upcoming appointments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingFilter {
    pub locality: Option<String>,
    pub benefit: Option<String>,
    pub max_wait_days: Option<i64>,
    pub active_only: Option<bool>,
}
