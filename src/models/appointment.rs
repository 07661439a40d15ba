use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AppointmentType, ProcessingStatus};

/// An appointment record produced by parsing an uploaded PDF.
/// The original file bytes are retained for later review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedAppointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_filename: String,
    pub name: String,
    pub date: NaiveDate,
    pub appointment_type: AppointmentType,
    pub summary: Option<String>,
    pub doctor: Option<String>,
    pub file_size: i64,
    #[serde(skip)]
    pub raw_file_data: Option<Vec<u8>>,
    pub processing_status: ProcessingStatus,
    pub confidence_score: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
