use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{AppointmentType, ProcessingStatus};
use crate::models::ParsedAppointment;

use super::{format_timestamp, parse_timestamp};

/// Fields accepted when storing a freshly parsed document.
pub struct NewParsedAppointment {
    pub user_id: Uuid,
    pub original_filename: String,
    pub name: String,
    pub date: NaiveDate,
    pub appointment_type: AppointmentType,
    pub summary: Option<String>,
    pub doctor: Option<String>,
    pub file_size: i64,
    pub raw_file_data: Vec<u8>,
    pub confidence_score: i64,
}

pub fn insert_parsed_appointment(
    conn: &Connection,
    new: NewParsedAppointment,
) -> Result<ParsedAppointment, DatabaseError> {
    let now = Utc::now().naive_utc();
    let record = ParsedAppointment {
        id: Uuid::new_v4(),
        user_id: new.user_id,
        original_filename: new.original_filename,
        name: new.name,
        date: new.date,
        appointment_type: new.appointment_type,
        summary: new.summary,
        doctor: new.doctor,
        file_size: new.file_size,
        raw_file_data: Some(new.raw_file_data),
        processing_status: ProcessingStatus::Completed,
        confidence_score: new.confidence_score,
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO parsed_appointments
         (id, user_id, original_filename, name, date, appointment_type, summary, doctor,
          file_size, raw_file_data, processing_status, confidence_score, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            record.id.to_string(),
            record.user_id.to_string(),
            record.original_filename,
            record.name,
            record.date.to_string(),
            record.appointment_type.as_str(),
            record.summary,
            record.doctor,
            record.file_size,
            record.raw_file_data,
            record.processing_status.as_str(),
            record.confidence_score,
            format_timestamp(&record.created_at),
            format_timestamp(&record.updated_at),
        ],
    )?;

    Ok(record)
}

/// List a user's parsed appointments, newest first.
/// Raw file bytes are not loaded here.
pub fn list_parsed_appointments(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<ParsedAppointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, original_filename, name, date, appointment_type, summary, doctor,
         file_size, processing_status, confidence_score, created_at, updated_at
         FROM parsed_appointments WHERE user_id = ?1 ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map(params![user_id.to_string()], |row| {
        Ok(ParsedRow {
            id: row.get::<_, String>(0)?,
            user_id: row.get::<_, String>(1)?,
            original_filename: row.get::<_, String>(2)?,
            name: row.get::<_, String>(3)?,
            date: row.get::<_, String>(4)?,
            appointment_type: row.get::<_, String>(5)?,
            summary: row.get::<_, Option<String>>(6)?,
            doctor: row.get::<_, Option<String>>(7)?,
            file_size: row.get::<_, i64>(8)?,
            processing_status: row.get::<_, String>(9)?,
            confidence_score: row.get::<_, i64>(10)?,
            created_at: row.get::<_, String>(11)?,
            updated_at: row.get::<_, String>(12)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(parsed_from_row(row?)?);
    }
    Ok(records)
}

struct ParsedRow {
    id: String,
    user_id: String,
    original_filename: String,
    name: String,
    date: String,
    appointment_type: String,
    summary: Option<String>,
    doctor: Option<String>,
    file_size: i64,
    processing_status: String,
    confidence_score: i64,
    created_at: String,
    updated_at: String,
}

fn parsed_from_row(row: ParsedRow) -> Result<ParsedAppointment, DatabaseError> {
    Ok(ParsedAppointment {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        user_id: Uuid::parse_str(&row.user_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        original_filename: row.original_filename,
        name: row.name,
        date: NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").unwrap_or_default(),
        appointment_type: AppointmentType::from_str(&row.appointment_type)
            .unwrap_or(AppointmentType::Other),
        summary: row.summary,
        doctor: row.doctor,
        file_size: row.file_size,
        raw_file_data: None,
        processing_status: ProcessingStatus::from_str(&row.processing_status)
            .unwrap_or(ProcessingStatus::Completed),
        confidence_score: row.confidence_score,
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
    })
}
