use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use tracing::warn;

use super::parser::RawAppointmentFields;
use super::StructuringError;
use crate::models::enums::AppointmentType;

/// Confidence strictly below this rejects the extraction outright.
pub const MIN_CONFIDENCE: i64 = 51;

/// Validated fields ready for persistence.
#[derive(Debug, Clone)]
pub struct AppointmentFields {
    pub name: String,
    pub date: NaiveDate,
    pub appointment_type: AppointmentType,
    pub summary: String,
    pub doctor: String,
    pub confidence_score: i64,
}

/// Validate raw model output into persistable fields.
///
/// Rules, in order:
/// 1. Confidence below [`MIN_CONFIDENCE`] rejects everything else.
/// 2. name, date, summary and doctor must all be present and non-empty.
/// 3. A type outside the assignable list (a reported `Other` included)
///    falls back to `Other` when confidence is strictly above the
///    minimum, otherwise the type is undecidable.
/// 4. An unparseable date falls back to today rather than failing.
pub fn validate_fields(raw: RawAppointmentFields) -> Result<AppointmentFields, StructuringError> {
    let confidence = raw.confidence_score.unwrap_or(0);
    if confidence < MIN_CONFIDENCE {
        return Err(StructuringError::LowConfidence(confidence));
    }

    let mut missing = Vec::new();
    let name = required(&raw.name, "name", &mut missing);
    let date_str = required(&raw.date, "date", &mut missing);
    let summary = required(&raw.summary, "summary", &mut missing);
    let doctor = required(&raw.doctor, "doctor", &mut missing);
    if !missing.is_empty() {
        return Err(StructuringError::MissingFields(missing));
    }

    let type_str = raw.appointment_type.unwrap_or_default();
    // A literal "Other" is never assignable directly; it goes through
    // the same confidence gate as any unlisted type.
    let appointment_type = match AppointmentType::from_str(&type_str) {
        Ok(t) if t != AppointmentType::Other => t,
        _ if confidence > MIN_CONFIDENCE => {
            warn!(reported = %type_str, "Unassignable appointment type, falling back to Other");
            AppointmentType::Other
        }
        _ => return Err(StructuringError::CannotDetermineType(type_str)),
    };

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_else(|_| {
        warn!(reported = %date_str, "Unparseable appointment date, using today");
        Utc::now().date_naive()
    });

    Ok(AppointmentFields {
        name,
        date,
        appointment_type,
        summary,
        doctor,
        confidence_score: confidence,
    })
}

fn required(value: &Option<String>, field: &str, missing: &mut Vec<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            missing.push(field.to_string());
            String::new()
        }
    }
}
