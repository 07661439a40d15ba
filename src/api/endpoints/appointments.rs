//! Parsed-appointment endpoints: PDF upload and listing.

use axum::extract::{Multipart, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::config::MAX_UPLOAD_BYTES;
use crate::db::repository::parsed::{
    insert_parsed_appointment, list_parsed_appointments, NewParsedAppointment,
};
use crate::models::ParsedAppointment;
use crate::pipeline::structuring::{structure_appointment, AppointmentFields};

/// POST /parse-pdf
///
/// Multipart upload with a single `file` field. The PDF goes through
/// text extraction and LLM structuring synchronously; both are blocking
/// work and run off the async executor.
pub async fn parse_pdf(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    mut multipart: Multipart,
) -> Result<Json<ParsedAppointment>, ApiError> {
    let mut filename = None;
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
            file_bytes = Some(bytes);
        }
    }

    let bytes = file_bytes.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".into()))?;
    let filename = filename.unwrap_or_else(|| "upload.pdf".to_string());

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ApiError::BadRequest("Only PDF files are accepted".into()));
    }
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge);
    }

    tracing::info!(
        user = %user.email,
        file = %filename,
        size = bytes.len(),
        "Processing PDF upload"
    );

    let engine = ctx.engine.clone();
    let llm = ctx.llm.clone();
    let model = ctx.llm_model.clone();
    let pdf = bytes.to_vec();

    let fields: AppointmentFields = tokio::task::spawn_blocking(move || {
        let text = engine.extract(&pdf);
        if text.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "Could not extract any text from the document".into(),
            ));
        }
        Ok(structure_appointment(llm.as_ref(), &model, &text)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Extraction task failed: {e}")))??;

    let conn = ctx.open_db()?;
    let record = insert_parsed_appointment(
        &conn,
        NewParsedAppointment {
            user_id: user.user_id,
            original_filename: filename,
            name: fields.name,
            date: fields.date,
            appointment_type: fields.appointment_type,
            summary: Some(fields.summary),
            doctor: Some(fields.doctor),
            file_size: bytes.len() as i64,
            raw_file_data: bytes.to_vec(),
            confidence_score: fields.confidence_score,
        },
    )?;

    Ok(Json(record))
}

/// GET /parsed-appointments
pub async fn list_parsed(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Vec<ParsedAppointment>>, ApiError> {
    let conn = ctx.open_db()?;
    let records = list_parsed_appointments(&conn, &user.user_id)?;
    Ok(Json(records))
}
