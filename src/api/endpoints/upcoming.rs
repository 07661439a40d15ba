//! Upcoming-appointment queue endpoints.
//!
//! The queue data comes from an external sync job that POSTs the full
//! current listing. Uploads are processed item by item so one bad row
//! never sinks the batch.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::upcoming::{
    clear_inactive_upcoming, deactivate_upcoming, get_upcoming_by_queue_id, list_upcoming,
    upsert_upcoming, QueueListing,
};
use crate::models::{UpcomingAppointment, UpcomingFilter};

#[derive(Debug, Deserialize)]
pub struct UploadPayload {
    pub appointments: Vec<IncomingListing>,
}

/// One listing as posted by the sync job. Dates arrive as strings in
/// either ISO or day-first form.
#[derive(Debug, Deserialize)]
pub struct IncomingListing {
    pub queue_id: String,
    pub place: String,
    pub provider: String,
    pub phone: Option<String>,
    pub address: String,
    pub locality: String,
    pub date: String,
    pub benefit: String,
    pub waiting_people: i64,
    pub average_wait_days: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Serialize)]
pub struct BulkUploadReport {
    pub total_processed: usize,
    pub new_records: usize,
    pub updated_records: usize,
    pub errors: Vec<String>,
}

/// POST /upcoming-appointments/upload
pub async fn upload(
    State(ctx): State<ApiContext>,
    Json(payload): Json<UploadPayload>,
) -> Result<Json<BulkUploadReport>, ApiError> {
    let conn = ctx.open_db()?;
    let mut report = BulkUploadReport::default();

    for item in payload.appointments {
        report.total_processed += 1;

        let date = match parse_listing_date(&item.date) {
            Some(d) => d,
            None => {
                report
                    .errors
                    .push(format!("{}: unparseable date '{}'", item.queue_id, item.date));
                continue;
            }
        };

        let listing = QueueListing {
            queue_id: item.queue_id.clone(),
            place: item.place,
            provider: item.provider,
            phone: item.phone,
            address: item.address,
            locality: item.locality,
            date,
            benefit: item.benefit,
            waiting_people: item.waiting_people,
            average_wait_days: item.average_wait_days,
            latitude: item.latitude,
            longitude: item.longitude,
        };

        match upsert_upcoming(&conn, &listing) {
            Ok(true) => report.new_records += 1,
            Ok(false) => report.updated_records += 1,
            Err(e) => report.errors.push(format!("{}: {e}", item.queue_id)),
        }
    }

    tracing::info!(
        total = report.total_processed,
        new = report.new_records,
        updated = report.updated_records,
        errors = report.errors.len(),
        "Queue upload processed"
    );

    Ok(Json(report))
}

fn parse_listing_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d-%m-%Y"))
        .ok()
}

/// GET /upcoming-appointments
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(filter): Query<UpcomingFilter>,
) -> Result<Json<Vec<UpcomingAppointment>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(list_upcoming(&conn, &filter)?))
}

/// GET /upcoming-appointments/:queue_id
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(queue_id): Path<String>,
) -> Result<Json<UpcomingAppointment>, ApiError> {
    let conn = ctx.open_db()?;
    let record = get_upcoming_by_queue_id(&conn, &queue_id)?
        .ok_or_else(|| ApiError::NotFound(format!("UpcomingAppointment {queue_id} not found")))?;
    Ok(Json(record))
}

/// PUT /upcoming-appointments/:queue_id/deactivate
pub async fn deactivate(
    State(ctx): State<ApiContext>,
    Path(queue_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.open_db()?;
    deactivate_upcoming(&conn, &queue_id)?;
    Ok(Json(json!({
        "status": "success",
        "queue_id": queue_id,
    })))
}

/// DELETE /upcoming-appointments/inactive
pub async fn clear_inactive(
    State(ctx): State<ApiContext>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = ctx.open_db()?;
    let deleted = clear_inactive_upcoming(&conn)?;
    tracing::info!(deleted, "Inactive queue listings removed");
    Ok(Json(json!({ "deleted": deleted })))
}
