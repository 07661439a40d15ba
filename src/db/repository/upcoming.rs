use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, ToSql};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{UpcomingAppointment, UpcomingFilter};

use super::{format_timestamp, parse_timestamp};

/// One queue listing as delivered by the upstream sync job.
#[derive(Debug, Clone)]
pub struct QueueListing {
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
}

/// Insert a listing or update the existing row with the same queue_id.
/// Returns `true` if a new row was created.
pub fn upsert_upcoming(conn: &Connection, listing: &QueueListing) -> Result<bool, DatabaseError> {
    let now = format_timestamp(&Utc::now().naive_utc());

    let updated = conn.execute(
        "UPDATE upcoming_appointments SET place = ?2, provider = ?3, phone = ?4, address = ?5,
         locality = ?6, date = ?7, benefit = ?8, waiting_people = ?9, average_wait_days = ?10,
         latitude = ?11, longitude = ?12, is_active = 1, updated_at = ?13
         WHERE queue_id = ?1",
        params![
            listing.queue_id,
            listing.place,
            listing.provider,
            listing.phone,
            listing.address,
            listing.locality,
            listing.date.to_string(),
            listing.benefit,
            listing.waiting_people,
            listing.average_wait_days,
            listing.latitude,
            listing.longitude,
            now,
        ],
    )?;

    if updated > 0 {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO upcoming_appointments
         (id, queue_id, place, provider, phone, address, locality, date, benefit,
          waiting_people, average_wait_days, latitude, longitude, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 1, ?14, ?14)",
        params![
            Uuid::new_v4().to_string(),
            listing.queue_id,
            listing.place,
            listing.provider,
            listing.phone,
            listing.address,
            listing.locality,
            listing.date.to_string(),
            listing.benefit,
            listing.waiting_people,
            listing.average_wait_days,
            listing.latitude,
            listing.longitude,
            now,
        ],
    )?;

    Ok(true)
}

/// List upcoming appointments, soonest first, ties broken by shorter wait.
pub fn list_upcoming(
    conn: &Connection,
    filter: &UpcomingFilter,
) -> Result<Vec<UpcomingAppointment>, DatabaseError> {
    let mut sql = String::from(
        "SELECT id, queue_id, place, provider, phone, address, locality, date, benefit,
         waiting_people, average_wait_days, latitude, longitude, is_active, created_at, updated_at
         FROM upcoming_appointments WHERE 1=1",
    );
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if filter.active_only.unwrap_or(true) {
        sql.push_str(" AND is_active = 1");
    }
    if let Some(locality) = &filter.locality {
        sql.push_str(&format!(" AND locality LIKE ?{}", args.len() + 1));
        args.push(Box::new(format!("%{locality}%")));
    }
    if let Some(benefit) = &filter.benefit {
        sql.push_str(&format!(" AND benefit LIKE ?{}", args.len() + 1));
        args.push(Box::new(format!("%{benefit}%")));
    }
    if let Some(max_wait) = filter.max_wait_days {
        sql.push_str(&format!(" AND average_wait_days <= ?{}", args.len() + 1));
        args.push(Box::new(max_wait));
    }

    sql.push_str(" ORDER BY date ASC, average_wait_days ASC");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn ToSql> = args.iter().map(|a| a.as_ref()).collect();
    let rows = stmt.query_map(params.as_slice(), map_upcoming_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(upcoming_from_row(row?)?);
    }
    Ok(records)
}

/// Fetch a single listing by its upstream queue id.
pub fn get_upcoming_by_queue_id(
    conn: &Connection,
    queue_id: &str,
) -> Result<Option<UpcomingAppointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, queue_id, place, provider, phone, address, locality, date, benefit,
         waiting_people, average_wait_days, latitude, longitude, is_active, created_at, updated_at
         FROM upcoming_appointments WHERE queue_id = ?1",
    )?;

    let result = stmt.query_row(params![queue_id], map_upcoming_row);

    match result {
        Ok(row) => Ok(Some(upcoming_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Mark a listing inactive. Errors if the queue id is unknown.
pub fn deactivate_upcoming(conn: &Connection, queue_id: &str) -> Result<(), DatabaseError> {
    let now = format_timestamp(&Utc::now().naive_utc());
    let rows = conn.execute(
        "UPDATE upcoming_appointments SET is_active = 0, updated_at = ?2 WHERE queue_id = ?1",
        params![queue_id, now],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "UpcomingAppointment".into(),
            id: queue_id.to_string(),
        });
    }
    Ok(())
}

/// Delete every inactive listing. Returns the number of rows removed.
pub fn clear_inactive_upcoming(conn: &Connection) -> Result<usize, DatabaseError> {
    let deleted = conn.execute("DELETE FROM upcoming_appointments WHERE is_active = 0", [])?;
    Ok(deleted)
}

type UpcomingRowTuple = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    String,
    String,
    i64,
    i64,
    Option<f64>,
    Option<f64>,
    i64,
    String,
    String,
);

fn map_upcoming_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UpcomingRowTuple> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
        row.get(12)?,
        row.get(13)?,
        row.get(14)?,
        row.get(15)?,
    ))
}

fn upcoming_from_row(row: UpcomingRowTuple) -> Result<UpcomingAppointment, DatabaseError> {
    let (
        id,
        queue_id,
        place,
        provider,
        phone,
        address,
        locality,
        date,
        benefit,
        waiting_people,
        average_wait_days,
        latitude,
        longitude,
        is_active,
        created_at,
        updated_at,
    ) = row;

    Ok(UpcomingAppointment {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        queue_id,
        place,
        provider,
        phone,
        address,
        locality,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap_or_default(),
        benefit,
        waiting_people,
        average_wait_days,
        latitude,
        longitude,
        is_active: is_active != 0,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn listing(queue_id: &str, locality: &str, wait_days: i64) -> QueueListing {
        QueueListing {
            queue_id: queue_id.into(),
            place: "Cardiology Ward".into(),
            provider: "City Hospital".into(),
            phone: Some("+48 22 123 45 67".into()),
            address: "Marszalkowska 1".into(),
            locality: locality.into(),
            date: NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(),
            benefit: "cardiology consultation".into(),
            waiting_people: 12,
            average_wait_days: wait_days,
            latitude: Some(52.23),
            longitude: Some(21.01),
        }
    }

    #[test]
    fn upsert_inserts_then_updates() {
        let conn = open_memory_database().unwrap();

        assert!(upsert_upcoming(&conn, &listing("q-1", "Warszawa", 30)).unwrap());
        assert!(!upsert_upcoming(&conn, &listing("q-1", "Warszawa", 25)).unwrap());

        let fetched = get_upcoming_by_queue_id(&conn, "q-1").unwrap().unwrap();
        assert_eq!(fetched.average_wait_days, 25);
    }

    #[test]
    fn upsert_reactivates_inactive_row() {
        let conn = open_memory_database().unwrap();
        upsert_upcoming(&conn, &listing("q-1", "Warszawa", 30)).unwrap();
        deactivate_upcoming(&conn, "q-1").unwrap();

        upsert_upcoming(&conn, &listing("q-1", "Warszawa", 30)).unwrap();
        let fetched = get_upcoming_by_queue_id(&conn, "q-1").unwrap().unwrap();
        assert!(fetched.is_active);
    }

    #[test]
    fn list_filters_by_locality_substring() {
        let conn = open_memory_database().unwrap();
        upsert_upcoming(&conn, &listing("q-1", "Warszawa", 30)).unwrap();
        upsert_upcoming(&conn, &listing("q-2", "Krakow", 10)).unwrap();

        let filter = UpcomingFilter {
            locality: Some("arsz".into()),
            ..Default::default()
        };
        let results = list_upcoming(&conn, &filter).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].queue_id, "q-1");
    }

    #[test]
    fn list_filters_by_max_wait() {
        let conn = open_memory_database().unwrap();
        upsert_upcoming(&conn, &listing("q-1", "Warszawa", 30)).unwrap();
        upsert_upcoming(&conn, &listing("q-2", "Warszawa", 10)).unwrap();

        let filter = UpcomingFilter {
            max_wait_days: Some(15),
            ..Default::default()
        };
        let results = list_upcoming(&conn, &filter).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].queue_id, "q-2");
    }

    #[test]
    fn list_excludes_inactive_by_default() {
        let conn = open_memory_database().unwrap();
        upsert_upcoming(&conn, &listing("q-1", "Warszawa", 30)).unwrap();
        upsert_upcoming(&conn, &listing("q-2", "Warszawa", 10)).unwrap();
        deactivate_upcoming(&conn, "q-1").unwrap();

        let results = list_upcoming(&conn, &UpcomingFilter::default()).unwrap();
        assert_eq!(results.len(), 1);

        let all = list_upcoming(
            &conn,
            &UpcomingFilter {
                active_only: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn list_orders_by_date_then_wait() {
        let conn = open_memory_database().unwrap();
        let mut early = listing("q-1", "Warszawa", 30);
        early.date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let mut late_short = listing("q-2", "Warszawa", 5);
        late_short.date = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
        let mut late_long = listing("q-3", "Warszawa", 50);
        late_long.date = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();

        upsert_upcoming(&conn, &late_long).unwrap();
        upsert_upcoming(&conn, &early).unwrap();
        upsert_upcoming(&conn, &late_short).unwrap();

        let results = list_upcoming(&conn, &UpcomingFilter::default()).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.queue_id.as_str()).collect();
        assert_eq!(ids, vec!["q-1", "q-2", "q-3"]);
    }

    #[test]
    fn deactivate_unknown_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = deactivate_upcoming(&conn, "missing").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn clear_inactive_removes_only_inactive() {
        let conn = open_memory_database().unwrap();
        upsert_upcoming(&conn, &listing("q-1", "Warszawa", 30)).unwrap();
        upsert_upcoming(&conn, &listing("q-2", "Warszawa", 10)).unwrap();
        deactivate_upcoming(&conn, "q-1").unwrap();

        assert_eq!(clear_inactive_upcoming(&conn).unwrap(), 1);
        assert!(get_upcoming_by_queue_id(&conn, "q-1").unwrap().is_none());
        assert!(get_upcoming_by_queue_id(&conn, "q-2").unwrap().is_some());
    }
}
