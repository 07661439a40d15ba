use chrono::{Duration, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;

use super::{format_timestamp, parse_timestamp};

/// Bearer tokens live for 30 minutes, matching the login contract.
pub const TOKEN_TTL_MINUTES: i64 = 30;

/// Store a hashed bearer token for a user.
pub fn insert_token(
    conn: &Connection,
    token_hash: &str,
    user_id: &Uuid,
) -> Result<(), DatabaseError> {
    let expires_at = Utc::now().naive_utc() + Duration::minutes(TOKEN_TTL_MINUTES);
    conn.execute(
        "INSERT INTO auth_tokens (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token_hash, user_id.to_string(), format_timestamp(&expires_at)],
    )?;
    Ok(())
}

/// Resolve a token hash to a user id, if the token exists and is unexpired.
pub fn lookup_token(conn: &Connection, token_hash: &str) -> Result<Option<Uuid>, DatabaseError> {
    let result = conn.query_row(
        "SELECT user_id, expires_at FROM auth_tokens WHERE token_hash = ?1",
        params![token_hash],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        },
    );

    let (user_id, expires_at) = match result {
        Ok(pair) => pair,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if parse_timestamp(&expires_at) < Utc::now().naive_utc() {
        return Ok(None);
    }

    let user_id = Uuid::parse_str(&user_id)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
    Ok(Some(user_id))
}

/// Drop expired tokens. Called opportunistically on login.
pub fn purge_expired_tokens(conn: &Connection) -> Result<usize, DatabaseError> {
    let now = format_timestamp(&Utc::now().naive_utc());
    let deleted = conn.execute(
        "DELETE FROM auth_tokens WHERE expires_at < ?1",
        params![now],
    )?;
    Ok(deleted)
}
