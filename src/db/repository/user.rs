use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::User;

use super::{format_timestamp, parse_timestamp};

pub fn insert_user(
    conn: &Connection,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User, DatabaseError> {
    let now = Utc::now().naive_utc();
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        created_at: now,
        updated_at: now,
        last_login: None,
    };

    conn.execute(
        "INSERT INTO users (id, email, first_name, last_name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id.to_string(),
            user.email,
            user.first_name,
            user.last_name,
            format_timestamp(&user.created_at),
            format_timestamp(&user.updated_at),
        ],
    )?;

    Ok(user)
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    query_user(
        conn,
        "SELECT id, email, first_name, last_name, created_at, updated_at, last_login
         FROM users WHERE email = ?1",
        email,
    )
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    query_user(
        conn,
        "SELECT id, email, first_name, last_name, created_at, updated_at, last_login
         FROM users WHERE id = ?1",
        &id.to_string(),
    )
}

/// Record a successful login.
pub fn touch_last_login(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let now = format_timestamp(&Utc::now().naive_utc());
    let rows = conn.execute(
        "UPDATE users SET last_login = ?2, updated_at = ?2 WHERE id = ?1",
        params![id.to_string(), now],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn query_user(conn: &Connection, sql: &str, key: &str) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;

    let result = stmt.query_row(params![key], |row| {
        Ok(UserRow {
            id: row.get::<_, String>(0)?,
            email: row.get::<_, String>(1)?,
            first_name: row.get::<_, String>(2)?,
            last_name: row.get::<_, String>(3)?,
            created_at: row.get::<_, String>(4)?,
            updated_at: row.get::<_, String>(5)?,
            last_login: row.get::<_, Option<String>>(6)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(user_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

struct UserRow {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    created_at: String,
    updated_at: String,
    last_login: Option<String>,
}

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    Ok(User {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
        last_login: row.last_login.as_deref().map(parse_timestamp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn insert_and_fetch_by_email() {
        let conn = open_memory_database().unwrap();
        let user = insert_user(&conn, "anna@example.com", "Anna", "Nowak").unwrap();

        let fetched = get_user_by_email(&conn, "anna@example.com")
            .unwrap()
            .expect("user should exist");
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.first_name, "Anna");
        assert!(fetched.last_login.is_none());
    }

    #[test]
    fn fetch_missing_user_returns_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_user_by_email(&conn, "nobody@example.com")
            .unwrap()
            .is_none());
    }

    #[test]
    fn duplicate_email_rejected() {
        let conn = open_memory_database().unwrap();
        insert_user(&conn, "anna@example.com", "Anna", "Nowak").unwrap();
        assert!(insert_user(&conn, "anna@example.com", "Anna", "Nowak").is_err());
    }

    #[test]
    fn touch_last_login_sets_timestamp() {
        let conn = open_memory_database().unwrap();
        let user = insert_user(&conn, "jan@example.com", "Jan", "Kowalski").unwrap();
        touch_last_login(&conn, &user.id).unwrap();

        let fetched = get_user(&conn, &user.id).unwrap().unwrap();
        assert!(fetched.last_login.is_some());
    }

    #[test]
    fn touch_missing_user_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = touch_last_login(&conn, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
