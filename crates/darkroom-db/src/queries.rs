use crate::models::UserRow;
use crate::records::timestamp;
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

impl Database {
    // -- Users --

    pub fn create_user(&self, id: Uuid, email: &str, password_hash: &str, name: &str) -> Result<UserRow> {
        let row = UserRow {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            created_at: timestamp(chrono::Utc::now()),
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, password_hash, name, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                (&row.id, &row.email, &row.password_hash, &row.name, &row.created_at),
            )?;
            Ok(())
        })?;

        Ok(row)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: Uuid) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", &id.to_string()))
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, email, password_hash, name, created_at FROM users WHERE {column} = ?1"
    ))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password_hash: row.get(2)?,
                name: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}
