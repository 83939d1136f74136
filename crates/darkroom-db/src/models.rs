//! Row types that map directly to SQLite rows.
//! Distinct from darkroom-types models where the row carries secrets.

use anyhow::{Context, Result};
use darkroom_types::models::User;

#[cfg_attr(test, derive(Debug))]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: String,
}

impl UserRow {
    /// The public part of the row; the hash stays behind.
    pub fn to_user(&self) -> Result<User> {
        Ok(User {
            id: self
                .id
                .parse()
                .with_context(|| format!("corrupt user id '{}'", self.id))?,
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self
                .created_at
                .parse()
                .with_context(|| format!("corrupt created_at on user '{}'", self.id))?,
        })
    }
}
