//! Generic ownership-scoped repository.
//!
//! Every entity kind implements [`OwnedRecord`]; [`Scoped`] then provides
//! list/get/create/update/delete for it with the owner predicate baked into
//! every statement. There is no way to reach a record through this module
//! without naming its owner.

use std::collections::HashMap;
use std::marker::PhantomData;

use anyhow::{Result, anyhow};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, Row, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use crate::Database;
use crate::records::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Row is removed.
    Hard,
    /// `deleted_at` is stamped; the row stays readable by id.
    Soft,
}

pub trait OwnedRecord: Sized {
    /// Validated write payload for create and full-field update.
    type Fields;

    const TABLE: &'static str;
    /// Writable columns, in the order [`bind`](Self::bind) yields values.
    const COLUMNS: &'static [&'static str];
    /// Default listing order. Must end in a unique key for determinism.
    const ORDER_BY: &'static str;
    const DELETE: DeleteMode = DeleteMode::Hard;

    fn id(&self) -> Uuid;
    fn bind(fields: &Self::Fields) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Records whose delete is reversible.
pub trait SoftDelete: OwnedRecord {}

/// Filters for [`Scoped::list`].
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    include_deleted: bool,
    equals: Vec<(&'static str, Value)>,
    order_by: Option<&'static str>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also return soft-deleted records. No effect on hard-delete kinds.
    pub fn include_deleted(mut self, include: bool) -> Self {
        self.include_deleted = include;
        self
    }

    /// Require `column = value`. `column` must be a trusted identifier.
    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.equals.push((column, value.into()));
        self
    }

    pub fn order_by(mut self, order: &'static str) -> Self {
        self.order_by = Some(order);
        self
    }
}

/// A repository view of one entity kind, restricted to one owner.
pub struct Scoped<'a, R> {
    db: &'a Database,
    owner: String,
    _record: PhantomData<fn() -> R>,
}

impl Database {
    pub fn scoped<R: OwnedRecord>(&self, owner: Uuid) -> Scoped<'_, R> {
        Scoped {
            db: self,
            owner: owner.to_string(),
            _record: PhantomData,
        }
    }
}

impl<R: OwnedRecord> Scoped<'_, R> {
    /// The predicate that picks out records update/delete may target.
    fn active_clause() -> &'static str {
        match R::DELETE {
            DeleteMode::Hard => "",
            DeleteMode::Soft => " AND deleted_at IS NULL",
        }
    }

    pub fn list(&self, filter: &ListFilter) -> Result<Vec<R>> {
        let mut sql = format!("SELECT * FROM {} WHERE user_id = ?1", R::TABLE);
        if !filter.include_deleted {
            sql.push_str(Self::active_clause());
        }

        let mut params: Vec<Value> = vec![Value::Text(self.owner.clone())];
        for (column, value) in &filter.equals {
            params.push(value.clone());
            sql.push_str(&format!(" AND {column} = ?{}", params.len()));
        }
        sql.push_str(&format!(" ORDER BY {}", filter.order_by.unwrap_or(R::ORDER_BY)));

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(params), R::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Fetch by id in any lifecycle state. `None` when the record does not
    /// exist or belongs to someone else; callers cannot tell which.
    pub fn get(&self, id: Uuid) -> Result<Option<R>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1 AND user_id = ?2", R::TABLE);
        self.db.with_conn(|conn| {
            let row = conn
                .query_row(&sql, (id.to_string(), &self.owner), R::from_row)
                .optional()?;
            Ok(row)
        })
    }

    /// Batch-fetch by id. Missing or foreign ids are simply absent from the map.
    pub fn get_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, R>> {
        let mut unique: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        unique.sort();
        unique.dedup();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: Vec<String> = (2..unique.len() + 2).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "SELECT * FROM {} WHERE user_id = ?1 AND id IN ({})",
            R::TABLE,
            placeholders.join(", ")
        );

        let params = std::iter::once(self.owner.clone()).chain(unique);
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(params), R::from_row)?
                .map(|r| r.map(|rec| (rec.id(), rec)))
                .collect::<std::result::Result<HashMap<_, _>, _>>()?;
            Ok(rows)
        })
    }

    pub fn create(&self, fields: &R::Fields) -> Result<R> {
        let id = Uuid::new_v4();
        let now = timestamp(chrono::Utc::now());

        let columns = ["id", "user_id", "created_at", "updated_at"]
            .iter()
            .chain(R::COLUMNS)
            .copied()
            .collect::<Vec<_>>();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            R::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut params = vec![
            Value::Text(id.to_string()),
            Value::Text(self.owner.clone()),
            Value::Text(now.clone()),
            Value::Text(now),
        ];
        params.extend(R::bind(fields));

        self.db.with_conn(|conn| {
            conn.execute(&sql, params_from_iter(params))?;
            Ok(())
        })?;
        debug!(table = R::TABLE, %id, owner = %self.owner, "record created");

        self.get(id)?
            .ok_or_else(|| anyhow!("{} row {} vanished after insert", R::TABLE, id))
    }

    /// Full-field update of an active record. `None` when there is no such
    /// record for this owner (or it is soft-deleted).
    pub fn update(&self, id: Uuid, fields: &R::Fields) -> Result<Option<R>> {
        let values = R::bind(fields);
        let mut assignments: Vec<String> = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ?{}", i + 1))
            .collect();

        let mut params = values;
        params.push(Value::Text(timestamp(chrono::Utc::now())));
        assignments.push(format!("updated_at = ?{}", params.len()));
        params.push(Value::Text(id.to_string()));
        let id_idx = params.len();
        params.push(Value::Text(self.owner.clone()));
        let owner_idx = params.len();

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{} AND user_id = ?{}{}",
            R::TABLE,
            assignments.join(", "),
            id_idx,
            owner_idx,
            Self::active_clause()
        );

        let changed = self
            .db
            .with_conn(|conn| Ok(conn.execute(&sql, params_from_iter(params))?))?;
        if changed == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    /// Hard kinds are removed; soft kinds get `deleted_at` stamped, and only
    /// if they are currently active. Returns whether anything matched.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let changed = match R::DELETE {
            DeleteMode::Hard => {
                let sql = format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", R::TABLE);
                self.db
                    .with_conn(|conn| Ok(conn.execute(&sql, (id.to_string(), &self.owner))?))?
            }
            DeleteMode::Soft => {
                let sql = format!(
                    "UPDATE {} SET deleted_at = ?1, updated_at = ?1
                     WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NULL",
                    R::TABLE
                );
                let now = timestamp(chrono::Utc::now());
                self.db.with_conn(|conn| {
                    Ok(conn.execute(&sql, (now, id.to_string(), &self.owner))?)
                })?
            }
        };
        Ok(changed > 0)
    }
}

impl<R: SoftDelete> Scoped<'_, R> {
    /// Clear `deleted_at` on a soft-deleted record. `None` unless the record
    /// exists for this owner and is currently deleted.
    pub fn restore(&self, id: Uuid) -> Result<Option<R>> {
        let sql = format!(
            "UPDATE {} SET deleted_at = NULL, updated_at = ?1
             WHERE id = ?2 AND user_id = ?3 AND deleted_at IS NOT NULL",
            R::TABLE
        );
        let now = timestamp(chrono::Utc::now());
        let changed = self
            .db
            .with_conn(|conn| Ok(conn.execute(&sql, (now, id.to_string(), &self.owner))?))?;
        if changed == 0 {
            return Ok(None);
        }
        self.get(id)
    }
}
