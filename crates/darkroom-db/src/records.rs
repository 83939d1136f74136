//! [`OwnedRecord`] bindings for the four entity kinds.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef};
use uuid::Uuid;

use darkroom_types::models::{
    Camera, CameraFields, ChemicalBatch, ChemicalBatchFields, FilmRoll, FilmRollFields, FilmStock,
    FilmStockFields,
};

use crate::repo::{DeleteMode, OwnedRecord, SoftDelete};

/// Stored timestamp form: RFC 3339, UTC, fixed microsecond precision, so
/// text order equals time order.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Text column decoded through `FromStr` (ids, timestamps, enumerations).
struct Parsed<T>(T);

impl<T> FromSql for Parsed<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map(Parsed)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

fn parsed<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(row.get::<_, Parsed<T>>(column)?.0)
}

fn parsed_opt<T>(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(row.get::<_, Option<Parsed<T>>>(column)?.map(|p| p.0))
}

fn text(value: impl ToString) -> Value {
    Value::Text(value.to_string())
}

fn text_opt(value: Option<impl ToString>) -> Value {
    value.map(text).unwrap_or(Value::Null)
}

impl OwnedRecord for Camera {
    type Fields = CameraFields;

    const TABLE: &'static str = "cameras";
    const COLUMNS: &'static [&'static str] = &["make", "name", "format", "notes"];
    const ORDER_BY: &'static str = "make ASC, name ASC, rowid ASC";

    fn id(&self) -> Uuid {
        self.id
    }

    fn bind(f: &CameraFields) -> Vec<Value> {
        vec![text(&f.make), text(&f.name), text_opt(f.format), text_opt(f.notes.as_ref())]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Camera {
            id: parsed(row, "id")?,
            make: row.get("make")?,
            name: row.get("name")?,
            format: parsed_opt(row, "format")?,
            notes: row.get("notes")?,
            owner_id: parsed(row, "user_id")?,
            created_at: parsed(row, "created_at")?,
            updated_at: parsed(row, "updated_at")?,
        })
    }
}

impl OwnedRecord for FilmStock {
    type Fields = FilmStockFields;

    const TABLE: &'static str = "film_stocks";
    const COLUMNS: &'static [&'static str] = &["make", "name", "iso", "format", "film_type"];
    const ORDER_BY: &'static str = "make ASC, name ASC, rowid ASC";

    fn id(&self) -> Uuid {
        self.id
    }

    fn bind(f: &FilmStockFields) -> Vec<Value> {
        vec![
            text(&f.make),
            text(&f.name),
            f.iso.map(Value::from).unwrap_or(Value::Null),
            text_opt(f.format),
            text_opt(f.film_type),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(FilmStock {
            id: parsed(row, "id")?,
            make: row.get("make")?,
            name: row.get("name")?,
            iso: row.get("iso")?,
            format: parsed_opt(row, "format")?,
            film_type: parsed_opt(row, "film_type")?,
            owner_id: parsed(row, "user_id")?,
            created_at: parsed(row, "created_at")?,
            updated_at: parsed(row, "updated_at")?,
        })
    }
}

impl OwnedRecord for ChemicalBatch {
    type Fields = ChemicalBatchFields;

    const TABLE: &'static str = "chemical_batches";
    const COLUMNS: &'static [&'static str] =
        &["name", "description", "chemical_type", "status", "notes"];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";
    const DELETE: DeleteMode = DeleteMode::Soft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn bind(f: &ChemicalBatchFields) -> Vec<Value> {
        vec![
            text(&f.name),
            text_opt(f.description.as_ref()),
            text(f.chemical_type),
            text(f.status),
            text_opt(f.notes.as_ref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ChemicalBatch {
            id: parsed(row, "id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            chemical_type: parsed(row, "chemical_type")?,
            status: parsed(row, "status")?,
            notes: row.get("notes")?,
            deleted_at: parsed_opt(row, "deleted_at")?,
            owner_id: parsed(row, "user_id")?,
            created_at: parsed(row, "created_at")?,
            updated_at: parsed(row, "updated_at")?,
        })
    }
}

impl SoftDelete for ChemicalBatch {}

impl OwnedRecord for FilmRoll {
    type Fields = FilmRollFields;

    const TABLE: &'static str = "film_rolls";
    const COLUMNS: &'static [&'static str] = &[
        "film_stock_id",
        "camera_id",
        "chemical_batch_id",
        "date_loaded",
        "date_finished",
        "frame_count",
        "status",
        "notes",
    ];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    fn id(&self) -> Uuid {
        self.id
    }

    fn bind(f: &FilmRollFields) -> Vec<Value> {
        vec![
            text(f.film_stock),
            text_opt(f.camera),
            text_opt(f.chemical_batch),
            text_opt(f.date_loaded.map(timestamp)),
            text_opt(f.date_finished.map(timestamp)),
            Value::from(f.frame_count),
            text(f.status),
            text_opt(f.notes.as_ref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(FilmRoll {
            id: parsed(row, "id")?,
            film_stock: parsed(row, "film_stock_id")?,
            camera: parsed_opt(row, "camera_id")?,
            chemical_batch: parsed_opt(row, "chemical_batch_id")?,
            date_loaded: parsed_opt(row, "date_loaded")?,
            date_finished: parsed_opt(row, "date_finished")?,
            frame_count: row.get("frame_count")?,
            status: parsed(row, "status")?,
            notes: row.get("notes")?,
            owner_id: parsed(row, "user_id")?,
            created_at: parsed(row, "created_at")?,
            updated_at: parsed(row, "updated_at")?,
        })
    }
}
