use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{BatchStatus, ChemicalType, FilmType, Format, RollStatus};

/// A registered account. The password hash never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub make: String,
    pub name: String,
    pub format: Option<Format>,
    pub notes: Option<String>,
    #[serde(rename = "user")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmStock {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub make: String,
    pub name: String,
    pub iso: Option<u32>,
    pub format: Option<Format>,
    #[serde(rename = "type")]
    pub film_type: Option<FilmType>,
    #[serde(rename = "user")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A mixed batch of developer chemistry. `deleted_at` is the soft-delete
/// marker: a deleted batch drops out of default listings but stays a valid
/// reference target for the rolls developed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalBatch {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub chemical_type: ChemicalType,
    pub status: BatchStatus,
    pub notes: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(rename = "user")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A roll as stored: references are bare ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRoll {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub film_stock: Uuid,
    pub camera: Option<Uuid>,
    pub chemical_batch: Option<Uuid>,
    pub date_loaded: Option<DateTime<Utc>>,
    pub date_finished: Option<DateTime<Utc>>,
    pub frame_count: u32,
    pub status: RollStatus,
    pub notes: Option<String>,
    #[serde(rename = "user")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A roll with its references resolved into full records. A reference whose
/// target has since been hard-deleted resolves to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedFilmRoll {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub film_stock: Option<FilmStock>,
    pub camera: Option<Camera>,
    pub chemical_batch: Option<ChemicalBatch>,
    pub date_loaded: Option<DateTime<Utc>>,
    pub date_finished: Option<DateTime<Utc>>,
    pub frame_count: u32,
    pub status: RollStatus,
    pub notes: Option<String>,
    #[serde(rename = "user")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopulatedFilmRoll {
    pub fn new(
        roll: FilmRoll,
        film_stock: Option<FilmStock>,
        camera: Option<Camera>,
        chemical_batch: Option<ChemicalBatch>,
    ) -> Self {
        Self {
            id: roll.id,
            film_stock,
            camera,
            chemical_batch,
            date_loaded: roll.date_loaded,
            date_finished: roll.date_finished,
            frame_count: roll.frame_count,
            status: roll.status,
            notes: roll.notes,
            owner_id: roll.owner_id,
            created_at: roll.created_at,
            updated_at: roll.updated_at,
        }
    }
}

// -- Validated write fields --
//
// Produced by the payload validators in `api`; these are the only shapes the
// store accepts for create and full-field update.

#[derive(Debug, Clone, PartialEq)]
pub struct CameraFields {
    pub make: String,
    pub name: String,
    pub format: Option<Format>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilmStockFields {
    pub make: String,
    pub name: String,
    pub iso: Option<u32>,
    pub format: Option<Format>,
    pub film_type: Option<FilmType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChemicalBatchFields {
    pub name: String,
    pub description: Option<String>,
    pub chemical_type: ChemicalType,
    pub status: BatchStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilmRollFields {
    pub film_stock: Uuid,
    pub camera: Option<Uuid>,
    pub chemical_batch: Option<Uuid>,
    pub date_loaded: Option<DateTime<Utc>>,
    pub date_finished: Option<DateTime<Utc>>,
    pub frame_count: u32,
    pub status: RollStatus,
    pub notes: Option<String>,
}

/// Default frame count for a roll when the payload leaves it out.
pub const DEFAULT_FRAME_COUNT: u32 = 36;
