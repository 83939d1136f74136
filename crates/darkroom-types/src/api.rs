use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{BatchStatus, ChemicalType, FilmType, Format, RollStatus};
use crate::models::{
    CameraFields, ChemicalBatchFields, DEFAULT_FRAME_COUNT, FilmRollFields, FilmStockFields, User,
};
use crate::validate::{ValidationError, Violations, optional_text};

// -- JWT Claims --

/// Session token payload. `jti` is random per issue so two tokens minted in
/// the same second for the same identity still differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

// -- Auth --

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// A sign-up that passed validation.
#[derive(Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let mut v = Violations::new();

        let email = v.required_text("email", self.email, "Email is required");
        if !email.is_empty() && !email.contains('@') {
            v.push("email", "Email must be a valid address");
        }

        // Passwords are not trimmed.
        let password = self.password.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LEN {
            v.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        let name = v.required_text("name", self.name, "Name is required");

        v.finish(|| Registration {
            email,
            password,
            name,
        })
    }
}

/// Missing and `null` fields read as empty, so every incomplete login falls
/// through to the credentials check.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// The only identity shape that is ever serialized to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

// -- Generic responses --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

// -- Cameras --

#[derive(Debug, Deserialize)]
pub struct CameraPayload {
    pub make: Option<String>,
    pub name: Option<String>,
    pub format: Option<String>,
    pub notes: Option<String>,
}

impl CameraPayload {
    pub fn validate(self) -> Result<CameraFields, ValidationError> {
        let mut v = Violations::new();
        let make = v.required_text("make", self.make, "Camera make is required");
        let name = v.required_text("name", self.name, "Camera name is required");
        let format: Option<Format> = v.optional_enum("format", self.format);
        let notes = optional_text(self.notes);

        v.finish(|| CameraFields {
            make,
            name,
            format,
            notes,
        })
    }
}

// -- Film stocks --

#[derive(Debug, Deserialize)]
pub struct FilmStockPayload {
    pub make: Option<String>,
    pub name: Option<String>,
    pub iso: Option<i64>,
    pub format: Option<String>,
    #[serde(rename = "type")]
    pub film_type: Option<String>,
}

impl FilmStockPayload {
    pub fn validate(self) -> Result<FilmStockFields, ValidationError> {
        let mut v = Violations::new();
        let make = v.required_text("make", self.make, "Film make is required");
        let name = v.required_text("name", self.name, "Film name is required");
        let iso = v.positive("iso", self.iso, "ISO must be positive");
        let format: Option<Format> = v.optional_enum("format", self.format);
        let film_type: Option<FilmType> = v.optional_enum("type", self.film_type);

        v.finish(|| FilmStockFields {
            make,
            name,
            iso,
            format,
            film_type,
        })
    }
}

// -- Chemical batches --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalBatchPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub chemical_type: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl ChemicalBatchPayload {
    pub fn validate(self) -> Result<ChemicalBatchFields, ValidationError> {
        let mut v = Violations::new();
        let name = v.required_text("name", self.name, "Batch name is required");
        let description = optional_text(self.description);
        let chemical_type = v.required_enum(
            "chemicalType",
            self.chemical_type,
            "Chemical type is required",
            ChemicalType::Other,
        );
        let status: BatchStatus = v.optional_enum("status", self.status).unwrap_or_default();
        let notes = optional_text(self.notes);

        v.finish(|| ChemicalBatchFields {
            name,
            description,
            chemical_type,
            status,
            notes,
        })
    }
}

// -- Film rolls --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRollPayload {
    pub film_stock: Option<String>,
    pub camera: Option<String>,
    pub chemical_batch: Option<String>,
    pub date_loaded: Option<String>,
    pub date_finished: Option<String>,
    pub frame_count: Option<i64>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl FilmRollPayload {
    /// Checks shape only. Whether the referenced records exist and belong to
    /// the caller is decided against the store by the handler.
    pub fn validate(self) -> Result<FilmRollFields, ValidationError> {
        let mut v = Violations::new();

        let film_stock = match optional_text(self.film_stock) {
            Some(raw) => parse_reference(&mut v, "filmStock", &raw, "Film stock not found"),
            None => {
                v.push("filmStock", "Film stock is required");
                None
            }
        };
        let camera = optional_text(self.camera)
            .and_then(|raw| parse_reference(&mut v, "camera", &raw, "Camera not found"));
        let chemical_batch = optional_text(self.chemical_batch).and_then(|raw| {
            parse_reference(&mut v, "chemicalBatch", &raw, "Chemical batch not found")
        });

        let date_loaded = v.optional_date("dateLoaded", self.date_loaded);
        let date_finished = v.optional_date("dateFinished", self.date_finished);

        let frame_count = match self.frame_count {
            None => Some(DEFAULT_FRAME_COUNT),
            Some(n) => v.positive("frameCount", Some(n), "Frame count must be at least 1"),
        };
        let status: RollStatus = v.optional_enum("status", self.status).unwrap_or_default();
        let notes = optional_text(self.notes);

        v.finish(|| FilmRollFields {
            film_stock: film_stock.unwrap_or_default(),
            camera,
            chemical_batch,
            date_loaded,
            date_finished,
            frame_count: frame_count.unwrap_or(DEFAULT_FRAME_COUNT),
            status,
            notes,
        })
    }
}

/// An id that cannot be parsed can never name a stored record.
fn parse_reference(v: &mut Violations, field: &'static str, raw: &str, message: &str) -> Option<Uuid> {
    match raw.parse::<Uuid>() {
        Ok(id) => Some(id),
        Err(_) => {
            v.push(field, message);
            None
        }
    }
}
