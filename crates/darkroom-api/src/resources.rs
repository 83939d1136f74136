//! CRUD handlers shared by every entity kind.
//!
//! Handlers are generic over [`Resource`] and instantiated per route, so the
//! owner scoping, the not-found rule and the response shapes are written
//! once.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use darkroom_db::{ListFilter, OwnedRecord};
use darkroom_types::api::{
    CameraPayload, ChemicalBatchPayload, FilmRollPayload, FilmStockPayload, MessageResponse,
};
use darkroom_types::models::{Camera, ChemicalBatch, FilmRoll, FilmStock, User};
use darkroom_types::validate::ValidationError;

use crate::auth::{AppState, with_db};
use crate::error::{ApiError, ApiResult};

pub trait Resource: OwnedRecord<Fields: Send + 'static> + Serialize + Send + 'static {
    type Payload: DeserializeOwned + Send + 'static;

    /// Used in `"<label> not found"` / `"<label> deleted"`.
    const LABEL: &'static str;

    fn validate(payload: Self::Payload) -> Result<Self::Fields, ValidationError>;
}

impl Resource for Camera {
    type Payload = CameraPayload;
    const LABEL: &'static str = "Camera";

    fn validate(payload: CameraPayload) -> Result<Self::Fields, ValidationError> {
        payload.validate()
    }
}

impl Resource for FilmStock {
    type Payload = FilmStockPayload;
    const LABEL: &'static str = "Film stock";

    fn validate(payload: FilmStockPayload) -> Result<Self::Fields, ValidationError> {
        payload.validate()
    }
}

impl Resource for ChemicalBatch {
    type Payload = ChemicalBatchPayload;
    const LABEL: &'static str = "Chemical batch";

    fn validate(payload: ChemicalBatchPayload) -> Result<Self::Fields, ValidationError> {
        payload.validate()
    }
}

impl Resource for FilmRoll {
    type Payload = FilmRollPayload;
    const LABEL: &'static str = "Film roll";

    fn validate(payload: FilmRollPayload) -> Result<Self::Fields, ValidationError> {
        payload.validate()
    }
}

/// Path ids that are not UUIDs cannot name a record.
pub fn parse_id<R: Resource>(raw: &str) -> ApiResult<Uuid> {
    raw.parse().map_err(|_| ApiError::NotFound(R::LABEL))
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<R>>> {
    let records = with_db(&state, move |db| db.scoped::<R>(user.id).list(&ListFilter::new())).await?;
    Ok(Json(records))
}

pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<R>> {
    let id = parse_id::<R>(&id)?;
    let record = with_db(&state, move |db| db.scoped::<R>(user.id).get(id))
        .await?
        .ok_or(ApiError::NotFound(R::LABEL))?;
    Ok(Json(record))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let fields = R::validate(payload)?;

    let record = with_db(&state, move |db| db.scoped::<R>(user.id).create(&fields)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> ApiResult<Json<R>> {
    let id = parse_id::<R>(&id)?;
    let Json(payload) = payload?;
    let fields = R::validate(payload)?;

    let record = with_db(&state, move |db| db.scoped::<R>(user.id).update(id, &fields))
        .await?
        .ok_or(ApiError::NotFound(R::LABEL))?;
    Ok(Json(record))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id::<R>(&id)?;
    let deleted = with_db(&state, move |db| db.scoped::<R>(user.id).delete(id)).await?;
    if !deleted {
        return Err(ApiError::NotFound(R::LABEL));
    }
    Ok(Json(MessageResponse::new(format!("{} deleted", R::LABEL))))
}
