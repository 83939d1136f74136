use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::info;

use darkroom_db::ListFilter;
use darkroom_types::models::{ChemicalBatch, PopulatedFilmRoll, User};

use crate::auth::{AppState, with_db};
use crate::error::{ApiError, ApiResult};
use crate::resources::{self, parse_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchQuery {
    /// Only the literal `true` turns this on.
    pub include_deleted: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    query: Result<Query<BatchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ChemicalBatch>>> {
    let Query(query) = query?;
    let filter = ListFilter::new().include_deleted(query.include_deleted.as_deref() == Some("true"));

    let batches =
        with_db(&state, move |db| db.scoped::<ChemicalBatch>(user.id).list(&filter)).await?;
    Ok(Json(batches))
}

/// Soft delete. Only an active batch can be deleted.
pub async fn delete(
    state: State<AppState>,
    user: Extension<User>,
    id: Path<String>,
) -> ApiResult<Json<darkroom_types::api::MessageResponse>> {
    let (user_id, batch_id) = (user.id, id.0.clone());
    let response = resources::delete::<ChemicalBatch>(state, user, id).await?;
    info!(%user_id, %batch_id, "chemical batch soft-deleted");
    Ok(response)
}

/// Only a soft-deleted batch can be restored.
pub async fn restore(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChemicalBatch>> {
    let id = id
        .parse()
        .map_err(|_| ApiError::NotFound("Deleted chemical batch"))?;

    let batch = with_db(&state, move |db| db.scoped::<ChemicalBatch>(user.id).restore(id))
        .await?
        .ok_or(ApiError::NotFound("Deleted chemical batch"))?;

    info!(user_id = %user.id, batch_id = %batch.id, "chemical batch restored");
    Ok(Json(batch))
}

/// Rolls developed in this batch, oldest first. Works for deleted batches.
pub async fn rolls(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PopulatedFilmRoll>>> {
    let id = parse_id::<ChemicalBatch>(&id)?;
    let rolls = with_db(&state, move |db| db.rolls_for_batch(user.id, id))
        .await?
        .ok_or(ApiError::NotFound("Chemical batch"))?;
    Ok(Json(rolls))
}
