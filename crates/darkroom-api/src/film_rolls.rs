//! Roll handlers. Every roll leaving the API has its references populated.

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use darkroom_db::ListFilter;
use darkroom_types::api::FilmRollPayload;
use darkroom_types::enums::RollStatus;
use darkroom_types::models::{FilmRoll, PopulatedFilmRoll, User};
use darkroom_types::validate::{ValidationError, Violations};

use crate::auth::{AppState, with_db};
use crate::error::{ApiError, ApiResult};
use crate::resources::parse_id;

const LABEL: &str = "Film roll";

#[derive(Debug, Deserialize)]
pub struct RollQuery {
    pub status: Option<String>,
}

/// Outcome of a write that needs the store to judge the payload.
enum Write {
    Done(PopulatedFilmRoll),
    Invalid(ValidationError),
    Missing,
}

impl Write {
    fn into_result(self) -> ApiResult<PopulatedFilmRoll> {
        match self {
            Write::Done(roll) => Ok(roll),
            Write::Invalid(err) => Err(err.into()),
            Write::Missing => Err(ApiError::NotFound(LABEL)),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    query: Result<Query<RollQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PopulatedFilmRoll>>> {
    let Query(query) = query?;

    let mut v = Violations::new();
    let status: Option<RollStatus> = v.optional_enum("status", query.status);
    v.finish(|| ())?;

    let mut filter = ListFilter::new();
    if let Some(status) = status {
        filter = filter.eq("status", status.as_str().to_string());
    }

    let rolls = with_db(&state, move |db| {
        let rolls = db.scoped::<FilmRoll>(user.id).list(&filter)?;
        db.populate_rolls(user.id, rolls)
    })
    .await?;
    Ok(Json(rolls))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<PopulatedFilmRoll>> {
    let id = parse_id::<FilmRoll>(&id)?;

    let roll = with_db(&state, move |db| {
        db.scoped::<FilmRoll>(user.id)
            .get(id)?
            .map(|roll| db.populate_roll(user.id, roll))
            .transpose()
    })
    .await?
    .ok_or(ApiError::NotFound(LABEL))?;
    Ok(Json(roll))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<FilmRollPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let fields = payload.validate()?;

    let outcome = with_db(&state, move |db| {
        if let Some(err) = db.check_roll_references(user.id, &fields)? {
            return Ok(Write::Invalid(err));
        }
        let roll = db.scoped::<FilmRoll>(user.id).create(&fields)?;
        Ok(Write::Done(db.populate_roll(user.id, roll)?))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(outcome.into_result()?)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    payload: Result<Json<FilmRollPayload>, JsonRejection>,
) -> ApiResult<Json<PopulatedFilmRoll>> {
    let id = parse_id::<FilmRoll>(&id)?;
    let Json(payload) = payload?;
    let fields = payload.validate()?;

    let outcome = with_db(&state, move |db| {
        let rolls = db.scoped::<FilmRoll>(user.id);
        if rolls.get(id)?.is_none() {
            return Ok(Write::Missing);
        }
        if let Some(err) = db.check_roll_references(user.id, &fields)? {
            return Ok(Write::Invalid(err));
        }
        match rolls.update(id, &fields)? {
            Some(roll) => Ok(Write::Done(db.populate_roll(user.id, roll)?)),
            None => Ok(Write::Missing),
        }
    })
    .await?;

    Ok(Json(outcome.into_result()?))
}
