use std::sync::{Arc, LazyLock};

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{error, info};
use uuid::Uuid;

use darkroom_db::{Database, is_constraint_violation};
use darkroom_types::api::{AuthResponse, Claims, LoginRequest, MeResponse, RegisterRequest};
use darkroom_types::models::User;

use crate::error::{ApiError, ApiResult};

pub type AppState = Arc<AppStateInner>;

/// Verified against when a login names no known account, so a miss costs
/// the same Argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("darkroom-no-such-account").ok());

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

/// Run a store call off the async runtime.
pub async fn with_db<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
        .map_err(ApiError::Internal)
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let reg = req.validate()?;

    let user = with_db(&state, move |db| {
        if db.get_user_by_email(&reg.email)?.is_some() {
            return Ok(None);
        }

        let password_hash = hash_password(&reg.password)?;
        match db.create_user(Uuid::new_v4(), &reg.email, &password_hash, &reg.name) {
            Ok(row) => Ok(Some(row.to_user()?)),
            // Lost a race with a concurrent sign-up for the same email.
            Err(e) if is_constraint_violation(&e) => Ok(None),
            Err(e) => Err(e),
        }
    })
    .await?
    .ok_or(ApiError::DuplicateIdentity)?;

    let token = create_token(&state.jwt_secret, state.token_ttl, user.id)?;
    info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".into(),
            token,
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let user = with_db(&state, move |db| {
        let Some(row) = db.get_user_by_email(email.trim())? else {
            spend_dummy_verification(&password);
            return Ok(None);
        };
        if !verify_password(&password, &row.password_hash)? {
            return Ok(None);
        }
        Ok(Some(row.to_user()?))
    })
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    let token = create_token(&state.jwt_secret, state.token_ttl, user.id)?;
    info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: user.into(),
    }))
}

pub async fn me(Extension(user): Extension<User>) -> Json<MeResponse> {
    Json(MeResponse { user: user.into() })
}

/// Argon2id with a random salt, PHC string format.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("corrupt password hash: {}", e))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {}", e)),
    }
}

fn spend_dummy_verification(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

pub fn create_token(secret: &str, ttl: chrono::Duration, user_id: Uuid) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        jti: Uuid::new_v4(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
