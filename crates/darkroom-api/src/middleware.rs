use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use darkroom_types::api::Claims;

use crate::auth::{AppState, with_db};
use crate::error::ApiError;

/// Signature and expiry check only; says nothing about whether the
/// identity still exists.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Extract and validate the bearer token, then load the identity it was
/// issued for. The resolved [`darkroom_types::models::User`] is placed in
/// request extensions for handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated("Authentication required"))?;

    let claims = verify_token(&state.jwt_secret, token).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::Unauthenticated("Invalid or expired token")
    })?;

    let user_id = claims.sub;
    let user = with_db(&state, move |db| {
        db.get_user_by_id(user_id)?.map(|row| row.to_user()).transpose()
    })
    .await?
    .ok_or_else(|| {
        debug!(%user_id, "Token for unknown identity");
        ApiError::Unauthenticated("Invalid or expired token")
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
