use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::{
    repo_types::User,
    services::{require_active, resolve_current_user},
};
use crate::{error::AppError, state::AppState};

/// Resolves the bearer token to an active user.
pub struct ActiveUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for ActiveUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            warn!("missing or malformed Authorization header");
            AppError::Unauthenticated
        })?;

        let user = resolve_current_user(state.users.as_ref(), &state.jwt, token).await?;
        Ok(ActiveUser(require_active(user)?))
    }
}

// Expect "Bearer <token>"; the scheme name is case-insensitive.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
