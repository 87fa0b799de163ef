//! Bearer-token authentication extractors.
//!
//! Session management proper (issuing tokens, refresh, expiry) lives
//! outside this service; here a token is just a row lookup in the `users`
//! table. Handlers pick the extractor matching their needs:
//!
//! * [`AuthUser`] — rejects with 401 when no valid token is presented.
//! * [`OptionalUser`] — anonymous callers pass through as `None` and are
//!   treated as the free tier.
//! * [`AdminUser`] — 401 without a token, 403 for non-admins.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use invest_core::{PlanKey, UserContext};

use crate::db;
use crate::errors::ApiError;
use crate::AppState;

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub plan: PlanKey,
    pub is_admin: bool,
}

impl AuthUser {
    /// The injectable context the core validator expects.
    pub fn context(&self) -> UserContext {
        UserContext {
            id: self.id,
            plan: self.plan,
        }
    }
}

/// Caller that may or may not be signed in.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthUser>);

impl OptionalUser {
    /// Effective plan tier: anonymous callers get the free tier.
    pub fn plan(&self) -> PlanKey {
        self.0.as_ref().map(|u| u.plan).unwrap_or(PlanKey::Free)
    }
}

/// Caller that must be an administrator.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn lookup(state: &AppState, parts: &Parts) -> Result<Option<AuthUser>, ApiError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };
    let Some(row) = db::user_by_token(&state.pool, token).await? else {
        return Ok(None);
    };
    Ok(Some(AuthUser {
        id: row.id,
        plan: row.plan(),
        email: row.email,
        is_admin: row.is_admin,
    }))
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        lookup(state, parts).await?.ok_or(ApiError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(lookup(state, parts).await?))
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
