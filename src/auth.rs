use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::{User, UserRole},
    repository::RepositoryState,
};

/// Claims
///
/// Payload of a Supabase-issued access token. Only the subject and the
/// timestamps matter here; the role is always read from `profiles`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's UUID, primary key of `profiles`.
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of a request: who is calling and with which role.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    fn from_profile(user: User) -> Result<Self, StatusCode> {
        match user.role.parse::<UserRole>() {
            Ok(role) => Ok(AuthUser { id: user.id, role }),
            Err(unknown) => {
                tracing::warn!(user_id = %user.id, role = %unknown.0, "profile has unrecognised role");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Resolution order:
/// 1. An identity already placed in the request extensions by the access guard.
/// 2. In `Env::Local`, an `x-user-id` header naming an existing profile.
/// 3. A `Bearer` JWT, verified against the Supabase secret, followed by a
///    profile lookup for the current role.
///
/// Rejection: `401 Unauthorized` on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // Local development bypass, never honoured in production.
        if config.env == Env::Local {
            let bypass_id = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|id_str| Uuid::parse_str(id_str).ok());
            if let Some(user_id) = bypass_id {
                if let Some(user) = repo.get_user(user_id).await {
                    return AuthUser::from_profile(user);
                }
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;
        // Supabase sets `aud: authenticated`; signature and expiry are what we rely on.
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
                other => tracing::debug!("rejected token: {:?}", other),
            }
            StatusCode::UNAUTHORIZED
        })?;

        // A valid token for a deleted profile is still rejected.
        let user = repo
            .get_user(token_data.claims.sub)
            .await
            .ok_or(StatusCode::UNAUTHORIZED)?;

        AuthUser::from_profile(user)
    }
}
