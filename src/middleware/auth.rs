use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{config::AppConfig, dto::auth::Claims, error::AppError, models::Role, state::AppState};

/// Identity extracted from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::forbidden("Anda tidak berhak mengakses resource ini"));
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Admin)
}

fn unauthorized(message: &str) -> AppError {
    AppError::Unauthorized(message.to_string())
}

pub fn decode_access_token(config: &AppConfig, token: &str) -> Result<Claims, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.access_token_key.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| unauthorized("Token tidak valid atau kedaluwarsa"))?;
    Ok(decoded.claims)
}

pub fn auth_user_from_header(config: &AppConfig, value: Option<&str>) -> Result<AuthUser, AppError> {
    let auth_str = value.ok_or_else(|| unauthorized("Missing authentication"))?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization scheme"))?;

    let claims = decode_access_token(config, token)?;
    let role = Role::parse(&claims.role).ok_or_else(|| unauthorized("Invalid role in token"))?;

    Ok(AuthUser {
        id: claims.id,
        role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| unauthorized("Invalid Authorization header"))
            })
            .transpose()?;

        auth_user_from_header(&state.config, header_value)
    }
}
