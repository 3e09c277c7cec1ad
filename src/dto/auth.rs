use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{WireNames, validate_not_blank};

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username or email.
    #[validate(custom(function = "validate_not_blank", message = "wajib diisi"))]
    pub username: String,
    #[validate(length(min = 1, message = "wajib diisi"))]
    pub password: String,
}

impl WireNames for LoginRequest {}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// JWT payload. `id` and `role` identify the caller on every request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub id: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}
