use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    models::UserProfile,
    validation::{
        WireNames, string_or_number, validate_digits, validate_not_blank, validate_username,
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        custom(function = "validate_username"),
        length(max = 50, message = "maksimal 50 karakter")
    )]
    pub username: String,
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 100, message = "maksimal 100 karakter")
    )]
    pub fullname: String,
    #[validate(length(min = 1, message = "wajib diisi"))]
    pub password: String,
    #[validate(email(message = "harus berupa email yang valid"))]
    pub email: String,
    #[serde(deserialize_with = "string_or_number")]
    #[schema(value_type = String)]
    #[validate(
        custom(function = "validate_digits"),
        length(max = 20, message = "maksimal 20 karakter")
    )]
    pub no_contact: String,
    #[validate(custom(function = "validate_not_blank", message = "wajib diisi"))]
    pub address: String,
    #[serde(default)]
    pub sosmed_url: Vec<String>,
}

impl WireNames for RegisterRequest {}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserData {
    pub user: UserProfile,
}
