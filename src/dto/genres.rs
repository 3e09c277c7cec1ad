use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    models::Genre,
    validation::{WireNames, validate_not_blank},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGenreRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 50, message = "maksimal 50 karakter")
    )]
    pub name: String,
}

impl WireNames for CreateGenreRequest {}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGenre {
    pub genre_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}
