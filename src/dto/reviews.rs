use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    models::{Comment, Review},
    validation::{WireNames, camel_case, validate_not_blank, validate_publish_year},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub title: String,
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub author: String,
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 255, message = "maksimal 255 karakter")
    )]
    pub publisher: String,
    #[serde(alias = "publish_year")]
    #[validate(custom(function = "validate_publish_year"))]
    pub publish_year: i32,
    #[validate(custom(function = "validate_not_blank", message = "wajib diisi"))]
    pub synopsis: String,
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 50, message = "maksimal 50 karakter")
    )]
    pub genre: String,
    #[validate(range(min = 1, max = 5, message = "harus berada di antara 1 dan 5"))]
    pub rating: i32,
}

impl WireNames for ReviewRequest {
    fn wire_name(field: &str) -> String {
        camel_case(field)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReview {
    pub review_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub reviews: Vec<Review>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewData {
    pub review: Review,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikesData {
    pub likes: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 2000, message = "maksimal 2000 karakter")
    )]
    pub text: String,
}

impl WireNames for CommentRequest {}

/// Comment edit addressed by body instead of path.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdateRequest {
    #[validate(custom(function = "validate_not_blank", message = "wajib diisi"))]
    pub comment_id: String,
    #[validate(
        custom(function = "validate_not_blank", message = "wajib diisi"),
        length(max = 2000, message = "maksimal 2000 karakter")
    )]
    pub text: String,
}

impl WireNames for CommentUpdateRequest {
    fn wire_name(field: &str) -> String {
        camel_case(field)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentTarget {
    #[validate(custom(function = "validate_not_blank", message = "wajib diisi"))]
    pub comment_id: String,
}

impl WireNames for CommentTarget {
    fn wire_name(field: &str) -> String {
        camel_case(field)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedComment {
    pub comment_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentList {
    pub comments: Vec<Comment>,
}
