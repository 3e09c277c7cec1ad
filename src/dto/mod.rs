pub mod auth;
pub mod donations;
pub mod genres;
pub mod reviews;
pub mod users;

use serde::Serialize;
use utoipa::ToSchema;

/// Documentation shape for responses that carry only a message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}
