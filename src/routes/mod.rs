use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{response::ApiResponse, state::AppState, storage::UPLOAD_URL_PREFIX};

pub mod auth;
pub mod comments;
pub mod doc;
pub mod donations;
pub mod genres;
pub mod health;
pub mod multipart;
pub mod reviews;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/authentications", auth::router())
        .nest("/genres", genres::router())
        .nest("/donations", donations::router())
        .nest("/requests", donations::requests_router())
        .nest("/review", reviews::router().merge(comments::router()))
}

/// Full application without the outer tracing and limit layers.
pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    let body_limit = state.config.max_image_bytes + 64 * 1024;

    Router::new()
        .route("/health", get(health::health_check))
        .merge(create_api_router())
        .nest_service(UPLOAD_URL_PREFIX, uploads)
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<()>>) {
    let body = ApiResponse::fail(format!("Resource {} tidak ditemukan", uri.path()));
    (StatusCode::NOT_FOUND, Json(body))
}
