use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::genres::{CreateGenreRequest, CreatedGenre, GenreList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::genre_service,
    state::AppState,
    validation::ValidatedJson,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_genres).post(create_genre))
}

#[utoipa::path(
    get,
    path = "/genres",
    responses(
        (status = 200, description = "All genres", body = ApiResponse<GenreList>)
    ),
    tag = "Genres"
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<ApiResponse<GenreList>>> {
    let genres = genre_service::list_genres(&state).await?;
    Ok(Json(ApiResponse::success(GenreList { genres })))
}

#[utoipa::path(
    post,
    path = "/genres",
    request_body = CreateGenreRequest,
    responses(
        (status = 201, description = "Genre created", body = ApiResponse<CreatedGenre>),
        (status = 400, description = "Invalid payload or duplicate name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn create_genre(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateGenreRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedGenre>>)> {
    let created = genre_service::create_genre(&state, &user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("Genre berhasil ditambahkan", created)),
    ))
}
