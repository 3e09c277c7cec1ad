use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::{
        MessageResponse,
        reviews::ReviewList,
        users::{RegisterRequest, RegisteredUser, UserData},
    },
    error::{AppError, AppResult},
    response::ApiResponse,
    routes::multipart::multipart_error,
    services::{auth_service, review_service, user_service},
    state::AppState,
    validation::ValidatedJson,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/{id}", get(get_user))
        .route("/{id}/reviews", get(list_user_reviews))
        .route("/{id}/profileimg", post(upload_profile_image))
}

#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<RegisteredUser>),
        (status = 400, description = "Invalid payload or username already taken")
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisteredUser>>)> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(resp))))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = ApiResponse<UserData>),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserData>>> {
    let user = user_service::get_user(&state, &id).await?;
    Ok(Json(ApiResponse::success(UserData { user })))
}

#[utoipa::path(
    get,
    path = "/users/{id}/reviews",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Reviews posted by the user", body = ApiResponse<ReviewList>)
    ),
    tag = "Users"
)]
pub async fn list_user_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let reviews = review_service::list_reviews_by_owner(&state, &id).await?;
    Ok(Json(ApiResponse::success(ReviewList { reviews })))
}

#[utoipa::path(
    post,
    path = "/users/{id}/profileimg",
    params(("id" = String, Path, description = "User ID")),
    request_body(content_type = "multipart/form-data", description = "`image` file field"),
    responses(
        (status = 201, description = "Profile image stored", body = MessageResponse),
        (status = 400, description = "Missing or non-image file"),
        (status = 404, description = "User not found"),
        (status = 413, description = "File too large")
    ),
    tag = "Users"
)]
pub async fn upload_profile_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        user_service::upload_profile_image(
            &state,
            &id,
            &file_name,
            content_type.as_deref(),
            Box::pin(field),
        )
        .await?;

        return Ok((
            StatusCode::CREATED,
            Json(ApiResponse::message("Foto profile berhasil diunggah")),
        ));
    }

    Err(AppError::bad_request("\"image\" wajib diisi"))
}
