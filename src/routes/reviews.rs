use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::{
        MessageResponse,
        donations::CoverData,
        reviews::{CreatedReview, LikesData, ReviewData, ReviewList, ReviewRequest},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::multipart::multipart_error,
    services::review_service,
    state::AppState,
    validation::ValidatedJson,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/{id}/cover", post(upload_cover))
        .route("/{id}/like", post(like_review).delete(unlike_review))
}

#[utoipa::path(
    post,
    path = "/review",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<CreatedReview>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<ReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedReview>>)> {
    let created = review_service::create_review(&state, &user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("Review berhasil ditambahkan", created)),
    ))
}

#[utoipa::path(
    get,
    path = "/review",
    responses(
        (status = 200, description = "All reviews", body = ApiResponse<ReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let reviews = review_service::list_reviews(&state).await?;
    Ok(Json(ApiResponse::success(ReviewList { reviews })))
}

#[utoipa::path(
    get,
    path = "/review/{id}",
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review", body = ApiResponse<ReviewData>),
        (status = 404, description = "Not found")
    ),
    tag = "Reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ReviewData>>> {
    let review = review_service::get_review(&state, &id).await?;
    Ok(Json(ApiResponse::success(ReviewData { review })))
}

#[utoipa::path(
    put,
    path = "/review/{id}",
    params(("id" = String, Path, description = "Review ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = MessageResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ReviewRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    review_service::update_review(&state, &user, &id, payload).await?;
    Ok(Json(ApiResponse::message("Review berhasil diperbarui")))
}

#[utoipa::path(
    delete,
    path = "/review/{id}",
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    review_service::delete_review(&state, &user, &id).await?;
    Ok(Json(ApiResponse::message("Review berhasil dihapus")))
}

#[utoipa::path(
    post,
    path = "/review/{id}/cover",
    params(("id" = String, Path, description = "Review ID")),
    request_body(content_type = "multipart/form-data", description = "`cover` file field"),
    responses(
        (status = 201, description = "Cover stored", body = ApiResponse<CoverData>),
        (status = 400, description = "Missing or non-image file"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found"),
        (status = 413, description = "File too large")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn upload_cover(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<CoverData>>)> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("cover") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let url = review_service::upload_cover(
            &state,
            &user,
            &id,
            &file_name,
            content_type.as_deref(),
            Box::pin(field),
        )
        .await?;

        return Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success_with_message(
                "Sampul review berhasil diunggah",
                CoverData { url },
            )),
        ));
    }

    Err(AppError::bad_request("\"cover\" wajib diisi"))
}

#[utoipa::path(
    post,
    path = "/review/{id}/like",
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Like recorded", body = ApiResponse<LikesData>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn like_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<LikesData>>> {
    let likes = review_service::like_review(&state, &user, &id).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Review berhasil disukai",
        LikesData { likes },
    )))
}

#[utoipa::path(
    delete,
    path = "/review/{id}/like",
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Like removed", body = ApiResponse<LikesData>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn unlike_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<LikesData>>> {
    let likes = review_service::unlike_review(&state, &user, &id).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Batal menyukai review",
        LikesData { likes },
    )))
}
