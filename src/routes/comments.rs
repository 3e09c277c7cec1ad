use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};

use crate::{
    dto::{
        MessageResponse,
        reviews::{
            CommentList, CommentRequest, CommentTarget, CommentUpdateRequest, CreatedComment,
        },
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::comment_service,
    state::AppState,
    validation::ValidatedJson,
};

// Mounted under `/review` next to the review routes, so the review segment keeps the `{id}` name.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/comment",
            get(list_comments)
                .post(create_comment)
                .put(update_comment_by_body)
                .delete(delete_comment_by_body),
        )
        .route(
            "/{id}/comment/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
}

#[utoipa::path(
    post,
    path = "/review/{reviewId}/comment",
    params(("reviewId" = String, Path, description = "Review ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = ApiResponse<CreatedComment>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedComment>>)> {
    let created = comment_service::create_comment(&state, &user, &review_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("Komentar berhasil ditambahkan", created)),
    ))
}

#[utoipa::path(
    get,
    path = "/review/{reviewId}/comment",
    params(("reviewId" = String, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Comments on the review", body = ApiResponse<CommentList>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(review_id): Path<String>,
) -> AppResult<Json<ApiResponse<CommentList>>> {
    let comments = comment_service::list_comments(&state, &review_id).await?;
    Ok(Json(ApiResponse::success(CommentList { comments })))
}

#[utoipa::path(
    put,
    path = "/review/{reviewId}/comment/{commentId}",
    params(
        ("reviewId" = String, Path, description = "Review ID"),
        ("commentId" = String, Path, description = "Comment ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = MessageResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn update_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((review_id, comment_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<CommentRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    comment_service::update_comment(&state, &user, &review_id, &comment_id, payload).await?;
    Ok(Json(ApiResponse::message("Komentar berhasil diperbarui")))
}

#[utoipa::path(
    delete,
    path = "/review/{reviewId}/comment/{commentId}",
    params(
        ("reviewId" = String, Path, description = "Review ID"),
        ("commentId" = String, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((review_id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    comment_service::delete_comment(&state, &user, &review_id, &comment_id).await?;
    Ok(Json(ApiResponse::message("Komentar berhasil dihapus")))
}

#[utoipa::path(
    put,
    path = "/review/{reviewId}/comment",
    params(("reviewId" = String, Path, description = "Review ID")),
    request_body = CommentUpdateRequest,
    responses(
        (status = 200, description = "Comment updated", body = MessageResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn update_comment_by_body(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CommentUpdateRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let CommentUpdateRequest { comment_id, text } = payload;
    comment_service::update_comment(&state, &user, &review_id, &comment_id, CommentRequest { text })
        .await?;
    Ok(Json(ApiResponse::message("Komentar berhasil diperbarui")))
}

#[utoipa::path(
    delete,
    path = "/review/{reviewId}/comment",
    params(("reviewId" = String, Path, description = "Review ID")),
    request_body = CommentTarget,
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn delete_comment_by_body(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<String>,
    ValidatedJson(target): ValidatedJson<CommentTarget>,
) -> AppResult<Json<ApiResponse<()>>> {
    comment_service::delete_comment(&state, &user, &review_id, &target.comment_id).await?;
    Ok(Json(ApiResponse::message("Komentar berhasil dihapus")))
}
