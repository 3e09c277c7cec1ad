use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::AppResult,
    response::ApiResponse,
    services::auth_service::login_user,
    state::AppState,
    validation::ValidatedJson,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(login))
}

#[utoipa::path(
    post,
    path = "/authentications",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Access token issued", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let resp = login_user(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Authentication berhasil ditambahkan",
            resp,
        )),
    ))
}
