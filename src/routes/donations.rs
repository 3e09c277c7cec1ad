use axum::{
    Json, Router,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    routing::{get, post},
};
use serde_json::{Map, Value};

use crate::{
    dto::{
        MessageResponse,
        donations::{
            CoverData, CreateDonationRequest, CreatedDonation, DonationBookData, DonationBookList,
            DonationRequested, RecipientDonationList, UpdateDonationRequest,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::multipart::{collect_form, multipart_error},
    services::{donation_service, recipient_donation_service},
    state::AppState,
    storage::ImageUpload,
    validation::{ValidatedJson, validate_payload},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_donations).post(create_donation))
        .route(
            "/{id}",
            get(get_donation).put(update_donation).delete(delete_donation),
        )
        .route("/{id}/cover", post(upload_cover))
        .route("/{id}/request", post(request_donation))
        .route("/{id}/requests", get(list_donation_requests))
}

pub fn requests_router() -> Router<AppState> {
    Router::new().route("/", get(list_my_requests))
}

/// Donation body sent either as JSON or as a multipart form with an optional `cover` file.
pub struct DonationSubmission {
    pub payload: CreateDonationRequest,
    pub cover: Option<ImageUpload>,
}

impl FromRequest<AppState> for DonationSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let ValidatedJson(payload) =
                ValidatedJson::<CreateDonationRequest>::from_request(req, state).await?;
            return Ok(Self {
                payload,
                cover: None,
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        let (fields, cover) = collect_form(multipart, "cover", state.config.max_image_bytes).await?;

        let mut object = Map::new();
        for (name, value) in fields {
            let value = match name.as_str() {
                "publishYear" | "publish_year" => match value.trim().parse::<i64>() {
                    Ok(year) => Value::from(year),
                    Err(_) => return Err(AppError::bad_request("\"publishYear\" harus berupa angka")),
                },
                _ => Value::String(value),
            };
            let key = if name == "publish_year" { "publishYear".to_string() } else { name };
            object.insert(key, value);
        }

        let payload: CreateDonationRequest = serde_json::from_value(Value::Object(object))
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
        validate_payload(&payload)?;

        Ok(Self { payload, cover })
    }
}

#[utoipa::path(
    post,
    path = "/donations",
    request_body = CreateDonationRequest,
    responses(
        (status = 201, description = "Donation created", body = ApiResponse<CreatedDonation>),
        (status = 400, description = "Invalid payload or unknown genre"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "Cover too large")
    ),
    security(("bearer_auth" = [])),
    tag = "Donations"
)]
pub async fn create_donation(
    State(state): State<AppState>,
    user: AuthUser,
    submission: DonationSubmission,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedDonation>>)> {
    let created =
        donation_service::create_donation(&state, &user, submission.payload, submission.cover)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Buku donasi berhasil ditambahkan",
            created,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/donations",
    responses(
        (status = 200, description = "All donation books", body = ApiResponse<DonationBookList>)
    ),
    tag = "Donations"
)]
pub async fn list_donations(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DonationBookList>>> {
    let books = donation_service::list_donations(&state).await?;
    Ok(Json(ApiResponse::success(DonationBookList { books })))
}

#[utoipa::path(
    get,
    path = "/donations/{id}",
    params(("id" = String, Path, description = "Donation book ID")),
    responses(
        (status = 200, description = "Donation book", body = ApiResponse<DonationBookData>),
        (status = 404, description = "Not found")
    ),
    tag = "Donations"
)]
pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DonationBookData>>> {
    let book = donation_service::get_donation(&state, &id).await?;
    Ok(Json(ApiResponse::success(DonationBookData { book })))
}

#[utoipa::path(
    put,
    path = "/donations/{id}",
    params(("id" = String, Path, description = "Donation book ID")),
    request_body = UpdateDonationRequest,
    responses(
        (status = 200, description = "Donation updated", body = MessageResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Donations"
)]
pub async fn update_donation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateDonationRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    donation_service::update_donation(&state, &user, &id, payload).await?;
    Ok(Json(ApiResponse::message("Buku donasi berhasil diperbarui")))
}

#[utoipa::path(
    delete,
    path = "/donations/{id}",
    params(("id" = String, Path, description = "Donation book ID")),
    responses(
        (status = 200, description = "Donation deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Donations"
)]
pub async fn delete_donation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    donation_service::delete_donation(&state, &user, &id).await?;
    Ok(Json(ApiResponse::message("Buku donasi berhasil dihapus")))
}

#[utoipa::path(
    post,
    path = "/donations/{id}/cover",
    params(("id" = String, Path, description = "Donation book ID")),
    request_body(content_type = "multipart/form-data", description = "`cover` file field"),
    responses(
        (status = 201, description = "Cover stored", body = ApiResponse<CoverData>),
        (status = 400, description = "Missing or non-image file"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found"),
        (status = 413, description = "File too large")
    ),
    security(("bearer_auth" = [])),
    tag = "Donations"
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
        let url = donation_service::upload_cover(
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
                "Sampul berhasil diunggah",
                CoverData { url },
            )),
        ));
    }

    Err(AppError::bad_request("\"cover\" wajib diisi"))
}

#[utoipa::path(
    post,
    path = "/donations/{id}/request",
    params(("id" = String, Path, description = "Donation book ID")),
    responses(
        (status = 200, description = "Request recorded", body = ApiResponse<DonationRequested>),
        (status = 400, description = "Own donation or already requested"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Donations"
)]
pub async fn request_donation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DonationRequested>>> {
    let requested = recipient_donation_service::request_donation(&state, &user, &id).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Permintaan donasi berhasil ditambahkan",
        requested,
    )))
}

#[utoipa::path(
    get,
    path = "/donations/{id}/requests",
    params(("id" = String, Path, description = "Donation book ID")),
    responses(
        (status = 200, description = "Requests for the donation", body = ApiResponse<RecipientDonationList>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Donations"
)]
pub async fn list_donation_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<RecipientDonationList>>> {
    let requests =
        recipient_donation_service::list_requests_for_donation(&state, &user, &id).await?;
    Ok(Json(ApiResponse::success(RecipientDonationList { requests })))
}

#[utoipa::path(
    get,
    path = "/requests",
    responses(
        (status = 200, description = "Requests made by the caller", body = ApiResponse<RecipientDonationList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Donations"
)]
pub async fn list_my_requests(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RecipientDonationList>>> {
    let requests = recipient_donation_service::list_my_requests(&state, &user).await?;
    Ok(Json(ApiResponse::success(RecipientDonationList { requests })))
}
