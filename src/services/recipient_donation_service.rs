use crate::{
    audit,
    dto::donations::DonationRequested,
    error::{AppError, AppResult},
    ids::new_id,
    middleware::auth::AuthUser,
    models::RecipientDonation,
    services::donation_service::{DONATION_NOT_FOUND, verify_donation_owner},
    state::AppState,
};

/// Status every request starts in; no transitions beyond it exist yet.
pub const STATUS_REQUESTED: &str = "requested";

#[derive(sqlx::FromRow)]
struct InsertedRequest {
    id: String,
    donation_status: String,
}

const SELECT_REQUEST: &str = r#"
    SELECT id, id_donation AS donation_id, user_id AS owner_id, recipient_id,
           donation_status, created_at
    FROM recipient_donations
"#;

pub async fn request_donation(
    state: &AppState,
    user: &AuthUser,
    donation_id: &str,
) -> AppResult<DonationRequested> {
    let owner: Option<String> =
        sqlx::query_scalar("SELECT owner FROM donation_books WHERE id = $1")
            .bind(donation_id)
            .fetch_optional(&state.pool)
            .await?;
    let owner = owner.ok_or_else(|| AppError::not_found(DONATION_NOT_FOUND))?;

    if owner == user.id {
        return Err(AppError::bad_request(
            "Tidak dapat meminta buku donasi milik sendiri",
        ));
    }

    // A repeated request by the same recipient hits the unique key and returns nothing.
    let inserted = sqlx::query_as::<_, InsertedRequest>(
        r#"
        INSERT INTO recipient_donations (id, id_donation, user_id, recipient_id, donation_status)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id_donation, recipient_id) DO NOTHING
        RETURNING id, donation_status
        "#,
    )
    .bind(new_id("recipient_donation"))
    .bind(donation_id)
    .bind(&owner)
    .bind(&user.id)
    .bind(STATUS_REQUESTED)
    .fetch_optional(&state.pool)
    .await?;

    let inserted =
        inserted.ok_or_else(|| AppError::bad_request("Gagal menambahkan permintaan donasi"))?;

    tracing::info!(
        request_id = %inserted.id,
        donation_id,
        recipient = %user.id,
        "donation requested"
    );
    audit::record(
        &state.pool,
        Some(&user.id),
        "donation_request",
        "recipient_donations",
        serde_json::json!({ "request_id": inserted.id, "donation_id": donation_id }),
    )
    .await;

    Ok(DonationRequested {
        donation_status: inserted.donation_status,
        id: inserted.id,
    })
}

pub async fn list_requests_for_donation(
    state: &AppState,
    user: &AuthUser,
    donation_id: &str,
) -> AppResult<Vec<RecipientDonation>> {
    verify_donation_owner(state, donation_id, user).await?;

    let sql = format!("{SELECT_REQUEST} WHERE id_donation = $1 ORDER BY created_at ASC");
    let requests = sqlx::query_as::<_, RecipientDonation>(&sql)
        .bind(donation_id)
        .fetch_all(&state.pool)
        .await?;
    Ok(requests)
}

pub async fn list_my_requests(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<Vec<RecipientDonation>> {
    let sql = format!("{SELECT_REQUEST} WHERE recipient_id = $1 ORDER BY created_at DESC");
    let requests = sqlx::query_as::<_, RecipientDonation>(&sql)
        .bind(&user.id)
        .fetch_all(&state.pool)
        .await?;
    Ok(requests)
}
