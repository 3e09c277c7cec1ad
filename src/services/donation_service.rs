use axum::body::Bytes;
use chrono::Utc;
use futures::Stream;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};

use crate::{
    audit,
    dto::donations::{CreateDonationRequest, CreatedDonation, UpdateDonationRequest},
    entity::{
        donation_books::{ActiveModel as DonationActive, Column as DonationCol, Entity as DonationBooks},
        donation_covers::{ActiveModel as CoverActive, Column as CoverCol, Entity as DonationCovers},
    },
    error::{AppError, AppResult},
    ids::new_id,
    middleware::auth::AuthUser,
    models::DonationBook,
    services::genre_service::resolve_genre_id,
    state::AppState,
    storage::{ImageUpload, entity_filename},
    validation::validate_image_content_type,
};

pub const DONATION_NOT_FOUND: &str = "Buku donasi tidak ditemukan";
const NOT_OWNER: &str = "Anda tidak berhak mengakses resource ini";
const COVER_PREFIX: &str = "donation_book";

const SELECT_DONATION: &str = r#"
    SELECT d.id, d.owner, d.title, d.author, d.publisher, d.publish_year, d.synopsis,
           d.genre AS genre_id, g.name AS genre, d.book_condition,
           cover.url AS cover_url, d.created_at, d.updated_at
    FROM donation_books d
    JOIN genres g ON g.id = d.genre
    LEFT JOIN LATERAL (
        SELECT url FROM donation_covers
        WHERE donation_id = d.id
        ORDER BY created_at DESC, id DESC
        LIMIT 1
    ) cover ON TRUE
"#;

pub async fn list_donations(state: &AppState) -> AppResult<Vec<DonationBook>> {
    let sql = format!("{SELECT_DONATION} ORDER BY d.created_at DESC");
    let books = sqlx::query_as::<_, DonationBook>(&sql)
        .fetch_all(&state.pool)
        .await?;
    Ok(books)
}

pub async fn get_donation(state: &AppState, id: &str) -> AppResult<DonationBook> {
    let sql = format!("{SELECT_DONATION} WHERE d.id = $1");
    let book = sqlx::query_as::<_, DonationBook>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    book.ok_or_else(|| AppError::not_found(DONATION_NOT_FOUND))
}

/// Inserts the donation and, when a cover is attached, writes the file and
/// records its path. All of it commits together; a failure after the file is
/// written removes the file again.
pub async fn create_donation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateDonationRequest,
    cover: Option<ImageUpload>,
) -> AppResult<CreatedDonation> {
    if let Some(cover) = &cover {
        validate_image_content_type(cover.content_type.as_deref())?;
    }
    let genre_id = resolve_genre_id(state, &payload.genre).await?;

    let txn = state.orm.begin().await?;

    let book = DonationActive {
        id: Set(new_id("donation")),
        owner: Set(user.id.clone()),
        title: Set(payload.title.trim().to_string()),
        author: Set(payload.author.trim().to_string()),
        publisher: Set(payload.publisher.trim().to_string()),
        publish_year: Set(payload.publish_year),
        synopsis: Set(payload.synopsis),
        genre: Set(genre_id),
        book_condition: Set(payload.book_condition.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut written: Option<String> = None;
    if let Some(cover) = cover {
        let storage = &state.storage.donation_covers;
        let filename = entity_filename(COVER_PREFIX, &book.id, &cover.file_name);
        storage.write_bytes(cover.data, &filename).await?;

        let recorded = CoverActive {
            id: Set(new_id("cover")),
            donation_id: Set(book.id.clone()),
            url: Set(storage.url_for(&filename)),
            created_at: NotSet,
        }
        .insert(&txn)
        .await;
        if let Err(err) = recorded {
            storage.remove(&filename).await;
            return Err(err.into());
        }
        written = Some(filename);
    }

    if let Err(err) = txn.commit().await {
        if let Some(filename) = &written {
            state.storage.donation_covers.remove(filename).await;
        }
        return Err(err.into());
    }

    tracing::info!(donation_id = %book.id, owner = %user.id, "donation created");
    audit::record(
        &state.pool,
        Some(&user.id),
        "donation_create",
        "donation_books",
        serde_json::json!({ "donation_id": book.id, "cover": written.is_some() }),
    )
    .await;

    Ok(CreatedDonation { book_id: book.id })
}

/// Owner or admin passes; a missing row is reported before a foreign owner.
pub async fn verify_donation_owner(state: &AppState, id: &str, user: &AuthUser) -> AppResult<()> {
    let book = DonationBooks::find_by_id(id.to_string())
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found(DONATION_NOT_FOUND))?;

    if book.owner != user.id && !user.is_admin() {
        return Err(AppError::forbidden(NOT_OWNER));
    }
    Ok(())
}

fn owner_condition(id: &str, user: &AuthUser) -> Condition {
    let mut condition = Condition::all().add(DonationCol::Id.eq(id));
    if !user.is_admin() {
        condition = condition.add(DonationCol::Owner.eq(user.id.as_str()));
    }
    condition
}

/// Called after a gated statement touched no rows.
async fn missing_or_forbidden(state: &AppState, id: &str) -> AppError {
    match DonationBooks::find_by_id(id.to_string()).one(&state.orm).await {
        Ok(Some(_)) => AppError::forbidden(NOT_OWNER),
        Ok(None) => AppError::not_found(DONATION_NOT_FOUND),
        Err(err) => err.into(),
    }
}

pub async fn update_donation(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateDonationRequest,
) -> AppResult<()> {
    if payload.is_empty() {
        return Err(AppError::bad_request("Tidak ada data yang diperbarui"));
    }

    // The row is classified before any lookup so a bad genre cannot mask 404/403.
    verify_donation_owner(state, id, user).await?;
    let genre_id = match payload.genre.as_deref() {
        Some(name) => Some(resolve_genre_id(state, name).await?),
        None => None,
    };

    let mut update = DonationBooks::update_many()
        .col_expr(DonationCol::UpdatedAt, Expr::value(Utc::now()));
    if let Some(title) = payload.title {
        update = update.col_expr(DonationCol::Title, Expr::value(title.trim().to_string()));
    }
    if let Some(author) = payload.author {
        update = update.col_expr(DonationCol::Author, Expr::value(author.trim().to_string()));
    }
    if let Some(publisher) = payload.publisher {
        update = update.col_expr(DonationCol::Publisher, Expr::value(publisher.trim().to_string()));
    }
    if let Some(year) = payload.publish_year {
        update = update.col_expr(DonationCol::PublishYear, Expr::value(year));
    }
    if let Some(synopsis) = payload.synopsis {
        update = update.col_expr(DonationCol::Synopsis, Expr::value(synopsis));
    }
    if let Some(genre_id) = genre_id {
        update = update.col_expr(DonationCol::Genre, Expr::value(genre_id));
    }
    if let Some(condition) = payload.book_condition {
        update = update.col_expr(DonationCol::BookCondition, Expr::value(condition.as_str()));
    }

    let result = update
        .filter(owner_condition(id, user))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(missing_or_forbidden(state, id).await);
    }

    audit::record(
        &state.pool,
        Some(&user.id),
        "donation_update",
        "donation_books",
        serde_json::json!({ "donation_id": id }),
    )
    .await;
    Ok(())
}

pub async fn delete_donation(state: &AppState, user: &AuthUser, id: &str) -> AppResult<()> {
    let cover_urls: Vec<String> = DonationCovers::find()
        .filter(CoverCol::DonationId.eq(id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| c.url)
        .collect();

    let result = DonationBooks::delete_many()
        .filter(owner_condition(id, user))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(missing_or_forbidden(state, id).await);
    }

    // Cover rows went with the cascade; the files are ours to clean up.
    for url in &cover_urls {
        if let Some(filename) = url.rsplit('/').next() {
            state.storage.donation_covers.remove(filename).await;
        }
    }

    tracing::info!(donation_id = id, by = %user.id, "donation deleted");
    audit::record(
        &state.pool,
        Some(&user.id),
        "donation_delete",
        "donation_books",
        serde_json::json!({ "donation_id": id }),
    )
    .await;
    Ok(())
}

/// Adds a new cover to an existing donation; the newest cover is the one shown.
pub async fn upload_cover<S, E>(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    original_name: &str,
    content_type: Option<&str>,
    body: S,
) -> AppResult<String>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    validate_image_content_type(content_type)?;
    verify_donation_owner(state, id, user).await?;

    let storage = &state.storage.donation_covers;
    let filename = entity_filename(COVER_PREFIX, id, original_name);
    storage.write_stream(body, &filename).await?;
    let url = storage.url_for(&filename);

    let recorded = CoverActive {
        id: Set(new_id("cover")),
        donation_id: Set(id.to_string()),
        url: Set(url.clone()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;
    if let Err(err) = recorded {
        release_cover_file(state, &filename).await;
        return Err(err.into());
    }

    Ok(url)
}

/// Removes a cover file unless a stored cover row still points at it.
/// Re-uploads with the same extension reuse the filename of the previous cover.
pub async fn release_cover_file(state: &AppState, filename: &str) {
    let storage = &state.storage.donation_covers;
    let url = storage.url_for(filename);
    let referenced: Result<bool, sqlx::Error> =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM donation_covers WHERE url = $1)")
            .bind(&url)
            .fetch_one(&state.pool)
            .await;
    match referenced {
        Ok(false) => storage.remove(filename).await,
        Ok(true) => {}
        Err(err) => tracing::warn!(error = %err, url = %url, "cover reference check failed, keeping file"),
    }
}
