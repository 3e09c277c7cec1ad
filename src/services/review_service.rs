use axum::body::Bytes;
use futures::Stream;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set, TransactionTrait};

use crate::{
    audit,
    dto::reviews::{CreatedReview, ReviewRequest},
    entity::{
        ratings::ActiveModel as RatingActive,
        review_covers::ActiveModel as ReviewCoverActive,
        reviews::{ActiveModel as ReviewActive, Entity as Reviews},
    },
    error::{AppError, AppResult},
    ids::new_id,
    middleware::auth::AuthUser,
    models::Review,
    state::AppState,
    storage::entity_filename,
    validation::validate_image_content_type,
};

pub const REVIEW_NOT_FOUND: &str = "Review tidak ditemukan";
const NOT_OWNER: &str = "Anda tidak berhak mengakses resource ini";
const COVER_PREFIX: &str = "review";

const SELECT_REVIEW: &str = r#"
    SELECT r.id, r.owner, r.title, r.author, r.publisher, r.publish_year, r.synopsis,
           r.genre, rt.value AS rating, r.likes, cover.url AS cover_url,
           r.created_at, r.updated_at
    FROM reviews r
    JOIN ratings rt ON rt.id = r.rating_id
    LEFT JOIN LATERAL (
        SELECT url FROM review_covers
        WHERE review_id = r.id
        ORDER BY created_at DESC, id DESC
        LIMIT 1
    ) cover ON TRUE
"#;

/// Rating and review rows are written in one transaction.
pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: ReviewRequest,
) -> AppResult<CreatedReview> {
    let txn = state.orm.begin().await?;

    let rating = RatingActive {
        id: Set(new_id("rating")),
        value: Set(payload.rating),
    }
    .insert(&txn)
    .await?;

    let review = ReviewActive {
        id: Set(new_id("review")),
        owner: Set(user.id.clone()),
        title: Set(payload.title.trim().to_string()),
        author: Set(payload.author.trim().to_string()),
        publisher: Set(payload.publisher.trim().to_string()),
        publish_year: Set(payload.publish_year),
        synopsis: Set(payload.synopsis),
        genre: Set(payload.genre.trim().to_string()),
        rating_id: Set(rating.id),
        likes: Set(0),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(review_id = %review.id, owner = %user.id, "review created");
    audit::record(
        &state.pool,
        Some(&user.id),
        "review_create",
        "reviews",
        serde_json::json!({ "review_id": review.id }),
    )
    .await;

    Ok(CreatedReview {
        review_id: review.id,
    })
}

pub async fn list_reviews(state: &AppState) -> AppResult<Vec<Review>> {
    let sql = format!("{SELECT_REVIEW} ORDER BY r.created_at DESC");
    let reviews = sqlx::query_as::<_, Review>(&sql)
        .fetch_all(&state.pool)
        .await?;
    Ok(reviews)
}

pub async fn get_review(state: &AppState, id: &str) -> AppResult<Review> {
    let sql = format!("{SELECT_REVIEW} WHERE r.id = $1");
    let review = sqlx::query_as::<_, Review>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    review.ok_or_else(|| AppError::not_found(REVIEW_NOT_FOUND))
}

pub async fn list_reviews_by_owner(state: &AppState, owner_id: &str) -> AppResult<Vec<Review>> {
    let sql = format!("{SELECT_REVIEW} WHERE r.owner = $1 ORDER BY r.created_at DESC");
    let reviews = sqlx::query_as::<_, Review>(&sql)
        .bind(owner_id)
        .fetch_all(&state.pool)
        .await?;
    Ok(reviews)
}

pub async fn verify_review_exists(state: &AppState, id: &str) -> AppResult<()> {
    match Reviews::find_by_id(id.to_string()).one(&state.orm).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(REVIEW_NOT_FOUND)),
    }
}

/// Only the posting user passes; a missing row is reported first.
pub async fn verify_review_owner(state: &AppState, id: &str, user: &AuthUser) -> AppResult<()> {
    let review = Reviews::find_by_id(id.to_string())
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found(REVIEW_NOT_FOUND))?;
    if review.owner != user.id {
        return Err(AppError::forbidden(NOT_OWNER));
    }
    Ok(())
}

async fn missing_or_forbidden(state: &AppState, id: &str) -> AppError {
    match verify_review_exists(state, id).await {
        Ok(()) => AppError::forbidden(NOT_OWNER),
        Err(err) => err,
    }
}

pub async fn update_review(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: ReviewRequest,
) -> AppResult<()> {
    let mut tx = state.pool.begin().await?;

    let rating_id: Option<String> = sqlx::query_scalar(
        r#"
        UPDATE reviews
        SET title = $3,
            author = $4,
            publisher = $5,
            publish_year = $6,
            synopsis = $7,
            genre = $8,
            updated_at = NOW()
        WHERE id = $1 AND owner = $2
        RETURNING rating_id
        "#,
    )
    .bind(id)
    .bind(&user.id)
    .bind(payload.title.trim())
    .bind(payload.author.trim())
    .bind(payload.publisher.trim())
    .bind(payload.publish_year)
    .bind(&payload.synopsis)
    .bind(payload.genre.trim())
    .fetch_optional(&mut *tx)
    .await?;

    let Some(rating_id) = rating_id else {
        drop(tx);
        return Err(missing_or_forbidden(state, id).await);
    };

    sqlx::query("UPDATE ratings SET value = $2 WHERE id = $1")
        .bind(&rating_id)
        .bind(payload.rating)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    audit::record(
        &state.pool,
        Some(&user.id),
        "review_update",
        "reviews",
        serde_json::json!({ "review_id": id }),
    )
    .await;
    Ok(())
}

pub async fn delete_review(state: &AppState, user: &AuthUser, id: &str) -> AppResult<()> {
    let cover_urls: Vec<String> =
        sqlx::query_scalar("SELECT url FROM review_covers WHERE review_id = $1")
            .bind(id)
            .fetch_all(&state.pool)
            .await?;

    let mut tx = state.pool.begin().await?;
    let rating_id: Option<String> = sqlx::query_scalar(
        "DELETE FROM reviews WHERE id = $1 AND owner = $2 RETURNING rating_id",
    )
    .bind(id)
    .bind(&user.id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(rating_id) = rating_id else {
        drop(tx);
        return Err(missing_or_forbidden(state, id).await);
    };

    // The rating is the parent of the review, so it does not go with the cascade.
    sqlx::query("DELETE FROM ratings WHERE id = $1")
        .bind(&rating_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    for url in &cover_urls {
        if let Some(filename) = url.rsplit('/').next() {
            state.storage.review_covers.remove(filename).await;
        }
    }

    tracing::info!(review_id = id, by = %user.id, "review deleted");
    audit::record(
        &state.pool,
        Some(&user.id),
        "review_delete",
        "reviews",
        serde_json::json!({ "review_id": id }),
    )
    .await;
    Ok(())
}

/// Counts one like per viewer; liking twice is a no-op.
pub async fn like_review(state: &AppState, user: &AuthUser, id: &str) -> AppResult<i32> {
    verify_review_exists(state, id).await?;

    let likes: Option<i32> = sqlx::query_scalar(
        r#"
        WITH inserted AS (
            INSERT INTO review_likes (review_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            RETURNING review_id
        )
        UPDATE reviews
        SET likes = likes + (SELECT COUNT(*) FROM inserted)::INTEGER
        WHERE id = $1
        RETURNING likes
        "#,
    )
    .bind(id)
    .bind(&user.id)
    .fetch_optional(&state.pool)
    .await?;

    likes.ok_or_else(|| AppError::not_found(REVIEW_NOT_FOUND))
}

pub async fn unlike_review(state: &AppState, user: &AuthUser, id: &str) -> AppResult<i32> {
    let likes: Option<i32> = sqlx::query_scalar(
        r#"
        WITH removed AS (
            DELETE FROM review_likes
            WHERE review_id = $1 AND user_id = $2
            RETURNING review_id
        )
        UPDATE reviews
        SET likes = GREATEST(likes - (SELECT COUNT(*) FROM removed)::INTEGER, 0)
        WHERE id = $1
        RETURNING likes
        "#,
    )
    .bind(id)
    .bind(&user.id)
    .fetch_optional(&state.pool)
    .await?;

    likes.ok_or_else(|| AppError::not_found(REVIEW_NOT_FOUND))
}

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
    verify_review_owner(state, id, user).await?;

    let storage = &state.storage.review_covers;
    let filename = entity_filename(COVER_PREFIX, id, original_name);
    storage.write_stream(body, &filename).await?;
    let url = storage.url_for(&filename);

    let recorded = ReviewCoverActive {
        id: Set(new_id("cover")),
        review_id: Set(id.to_string()),
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
    let storage = &state.storage.review_covers;
    let url = storage.url_for(filename);
    let referenced: Result<bool, sqlx::Error> =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM review_covers WHERE url = $1)")
            .bind(&url)
            .fetch_one(&state.pool)
            .await;
    match referenced {
        Ok(false) => storage.remove(filename).await,
        Ok(true) => {}
        Err(err) => tracing::warn!(error = %err, url = %url, "cover reference check failed, keeping file"),
    }
}
