use axum::body::Bytes;
use chrono::Utc;
use futures::Stream;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set};

use crate::{
    entity::{
        image_profiles::ActiveModel as ImageProfileActive,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    ids::new_id,
    models::UserProfile,
    state::AppState,
    storage::timestamped_filename,
    validation::validate_image_content_type,
};

const USER_NOT_FOUND: &str = "User tidak ditemukan";

pub async fn get_user(state: &AppState, id: &str) -> AppResult<UserProfile> {
    // Profile images accumulate; the newest row is the active one.
    let user = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT u.id, u.username, u.fullname, u.email, u.address, u.sosmed_url,
               u.role, u.contact_number, u.joined_at, img.url AS image_url
        FROM users u
        LEFT JOIN LATERAL (
            SELECT url FROM image_profiles
            WHERE user_id = u.id
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        ) img ON TRUE
        WHERE u.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;

    user.ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
}

pub async fn verify_user_exists(state: &AppState, id: &str) -> AppResult<()> {
    match Users::find_by_id(id.to_string()).one(&state.orm).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(USER_NOT_FOUND)),
    }
}

/// Writes the image and records its URL; returns the URL path.
pub async fn upload_profile_image<S, E>(
    state: &AppState,
    user_id: &str,
    original_name: &str,
    content_type: Option<&str>,
    body: S,
) -> AppResult<String>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    validate_image_content_type(content_type)?;
    verify_user_exists(state, user_id).await?;

    let storage = &state.storage.profiles;
    let filename = timestamped_filename(original_name, Utc::now().timestamp_millis());
    storage.write_stream(body, &filename).await?;
    let url = storage.url_for(&filename);

    let inserted = ImageProfileActive {
        id: Set(new_id("imguser")),
        user_id: Set(user_id.to_string()),
        url: Set(url.clone()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;

    if let Err(err) = inserted {
        storage.remove(&filename).await;
        return Err(err.into());
    }

    tracing::info!(user_id, url = %url, "profile image stored");
    Ok(url)
}
