use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};

use crate::{
    audit,
    dto::reviews::{CommentRequest, CreatedComment},
    entity::comments::{ActiveModel as CommentActive, Column as CommentCol, Entity as Comments},
    error::{AppError, AppResult},
    ids::new_id,
    middleware::auth::AuthUser,
    models::Comment,
    services::review_service::verify_review_exists,
    state::AppState,
};

const COMMENT_NOT_FOUND: &str = "Komentar tidak ditemukan";
const NOT_OWNER: &str = "Anda tidak berhak mengakses resource ini";

pub async fn create_comment(
    state: &AppState,
    user: &AuthUser,
    review_id: &str,
    payload: CommentRequest,
) -> AppResult<CreatedComment> {
    verify_review_exists(state, review_id).await?;

    let comment = CommentActive {
        id: Set(new_id("comment")),
        review_id: Set(review_id.to_string()),
        owner: Set(user.id.clone()),
        text: Set(payload.text.trim().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(&user.id),
        "comment_create",
        "comments",
        serde_json::json!({ "comment_id": comment.id, "review_id": review_id }),
    )
    .await;

    Ok(CreatedComment {
        comment_id: comment.id,
    })
}

pub async fn list_comments(state: &AppState, review_id: &str) -> AppResult<Vec<Comment>> {
    verify_review_exists(state, review_id).await?;

    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.review_id, c.owner, u.username, c.text, c.created_at, c.updated_at
        FROM comments c
        JOIN users u ON u.id = c.owner
        WHERE c.review_id = $1
        ORDER BY c.created_at ASC
        "#,
    )
    .bind(review_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(comments)
}

fn scoped(review_id: &str, comment_id: &str) -> Condition {
    Condition::all()
        .add(CommentCol::Id.eq(comment_id))
        .add(CommentCol::ReviewId.eq(review_id))
}

async fn missing_or_forbidden(state: &AppState, review_id: &str, comment_id: &str) -> AppError {
    let found = Comments::find()
        .filter(scoped(review_id, comment_id))
        .one(&state.orm)
        .await;
    match found {
        Ok(Some(_)) => AppError::forbidden(NOT_OWNER),
        Ok(None) => AppError::not_found(COMMENT_NOT_FOUND),
        Err(err) => err.into(),
    }
}

pub async fn update_comment(
    state: &AppState,
    user: &AuthUser,
    review_id: &str,
    comment_id: &str,
    payload: CommentRequest,
) -> AppResult<()> {
    verify_review_exists(state, review_id).await?;

    let result = Comments::update_many()
        .col_expr(CommentCol::Text, Expr::value(payload.text.trim().to_string()))
        .col_expr(CommentCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(scoped(review_id, comment_id).add(CommentCol::Owner.eq(user.id.as_str())))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(missing_or_forbidden(state, review_id, comment_id).await);
    }
    Ok(())
}

pub async fn delete_comment(
    state: &AppState,
    user: &AuthUser,
    review_id: &str,
    comment_id: &str,
) -> AppResult<()> {
    verify_review_exists(state, review_id).await?;

    let result = Comments::delete_many()
        .filter(scoped(review_id, comment_id).add(CommentCol::Owner.eq(user.id.as_str())))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(missing_or_forbidden(state, review_id, comment_id).await);
    }
    Ok(())
}
