use sea_orm::{
    ActiveModelTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, Func},
};

use crate::{
    dto::genres::{CreateGenreRequest, CreatedGenre},
    entity::genres::{ActiveModel as GenreActive, Column as GenreCol, Entity as Genres, Model as GenreModel},
    error::{AppError, AppResult},
    ids::new_id,
    middleware::auth::{AuthUser, ensure_admin},
    models::Genre,
    state::AppState,
};

pub async fn list_genres(state: &AppState) -> AppResult<Vec<Genre>> {
    let genres = Genres::find()
        .order_by_asc(GenreCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(genre_from_entity)
        .collect();
    Ok(genres)
}

pub async fn create_genre(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGenreRequest,
) -> AppResult<CreatedGenre> {
    ensure_admin(user)?;
    let name = payload.name.trim().to_string();

    if find_by_name(state, &name).await?.is_some() {
        return Err(AppError::bad_request("Genre sudah ada"));
    }

    let genre = GenreActive {
        id: Set(new_id("genre")),
        name: Set(name),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(genre_id = %genre.id, name = %genre.name, "genre created");
    Ok(CreatedGenre { genre_id: genre.id })
}

pub async fn find_by_name(state: &AppState, name: &str) -> AppResult<Option<GenreModel>> {
    let genre = Genres::find()
        .filter(
            Expr::expr(Func::lower(Expr::col(GenreCol::Name)))
                .eq(name.trim().to_lowercase()),
        )
        .one(&state.orm)
        .await?;
    Ok(genre)
}

/// Resolves a genre name to its id; unknown names are a client error.
pub async fn resolve_genre_id(state: &AppState, name: &str) -> AppResult<String> {
    match find_by_name(state, name).await? {
        Some(genre) => Ok(genre.id),
        None => Err(AppError::bad_request(format!(
            "Genre \"{}\" tidak ditemukan",
            name.trim()
        ))),
    }
}

fn genre_from_entity(model: GenreModel) -> Genre {
    Genre {
        id: model.id,
        name: model.name,
    }
}
