//! Favorites service: listing, adding and removing a user's favorite
//! planets and characters.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};

use galaxy_db::Database;
use galaxy_db::favorites::{AddFavorite, FavoriteTarget, RemoveFavorite};
use galaxy_types::api::{
    FavoriteCharacterAdded, FavoritePlanetAdded, Favorites, FavoritesResponse, MessageResponse,
};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, db_task};

pub fn user_not_found(user_id: i64) -> ApiError {
    ApiError::NotFound(format!("User with id {} does not exist", user_id))
}

fn target_not_found(target: FavoriteTarget, id: i64) -> ApiError {
    ApiError::NotFound(format!("{} with id {} does not exist", label(target), id))
}

fn label(target: FavoriteTarget) -> &'static str {
    match target {
        FavoriteTarget::Planet => "Planet",
        FavoriteTarget::Character => "Character",
    }
}

pub fn list_favorites(db: &Database, user_id: i64) -> ApiResult<FavoritesResponse> {
    let favorites = db.list_favorites(user_id)?.ok_or_else(|| user_not_found(user_id))?;

    Ok(FavoritesResponse {
        user_id,
        favorites: Favorites {
            planets: favorites.planets.into_iter().map(Into::into).collect(),
            characters: favorites.characters.into_iter().map(Into::into).collect(),
        },
    })
}

fn add_favorite(
    db: &Database,
    target: FavoriteTarget,
    user_id: i64,
    target_id: i64,
) -> ApiResult<String> {
    match db.add_favorite(target, user_id, target_id)? {
        AddFavorite::Added => Ok(format!(
            "{} {} added to favorites of user {}",
            label(target),
            target_id,
            user_id
        )),
        AddFavorite::TargetNotFound => Err(target_not_found(target, target_id)),
        AddFavorite::UserNotFound => Err(user_not_found(user_id)),
        AddFavorite::AlreadyFavorited => Err(ApiError::Conflict(format!(
            "{} {} is already a favorite of user {}",
            label(target),
            target_id,
            user_id
        ))),
    }
}

fn remove_favorite(
    db: &Database,
    target: FavoriteTarget,
    user_id: i64,
    target_id: i64,
) -> ApiResult<MessageResponse> {
    match db.remove_favorite(target, user_id, target_id)? {
        RemoveFavorite::Removed => Ok(MessageResponse::new("Favorite removed successfully")),
        RemoveFavorite::TargetNotFound => Err(target_not_found(target, target_id)),
        RemoveFavorite::UserNotFound => Err(user_not_found(user_id)),
        RemoveFavorite::NotFavorited => Err(ApiError::BadRequest(format!(
            "{} {} is not a favorite of user {}",
            label(target),
            target_id,
            user_id
        ))),
    }
}

pub fn add_favorite_planet(
    db: &Database,
    user_id: i64,
    planet_id: i64,
) -> ApiResult<FavoritePlanetAdded> {
    let message = add_favorite(db, FavoriteTarget::Planet, user_id, planet_id)?;
    Ok(FavoritePlanetAdded {
        message,
        user_id,
        planet_id,
    })
}

pub fn add_favorite_character(
    db: &Database,
    user_id: i64,
    character_id: i64,
) -> ApiResult<FavoriteCharacterAdded> {
    let message = add_favorite(db, FavoriteTarget::Character, user_id, character_id)?;
    Ok(FavoriteCharacterAdded {
        message,
        user_id,
        character_id,
    })
}

pub fn remove_favorite_planet(
    db: &Database,
    user_id: i64,
    planet_id: i64,
) -> ApiResult<MessageResponse> {
    remove_favorite(db, FavoriteTarget::Planet, user_id, planet_id)
}

pub fn remove_favorite_character(
    db: &Database,
    user_id: i64,
    character_id: i64,
) -> ApiResult<MessageResponse> {
    remove_favorite(db, FavoriteTarget::Character, user_id, character_id)
}

// -- Handlers --

/// GET /users/{user_id}/favorites
pub async fn get_favorites(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = path?;
    let favorites = db_task(&state, move |db| list_favorites(db, user_id)).await?;
    Ok(Json(favorites))
}

/// POST /users/{user_id}/favorite/planet/{planet_id}
pub async fn post_planet_favorite(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path((user_id, planet_id)) = path?;
    let added = db_task(&state, move |db| add_favorite_planet(db, user_id, planet_id)).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// DELETE /users/{user_id}/favorite/planet/{planet_id}
pub async fn delete_planet_favorite(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path((user_id, planet_id)) = path?;
    let removed = db_task(&state, move |db| remove_favorite_planet(db, user_id, planet_id)).await?;
    Ok(Json(removed))
}

/// POST /users/{user_id}/favorite/people/{character_id}
pub async fn post_character_favorite(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path((user_id, character_id)) = path?;
    let added =
        db_task(&state, move |db| add_favorite_character(db, user_id, character_id)).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// DELETE /users/{user_id}/favorite/people/{character_id}
pub async fn delete_character_favorite(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path((user_id, character_id)) = path?;
    let removed =
        db_task(&state, move |db| remove_favorite_character(db, user_id, character_id)).await?;
    Ok(Json(removed))
}
