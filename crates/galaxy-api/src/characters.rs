use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use galaxy_db::models::NewCharacter;
use galaxy_types::api::{CharacterFields, MessageResponse};
use galaxy_types::models::Character;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, db_task};

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Character with id {} does not exist", id))
}

fn name_taken(name: &str) -> ApiError {
    ApiError::Conflict(format!("A character named '{}' already exists", name))
}

pub async fn list_characters(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let characters: Vec<Character> = db_task(&state, |db| {
        Ok(db.list_characters()?.into_iter().map(Into::into).collect())
    })
    .await?;
    Ok(Json(characters))
}

pub async fn get_character(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let character =
        db_task(&state, move |db| db.get_character(id)?.ok_or_else(|| not_found(id))).await?;
    Ok(Json(Character::from(character)))
}

pub async fn create_character(
    State(state): State<AppState>,
    payload: Result<Json<CharacterFields>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(fields) = payload?;
    if fields.is_empty() {
        return Err(ApiError::BadRequest("No data provided to create the character".into()));
    }
    let (Some(name), Some(age), Some(genre), Some(affiliation)) =
        (fields.name, fields.age, fields.genre, fields.affiliation)
    else {
        return Err(ApiError::BadRequest(
            "Missing required fields: name, age, genre, affiliation".into(),
        ));
    };

    let character = db_task(&state, move |db| {
        if db.get_character_by_name(&name)?.is_some() {
            return Err(name_taken(&name));
        }
        db.create_character(&NewCharacter {
            name: &name,
            age,
            genre: &genre,
            affiliation: &affiliation,
        })
        // A concurrent insert of the same name lands here
        .map_err(|e| if e.is_constraint_violation() { name_taken(&name) } else { e.into() })
    })
    .await?;

    Ok((StatusCode::CREATED, Json(Character::from(character))))
}

pub async fn update_character(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CharacterFields>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(fields) = payload?;
    if fields.is_empty() {
        return Err(ApiError::BadRequest("No data provided to update".into()));
    }

    let character = db_task(&state, move |db| {
        db.update_character(id, &fields)
            .map_err(|e| match (&fields.name, e.is_constraint_violation()) {
                (Some(name), true) => name_taken(name),
                _ => e.into(),
            })?
            .ok_or_else(|| not_found(id))
    })
    .await?;

    Ok(Json(Character::from(character)))
}

pub async fn delete_character(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    db_task(&state, move |db| {
        if db.delete_character(id)? { Ok(()) } else { Err(not_found(id)) }
    })
    .await?;

    Ok(Json(MessageResponse::new(format!(
        "Character with id {} deleted successfully",
        id
    ))))
}
