use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use galaxy_db::models::NewPlanet;
use galaxy_types::api::{MessageResponse, PlanetFields};
use galaxy_types::models::Planet;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, db_task};

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Planet with id {} does not exist", id))
}

fn name_taken(name: &str) -> ApiError {
    ApiError::Conflict(format!("A planet named '{}' already exists", name))
}

pub async fn list_planets(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let planets: Vec<Planet> = db_task(&state, |db| {
        Ok(db.list_planets()?.into_iter().map(Into::into).collect())
    })
    .await?;
    Ok(Json(planets))
}

pub async fn get_planet(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let planet = db_task(&state, move |db| db.get_planet(id)?.ok_or_else(|| not_found(id))).await?;
    Ok(Json(Planet::from(planet)))
}

pub async fn create_planet(
    State(state): State<AppState>,
    payload: Result<Json<PlanetFields>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(fields) = payload?;
    if fields.is_empty() {
        return Err(ApiError::BadRequest("No data provided to create the planet".into()));
    }
    let (Some(name), Some(size), Some(material), Some(population)) =
        (fields.name, fields.size, fields.material, fields.population)
    else {
        return Err(ApiError::BadRequest(
            "Missing required fields: name, size, material, population".into(),
        ));
    };

    let planet = db_task(&state, move |db| {
        if db.get_planet_by_name(&name)?.is_some() {
            return Err(name_taken(&name));
        }
        db.create_planet(&NewPlanet {
            name: &name,
            size,
            material: &material,
            population,
        })
        // A concurrent insert of the same name lands here
        .map_err(|e| if e.is_constraint_violation() { name_taken(&name) } else { e.into() })
    })
    .await?;

    Ok((StatusCode::CREATED, Json(Planet::from(planet))))
}

pub async fn update_planet(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PlanetFields>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(fields) = payload?;
    if fields.is_empty() {
        return Err(ApiError::BadRequest("No data provided to update".into()));
    }

    let planet = db_task(&state, move |db| {
        db.update_planet(id, &fields)
            .map_err(|e| match (&fields.name, e.is_constraint_violation()) {
                (Some(name), true) => name_taken(name),
                _ => e.into(),
            })?
            .ok_or_else(|| not_found(id))
    })
    .await?;

    Ok(Json(Planet::from(planet)))
}

pub async fn delete_planet(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    db_task(&state, move |db| {
        if db.delete_planet(id)? { Ok(()) } else { Err(not_found(id)) }
    })
    .await?;

    Ok(Json(MessageResponse::new(format!(
        "Planet with id {} deleted successfully",
        id
    ))))
}
