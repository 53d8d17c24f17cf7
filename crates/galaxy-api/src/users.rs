use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};

use galaxy_db::models::{NewUser, UserChanges};
use galaxy_types::api::{MessageResponse, UserFields};
use galaxy_types::models::User;

use crate::error::{ApiError, ApiResult};
use crate::favorites::user_not_found;
use crate::state::{AppState, db_task};

fn email_taken(email: &str) -> ApiError {
    ApiError::Conflict(format!("A user with email '{}' already exists", email))
}

/// Argon2id hash with a fresh salt.
fn hash_password(password: &str) -> ApiResult<String> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password must not be empty".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("password hashing failed: {}", e);
            ApiError::Internal
        })?
        .to_string();
    Ok(hash)
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = db_task(&state, |db| {
        let users = db
            .list_users()?
            .into_iter()
            .map(|row| row.into_user())
            .collect::<Result<Vec<User>, _>>()?;
        Ok(users)
    })
    .await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let user = db_task(&state, move |db| {
        let row = db.get_user_by_id(id)?.ok_or_else(|| user_not_found(id))?;
        Ok(row.into_user()?)
    })
    .await?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserFields>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let (Some(email), Some(name), Some(lastname), Some(password)) =
        (req.email, req.name, req.lastname, req.password)
    else {
        return Err(ApiError::BadRequest(
            "Missing required fields: email, name, lastname, password".into(),
        ));
    };
    let is_active = req.is_active.unwrap_or(true);

    let user = db_task(&state, move |db| {
        if db.get_user_by_email(&email)?.is_some() {
            return Err(email_taken(&email));
        }
        let password_hash = hash_password(&password)?;

        let row = db
            .create_user(&NewUser {
                email: &email,
                name: &name,
                lastname: &lastname,
                password_hash: &password_hash,
                is_active,
                subscription_date: chrono::Utc::now(),
            })
            .map_err(|e| if e.is_constraint_violation() { email_taken(&email) } else { e.into() })?;

        Ok(row.into_user()?)
    })
    .await?;

    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserFields>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(fields) = payload?;
    if fields.is_empty() {
        return Err(ApiError::BadRequest("No data provided to update".into()));
    }

    let user = db_task(&state, move |db| {
        if db.get_user_by_id(id)?.is_none() {
            return Err(user_not_found(id));
        }
        if let Some(email) = &fields.email {
            if let Some(owner) = db.get_user_by_email(email)? {
                if owner.id != id {
                    return Err(email_taken(email));
                }
            }
        }
        let password_hash = fields.password.as_deref().map(hash_password).transpose()?;

        let changes = UserChanges {
            email: fields.email.as_deref(),
            name: fields.name.as_deref(),
            lastname: fields.lastname.as_deref(),
            password_hash: password_hash.as_deref(),
            is_active: fields.is_active,
        };
        let row = db
            .update_user(id, &changes)
            .map_err(|e| match (&fields.email, e.is_constraint_violation()) {
                (Some(email), true) => email_taken(email),
                _ => e.into(),
            })?
            .ok_or_else(|| user_not_found(id))?;

        Ok(row.into_user()?)
    })
    .await?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    db_task(&state, move |db| {
        if db.delete_user(id)? { Ok(()) } else { Err(user_not_found(id)) }
    })
    .await?;

    info!(user_id = id, "user deleted");
    Ok(Json(MessageResponse::new(format!(
        "User with id {} deleted successfully",
        id
    ))))
}
