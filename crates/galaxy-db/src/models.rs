//! Database row types. These map directly to SQLite rows and stay distinct
//! from the galaxy-types API models so the DB layer owns its own shapes.

use chrono::{DateTime, Utc};
use galaxy_types::models::{Character, Planet, User};

use crate::{DbError, Result};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub lastname: String,
    pub subscription_date: String,
    pub password: String,
    pub is_active: bool,
}

impl UserRow {
    pub fn into_user(self) -> Result<User> {
        let subscription_date = DateTime::parse_from_rfc3339(&self.subscription_date)
            .map_err(|_| DbError::InvalidTimestamp {
                column: "users.subscription_date",
                value: self.subscription_date.clone(),
            })?
            .with_timezone(&Utc);

        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            lastname: self.lastname,
            subscription_date,
            is_active: self.is_active,
        })
    }
}

pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub lastname: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub subscription_date: DateTime<Utc>,
}

/// Fields to overwrite on an existing user; `None` keeps the stored value.
#[derive(Default)]
pub struct UserChanges<'a> {
    pub email: Option<&'a str>,
    pub name: Option<&'a str>,
    pub lastname: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetRow {
    pub id: i64,
    pub name: String,
    pub size: i32,
    pub material: String,
    pub population: i64,
}

impl From<PlanetRow> for Planet {
    fn from(row: PlanetRow) -> Self {
        Planet {
            id: row.id,
            name: row.name,
            size: row.size,
            material: row.material,
            population: row.population,
        }
    }
}

pub struct NewPlanet<'a> {
    pub name: &'a str,
    pub size: i32,
    pub material: &'a str,
    pub population: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRow {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub genre: String,
    pub affiliation: String,
}

impl From<CharacterRow> for Character {
    fn from(row: CharacterRow) -> Self {
        Character {
            id: row.id,
            name: row.name,
            age: row.age,
            genre: row.genre,
            affiliation: row.affiliation,
        }
    }
}

pub struct NewCharacter<'a> {
    pub name: &'a str,
    pub age: i32,
    pub genre: &'a str,
    pub affiliation: &'a str,
}

/// One row of `favorite_planets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoritePlanetRow {
    pub user_id: i64,
    pub planet_id: i64,
}

/// One row of `favorite_characters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteCharacterRow {
    pub user_id: i64,
    pub character_id: i64,
}
