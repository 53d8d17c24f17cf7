use serde::{Deserialize, Serialize};

use crate::models::{Character, Planet};

// -- Generic --

/// Body of every error response and of plain confirmations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Sitemap {
    pub routes: Vec<RouteInfo>,
}

// -- Users --

/// Used for both create (email, name, lastname and password required) and
/// update (merge whichever are present).
#[derive(Debug, Default, Deserialize)]
pub struct UserFields {
    pub email: Option<String>,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

impl UserFields {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.lastname.is_none()
            && self.password.is_none()
            && self.is_active.is_none()
    }
}

// -- Planets --

/// Planet fields as sent by clients. Creation requires every field,
/// updates merge whichever are present.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PlanetFields {
    pub name: Option<String>,
    pub size: Option<i32>,
    pub material: Option<String>,
    pub population: Option<i64>,
}

impl PlanetFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.size.is_none()
            && self.material.is_none()
            && self.population.is_none()
    }
}

// -- Characters --

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CharacterFields {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub genre: Option<String>,
    pub affiliation: Option<String>,
}

impl CharacterFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.genre.is_none()
            && self.affiliation.is_none()
    }
}

// -- Favorites --

#[derive(Debug, Serialize, Deserialize)]
pub struct Favorites {
    pub planets: Vec<Planet>,
    pub characters: Vec<Character>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub user_id: i64,
    pub favorites: Favorites,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoritePlanetAdded {
    pub message: String,
    pub user_id: i64,
    pub planet_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteCharacterAdded {
    pub message: String,
    pub user_id: i64,
    pub character_id: i64,
}
