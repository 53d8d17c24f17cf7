//! User ↔ Planet and User ↔ Character favorite relations.
//!
//! Each mutation runs its existence checks and the insert/delete inside one
//! IMMEDIATE transaction, and the join tables carry a composite primary key,
//! so a (user, target) pair can never be stored twice.

use rusqlite::{Connection, TransactionBehavior, params};
use tracing::debug;

use crate::models::{CharacterRow, PlanetRow};
use crate::queries::{character_from_row, planet_from_row};
use crate::{Database, DbError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteTarget {
    Planet,
    Character,
}

impl FavoriteTarget {
    fn relation_table(self) -> &'static str {
        match self {
            FavoriteTarget::Planet => "favorite_planets",
            FavoriteTarget::Character => "favorite_characters",
        }
    }

    fn target_table(self) -> &'static str {
        match self {
            FavoriteTarget::Planet => "planets",
            FavoriteTarget::Character => "characters",
        }
    }

    fn target_column(self) -> &'static str {
        match self {
            FavoriteTarget::Planet => "planet_id",
            FavoriteTarget::Character => "character_id",
        }
    }
}

/// Result of an add. Anything but `Added` left the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFavorite {
    Added,
    TargetNotFound,
    UserNotFound,
    AlreadyFavorited,
}

/// Result of a remove. Anything but `Removed` left the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveFavorite {
    Removed,
    TargetNotFound,
    UserNotFound,
    NotFavorited,
}

pub struct UserFavorites {
    pub planets: Vec<PlanetRow>,
    pub characters: Vec<CharacterRow>,
}

impl Database {
    /// Target is resolved before the user, so a missing target wins when
    /// both are absent.
    pub fn add_favorite(
        &self,
        target: FavoriteTarget,
        user_id: i64,
        target_id: i64,
    ) -> Result<AddFavorite> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !id_exists(&tx, target.target_table(), target_id)? {
                return Ok(AddFavorite::TargetNotFound);
            }
            if !id_exists(&tx, "users", user_id)? {
                return Ok(AddFavorite::UserNotFound);
            }
            if pair_exists(&tx, target, user_id, target_id)? {
                return Ok(AddFavorite::AlreadyFavorited);
            }

            let sql = format!(
                "INSERT INTO {} ({}, user_id) VALUES (?1, ?2)",
                target.relation_table(),
                target.target_column()
            );
            if let Err(e) = tx.execute(&sql, params![target_id, user_id]) {
                let err = DbError::from(e);
                if err.is_constraint_violation() {
                    return Ok(AddFavorite::AlreadyFavorited);
                }
                return Err(err);
            }

            tx.commit()?;
            debug!(?target, user_id, target_id, "favorite added");
            Ok(AddFavorite::Added)
        })
    }

    pub fn remove_favorite(
        &self,
        target: FavoriteTarget,
        user_id: i64,
        target_id: i64,
    ) -> Result<RemoveFavorite> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !id_exists(&tx, target.target_table(), target_id)? {
                return Ok(RemoveFavorite::TargetNotFound);
            }
            if !id_exists(&tx, "users", user_id)? {
                return Ok(RemoveFavorite::UserNotFound);
            }

            let sql = format!(
                "DELETE FROM {} WHERE {} = ?1 AND user_id = ?2",
                target.relation_table(),
                target.target_column()
            );
            if tx.execute(&sql, params![target_id, user_id])? == 0 {
                return Ok(RemoveFavorite::NotFavorited);
            }

            tx.commit()?;
            debug!(?target, user_id, target_id, "favorite removed");
            Ok(RemoveFavorite::Removed)
        })
    }

    pub fn add_favorite_planet(&self, user_id: i64, planet_id: i64) -> Result<AddFavorite> {
        self.add_favorite(FavoriteTarget::Planet, user_id, planet_id)
    }

    pub fn add_favorite_character(&self, user_id: i64, character_id: i64) -> Result<AddFavorite> {
        self.add_favorite(FavoriteTarget::Character, user_id, character_id)
    }

    pub fn remove_favorite_planet(&self, user_id: i64, planet_id: i64) -> Result<RemoveFavorite> {
        self.remove_favorite(FavoriteTarget::Planet, user_id, planet_id)
    }

    pub fn remove_favorite_character(
        &self,
        user_id: i64,
        character_id: i64,
    ) -> Result<RemoveFavorite> {
        self.remove_favorite(FavoriteTarget::Character, user_id, character_id)
    }

    /// `None` when the user does not exist. Both lists are read under one
    /// lock so they reflect the same point in time.
    pub fn list_favorites(&self, user_id: i64) -> Result<Option<UserFavorites>> {
        self.with_conn(|conn| {
            if !id_exists(conn, "users", user_id)? {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                "SELECT p.id, p.name, p.size, p.material, p.population
                 FROM favorite_planets f
                 JOIN planets p ON p.id = f.planet_id
                 WHERE f.user_id = ?1
                 ORDER BY p.id",
            )?;
            let planets = stmt
                .query_map([user_id], planet_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut stmt = conn.prepare(
                "SELECT c.id, c.name, c.age, c.genre, c.affiliation
                 FROM favorite_characters f
                 JOIN characters c ON c.id = f.character_id
                 WHERE f.user_id = ?1
                 ORDER BY c.id",
            )?;
            let characters = stmt
                .query_map([user_id], character_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Some(UserFavorites {
                planets,
                characters,
            }))
        })
    }
}

/// Raw join rows, for asserting on the relation tables directly.
#[cfg(test)]
impl Database {
    pub(crate) fn favorite_planet_rows(
        &self,
        user_id: i64,
    ) -> Result<Vec<crate::models::FavoritePlanetRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, planet_id FROM favorite_planets WHERE user_id = ?1 ORDER BY planet_id",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(crate::models::FavoritePlanetRow {
                        user_id: row.get(0)?,
                        planet_id: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub(crate) fn favorite_character_rows(
        &self,
        user_id: i64,
    ) -> Result<Vec<crate::models::FavoriteCharacterRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, character_id FROM favorite_characters WHERE user_id = ?1 ORDER BY character_id",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(crate::models::FavoriteCharacterRow {
                        user_id: row.get(0)?,
                        character_id: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn id_exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    Ok(conn.query_row(&sql, [id], |row| row.get(0))?)
}

fn pair_exists(conn: &Connection, target: FavoriteTarget, user_id: i64, target_id: i64) -> Result<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1 AND user_id = ?2)",
        target.relation_table(),
        target.target_column()
    );
    Ok(conn.query_row(&sql, params![target_id, user_id], |row| row.get(0))?)
}
