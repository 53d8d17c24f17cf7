use galaxy_types::api::{CharacterFields, PlanetFields};
use rusqlite::{Connection, Row, params};

use crate::models::{
    CharacterRow, NewCharacter, NewPlanet, NewUser, PlanetRow, UserChanges, UserRow,
};
use crate::{Database, Result};

const USER_COLUMNS: &str = "id, email, name, lastname, subscription_date, password, is_active";
const PLANET_COLUMNS: &str = "id, name, size, material, population";
const CHARACTER_COLUMNS: &str = "id, name, age, genre, affiliation";

impl Database {
    // -- Users --

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                [email],
                user_from_row,
            )
            .optional()
        })
    }

    /// Fails with a constraint violation when the email is taken.
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<UserRow> {
        let subscription_date = user.subscription_date.to_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (email, name, lastname, subscription_date, password, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.email,
                    user.name,
                    user.lastname,
                    subscription_date,
                    user.password_hash,
                    user.is_active
                ],
            )?;

            Ok(UserRow {
                id: conn.last_insert_rowid(),
                email: user.email.to_string(),
                name: user.name.to_string(),
                lastname: user.lastname.to_string(),
                subscription_date,
                password: user.password_hash.to_string(),
                is_active: user.is_active,
            })
        })
    }

    /// Merge the given changes into the stored user. `None` if absent; a
    /// constraint violation if the new email belongs to another user.
    pub fn update_user(&self, id: i64, changes: &UserChanges<'_>) -> Result<Option<UserRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(mut row) = query_user_by_id(&tx, id)? else {
                return Ok(None);
            };

            if let Some(email) = changes.email {
                row.email = email.to_string();
            }
            if let Some(name) = changes.name {
                row.name = name.to_string();
            }
            if let Some(lastname) = changes.lastname {
                row.lastname = lastname.to_string();
            }
            if let Some(password_hash) = changes.password_hash {
                row.password = password_hash.to_string();
            }
            if let Some(is_active) = changes.is_active {
                row.is_active = is_active;
            }

            tx.execute(
                "UPDATE users SET email = ?1, name = ?2, lastname = ?3, password = ?4, is_active = ?5
                 WHERE id = ?6",
                params![row.email, row.name, row.lastname, row.password, row.is_active, id],
            )?;
            tx.commit()?;
            Ok(Some(row))
        })
    }

    /// Returns false if no such user existed. Favorite rows cascade.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Planets --

    pub fn list_planets(&self) -> Result<Vec<PlanetRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {PLANET_COLUMNS} FROM planets ORDER BY id"))?;
            let rows = stmt
                .query_map([], planet_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_planet(&self, id: i64) -> Result<Option<PlanetRow>> {
        self.with_conn(|conn| query_planet_by_id(conn, id))
    }

    pub fn get_planet_by_name(&self, name: &str) -> Result<Option<PlanetRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {PLANET_COLUMNS} FROM planets WHERE name = ?1"),
                [name],
                planet_from_row,
            )
            .optional()
        })
    }

    /// Fails with a constraint violation when the name is taken.
    pub fn create_planet(&self, planet: &NewPlanet<'_>) -> Result<PlanetRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO planets (name, size, material, population) VALUES (?1, ?2, ?3, ?4)",
                params![planet.name, planet.size, planet.material, planet.population],
            )?;

            Ok(PlanetRow {
                id: conn.last_insert_rowid(),
                name: planet.name.to_string(),
                size: planet.size,
                material: planet.material.to_string(),
                population: planet.population,
            })
        })
    }

    /// Merge the provided fields into the stored planet. `None` if absent.
    pub fn update_planet(&self, id: i64, changes: &PlanetFields) -> Result<Option<PlanetRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(mut row) = query_planet_by_id(&tx, id)? else {
                return Ok(None);
            };

            if let Some(name) = &changes.name {
                row.name = name.clone();
            }
            if let Some(size) = changes.size {
                row.size = size;
            }
            if let Some(material) = &changes.material {
                row.material = material.clone();
            }
            if let Some(population) = changes.population {
                row.population = population;
            }

            tx.execute(
                "UPDATE planets SET name = ?1, size = ?2, material = ?3, population = ?4 WHERE id = ?5",
                params![row.name, row.size, row.material, row.population, id],
            )?;
            tx.commit()?;
            Ok(Some(row))
        })
    }

    /// Returns false if no such planet existed. Favorite rows cascade.
    pub fn delete_planet(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM planets WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Characters --

    pub fn list_characters(&self) -> Result<Vec<CharacterRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {CHARACTER_COLUMNS} FROM characters ORDER BY id"))?;
            let rows = stmt
                .query_map([], character_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_character(&self, id: i64) -> Result<Option<CharacterRow>> {
        self.with_conn(|conn| query_character_by_id(conn, id))
    }

    pub fn get_character_by_name(&self, name: &str) -> Result<Option<CharacterRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {CHARACTER_COLUMNS} FROM characters WHERE name = ?1"),
                [name],
                character_from_row,
            )
            .optional()
        })
    }

    pub fn create_character(&self, character: &NewCharacter<'_>) -> Result<CharacterRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO characters (name, age, genre, affiliation) VALUES (?1, ?2, ?3, ?4)",
                params![character.name, character.age, character.genre, character.affiliation],
            )?;

            Ok(CharacterRow {
                id: conn.last_insert_rowid(),
                name: character.name.to_string(),
                age: character.age,
                genre: character.genre.to_string(),
                affiliation: character.affiliation.to_string(),
            })
        })
    }

    pub fn update_character(
        &self,
        id: i64,
        changes: &CharacterFields,
    ) -> Result<Option<CharacterRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(mut row) = query_character_by_id(&tx, id)? else {
                return Ok(None);
            };

            if let Some(name) = &changes.name {
                row.name = name.clone();
            }
            if let Some(age) = changes.age {
                row.age = age;
            }
            if let Some(genre) = &changes.genre {
                row.genre = genre.clone();
            }
            if let Some(affiliation) = &changes.affiliation {
                row.affiliation = affiliation.clone();
            }

            tx.execute(
                "UPDATE characters SET name = ?1, age = ?2, genre = ?3, affiliation = ?4 WHERE id = ?5",
                params![row.name, row.age, row.genre, row.affiliation, id],
            )?;
            tx.commit()?;
            Ok(Some(row))
        })
    }

    pub fn delete_character(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM characters WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

pub(crate) fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        [id],
        user_from_row,
    )
    .optional()
}

pub(crate) fn query_planet_by_id(conn: &Connection, id: i64) -> Result<Option<PlanetRow>> {
    conn.query_row(
        &format!("SELECT {PLANET_COLUMNS} FROM planets WHERE id = ?1"),
        [id],
        planet_from_row,
    )
    .optional()
}

pub(crate) fn query_character_by_id(conn: &Connection, id: i64) -> Result<Option<CharacterRow>> {
    conn.query_row(
        &format!("SELECT {CHARACTER_COLUMNS} FROM characters WHERE id = ?1"),
        [id],
        character_from_row,
    )
    .optional()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        lastname: row.get(3)?,
        subscription_date: row.get(4)?,
        password: row.get(5)?,
        is_active: row.get(6)?,
    })
}

/// Expects the columns in `PLANET_COLUMNS` order, optionally table-qualified.
pub(crate) fn planet_from_row(row: &Row<'_>) -> rusqlite::Result<PlanetRow> {
    Ok(PlanetRow {
        id: row.get(0)?,
        name: row.get(1)?,
        size: row.get(2)?,
        material: row.get(3)?,
        population: row.get(4)?,
    })
}

pub(crate) fn character_from_row(row: &Row<'_>) -> rusqlite::Result<CharacterRow> {
    Ok(CharacterRow {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        genre: row.get(3)?,
        affiliation: row.get(4)?,
    })
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
