use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                email               TEXT NOT NULL UNIQUE,
                name                TEXT NOT NULL,
                lastname            TEXT NOT NULL,
                subscription_date   TEXT NOT NULL,
                password            TEXT NOT NULL,
                is_active           INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE planets (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE,
                size        INTEGER NOT NULL,
                material    TEXT NOT NULL,
                population  INTEGER NOT NULL
            );

            CREATE TABLE characters (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE,
                age         INTEGER NOT NULL,
                genre       TEXT NOT NULL,
                affiliation TEXT NOT NULL
            );

            CREATE TABLE favorite_planets (
                planet_id   INTEGER NOT NULL REFERENCES planets(id) ON DELETE CASCADE,
                user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                PRIMARY KEY (planet_id, user_id)
            );

            CREATE INDEX idx_favorite_planets_user ON favorite_planets(user_id);

            CREATE TABLE favorite_characters (
                character_id    INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
                user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                PRIMARY KEY (character_id, user_id)
            );

            CREATE INDEX idx_favorite_characters_user ON favorite_characters(user_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
