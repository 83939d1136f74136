use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        // Roll references to stocks, cameras and batches are plain columns,
        // not foreign keys: deleting a stock or camera leaves rolls pointing
        // at nothing, and population resolves that to null.
        conn.execute_batch(
            "
            CREATE TABLE users (
                id              TEXT PRIMARY KEY,
                email           TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                name            TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE cameras (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id),
                make        TEXT NOT NULL,
                name        TEXT NOT NULL,
                format      TEXT,
                notes       TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX idx_cameras_user ON cameras(user_id);

            CREATE TABLE film_stocks (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id),
                make        TEXT NOT NULL,
                name        TEXT NOT NULL,
                iso         INTEGER,
                format      TEXT,
                film_type   TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX idx_film_stocks_user ON film_stocks(user_id);

            CREATE TABLE chemical_batches (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL REFERENCES users(id),
                name            TEXT NOT NULL,
                description     TEXT,
                chemical_type   TEXT NOT NULL,
                status          TEXT NOT NULL DEFAULT 'in-use',
                notes           TEXT,
                deleted_at      TEXT,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE INDEX idx_chemical_batches_user ON chemical_batches(user_id, deleted_at);

            CREATE TABLE film_rolls (
                id                  TEXT PRIMARY KEY,
                user_id             TEXT NOT NULL REFERENCES users(id),
                film_stock_id       TEXT NOT NULL,
                camera_id           TEXT,
                chemical_batch_id   TEXT,
                date_loaded         TEXT,
                date_finished       TEXT,
                frame_count         INTEGER NOT NULL DEFAULT 36,
                status              TEXT NOT NULL DEFAULT 'loaded',
                notes               TEXT,
                created_at          TEXT NOT NULL,
                updated_at          TEXT NOT NULL
            );

            CREATE INDEX idx_film_rolls_user ON film_rolls(user_id);
            CREATE INDEX idx_film_rolls_status ON film_rolls(user_id, status);
            CREATE INDEX idx_film_rolls_batch ON film_rolls(user_id, chemical_batch_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
