use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_pets_table(conn)?;
    create_health_records_table(conn)?;
    create_health_records_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the pets table
fn create_pets_table(conn: &Connection) -> Result<(), String> {
    info!("Creating pets table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS pets (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            species TEXT NOT NULL,
            breed TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            weight REAL NOT NULL,
            height REAL NOT NULL,
            gender TEXT NOT NULL,
            is_neutered INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_pets_user_id ON pets (user_id, created_at DESC)",
        [],
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}

/// Create the health records table
fn create_health_records_table(conn: &Connection) -> Result<(), String> {
    info!("Creating health_records table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS health_records (
            id TEXT PRIMARY KEY,
            pet_id TEXT NOT NULL REFERENCES pets (id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            weight REAL,
            height REAL,
            activity_type TEXT,
            activity_duration INTEGER,
            activity_intensity TEXT,
            calories REAL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on (pet_id, date) for the per-pet listing
fn create_health_records_index(conn: &Connection) -> Result<(), String> {
    info!("Creating index on health_records (pet_id, date)");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_health_records_pet_date
        ON health_records (pet_id, date DESC)",
        [],
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}
