use rusqlite::{params_from_iter, Row, ToSql};
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::health_record::{HealthRecord, RecordQuery};
use crate::models::pet::Pet;
use super::errors::RepositoryError;

const PET_COLUMNS: &str =
    "id, user_id, name, species, breed, birth_date, weight, height, gender, is_neutered, created_at, updated_at";

const RECORD_COLUMNS: &str =
    "id, pet_id, date, weight, height, activity_type, activity_duration, activity_intensity, calories, notes, created_at, updated_at";

/// Database storage operations for pets and health records
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Store a pet in the database
    pub async fn insert_pet(pool: &DatabasePool, pet: &Pet) -> Result<(), RepositoryError> {
        debug!("Storing pet in database: id={}", pet.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    &format!("INSERT INTO pets ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)", PET_COLUMNS),
                    (
                        &pet.id,
                        &pet.user_id,
                        &pet.name,
                        &pet.species,
                        &pet.breed,
                        &pet.birth_date,
                        pet.weight,
                        pet.height,
                        &pet.gender,
                        pet.is_neutered,
                        &pet.created_at,
                        &pet.updated_at,
                    ),
                )?;

                Ok(())
            }
        }
    }

    /// Get a pet by ID from the database
    pub async fn get_pet_by_id(pool: &DatabasePool, id: &str) -> Result<Option<Pet>, RepositoryError> {
        debug!("Getting pet by ID from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!("SELECT {} FROM pets WHERE id = ?1", PET_COLUMNS))?;

                match stmt.query_row([id], pet_from_row) {
                    Ok(pet) => Ok(Some(pet)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(RepositoryError::Sqlite(e)),
                }
            }
        }
    }

    /// Get a page of the pets owned by a user, newest first, plus the total count
    pub async fn list_pets_by_owner(
        pool: &DatabasePool,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Pet>, usize), RepositoryError> {
        debug!("Listing pets for user {} (limit={}, offset={})", user_id, limit, offset);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM pets WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
                    PET_COLUMNS
                ))?;

                let pets = stmt
                    .query_map((user_id, sql_count(limit), sql_count(offset)), pet_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM pets WHERE user_id = ?1",
                    [user_id],
                    |row| row.get(0),
                )?;

                Ok((pets, total as usize))
            }
        }
    }

    /// Store a health record in the database
    pub async fn insert_record(pool: &DatabasePool, record: &HealthRecord) -> Result<(), RepositoryError> {
        debug!("Storing health record in database: id={}", record.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    &format!("INSERT INTO health_records ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)", RECORD_COLUMNS),
                    (
                        &record.id,
                        &record.pet_id,
                        &record.date,
                        record.weight,
                        record.height,
                        &record.activity_type,
                        record.activity_duration,
                        &record.activity_intensity,
                        record.calories,
                        &record.notes,
                        &record.created_at,
                        &record.updated_at,
                    ),
                )?;

                Ok(())
            }
        }
    }

    /// Get a health record by ID from the database
    pub async fn get_record_by_id(pool: &DatabasePool, id: &str) -> Result<Option<HealthRecord>, RepositoryError> {
        debug!("Getting health record by ID from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!("SELECT {} FROM health_records WHERE id = ?1", RECORD_COLUMNS))?;

                match stmt.query_row([id], record_from_row) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(RepositoryError::Sqlite(e)),
                }
            }
        }
    }

    /// Get the records of a pet, newest first
    pub async fn list_records_by_pet(
        pool: &DatabasePool,
        pet_id: &str,
        query: &RecordQuery,
    ) -> Result<Vec<HealthRecord>, RepositoryError> {
        debug!("Listing health records for pet {} with {:?}", pet_id, query);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let limit = query.limit.map(sql_count);

                let mut sql = format!("SELECT {} FROM health_records WHERE pet_id = ?", RECORD_COLUMNS);
                let mut params: Vec<&dyn ToSql> = vec![&pet_id];

                if let Some(ref start) = query.start_date {
                    sql.push_str(" AND date >= ?");
                    params.push(start);
                }

                if let Some(ref end) = query.end_date {
                    sql.push_str(" AND date <= ?");
                    params.push(end);
                }

                sql.push_str(" ORDER BY date DESC, created_at DESC");

                if let Some(ref limit) = limit {
                    sql.push_str(" LIMIT ?");
                    params.push(limit);
                }

                let mut stmt = conn.prepare(&sql)?;
                let records = stmt
                    .query_map(params_from_iter(params.iter()), record_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(records)
            }
        }
    }

    /// Overwrite a stored health record. Returns the number of rows changed.
    pub async fn update_record(pool: &DatabasePool, record: &HealthRecord) -> Result<usize, RepositoryError> {
        debug!("Updating health record in database: id={}", record.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let changed = conn.execute(
                    "UPDATE health_records SET
                        date = ?2, weight = ?3, height = ?4, activity_type = ?5,
                        activity_duration = ?6, activity_intensity = ?7, calories = ?8,
                        notes = ?9, updated_at = ?10
                     WHERE id = ?1",
                    (
                        &record.id,
                        &record.date,
                        record.weight,
                        record.height,
                        &record.activity_type,
                        record.activity_duration,
                        &record.activity_intensity,
                        record.calories,
                        &record.notes,
                        &record.updated_at,
                    ),
                )?;

                Ok(changed)
            }
        }
    }

    /// Delete a health record. Returns whether a row was removed.
    pub async fn delete_record(pool: &DatabasePool, id: &str) -> Result<bool, RepositoryError> {
        debug!("Deleting health record from database: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let changed = conn.execute("DELETE FROM health_records WHERE id = ?1", [id])?;
                Ok(changed > 0)
            }
        }
    }
}

/// Bind a row count as an SQLite integer, saturating at `i64::MAX`
fn sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn pet_from_row(row: &Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        breed: row.get(4)?,
        birth_date: row.get(5)?,
        weight: row.get(6)?,
        height: row.get(7)?,
        gender: row.get(8)?,
        is_neutered: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<HealthRecord> {
    Ok(HealthRecord {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        date: row.get(2)?,
        weight: row.get(3)?,
        height: row.get(4)?,
        activity_type: row.get(5)?,
        activity_duration: row.get(6)?,
        activity_intensity: row.get(7)?,
        calories: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}
