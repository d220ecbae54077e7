use std::time::Duration;

use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::models::{Pet, PetFields};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database wrapper with CRUD operations. Each operation is a single statement.
pub struct Database {
    conn: Connection,
}

fn pet_from_row(row: &Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(0)?,
        name: row.get(1)?,
        species: row.get(2)?,
        age: row.get(3)?,
        owner: row.get(4)?,
    })
}

impl Database {
    /// Open (or create) a SQLite database at the given path.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        crate::db::schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::db::schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// List pets in id order, optionally restricted to an exact species match.
    pub fn list_pets(&self, species: Option<&str>) -> Result<Vec<Pet>> {
        let pets = match species {
            Some(species) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, species, age, owner
                     FROM pets WHERE species = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![species], pet_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT id, name, species, age, owner FROM pets ORDER BY id")?;
                let rows = stmt.query_map([], pet_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(pets)
    }

    /// Get a single pet by id.
    pub fn get_pet(&self, id: i64) -> Result<Option<Pet>> {
        let result = self.conn.query_row(
            "SELECT id, name, species, age, owner FROM pets WHERE id = ?1",
            params![id],
            pet_from_row,
        );

        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a pet and return it with its new id.
    pub fn create_pet(&self, fields: &PetFields) -> Result<Pet> {
        self.conn.execute(
            "INSERT INTO pets (name, species, age, owner) VALUES (?1, ?2, ?3, ?4)",
            params![fields.name, fields.species, fields.age, fields.owner],
        )?;
        let id = self.conn.last_insert_rowid();
        log::debug!("Created pet {} ({})", id, fields.name);
        Ok(fields.clone().into_pet(id))
    }

    /// Overwrite all mutable fields. Returns rows affected; 0 means no such id.
    pub fn update_pet(&self, id: i64, fields: &PetFields) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE pets SET name = ?1, species = ?2, age = ?3, owner = ?4 WHERE id = ?5",
            params![fields.name, fields.species, fields.age, fields.owner, id],
        )?;
        Ok(changed)
    }

    /// Hard delete. Returns rows affected; 0 means no such id.
    pub fn delete_pet(&self, id: i64) -> Result<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM pets WHERE id = ?1", params![id])?;
        Ok(changed)
    }

    /// Mean age over all pets, 0 for an empty table.
    pub fn average_age(&self) -> Result<f64> {
        let avg: f64 = self.conn.query_row(
            "SELECT COALESCE(AVG(age), 0.0) FROM pets",
            [],
            |row| row.get(0),
        )?;
        Ok(avg)
    }

    pub fn count_pets(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pets", [], |row| row.get(0))?;
        Ok(count)
    }
}
