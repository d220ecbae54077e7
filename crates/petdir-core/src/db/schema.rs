use rusqlite::Connection;

use crate::error::Result;

pub fn create_tables(conn: &Connection) -> Result<()> {
    // AUTOINCREMENT keeps deleted ids from being handed out again.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            species TEXT NOT NULL,
            age REAL NOT NULL,
            owner TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pets_species ON pets(species);
        ",
    )?;
    Ok(())
}
