use log::{debug, info};
use rusqlite::{Connection, Error as SqliteError};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::reset::{BoxError, SchemaInitializer};

pub mod schema;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] SqliteError),
}

pub type DbResult<T> = Result<T, DbError>;

/// Opens `db_path` and makes sure every table exists.
///
/// The file is created when missing. Foreign key enforcement is switched on
/// for the returned connection.
pub fn open_database(db_path: &Path) -> DbResult<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    schema::initialize_database(&conn)?;

    Ok(conn)
}

/// Production schema capability for the reset operation.
///
/// Holds only the path. The connection is opened inside
/// [`SqliteSchema::create_all`], after the old file is gone, so no handle
/// opened against the deleted database is ever reused.
#[derive(Debug, Clone)]
pub struct SqliteSchema {
    path: PathBuf,
}

impl SqliteSchema {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates all tables and returns the names of the tables now present.
    pub fn create_all(&self) -> DbResult<Vec<String>> {
        info!("Connecting to {}", self.path.display());
        let conn = open_database(&self.path)?;
        let tables = schema::table_names(&conn)?;
        debug!("Schema now holds {} tables: {}", tables.len(), tables.join(", "));
        Ok(tables)
    }
}

impl SchemaInitializer for SqliteSchema {
    fn create_all(&mut self) -> Result<(), BoxError> {
        SqliteSchema::create_all(self)?;
        Ok(())
    }
}
