//! Delete-then-recreate of a single SQLite database file.
//!
//! [`reset`] removes the file (and any leftover sidecar files), then hands
//! over to a [`SchemaInitializer`] that builds the tables again. Both steps
//! are fatal on failure; nothing is retried or rolled back.

use log::{debug, error, info};
use serde::{Serialize, Serializer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Suffixes SQLite appends to the database path for its auxiliary files.
pub const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Line printed after the schema capability returned successfully.
pub const TABLES_CREATED: &str = "Tables created.";

/// Capability that creates every table of the current schema.
///
/// Implemented for any `FnMut() -> Result<(), E>` closure, so callers and
/// tests can pass a plain closure instead of a dedicated type.
pub trait SchemaInitializer {
    fn create_all(&mut self) -> Result<(), BoxError>;
}

impl<F, E> SchemaInitializer for F
where
    F: FnMut() -> Result<(), E>,
    E: Into<BoxError>,
{
    fn create_all(&mut self) -> Result<(), BoxError> {
        self().map_err(Into::into)
    }
}

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("Failed to delete {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Schema creation failed: {0}")]
    SchemaInitialization(#[source] BoxError),
}

/// Result record of one reset run.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub path: PathBuf,
    pub existed: bool,
    pub sidecars_removed: Vec<PathBuf>,
    pub schema_created: bool,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ResetError>,
}

fn serialize_error<S: Serializer>(error: &Option<ResetError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

impl Outcome {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            existed: false,
            sidecars_removed: Vec::new(),
            schema_created: false,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.schema_created
    }

    /// Human-readable lines describing the run.
    ///
    /// The branch line appears once the main file is gone, even when a
    /// sidecar removal failed afterwards; the confirmation only when the
    /// schema was created.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(ResetError::FileSystem { path, .. }) = &self.error {
            if *path == self.path {
                return lines;
            }
        }

        if self.existed {
            lines.push(format!("SQLite deleted: {}", self.path.display()));
        } else {
            lines.push(format!("No SQLite file found at: {}", self.path.display()));
        }
        if self.schema_created {
            lines.push(TABLES_CREATED.to_string());
        }
        lines
    }

    pub fn into_result(mut self) -> Result<Self, ResetError> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}

/// Reset the database at a fixed path.
#[derive(Debug, Clone)]
pub struct DatabaseResetter {
    path: PathBuf,
    remove_sidecars: bool,
}

impl DatabaseResetter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            remove_sidecars: true,
        }
    }

    pub fn remove_sidecars(mut self, remove: bool) -> Self {
        self.remove_sidecars = remove;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reset<S: SchemaInitializer + ?Sized>(&self, schema: &mut S) -> Outcome {
        let mut outcome = Outcome::new(&self.path);

        if let Err(e) = self.delete_files(&mut outcome) {
            error!("{e}");
            outcome.error = Some(e);
            return outcome;
        }

        if outcome.existed {
            debug!("SQLite deleted: {}", self.path.display());
        } else {
            debug!("No SQLite file found at: {}", self.path.display());
        }

        debug!("Creating tables for {}", self.path.display());
        match schema.create_all() {
            Ok(()) => {
                outcome.schema_created = true;
                debug!("{TABLES_CREATED}");
            }
            Err(source) => {
                let e = ResetError::SchemaInitialization(source);
                error!("{e}");
                outcome.error = Some(e);
            }
        }

        outcome
    }

    fn delete_files(&self, outcome: &mut Outcome) -> Result<(), ResetError> {
        if self.path.as_os_str().is_empty() {
            return Err(ResetError::FileSystem {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty database path"),
            });
        }

        // symlink_metadata so a dangling link still counts as present
        outcome.existed = fs::symlink_metadata(&self.path).is_ok();
        if outcome.existed {
            remove(&self.path)?;
        }

        if self.remove_sidecars {
            for sidecar in sidecar_paths(&self.path) {
                if fs::symlink_metadata(&sidecar).is_ok() {
                    remove(&sidecar)?;
                    info!("Removed sidecar {}", sidecar.display());
                    outcome.sidecars_removed.push(sidecar);
                }
            }
        }

        Ok(())
    }
}

/// Convenience wrapper around [`DatabaseResetter::reset`] with default settings.
pub fn reset<S: SchemaInitializer + ?Sized>(path: impl Into<PathBuf>, schema: &mut S) -> Outcome {
    DatabaseResetter::new(path).reset(schema)
}

pub fn sidecar_paths(path: &Path) -> Vec<PathBuf> {
    SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut name = path.as_os_str().to_os_string();
            name.push(suffix);
            PathBuf::from(name)
        })
        .collect()
}

fn remove(path: &Path) -> Result<(), ResetError> {
    fs::remove_file(path).map_err(|source| ResetError::FileSystem {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        let calls = Cell::new(0);

        let outcome = reset(&path, &mut || {
            calls.set(calls.get() + 1);
            Ok::<(), io::Error>(())
        });

        assert!(outcome.is_success());
        assert!(!outcome.existed);
        assert_eq!(calls.get(), 1);
        assert_eq!(
            outcome.status_lines(),
            vec![
                format!("No SQLite file found at: {}", path.display()),
                TABLES_CREATED.to_string(),
            ]
        );
    }

    #[test]
    fn existing_file_is_gone_before_schema_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        fs::write(&path, b"old data").unwrap();

        let mut seen_absent = None;
        let outcome = reset(&path, &mut || {
            seen_absent = Some(!path.exists());
            Ok::<(), io::Error>(())
        });

        assert!(outcome.is_success());
        assert!(outcome.existed);
        assert_eq!(seen_absent, Some(true));
        assert_eq!(
            outcome.status_lines()[0],
            format!("SQLite deleted: {}", path.display())
        );
    }

    #[test]
    fn delete_failure_skips_schema_creation() {
        let dir = tempdir().unwrap();
        // remove_file refuses directories, even for root
        let path = dir.path().join("app.db");
        fs::create_dir(&path).unwrap();
        let calls = Cell::new(0);

        let outcome = reset(&path, &mut || {
            calls.set(calls.get() + 1);
            Ok::<(), io::Error>(())
        });

        assert_eq!(calls.get(), 0);
        assert!(outcome.existed);
        assert!(!outcome.schema_created);
        assert!(matches!(outcome.error, Some(ResetError::FileSystem { .. })));
        assert!(outcome.status_lines().is_empty());
    }

    #[test]
    fn schema_failure_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");

        let outcome = reset(&path, &mut || {
            Err::<(), _>(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        });

        assert!(!outcome.is_success());
        assert!(!outcome.schema_created);
        let lines = outcome.status_lines();
        assert!(!lines.iter().any(|l| l == TABLES_CREATED));

        let err = outcome.into_result().unwrap_err();
        assert!(matches!(err, ResetError::SchemaInitialization(_)));
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn empty_path_is_rejected() {
        let calls = Cell::new(0);
        let outcome = reset("", &mut || {
            calls.set(calls.get() + 1);
            Ok::<(), io::Error>(())
        });

        assert_eq!(calls.get(), 0);
        assert!(matches!(outcome.error, Some(ResetError::FileSystem { .. })));
    }

    #[test]
    fn sidecars_are_removed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        fs::write(&path, b"db").unwrap();
        fs::write(dir.path().join("app.db-wal"), b"wal").unwrap();
        fs::write(dir.path().join("app.db-shm"), b"shm").unwrap();

        let outcome = reset(&path, &mut || Ok::<(), io::Error>(()));

        assert!(outcome.is_success());
        assert_eq!(outcome.sidecars_removed.len(), 2);
        assert!(!dir.path().join("app.db-wal").exists());
        assert!(!dir.path().join("app.db-shm").exists());
    }

    #[test]
    fn sidecar_failure_still_reports_main_deletion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        fs::write(&path, b"db").unwrap();
        fs::create_dir(dir.path().join("app.db-wal")).unwrap();
        let calls = Cell::new(0);

        let outcome = reset(&path, &mut || {
            calls.set(calls.get() + 1);
            Ok::<(), io::Error>(())
        });

        assert_eq!(calls.get(), 0);
        assert!(outcome.existed);
        assert!(!path.exists());
        match &outcome.error {
            Some(ResetError::FileSystem { path: failed, .. }) => {
                assert_eq!(*failed, dir.path().join("app.db-wal"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            outcome.status_lines(),
            vec![format!("SQLite deleted: {}", path.display())]
        );
    }

    #[test]
    fn sidecars_can_be_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.db");
        let wal = dir.path().join("app.db-wal");
        fs::write(&wal, b"wal").unwrap();

        let outcome = DatabaseResetter::new(&path)
            .remove_sidecars(false)
            .reset(&mut || Ok::<(), io::Error>(()));

        assert!(outcome.is_success());
        assert!(outcome.sidecars_removed.is_empty());
        assert!(wal.exists());
    }

    #[test]
    fn sidecar_paths_append_suffixes() {
        let paths = sidecar_paths(Path::new("./app.db"));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("./app.db-wal"),
                PathBuf::from("./app.db-shm"),
                PathBuf::from("./app.db-journal"),
            ]
        );
    }

    #[test]
    fn outcome_serializes_error_as_text() {
        let outcome = reset("", &mut || Ok::<(), io::Error>(()));
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["existed"], false);
        assert_eq!(json["schema_created"], false);
        assert!(json["error"].as_str().unwrap().contains("empty database path"));
    }
}
