pub mod config;
pub mod db;
pub mod reset;

pub use db::SqliteSchema;
pub use reset::{reset, DatabaseResetter, Outcome, ResetError, SchemaInitializer};
