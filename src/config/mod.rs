use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};

/// File reset and created when no `--database` is given.
pub const DEFAULT_DATABASE: &str = "app.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub keep_sidecars: bool,
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: Path::new(".").join(DEFAULT_DATABASE),
            keep_sidecars: false,
            json: false,
        }
    }
}

impl Config {
    /// Arguments shared by every binary of the crate.
    ///
    /// The database path is read from the command line only, never from
    /// the environment.
    pub fn command(name: &'static str, about: &'static str) -> Command<'static> {
        Command::new(name).about(about).arg(
            Arg::new("database")
                .short('d')
                .long("database")
                .value_name("PATH")
                .takes_value(true)
                .help("SQLite file to operate on [default: ./app.db]"),
        )
    }

    /// `reset_db` arguments on top of [`Config::command`].
    pub fn reset_command() -> Command<'static> {
        Self::command("reset_db", "Delete the SQLite database and recreate its tables")
            .arg(
                Arg::new("keep-sidecars")
                    .long("keep-sidecars")
                    .action(ArgAction::SetTrue)
                    .help("Leave -wal, -shm and -journal files in place"),
            )
            .arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Print the outcome as a JSON line"),
            )
    }

    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut config = Self::default();

        if let Some(path) = matches.get_one::<String>("database") {
            config.database_path = PathBuf::from(path);
        }
        config.keep_sidecars = flag(matches, "keep-sidecars");
        config.json = flag(matches, "json");

        config
    }
}

// Flags a command does not define read as unset.
fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}
