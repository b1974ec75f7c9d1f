use colored::*;
use db_reset::{config::Config, SqliteSchema};

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let matches = Config::command("init_db", "Create any missing tables, keeping existing data")
        .get_matches();
    let config = Config::from_matches(&matches);

    match SqliteSchema::new(&config.database_path).create_all() {
        Ok(tables) => {
            println!(
                "{} Database ready at {} ({} tables)",
                "✓".green(),
                config.database_path.display(),
                tables.len()
            );
        }
        Err(e) => {
            eprintln!("{} Failed to initialize database: {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
