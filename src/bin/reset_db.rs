use colored::*;
use db_reset::{config::Config, DatabaseResetter, SqliteSchema};

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let matches = Config::reset_command().get_matches();
    let config = Config::from_matches(&matches);

    let resetter =
        DatabaseResetter::new(&config.database_path).remove_sidecars(!config.keep_sidecars);
    let mut schema = SqliteSchema::new(&config.database_path);

    let outcome = resetter.reset(&mut schema);

    for line in outcome.status_lines() {
        println!("{} {}", "✓".green(), line);
    }
    if config.json {
        match serde_json::to_string(&outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{} failed to serialize outcome: {}", "error:".red().bold(), e),
        }
    }

    if let Err(e) = outcome.into_result() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
