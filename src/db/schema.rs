use log::info;
use rusqlite::{Connection, Result as SqliteResult};

/// Tables owned by the application schema, parents before children.
pub const TABLES: [&str; 8] = [
    "users",
    "files",
    "elo_events",
    "qcm_sessions",
    "qcm_questions",
    "flash_decks",
    "flash_cards",
    "flash_study_sessions",
];

pub fn initialize_database(conn: &Connection) -> SqliteResult<()> {
    info!("Initializing database schema...");

    // Create users table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email VARCHAR(320) NOT NULL,
            username VARCHAR(64) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            newsletter_opt_in BOOLEAN NOT NULL DEFAULT 0,
            university VARCHAR(120),
            study_level VARCHAR(120),
            score INTEGER NOT NULL DEFAULT 100,
            grade VARCHAR(64) NOT NULL DEFAULT 'Primo',
            elo INTEGER NOT NULL DEFAULT 1000,
            plan VARCHAR(32) NOT NULL DEFAULT 'free',
            is_admin BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            last_login_at TIMESTAMP
        );
        CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email);",
    )?;

    // Uploaded documents
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            filename_original VARCHAR(255) NOT NULL,
            filename_stored VARCHAR(255) NOT NULL,
            path VARCHAR(1024) NOT NULL,
            size_bytes INTEGER NOT NULL DEFAULT 0,
            page_count INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            expires_at TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS ix_files_user_id ON files (user_id);",
    )?;

    // Rating history, one row per score change
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS elo_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            source VARCHAR(32) NOT NULL,
            delta INTEGER NOT NULL,
            session_id INTEGER,
            question_index INTEGER,
            meta TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS ix_elo_events_user_id ON elo_events (user_id);",
    )?;

    // Quiz sessions and their generated questions
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS qcm_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            file_id INTEGER,
            difficulty VARCHAR(16) NOT NULL DEFAULT 'medium',
            pages VARCHAR(255),
            status VARCHAR(32) NOT NULL DEFAULT 'generating',
            total INTEGER NOT NULL DEFAULT 0,
            current_index INTEGER NOT NULL DEFAULT 0,
            answered_count INTEGER NOT NULL DEFAULT 0,
            detail TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            finished_at TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
            FOREIGN KEY (file_id) REFERENCES files (id) ON DELETE SET NULL
        );
        CREATE INDEX IF NOT EXISTS ix_qcm_sessions_user_id ON qcm_sessions (user_id);

        CREATE TABLE IF NOT EXISTS qcm_questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id INTEGER NOT NULL,
            \"index\" INTEGER NOT NULL,
            question TEXT NOT NULL,
            choice_a TEXT NOT NULL,
            choice_b TEXT NOT NULL,
            choice_c TEXT NOT NULL,
            choice_d TEXT NOT NULL,
            correct_letter CHAR(1) NOT NULL,
            explanation TEXT,
            chosen_letter CHAR(1),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (session_id) REFERENCES qcm_sessions (id) ON DELETE CASCADE,
            UNIQUE (session_id, \"index\")
        );",
    )?;

    // Flashcards
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS flash_decks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title VARCHAR(200) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS ix_flash_decks_user_id ON flash_decks (user_id);

        CREATE TABLE IF NOT EXISTS flash_cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_id INTEGER NOT NULL,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '',
            source_type VARCHAR(16) NOT NULL DEFAULT 'manual',
            source_file_id INTEGER,
            source_pages VARCHAR(255) NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (deck_id) REFERENCES flash_decks (id) ON DELETE CASCADE,
            FOREIGN KEY (source_file_id) REFERENCES files (id) ON DELETE SET NULL
        );
        CREATE INDEX IF NOT EXISTS ix_flash_cards_deck_id ON flash_cards (deck_id);

        CREATE TABLE IF NOT EXISTS flash_study_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            deck_id INTEGER NOT NULL,
            mode VARCHAR(16) NOT NULL DEFAULT 'classic',
            total INTEGER NOT NULL DEFAULT 0,
            current_index INTEGER NOT NULL DEFAULT 0,
            order_json TEXT NOT NULL DEFAULT '{}',
            stats_json TEXT NOT NULL DEFAULT '{}',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            ended_at TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
            FOREIGN KEY (deck_id) REFERENCES flash_decks (id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS ix_flash_study_sessions_user_id ON flash_study_sessions (user_id);",
    )?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Names of the user tables in `conn`, sorted.
pub fn table_names(conn: &Connection) -> SqliteResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;

    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<SqliteResult<Vec<String>>>()?;
    Ok(names)
}
