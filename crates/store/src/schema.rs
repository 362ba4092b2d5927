use log::debug;
use rusqlite::{Connection, Result};

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("init_db: checking database schema");
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL
                CHECK (category IN ('text','coding','image','music','video')),
            difficulty TEXT NOT NULL
                CHECK (difficulty IN ('easy','medium','hard'))
        );
        CREATE TABLE IF NOT EXISTS profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            display_name TEXT UNIQUE NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS completions (
            id INTEGER PRIMARY KEY,
            profile_id INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            card_id INTEGER NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
            UNIQUE (profile_id, card_id)
        );
        CREATE INDEX IF NOT EXISTS idx_completions_profile ON completions(profile_id);
        ",
    )
}
