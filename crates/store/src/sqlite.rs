use crate::schema::init_db;
use log::{debug, error, info, warn};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use taskdraw_core::{
    normalize_display_name, timestamp_now, Card, CardId, CardStore, Category, CompletionStore,
    Difficulty, Profile, ProfileCreation, ProfileId, ProfileStore, StoreError,
};

/// SQLite-backed store. The connection mutex plus an `IMMEDIATE`
/// transaction serialize every check-then-write.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

fn db_err(err: rusqlite::Error) -> StoreError {
    error!("sqlite: {err}");
    StoreError::Unavailable(err.to_string())
}

fn text_enum<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unexpected value {raw:?}").into(),
        )
    })
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: text_enum(row, 3, Category::from_id)?,
        difficulty: text_enum(row, 4, Difficulty::from_id)?,
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        display_name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn profile_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<Profile>> {
    conn.query_row(
        "SELECT id, display_name, created_at FROM profiles WHERE display_name = ?",
        [name],
        profile_from_row,
    )
    .optional()
}

fn require_profile(conn: &Connection, id: ProfileId) -> Result<(), StoreError> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM profiles WHERE id = ?", [id], |row| row.get(0))
        .optional()
        .map_err(db_err)?;
    found.map(|_| ()).ok_or(StoreError::profile_not_found(id))
}

fn require_card(conn: &Connection, id: CardId) -> Result<(), StoreError> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM cards WHERE id = ?", [id], |row| row.get(0))
        .optional()
        .map_err(db_err)?;
    found.map(|_| ()).ok_or(StoreError::card_not_found(id))
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("opening database {}", path.display());
        let conn = Connection::open(path).map_err(db_err)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        init_db(&conn).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("database lock poisoned".to_string()))
    }

    /// Inserts the catalog when the cards table is empty. Returns the
    /// number of cards written.
    pub fn seed_cards(&self, cards: &[Card]) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT count(*) FROM cards", [], |row| row.get(0))
            .map_err(db_err)?;
        if count > 0 {
            if usize::try_from(count).ok() != Some(cards.len()) {
                warn!(
                    "database already holds {count} cards; the given catalog of {} cards is ignored",
                    cards.len()
                );
            } else {
                debug!("seed_cards: {count} cards already present");
            }
            return Ok(0);
        }
        let tx = conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO cards (id, title, description, category, difficulty)
                     VALUES (?, ?, ?, ?, ?)",
                )
                .map_err(db_err)?;
            for card in cards {
                stmt.execute(params![
                    card.id,
                    card.title,
                    card.description,
                    card.category.id(),
                    card.difficulty.id()
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;
        info!("seeded {} cards", cards.len());
        Ok(cards.len())
    }
}

impl CardStore for SqliteStore {
    fn all_cards(&self) -> Result<Vec<Card>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, title, description, category, difficulty FROM cards ORDER BY id")
            .map_err(db_err)?;
        let cards = stmt
            .query_map([], card_from_row)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(cards)
    }

    fn cards_in_category(&self, category: Category) -> Result<Vec<Card>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, title, description, category, difficulty FROM cards
                 WHERE category = ? ORDER BY id",
            )
            .map_err(db_err)?;
        let cards = stmt
            .query_map([category.id()], card_from_row)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(cards)
    }
}

impl ProfileStore for SqliteStore {
    fn create_profile(&self, display_name: &str) -> Result<ProfileCreation, StoreError> {
        let name = normalize_display_name(display_name)?;
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(db_err)?;
        if let Some(existing) = profile_by_name(&tx, &name).map_err(db_err)? {
            debug!("profile {:?} already exists as {}", name, existing.id);
            return Ok(ProfileCreation {
                profile: existing,
                created: false,
            });
        }
        let created_at = timestamp_now();
        tx.execute(
            "INSERT INTO profiles (display_name, created_at) VALUES (?, ?)",
            params![name, created_at],
        )
        .map_err(db_err)?;
        let profile = Profile {
            id: tx.last_insert_rowid(),
            display_name: name,
            created_at,
        };
        tx.commit().map_err(db_err)?;
        info!("created profile {} ({})", profile.id, profile.display_name);
        Ok(ProfileCreation {
            profile,
            created: true,
        })
    }

    fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, display_name, created_at FROM profiles ORDER BY id")
            .map_err(db_err)?;
        let profiles = stmt
            .query_map([], profile_from_row)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(profiles)
    }

    fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, display_name, created_at FROM profiles WHERE id = ?",
            [id],
            profile_from_row,
        )
        .optional()
        .map_err(db_err)
    }

    fn find_profile_by_name(&self, display_name: &str) -> Result<Option<Profile>, StoreError> {
        let conn = self.lock()?;
        profile_by_name(&conn, display_name.trim()).map_err(db_err)
    }
}

impl CompletionStore for SqliteStore {
    fn is_completed(&self, profile_id: ProfileId, card_id: CardId) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM completions WHERE profile_id = ? AND card_id = ?",
                params![profile_id, card_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        Ok(found.is_some())
    }

    fn toggle(&self, profile_id: ProfileId, card_id: CardId) -> Result<bool, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(db_err)?;
        require_profile(&tx, profile_id)?;
        require_card(&tx, card_id)?;
        let removed = tx
            .execute(
                "DELETE FROM completions WHERE profile_id = ? AND card_id = ?",
                params![profile_id, card_id],
            )
            .map_err(db_err)?;
        let completed = if removed > 0 {
            false
        } else {
            tx.execute(
                "INSERT INTO completions (profile_id, card_id) VALUES (?, ?)",
                params![profile_id, card_id],
            )
            .map_err(db_err)?;
            true
        };
        tx.commit().map_err(db_err)?;
        debug!("toggle profile {profile_id} card {card_id} -> {completed}");
        Ok(completed)
    }

    fn list_completed(&self, profile_id: ProfileId) -> Result<Vec<CardId>, StoreError> {
        let conn = self.lock()?;
        require_profile(&conn, profile_id)?;
        let mut stmt = conn
            .prepare("SELECT card_id FROM completions WHERE profile_id = ? ORDER BY card_id")
            .map_err(db_err)?;
        let ids = stmt
            .query_map([profile_id], |row| row.get(0))
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<CardId>>>()
            .map_err(db_err)?;
        Ok(ids)
    }

    fn reset_all(&self, profile_id: ProfileId) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(db_err)?;
        require_profile(&tx, profile_id)?;
        let removed = tx
            .execute("DELETE FROM completions WHERE profile_id = ?", [profile_id])
            .map_err(db_err)?;
        tx.commit().map_err(db_err)?;
        info!("reset {removed} completions for profile {profile_id}");
        Ok(removed)
    }
}
