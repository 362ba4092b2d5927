//! SQLite persistence for cards, profiles and completions.

mod schema;
mod sqlite;

pub use schema::init_db;
pub use sqlite::SqliteStore;

use log::info;
use std::path::Path;
use std::sync::Arc;
use taskdraw_core::{Card, MemoryStore, Store, StoreError};

/// Opens the SQLite database at `database` and seeds it with `cards` when
/// empty, or builds an in-memory store holding `cards` when no path is given.
pub fn open_store(database: Option<&Path>, cards: Vec<Card>) -> Result<Arc<dyn Store>, StoreError> {
    match database {
        Some(path) => {
            let store = SqliteStore::open(path)?;
            store.seed_cards(&cards)?;
            Ok(Arc::new(store))
        }
        None => {
            info!("no database configured, using in-memory store");
            Ok(Arc::new(MemoryStore::new(cards)))
        }
    }
}
