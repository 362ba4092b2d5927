use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};
use taskdraw_core::{
    Card, CardStore, CatalogIndex, Category, CompletionStore, Difficulty, ProfileStore, RngState,
    SessionController, StoreError, ToggleOutcome,
};
use taskdraw_store::SqliteStore;

fn cards() -> Vec<Card> {
    vec![
        Card::new(1, "T1", "one", Category::Text, Difficulty::Easy),
        Card::new(2, "T2", "two", Category::Text, Difficulty::Hard),
        Card::new(5, "C5", "five", Category::Coding, Difficulty::Medium),
    ]
}

fn seeded() -> SqliteStore {
    let store = SqliteStore::open_in_memory().expect("open");
    assert_eq!(store.seed_cards(&cards()).expect("seed"), 3);
    store
}

fn unique_temp_db() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "taskdraw_store_test_{}_{}.db",
        std::process::id(),
        nanos
    ))
}

#[test]
fn different_catalog_does_not_replace_stored_cards() {
    let store = seeded();
    let other = vec![Card::new(40, "Solo", "", Category::Video, Difficulty::Hard)];
    assert_eq!(store.seed_cards(&other).expect("reseed"), 0);
    assert_eq!(store.all_cards().expect("all"), cards());
    assert!(store.cards_in_category(Category::Video).expect("video").is_empty());
}

#[test]
fn seeding_is_skipped_once_cards_exist() {
    let store = seeded();
    assert_eq!(store.seed_cards(&cards()).expect("reseed"), 0);
    assert_eq!(store.all_cards().expect("all"), cards());
    let text: Vec<i64> = store
        .cards_in_category(Category::Text)
        .expect("text")
        .iter()
        .map(|card| card.id)
        .collect();
    assert_eq!(text, vec![1, 2]);
    assert!(store.cards_in_category(Category::Video).expect("video").is_empty());
}

#[test]
fn profile_creation_is_idempotent_by_name() {
    let store = seeded();
    let first = store.create_profile("Bob").expect("first");
    let second = store.create_profile("Bob").expect("second");
    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.profile, second.profile);
    assert_eq!(store.list_profiles().expect("list").len(), 1);
    assert_eq!(
        store.find_profile_by_name("Bob").expect("find"),
        Some(first.profile.clone())
    );
    assert_eq!(
        store.get_profile(first.profile.id).expect("get"),
        Some(first.profile)
    );
    assert!(matches!(
        store.create_profile(""),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn bob_toggles_card_five() {
    let store = seeded();
    let bob = store.create_profile("Bob").expect("bob").profile;
    assert!(store.toggle(bob.id, 5).expect("on"));
    assert_eq!(store.list_completed(bob.id).expect("list"), vec![5]);
    assert!(store.is_completed(bob.id, 5).expect("check"));
    assert!(!store.toggle(bob.id, 5).expect("off"));
    assert!(store.list_completed(bob.id).expect("list").is_empty());
}

#[test]
fn referential_checks() {
    let store = seeded();
    let bob = store.create_profile("Bob").expect("bob").profile;
    assert_eq!(store.toggle(42, 5), Err(StoreError::profile_not_found(42)));
    assert_eq!(store.toggle(bob.id, 99), Err(StoreError::card_not_found(99)));
    assert_eq!(store.reset_all(42), Err(StoreError::profile_not_found(42)));
    assert_eq!(
        store.list_completed(42),
        Err(StoreError::profile_not_found(42))
    );
    assert!(!store.is_completed(42, 5).expect("check"));
}

#[test]
fn reset_only_touches_one_profile() {
    let store = seeded();
    let ann = store.create_profile("Ann").expect("ann").profile;
    let bob = store.create_profile("Bob").expect("bob").profile;
    store.toggle(ann.id, 1).expect("ann 1");
    store.toggle(bob.id, 1).expect("bob 1");
    store.toggle(bob.id, 2).expect("bob 2");
    assert_eq!(store.reset_all(bob.id).expect("reset"), 2);
    assert!(store.list_completed(bob.id).expect("bob").is_empty());
    assert_eq!(store.list_completed(ann.id).expect("ann"), vec![1]);
}

#[test]
fn concurrent_toggles_serialize() {
    let store = Arc::new(seeded());
    let bob = store.create_profile("Bob").expect("bob").profile;
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.toggle(bob.id, 5).expect("toggle"))
        })
        .collect();
    let inserted = handles
        .into_iter()
        .map(|handle| handle.join().expect("join"))
        .filter(|completed| *completed)
        .count();
    assert_eq!(inserted, 3);
    assert!(store.list_completed(bob.id).expect("list").is_empty());
}

#[test]
fn concurrent_profile_creation_yields_one_profile() {
    let store = Arc::new(seeded());
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.create_profile("Ann").expect("create").profile.id)
        })
        .collect();
    let ids: Vec<i64> = handles
        .into_iter()
        .map(|handle| handle.join().expect("join"))
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(store.list_profiles().expect("list").len(), 1);
}

#[test]
fn completions_survive_reopen() {
    let path = unique_temp_db();
    let bob_id = {
        let store = SqliteStore::open(&path).expect("open");
        store.seed_cards(&cards()).expect("seed");
        let bob = store.create_profile("Bob").expect("bob").profile;
        store.toggle(bob.id, 2).expect("toggle");
        bob.id
    };
    let store = SqliteStore::open(&path).expect("reopen");
    assert_eq!(store.seed_cards(&cards()).expect("seed"), 0);
    assert_eq!(store.list_completed(bob_id).expect("list"), vec![2]);
    drop(store);
    let _ = std::fs::remove_file(path);
}

#[test]
fn session_over_sqlite_store() {
    let store = Arc::new(seeded());
    let catalog = CatalogIndex::from_cards(store.all_cards().expect("cards"));
    let mut session = SessionController::new(catalog, store.clone(), RngState::from_seed(8));
    let bob = store.create_profile("Bob").expect("bob").profile;
    session.activate_profile(bob.clone()).expect("activate");
    let card = session.draw_card(Category::Coding).expect("draw");
    assert_eq!(card.id, 5);
    assert_eq!(
        session.toggle_completion(card.id),
        Ok(ToggleOutcome::Toggled {
            card_id: 5,
            is_completed: true
        })
    );
    assert!(store.is_completed(bob.id, 5).expect("check"));
}
