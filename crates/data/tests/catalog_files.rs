use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use taskdraw_core::{CatalogIndex, Category, Difficulty};
use taskdraw_data::{load_cards, load_catalog, AppConfig, CatalogError};

fn unique_temp_file(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "taskdraw_data_{tag}_{}_{}.json",
        std::process::id(),
        nanos
    ))
}

#[test]
fn catalog_file_without_video_still_loads() {
    let file = unique_temp_file("catalog");
    let body = r#"
[
  {"id": 10, "title": "T1", "description": "first", "category": "text", "difficulty": "easy"},
  {"id": 11, "title": "T2", "description": "second", "category": "text", "difficulty": "hard"}
]
"#;
    std::fs::write(&file, body).expect("write");
    let cards = load_catalog(Some(&file)).expect("load");
    let index = CatalogIndex::from_cards(cards);
    assert_eq!(index.ids_in_category(Category::Text), vec![10, 11]);
    assert_eq!(index.count(Category::Video), 0);
    assert_eq!(index.get(11).map(|card| card.difficulty), Some(Difficulty::Hard));
    let _ = std::fs::remove_file(file);
}

#[test]
fn missing_catalog_file_names_the_path() {
    let file = unique_temp_file("missing");
    let err = load_cards(&file).expect_err("missing");
    assert!(err.to_string().contains(&file.display().to_string()));
}

#[test]
fn invalid_catalog_file_keeps_the_typed_error() {
    let file = unique_temp_file("negative");
    let body = r#"[{"id": -4, "title": "T", "description": "", "category": "image", "difficulty": "easy"}]"#;
    std::fs::write(&file, body).expect("write");
    let err = load_catalog(Some(&file)).expect_err("negative id");
    assert!(format!("{err:#}").contains(&file.display().to_string()));
    assert_eq!(
        err.downcast_ref::<CatalogError>(),
        Some(&CatalogError::NonPositiveId(-4))
    );
    let _ = std::fs::remove_file(file);
}

#[test]
fn builtin_catalog_is_used_without_a_path() {
    let cards = load_catalog(None).expect("builtin");
    assert_eq!(cards.len(), 30);
}

#[test]
fn config_file_then_flags() {
    let file = unique_temp_file("config");
    std::fs::write(&file, r#"{"bind": "127.0.0.1:9000", "seed": 3}"#).expect("write");
    let args: Vec<String> = ["--config", file.to_str().expect("utf8"), "--seed", "4"]
        .iter()
        .map(|value| value.to_string())
        .collect();
    let (config, rest) = AppConfig::resolve_with(&args, |_| None).expect("resolve");
    assert_eq!(config.bind, "127.0.0.1:9000");
    assert_eq!(config.seed, Some(4));
    assert!(rest.is_empty());
    let _ = std::fs::remove_file(file);
}
