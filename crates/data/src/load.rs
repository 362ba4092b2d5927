use anyhow::Context;
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use taskdraw_core::{Card, CardId, CatalogIndex};
use thiserror::Error;

/// A catalog that parsed but cannot be served.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("card id {0} must be positive")]
    NonPositiveId(CardId),
    #[error("duplicate card id {0}")]
    DuplicateId(CardId),
    #[error("card {0} has an empty title")]
    EmptyTitle(CardId),
}

const DEFAULT_CARDS: &str = include_str!("../assets/default_cards.json");

/// The catalog shipped with the application.
pub fn default_cards() -> anyhow::Result<Vec<Card>> {
    parse_cards(DEFAULT_CARDS).context("parse built-in catalog")
}

pub fn load_cards(path: &Path) -> anyhow::Result<Vec<Card>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_cards(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Loads `path` when given, the built-in catalog otherwise.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Vec<Card>> {
    let cards = match path {
        Some(path) => load_cards(path)?,
        None => default_cards()?,
    };
    let index = CatalogIndex::from_cards(cards.clone());
    for (category, count) in index.category_counts() {
        if count == 0 {
            warn!("catalog has no {category} cards");
        }
    }
    info!("catalog loaded: {} cards", cards.len());
    Ok(cards)
}

pub fn parse_cards(raw: &str) -> anyhow::Result<Vec<Card>> {
    let cards: Vec<Card> = serde_json::from_str(raw)?;
    validate_cards(&cards).context("invalid catalog")?;
    Ok(cards)
}

pub fn validate_cards(cards: &[Card]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(cards.len());
    for card in cards {
        if card.id <= 0 {
            return Err(CatalogError::NonPositiveId(card.id));
        }
        if !seen.insert(card.id) {
            return Err(CatalogError::DuplicateId(card.id));
        }
        if card.title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle(card.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdraw_core::Category;

    #[test]
    fn builtin_catalog_has_six_cards_per_category() {
        let cards = default_cards().expect("builtin");
        let index = CatalogIndex::from_cards(cards);
        assert_eq!(index.len(), 30);
        for (category, count) in index.category_counts() {
            assert_eq!(count, 6, "{category}");
        }
        assert_eq!(
            index.get(1).map(|card| card.category),
            Some(Category::Text)
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"[
            {"id":1,"title":"A","description":"","category":"text","difficulty":"easy"},
            {"id":1,"title":"B","description":"","category":"music","difficulty":"hard"}
        ]"#;
        let err = parse_cards(raw).expect_err("duplicate");
        assert_eq!(
            err.downcast_ref::<CatalogError>(),
            Some(&CatalogError::DuplicateId(1))
        );
    }

    #[test]
    fn unknown_category_fails_to_parse() {
        let raw = r#"[{"id":1,"title":"A","description":"","category":"poetry","difficulty":"easy"}]"#;
        assert!(parse_cards(raw).is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let raw = r#"[{"id":3,"title":"  ","description":"","category":"text","difficulty":"easy"}]"#;
        let err = parse_cards(raw).expect_err("blank");
        assert_eq!(
            err.downcast_ref::<CatalogError>(),
            Some(&CatalogError::EmptyTitle(3))
        );
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        let cards = vec![Card::new(
            0,
            "Zero",
            "",
            Category::Coding,
            taskdraw_core::Difficulty::Easy,
        )];
        assert_eq!(
            validate_cards(&cards),
            Err(CatalogError::NonPositiveId(0))
        );
    }
}
