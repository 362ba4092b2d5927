use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type CardId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Text,
    Coding,
    Image,
    Music,
    Video,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Text,
        Category::Coding,
        Category::Image,
        Category::Music,
        Category::Video,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Coding => "coding",
            Self::Image => "image",
            Self::Music => "music",
            Self::Video => "video",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.id().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("unknown category: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn id(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|difficulty| difficulty.id().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("unknown difficulty: {s}"))
    }
}

/// A task card. Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
}

impl Card {
    pub fn new(
        id: CardId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            category,
            difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_parse_case_insensitively() {
        assert_eq!(Category::from_id("Coding"), Some(Category::Coding));
        assert_eq!(" video ".parse::<Category>(), Ok(Category::Video));
        assert!("poetry".parse::<Category>().is_err());
    }

    #[test]
    fn card_serializes_lowercase_enums() {
        let card = Card::new(3, "Haiku", "Write one", Category::Text, Difficulty::Easy);
        let json = serde_json::to_value(&card).expect("serialize");
        assert_eq!(json["category"], "text");
        assert_eq!(json["difficulty"], "easy");
        assert_eq!(json["id"], 3);
    }
}
