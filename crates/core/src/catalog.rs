use crate::{Card, CardId, Category, Difficulty};
use std::collections::HashMap;

/// Immutable card catalog grouped by category.
///
/// Cards keep their catalog order inside each category so "view all"
/// listings stay stable between calls.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    cards: Vec<Card>,
    by_category: HashMap<Category, Vec<usize>>,
    by_id: HashMap<CardId, usize>,
}

impl CatalogIndex {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut by_category: HashMap<Category, Vec<usize>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(cards.len());
        for (idx, card) in cards.iter().enumerate() {
            by_category.entry(card.category).or_default().push(idx);
            by_id.insert(card.id, idx);
        }
        Self {
            cards,
            by_category,
            by_id,
        }
    }

    pub fn all(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.by_id.get(&id).map(|idx| &self.cards[*idx])
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn cards_in_category(&self, category: Category) -> Vec<&Card> {
        self.by_category
            .get(&category)
            .map(|indices| indices.iter().map(|idx| &self.cards[*idx]).collect())
            .unwrap_or_default()
    }

    pub fn ids_in_category(&self, category: Category) -> Vec<CardId> {
        self.by_category
            .get(&category)
            .map(|indices| indices.iter().map(|idx| self.cards[*idx].id).collect())
            .unwrap_or_default()
    }

    pub fn count(&self, category: Category) -> usize {
        self.by_category.get(&category).map_or(0, Vec::len)
    }

    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|category| (*category, self.count(*category)))
            .collect()
    }

    /// Cards of one category grouped easy, medium, hard. Empty groups are skipped.
    pub fn cards_by_difficulty(&self, category: Category) -> Vec<(Difficulty, Vec<&Card>)> {
        let cards = self.cards_in_category(category);
        Difficulty::ALL
            .iter()
            .filter_map(|difficulty| {
                let group: Vec<&Card> = cards
                    .iter()
                    .copied()
                    .filter(|card| card.difficulty == *difficulty)
                    .collect();
                (!group.is_empty()).then_some((*difficulty, group))
            })
            .collect()
    }
}
