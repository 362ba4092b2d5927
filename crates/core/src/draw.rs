use crate::{CardId, Category};
use std::collections::{HashMap, HashSet};

/// Per-category record of the cards already surfaced in the current cycle.
#[derive(Debug, Default, Clone)]
pub struct DrawState {
    drawn: HashMap<Category, HashSet<CardId>>,
}

impl DrawState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `all_ids` minus this cycle's drawn ids, in the order of `all_ids`.
    pub fn available_ids(&self, category: Category, all_ids: &[CardId]) -> Vec<CardId> {
        match self.drawn.get(&category) {
            Some(drawn) => all_ids
                .iter()
                .copied()
                .filter(|id| !drawn.contains(id))
                .collect(),
            None => all_ids.to_vec(),
        }
    }

    /// `id` must belong to `category`; the caller guarantees it.
    pub fn mark_drawn(&mut self, category: Category, id: CardId) {
        self.drawn.entry(category).or_default().insert(id);
    }

    pub fn is_drawn(&self, category: Category, id: CardId) -> bool {
        self.drawn
            .get(&category)
            .is_some_and(|drawn| drawn.contains(&id))
    }

    pub fn drawn_count(&self, category: Category) -> usize {
        self.drawn.get(&category).map_or(0, HashSet::len)
    }

    pub fn reset_category(&mut self, category: Category) {
        if let Some(drawn) = self.drawn.get_mut(&category) {
            drawn.clear();
        }
    }

    pub fn reset_all(&mut self) {
        self.drawn.clear();
    }

    pub fn is_pristine(&self) -> bool {
        self.drawn.values().all(HashSet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_excludes_drawn() {
        let mut state = DrawState::new();
        let ids = [1, 2, 3];
        state.mark_drawn(Category::Text, 2);
        assert_eq!(state.available_ids(Category::Text, &ids), vec![1, 3]);
        assert_eq!(state.available_ids(Category::Music, &ids), vec![1, 2, 3]);
        assert!(state.is_drawn(Category::Text, 2));
        assert!(!state.is_drawn(Category::Music, 2));
    }

    #[test]
    fn reset_category_leaves_others() {
        let mut state = DrawState::new();
        state.mark_drawn(Category::Text, 1);
        state.mark_drawn(Category::Video, 9);
        state.reset_category(Category::Text);
        assert_eq!(state.drawn_count(Category::Text), 0);
        assert_eq!(state.drawn_count(Category::Video), 1);
        state.reset_all();
        assert!(state.is_pristine());
    }

    #[test]
    fn marking_twice_is_a_single_entry() {
        let mut state = DrawState::new();
        state.mark_drawn(Category::Image, 4);
        state.mark_drawn(Category::Image, 4);
        assert_eq!(state.drawn_count(Category::Image), 1);
    }
}
