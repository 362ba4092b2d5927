use crate::{CardId, ProfileId};
use std::collections::{BTreeSet, HashMap};

/// Set of (profile, card) completion pairs. Each pair appears at most once.
///
/// Category agnostic; it never looks at the catalog.
#[derive(Debug, Default, Clone)]
pub struct CompletionState {
    by_profile: HashMap<ProfileId, BTreeSet<CardId>>,
}

impl CompletionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, profile_id: ProfileId, card_id: CardId) -> bool {
        self.by_profile
            .get(&profile_id)
            .is_some_and(|cards| cards.contains(&card_id))
    }

    /// Flips membership of the pair and returns the new completion state.
    pub fn toggle(&mut self, profile_id: ProfileId, card_id: CardId) -> bool {
        let cards = self.by_profile.entry(profile_id).or_default();
        if cards.remove(&card_id) {
            false
        } else {
            cards.insert(card_id);
            true
        }
    }

    /// Completed card ids for one profile, ascending.
    pub fn list_completed(&self, profile_id: ProfileId) -> Vec<CardId> {
        self.by_profile
            .get(&profile_id)
            .map(|cards| cards.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drops every pair for the profile and returns how many were removed.
    pub fn reset_all(&mut self, profile_id: ProfileId) -> usize {
        self.by_profile
            .remove(&profile_id)
            .map_or(0, |cards| cards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        let mut state = CompletionState::new();
        let before = state.is_completed(1, 5);
        assert_eq!(state.toggle(1, 5), !before);
        assert!(state.is_completed(1, 5));
        assert!(!state.toggle(1, 5));
        assert_eq!(state.is_completed(1, 5), before);
        assert!(state.list_completed(1).is_empty());
    }

    #[test]
    fn reset_is_scoped_to_one_profile() {
        let mut state = CompletionState::new();
        state.toggle(1, 5);
        state.toggle(1, 6);
        state.toggle(2, 5);
        assert_eq!(state.reset_all(1), 2);
        assert!(state.list_completed(1).is_empty());
        assert_eq!(state.list_completed(2), vec![5]);
        assert_eq!(state.reset_all(1), 0);
    }
}
