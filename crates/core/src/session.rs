use crate::{
    ActiveProfile, Card, CardId, CatalogIndex, Category, CompletionStore, DrawState, Event,
    EventBus, Profile, ProfileId, RngState, StoreError,
};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("category {0} has no cards in the catalog")]
    EmptyCategory(Category),
    #[error("card {0} is not in the catalog")]
    UnknownCard(CardId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Last observable position of one category deck. A draw in progress is
/// never visible outside `draw_card`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckPhase {
    #[default]
    Idle,
    Drawn(CardId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled { card_id: CardId, is_completed: bool },
    NoActiveProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    DecksOnly,
    DecksAndCompletions { profile_id: ProfileId, cleared: usize },
}

/// One client session: draw cycles per category plus the active profile's
/// completion view. Created at session start, dropped on reload.
pub struct SessionController {
    catalog: CatalogIndex,
    draws: DrawState,
    phases: HashMap<Category, DeckPhase>,
    current: Option<CardId>,
    rng: RngState,
    active: ActiveProfile,
    completed: HashSet<CardId>,
    completions: Arc<dyn CompletionStore>,
    events: EventBus,
}

impl SessionController {
    pub fn new(
        catalog: CatalogIndex,
        completions: Arc<dyn CompletionStore>,
        rng: RngState,
    ) -> Self {
        for (category, count) in catalog.category_counts() {
            if count == 0 {
                warn!("category {category} has no cards; draws from it will fail");
            }
        }
        Self {
            catalog,
            draws: DrawState::new(),
            phases: HashMap::new(),
            current: None,
            rng,
            active: ActiveProfile::NoProfile,
            completed: HashSet::new(),
            completions,
            events: EventBus::default(),
        }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.draws
    }

    pub fn active_profile(&self) -> &ActiveProfile {
        &self.active
    }

    pub fn phase(&self, category: Category) -> DeckPhase {
        self.phases.get(&category).copied().unwrap_or_default()
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.and_then(|id| self.catalog.get(id))
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Cards left in the category before its next reshuffle.
    pub fn remaining(&self, category: Category) -> usize {
        self.catalog
            .count(category)
            .saturating_sub(self.draws.drawn_count(category))
    }

    /// Draws one card uniformly from the category's not-yet-drawn cards,
    /// reshuffling first when the deck is exhausted. Nothing is mutated
    /// when the draw fails.
    pub fn draw_card(&mut self, category: Category) -> Result<Card, SessionError> {
        let all_ids = self.catalog.ids_in_category(category);
        if all_ids.is_empty() {
            warn!("draw requested from empty category {category}");
            return Err(SessionError::EmptyCategory(category));
        }
        let mut available = self.draws.available_ids(category, &all_ids);
        let reshuffle = available.is_empty();
        if reshuffle {
            available = all_ids;
        }
        let id = available[self.rng.pick_index(available.len())];
        let card = self
            .catalog
            .get(id)
            .cloned()
            .ok_or(SessionError::UnknownCard(id))?;

        if reshuffle {
            self.draws.reset_category(category);
            info!("{category} deck exhausted, reshuffled {} cards", available.len());
            self.events.push(Event::DeckReshuffled {
                category,
                size: available.len(),
            });
        }
        self.draws.mark_drawn(category, id);
        self.phases.insert(category, DeckPhase::Drawn(id));
        self.current = Some(id);
        let remaining = available.len() - 1;
        debug!("drew card {id} from {category}, {remaining} left in cycle");
        self.events.push(Event::CardDrawn {
            category,
            card_id: id,
            remaining,
        });
        Ok(card)
    }

    /// Switches the active profile and hydrates its completions. On failure
    /// the previous profile stays active.
    pub fn activate_profile(&mut self, profile: Profile) -> Result<usize, SessionError> {
        let completed: HashSet<CardId> = self
            .completions
            .list_completed(profile.id)?
            .into_iter()
            .collect();
        let count = completed.len();
        info!(
            "active profile is now {} ({}), {count} completed",
            profile.id, profile.display_name
        );
        self.events.push(Event::ProfileActivated {
            profile_id: profile.id,
            completed: count,
        });
        self.active = ActiveProfile::Active(profile);
        self.completed = completed;
        Ok(count)
    }

    pub fn deactivate_profile(&mut self) {
        if self.active.is_active() {
            self.events.push(Event::ProfileCleared);
        }
        self.active = ActiveProfile::NoProfile;
        self.completed.clear();
    }

    pub fn is_card_completed(&self, card_id: CardId) -> bool {
        match &self.active {
            ActiveProfile::NoProfile => false,
            ActiveProfile::Active(_) => self.completed.contains(&card_id),
        }
    }

    pub fn completed_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self.completed.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn toggle_completion(&mut self, card_id: CardId) -> Result<ToggleOutcome, SessionError> {
        let profile_id = match &self.active {
            ActiveProfile::NoProfile => {
                debug!("toggle of card {card_id} ignored: no active profile");
                return Ok(ToggleOutcome::NoActiveProfile);
            }
            ActiveProfile::Active(profile) => profile.id,
        };
        if !self.catalog.contains(card_id) {
            return Err(SessionError::UnknownCard(card_id));
        }
        let is_completed = self.completions.toggle(profile_id, card_id)?;
        if is_completed {
            self.completed.insert(card_id);
        } else {
            self.completed.remove(&card_id);
        }
        self.events.push(Event::CompletionToggled {
            profile_id,
            card_id,
            is_completed,
        });
        Ok(ToggleOutcome::Toggled {
            card_id,
            is_completed,
        })
    }

    /// Clears every deck and, with an active profile, that profile's
    /// completions. The store reset runs first so a failure leaves the
    /// session untouched.
    pub fn reset_session(&mut self) -> Result<ResetOutcome, SessionError> {
        let outcome = match &self.active {
            ActiveProfile::NoProfile => ResetOutcome::DecksOnly,
            ActiveProfile::Active(profile) => {
                let cleared = self.completions.reset_all(profile.id)?;
                ResetOutcome::DecksAndCompletions {
                    profile_id: profile.id,
                    cleared,
                }
            }
        };
        self.completed.clear();
        self.draws.reset_all();
        self.phases.clear();
        self.current = None;
        let completions_cleared = match outcome {
            ResetOutcome::DecksOnly => None,
            ResetOutcome::DecksAndCompletions { cleared, .. } => Some(cleared),
        };
        info!("session reset (completions cleared: {completions_cleared:?})");
        self.events.push(Event::SessionReset {
            completions_cleared,
        });
        Ok(outcome)
    }
}
