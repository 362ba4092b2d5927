use crate::{
    normalize_display_name, timestamp_now, Card, CardId, CardStore, CatalogIndex, Category,
    CompletionState, CompletionStore, Profile, ProfileCreation, ProfileId, ProfileStore,
    StoreError,
};
use log::{debug, info};
use std::sync::{Mutex, MutexGuard};

/// Process-local store. One mutex guards everything, so a toggle's
/// check-then-flip can never interleave with another toggle.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug)]
struct MemoryInner {
    catalog: CatalogIndex,
    profiles: Vec<Profile>,
    next_profile_id: ProfileId,
    completions: CompletionState,
}

impl MemoryStore {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                catalog: CatalogIndex::from_cards(cards),
                profiles: Vec::new(),
                next_profile_id: 1,
                completions: CompletionState::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl MemoryInner {
    fn require_profile(&self, id: ProfileId) -> Result<(), StoreError> {
        if self.profiles.iter().any(|profile| profile.id == id) {
            Ok(())
        } else {
            Err(StoreError::profile_not_found(id))
        }
    }
}

impl CardStore for MemoryStore {
    fn all_cards(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.lock()?.catalog.all().to_vec())
    }

    fn cards_in_category(&self, category: Category) -> Result<Vec<Card>, StoreError> {
        Ok(self
            .lock()?
            .catalog
            .cards_in_category(category)
            .into_iter()
            .cloned()
            .collect())
    }
}

impl ProfileStore for MemoryStore {
    fn create_profile(&self, display_name: &str) -> Result<ProfileCreation, StoreError> {
        let name = normalize_display_name(display_name)?;
        let mut inner = self.lock()?;
        if let Some(existing) = inner.profiles.iter().find(|p| p.display_name == name) {
            debug!("profile {:?} already exists as {}", name, existing.id);
            return Ok(ProfileCreation {
                profile: existing.clone(),
                created: false,
            });
        }
        let profile = Profile {
            id: inner.next_profile_id,
            display_name: name,
            created_at: timestamp_now(),
        };
        inner.next_profile_id += 1;
        inner.profiles.push(profile.clone());
        info!("created profile {} ({})", profile.id, profile.display_name);
        Ok(ProfileCreation {
            profile,
            created: true,
        })
    }

    fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.lock()?.profiles.clone())
    }

    fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self.lock()?.profiles.iter().find(|p| p.id == id).cloned())
    }

    fn find_profile_by_name(&self, display_name: &str) -> Result<Option<Profile>, StoreError> {
        let name = display_name.trim();
        Ok(self
            .lock()?
            .profiles
            .iter()
            .find(|p| p.display_name == name)
            .cloned())
    }
}

impl CompletionStore for MemoryStore {
    fn is_completed(&self, profile_id: ProfileId, card_id: CardId) -> Result<bool, StoreError> {
        Ok(self.lock()?.completions.is_completed(profile_id, card_id))
    }

    fn toggle(&self, profile_id: ProfileId, card_id: CardId) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        inner.require_profile(profile_id)?;
        if !inner.catalog.contains(card_id) {
            return Err(StoreError::card_not_found(card_id));
        }
        Ok(inner.completions.toggle(profile_id, card_id))
    }

    fn list_completed(&self, profile_id: ProfileId) -> Result<Vec<CardId>, StoreError> {
        let inner = self.lock()?;
        inner.require_profile(profile_id)?;
        Ok(inner.completions.list_completed(profile_id))
    }

    fn reset_all(&self, profile_id: ProfileId) -> Result<usize, StoreError> {
        let mut inner = self.lock()?;
        inner.require_profile(profile_id)?;
        Ok(inner.completions.reset_all(profile_id))
    }
}
