//! Collaborator seams between the session logic and whatever persists
//! cards, profiles and completions.

use crate::{Card, CardId, Category, Profile, ProfileCreation, ProfileId};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn profile_not_found(id: ProfileId) -> Self {
        Self::NotFound(format!("profile {id}"))
    }

    pub fn card_not_found(id: CardId) -> Self {
        Self::NotFound(format!("card {id}"))
    }
}

pub trait CardStore: Send + Sync {
    fn all_cards(&self) -> Result<Vec<Card>, StoreError>;

    fn cards_in_category(&self, category: Category) -> Result<Vec<Card>, StoreError> {
        Ok(self
            .all_cards()?
            .into_iter()
            .filter(|card| card.category == category)
            .collect())
    }
}

pub trait ProfileStore: Send + Sync {
    /// Create-or-get by display name. Never creates a duplicate name.
    fn create_profile(&self, display_name: &str) -> Result<ProfileCreation, StoreError>;
    fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError>;
    fn find_profile_by_name(&self, display_name: &str) -> Result<Option<Profile>, StoreError>;
}

/// Completion pairs. `toggle` must be atomic per (profile, card).
pub trait CompletionStore: Send + Sync {
    fn is_completed(&self, profile_id: ProfileId, card_id: CardId) -> Result<bool, StoreError>;
    fn toggle(&self, profile_id: ProfileId, card_id: CardId) -> Result<bool, StoreError>;
    fn list_completed(&self, profile_id: ProfileId) -> Result<Vec<CardId>, StoreError>;
    fn reset_all(&self, profile_id: ProfileId) -> Result<usize, StoreError>;
}

/// Lets a shared `Arc<dyn Store>` stand in where only completions are needed.
impl<T: CompletionStore + ?Sized> CompletionStore for Arc<T> {
    fn is_completed(&self, profile_id: ProfileId, card_id: CardId) -> Result<bool, StoreError> {
        (**self).is_completed(profile_id, card_id)
    }

    fn toggle(&self, profile_id: ProfileId, card_id: CardId) -> Result<bool, StoreError> {
        (**self).toggle(profile_id, card_id)
    }

    fn list_completed(&self, profile_id: ProfileId) -> Result<Vec<CardId>, StoreError> {
        (**self).list_completed(profile_id)
    }

    fn reset_all(&self, profile_id: ProfileId) -> Result<usize, StoreError> {
        (**self).reset_all(profile_id)
    }
}

pub trait Store: CardStore + ProfileStore + CompletionStore {}

impl<T: CardStore + ProfileStore + CompletionStore> Store for T {}
