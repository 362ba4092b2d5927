use crate::{CardId, Category, ProfileId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    CardDrawn {
        category: Category,
        card_id: CardId,
        remaining: usize,
    },
    DeckReshuffled { category: Category, size: usize },
    CompletionToggled {
        profile_id: ProfileId,
        card_id: CardId,
        is_completed: bool,
    },
    ProfileActivated { profile_id: ProfileId, completed: usize },
    ProfileCleared,
    SessionReset { completions_cleared: Option<usize> },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
