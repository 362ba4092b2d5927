use crate::commands::{Command, HELP};
use crate::persistence::{load_client_state, save_client_state};
use log::warn;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use taskdraw_core::{
    ActiveProfile, Card, CardId, CatalogIndex, Category, Event, ResetOutcome, RngState,
    SessionController, SessionError, Store, ToggleOutcome,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Terminal front end around one `SessionController`.
pub struct ClientApp {
    session: SessionController,
    store: Arc<dyn Store>,
    state_path: Option<PathBuf>,
}

impl ClientApp {
    pub fn new(
        store: Arc<dyn Store>,
        rng: RngState,
        state_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let catalog = CatalogIndex::from_cards(store.all_cards()?);
        let session = SessionController::new(catalog, Arc::new(Arc::clone(&store)), rng);
        Ok(Self {
            session,
            store,
            state_path,
        })
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Re-activates the profile remembered in the client state file, if it
    /// still exists. An unreadable state file starts the client without a
    /// profile.
    pub fn restore(&mut self) -> anyhow::Result<()> {
        let Some(path) = &self.state_path else {
            return Ok(());
        };
        let state = match load_client_state(path) {
            Ok(state) => state,
            Err(err) => {
                warn!("ignoring client state: {err:#}");
                return Ok(());
            }
        };
        let Some(id) = state.active_profile_id else {
            return Ok(());
        };
        match self.store.get_profile(id)? {
            Some(profile) => {
                self.session.activate_profile(profile)?;
            }
            None => {
                warn!("remembered profile {id} no longer exists");
                self.persist_active();
            }
        }
        Ok(())
    }

    /// Runs one command. Session failures are reported to `out` and the
    /// session carries on; only write failures end up in the `Err` arm.
    pub fn execute(&mut self, command: Command, out: &mut dyn Write) -> io::Result<Flow> {
        let result = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(out, "{HELP}").map_err(CommandError::from),
            Command::Draw(category) => self.draw(category, out),
            Command::Toggle(card_id) => self.toggle(card_id, out),
            Command::Reset => self.reset(out),
            Command::Profile(name) => self.select_profile(&name, out),
            Command::Profiles => self.list_profiles(out),
            Command::Logout => self.logout(out),
            Command::List(category) => self.list_cards(category, out),
            Command::Status => self.status(out),
        };
        match result {
            Ok(()) => {}
            Err(CommandError::Session(err)) => writeln!(out, "error: {err}")?,
            Err(CommandError::Io(err)) => return Err(err),
        }
        for event in self.session.events().drain() {
            if let Event::DeckReshuffled { category, size } = event {
                writeln!(out, "({category} deck reshuffled, {size} cards)")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn draw(&mut self, category: Category, out: &mut dyn Write) -> Result<(), CommandError> {
        let card = self.session.draw_card(category)?;
        self.print_card(&card, out)?;
        writeln!(
            out,
            "{} left in the {category} deck",
            self.session.remaining(category)
        )?;
        Ok(())
    }

    fn toggle(&mut self, card_id: Option<CardId>, out: &mut dyn Write) -> Result<(), CommandError> {
        let current = self.session.current_card().map(|card| card.id);
        let Some(card_id) = card_id.or(current) else {
            writeln!(out, "nothing to toggle: draw a card or pass a card id")?;
            return Ok(());
        };
        match self.session.toggle_completion(card_id)? {
            ToggleOutcome::Toggled {
                card_id,
                is_completed,
            } => {
                let mark = if is_completed { "completed" } else { "not completed" };
                writeln!(out, "card {card_id} is now {mark}")?;
            }
            ToggleOutcome::NoActiveProfile => {
                writeln!(
                    out,
                    "no active profile: select one with `profile <name>` to save completions"
                )?;
            }
        }
        Ok(())
    }

    fn reset(&mut self, out: &mut dyn Write) -> Result<(), CommandError> {
        match self.session.reset_session()? {
            ResetOutcome::DecksOnly => writeln!(out, "all decks have been reset")?,
            ResetOutcome::DecksAndCompletions { cleared, .. } => writeln!(
                out,
                "all decks have been reset, {cleared} completions cleared"
            )?,
        }
        Ok(())
    }

    fn select_profile(&mut self, name: &str, out: &mut dyn Write) -> Result<(), CommandError> {
        let creation = self
            .store
            .create_profile(name)
            .map_err(SessionError::from)?;
        let label = creation.profile.display_name.clone();
        let completed = self.session.activate_profile(creation.profile)?;
        self.persist_active();
        if creation.created {
            writeln!(out, "profile {label:?} created")?;
        } else {
            writeln!(out, "welcome back {label}, {completed} tasks completed")?;
        }
        Ok(())
    }

    fn logout(&mut self, out: &mut dyn Write) -> Result<(), CommandError> {
        self.session.deactivate_profile();
        self.persist_active();
        writeln!(out, "no active profile")?;
        Ok(())
    }

    fn list_profiles(&self, out: &mut dyn Write) -> Result<(), CommandError> {
        let profiles = self.store.list_profiles().map_err(SessionError::from)?;
        if profiles.is_empty() {
            writeln!(out, "no profiles yet")?;
        }
        let active = self.session.active_profile().id();
        for profile in profiles {
            let marker = if Some(profile.id) == active { "*" } else { " " };
            writeln!(out, "{marker} {:>3}  {}", profile.id, profile.display_name)?;
        }
        Ok(())
    }

    fn list_cards(&self, category: Option<Category>, out: &mut dyn Write) -> Result<(), CommandError> {
        let categories: Vec<Category> = match category {
            Some(category) => vec![category],
            None => Category::ALL.to_vec(),
        };
        let catalog = self.session.catalog();
        for category in categories {
            writeln!(out, "== {category} tasks")?;
            for (difficulty, cards) in catalog.cards_by_difficulty(category) {
                writeln!(out, "  {difficulty}")?;
                for card in cards {
                    let mark = if self.session.is_card_completed(card.id) { "x" } else { " " };
                    let seen = if self.session.draw_state().is_drawn(category, card.id) {
                        " (drawn)"
                    } else {
                        ""
                    };
                    writeln!(out, "    [{mark}] {:>3}  {}{seen}", card.id, card.title)?;
                }
            }
        }
        Ok(())
    }

    fn status(&self, out: &mut dyn Write) -> Result<(), CommandError> {
        match self.session.active_profile() {
            ActiveProfile::NoProfile => writeln!(out, "profile: none")?,
            ActiveProfile::Active(profile) => writeln!(
                out,
                "profile: {} ({} completed)",
                profile.display_name,
                self.session.completed_ids().len()
            )?,
        }
        if self.session.draw_state().is_pristine() {
            writeln!(out, "  no cards drawn yet")?;
        }
        for (category, total) in self.session.catalog().category_counts() {
            writeln!(
                out,
                "  {:<7} {}/{total} left",
                category.id(),
                self.session.remaining(category)
            )?;
        }
        Ok(())
    }

    fn print_card(&self, card: &Card, out: &mut dyn Write) -> io::Result<()> {
        let mark = if self.session.is_card_completed(card.id) {
            " (completed)"
        } else {
            ""
        };
        writeln!(
            out,
            "#{} {} [{} / {}]{mark}",
            card.id, card.title, card.category, card.difficulty
        )?;
        writeln!(out, "  {}", card.description)
    }

    fn persist_active(&self) {
        let Some(path) = &self.state_path else {
            return;
        };
        if let Err(err) = save_client_state(path, self.session.active_profile().id()) {
            warn!("could not save client state: {err:#}");
        }
    }
}
