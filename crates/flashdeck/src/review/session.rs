//! Review session state.
//!
//! [`ReviewSession`] is a plain value updated by [`ReviewSession::update`].
//! It never performs I/O itself: fetches, creates, deletes and user
//! notifications are returned as [`Effect`]s, and their outcomes come back in as [`Action`]s.

use std::fmt;

use uuid::Uuid;

use crate::flashcard::{Flashcard, NewFlashcard};

/// Label of the filter that matches every card.
///
/// A stored category with this exact name cannot be selected on its own: its
/// cards only show up under the "All" filter.
pub const ALL_CATEGORIES: &str = "All";

/// Which cards the session shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every card.
    #[default]
    All,
    /// Cards whose category equals this label.
    Named(String),
}

impl CategoryFilter {
    /// Parse a selector label; `"All"` selects every card.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(label.to_string())
        }
    }

    /// The selector label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    /// Check whether a card passes the filter.
    #[must_use]
    pub fn matches(&self, card: &Flashcard) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => card.category == *name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of the card list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The first fetch failed; no cards are held.
    Unavailable {
        /// Why the fetch failed.
        message: String,
    },
    /// Cards are loaded (possibly none).
    Ready,
}

/// Input to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch the card list.
    Load,
    /// The fetch returned these cards.
    Loaded(Vec<Flashcard>),
    /// The fetch failed.
    ///
    /// Before any successful load this leaves the session without data;
    /// afterwards the cards already held are kept.
    LoadFailed(String),
    /// Change the category filter.
    SelectCategory(CategoryFilter),
    /// Move forward, wrapping at the end.
    Next,
    /// Move backward, wrapping at the start.
    Previous,
    /// Show the other side of the current card.
    Flip,
    /// Ask the server to delete a card.
    RequestDelete(Uuid),
    /// The server confirmed the delete.
    DeleteSucceeded(Uuid),
    /// The server refused or the request failed.
    DeleteFailed {
        /// The card that was not deleted.
        id: Uuid,
        /// Why.
        message: String,
    },
    /// Ask the server to create a card.
    RequestCreate(NewFlashcard),
    /// A card was created.
    Created(Flashcard),
    /// The server refused the new card or the request failed.
    CreateFailed(String),
}

/// Work the session asks its driver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch all flashcards.
    FetchFlashcards,
    /// Delete one flashcard.
    DeleteFlashcard(Uuid),
    /// Create one flashcard.
    CreateFlashcard(NewFlashcard),
    /// Show a transient message.
    Notify(Notification),
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Something worked.
    Success,
    /// Something failed; state was left as it was.
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Text to show.
    pub message: String,
}

impl Notification {
    /// A success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    /// An error message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// What the front end should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    /// Waiting for the first fetch.
    Loading,
    /// The fetch failed.
    Unavailable {
        /// Why.
        message: &'a str,
    },
    /// No card matches the filter.
    Empty {
        /// The active filter.
        filter: &'a CategoryFilter,
    },
    /// A card is shown.
    Card(CardView<'a>),
}

/// The current card and where it sits in the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardView<'a> {
    /// The card.
    pub card: &'a Flashcard,
    /// 1-based position.
    pub position: usize,
    /// Number of cards in the filtered list.
    pub total: usize,
    /// Whether the back is showing.
    pub flipped: bool,
}

/// Client-held state of one review session.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    phase: Phase,
    all_cards: Vec<Flashcard>,
    selected: CategoryFilter,
    /// Indices into `all_cards`, in list order.
    filtered: Vec<usize>,
    current_index: usize,
    flipped: bool,
    /// Set once a fetch has succeeded.
    has_loaded: bool,
}

impl ReviewSession {
    /// Create an idle session showing every category.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle session that starts filtered to `filter`.
    #[must_use]
    pub fn with_category(filter: CategoryFilter) -> Self {
        Self {
            selected: filter,
            ..Self::default()
        }
    }

    /// Apply an action and return the effects it requests.
    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Load => {
                self.phase = Phase::Loading;
                vec![Effect::FetchFlashcards]
            }
            Action::Loaded(cards) => {
                self.phase = Phase::Ready;
                self.has_loaded = true;
                self.all_cards = cards;
                self.refilter();
                self.current_index = 0;
                self.flipped = false;
                Vec::new()
            }
            Action::LoadFailed(message) if self.has_loaded => {
                self.phase = Phase::Ready;
                vec![Effect::Notify(Notification::error(message))]
            }
            Action::LoadFailed(message) => {
                self.all_cards.clear();
                self.filtered.clear();
                self.current_index = 0;
                self.flipped = false;
                self.phase = Phase::Unavailable {
                    message: message.clone(),
                };
                vec![Effect::Notify(Notification::error(message))]
            }
            Action::SelectCategory(filter) => {
                self.selected = filter;
                self.refilter();
                self.current_index = 0;
                self.flipped = false;
                Vec::new()
            }
            Action::Next => {
                self.next();
                Vec::new()
            }
            Action::Previous => {
                self.previous();
                Vec::new()
            }
            Action::Flip => {
                if !self.filtered.is_empty() {
                    self.flipped = !self.flipped;
                }
                Vec::new()
            }
            // Local state only changes once the server confirms.
            Action::RequestDelete(id) => vec![Effect::DeleteFlashcard(id)],
            Action::DeleteSucceeded(id) => {
                self.remove(id);
                vec![Effect::Notify(Notification::success(
                    "Flashcard deleted successfully",
                ))]
            }
            Action::DeleteFailed { message, .. } => {
                vec![Effect::Notify(Notification::error(message))]
            }
            Action::RequestCreate(new) => vec![Effect::CreateFlashcard(new)],
            Action::Created(card) => {
                self.insert(card);
                vec![Effect::Notify(Notification::success(
                    "Flashcard created successfully",
                ))]
            }
            Action::CreateFailed(message) => {
                vec![Effect::Notify(Notification::error(message))]
            }
        }
    }

    fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.current_index = if self.current_index + 1 >= len {
            0
        } else {
            self.current_index + 1
        };
        self.flipped = false;
    }

    fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.current_index = if self.current_index == 0 {
            len - 1
        } else {
            self.current_index - 1
        };
        self.flipped = false;
    }

    fn remove(&mut self, id: Uuid) {
        let before = self.all_cards.len();
        self.all_cards.retain(|card| card.id != id);
        if self.all_cards.len() == before {
            return;
        }

        self.refilter();
        // Clamp against the length after removal.
        let len = self.filtered.len();
        if self.current_index >= len {
            self.current_index = len.saturating_sub(1);
        }
        self.flipped = false;
    }

    fn insert(&mut self, card: Flashcard) {
        if self.phase != Phase::Ready {
            return;
        }

        let was_empty = self.filtered.is_empty();
        let matches = self.selected.matches(&card);
        self.all_cards.insert(0, card);
        self.refilter();

        if was_empty {
            self.current_index = 0;
            self.flipped = false;
        } else if matches {
            // Keep showing the same card; the new one sorts in front of it.
            self.current_index += 1;
        }
    }

    fn refilter(&mut self) {
        self.filtered = self
            .all_cards
            .iter()
            .enumerate()
            .filter(|(_, card)| self.selected.matches(card))
            .map(|(index, _)| index)
            .collect();
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Every loaded card, newest first.
    #[must_use]
    pub fn all_cards(&self) -> &[Flashcard] {
        &self.all_cards
    }

    /// Cards that pass the active filter, in list order.
    pub fn filtered_cards(&self) -> impl Iterator<Item = &Flashcard> {
        self.filtered.iter().map(|&index| &self.all_cards[index])
    }

    /// Number of cards that pass the active filter.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Position of the current card in the filtered list.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The active filter.
    #[must_use]
    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Whether the back of the current card is showing.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// The card being shown, if any.
    #[must_use]
    pub fn current_card(&self) -> Option<&Flashcard> {
        self.filtered
            .get(self.current_index)
            .map(|&index| &self.all_cards[index])
    }

    /// Selector choices: `"All"` followed by each category in first-seen order.
    ///
    /// A stored category named `"All"` is not listed twice.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for card in &self.all_cards {
            if !categories.contains(&card.category) {
                categories.push(card.category.clone());
            }
        }
        categories
    }

    /// What to draw for the current state.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        match &self.phase {
            Phase::Idle | Phase::Loading => View::Loading,
            Phase::Unavailable { message } => View::Unavailable { message },
            Phase::Ready => match self.current_card() {
                Some(card) => View::Card(CardView {
                    card,
                    position: self.current_index + 1,
                    total: self.filtered.len(),
                    flipped: self.flipped,
                }),
                None => View::Empty {
                    filter: &self.selected,
                },
            },
        }
    }
}
