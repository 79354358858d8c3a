//! Flashcard review sessions.
//!
//! [`ReviewSession`] holds the state and decides what happens; the
//! [`ReviewController`] runs the effects it asks for against a
//! [`FlashcardSource`] and feeds the outcomes back in.

mod session;

use std::collections::VecDeque;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::flashcard::{Flashcard, NewFlashcard};

pub use session::{
    Action, CardView, CategoryFilter, Effect, Notification, NotificationKind, Phase,
    ReviewSession, View, ALL_CATEGORIES,
};

/// Where a review session gets its cards from.
#[async_trait::async_trait]
pub trait FlashcardSource: Send + Sync {
    /// Fetch every flashcard, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cards cannot be fetched.
    async fn fetch_flashcards(&self) -> Result<Vec<Flashcard>>;

    /// Permanently delete one flashcard.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete was refused or did not reach the store.
    async fn delete_flashcard(&self, id: Uuid) -> Result<()>;

    /// Create one flashcard.
    ///
    /// # Errors
    ///
    /// Returns an error if the card was rejected or did not reach the store.
    async fn create_flashcard(&self, new: &NewFlashcard) -> Result<Flashcard>;
}

#[async_trait::async_trait]
impl FlashcardSource for ApiClient {
    async fn fetch_flashcards(&self) -> Result<Vec<Flashcard>> {
        self.list_flashcards().await
    }

    async fn delete_flashcard(&self, id: Uuid) -> Result<()> {
        ApiClient::delete_flashcard(self, id).await
    }

    async fn create_flashcard(&self, new: &NewFlashcard) -> Result<Flashcard> {
        ApiClient::create_flashcard(self, new).await
    }
}

/// Drives a [`ReviewSession`] against a [`FlashcardSource`].
#[derive(Debug)]
pub struct ReviewController<S> {
    session: ReviewSession,
    source: S,
}

impl<S: FlashcardSource> ReviewController<S> {
    /// Create a controller with a fresh session.
    pub fn new(source: S) -> Self {
        Self::with_session(source, ReviewSession::new())
    }

    /// Create a controller around an existing session.
    pub fn with_session(source: S, session: ReviewSession) -> Self {
        Self { session, source }
    }

    /// The current session state.
    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    /// The card source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the card list.
    pub async fn load(&mut self) -> Vec<Notification> {
        self.dispatch(Action::Load).await
    }

    /// Apply an action and run every effect it leads to.
    ///
    /// Returns the notifications raised along the way, in order.
    pub async fn dispatch(&mut self, action: Action) -> Vec<Notification> {
        let mut notifications = Vec::new();
        let mut pending = VecDeque::from([action]);

        while let Some(action) = pending.pop_front() {
            for effect in self.session.update(action) {
                match effect {
                    Effect::Notify(notification) => notifications.push(notification),
                    other => {
                        if let Some(outcome) = self.run(other).await {
                            pending.push_back(outcome);
                        }
                    }
                }
            }
        }

        notifications
    }

    async fn run(&self, effect: Effect) -> Option<Action> {
        match effect {
            Effect::FetchFlashcards => match self.source.fetch_flashcards().await {
                Ok(cards) => {
                    debug!(count = cards.len(), "Loaded flashcards");
                    Some(Action::Loaded(cards))
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load flashcards");
                    Some(Action::LoadFailed("Failed to fetch flashcards".to_string()))
                }
            },
            Effect::DeleteFlashcard(id) => match self.source.delete_flashcard(id).await {
                Ok(()) => Some(Action::DeleteSucceeded(id)),
                Err(e) => {
                    warn!(%id, error = %e, "Failed to delete flashcard");
                    Some(Action::DeleteFailed {
                        id,
                        message: "Failed to delete flashcard".to_string(),
                    })
                }
            },
            Effect::CreateFlashcard(new) => match self.source.create_flashcard(&new).await {
                Ok(card) => {
                    debug!(id = %card.id, "Created flashcard");
                    Some(Action::Created(card))
                }
                Err(e) => {
                    warn!(error = %e, "Failed to create flashcard");
                    Some(Action::CreateFailed(create_failure_message(&e)))
                }
            },
            Effect::Notify(_) => None,
        }
    }
}

/// Rejected input is worth showing as is; anything else gets a generic message.
fn create_failure_message(error: &Error) -> String {
    match error {
        Error::Validation { message } | Error::Api { status: 400, message } => message.clone(),
        _ => "Failed to create flashcard".to_string(),
    }
}
