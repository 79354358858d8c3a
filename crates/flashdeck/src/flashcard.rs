//! Core flashcard types for flashdeck.
//!
//! This module defines the records exchanged between the store, the HTTP API
//! and the client. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Category assigned when none is given at creation.
pub const DEFAULT_CATEGORY: &str = "General";

/// A stored flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    /// Unique identifier, assigned by the store.
    pub id: Uuid,

    /// Question side.
    pub front_text: String,

    /// Answer side.
    pub back_text: String,

    /// Grouping label.
    pub category: String,

    /// When the flashcard was created.
    pub created_at: DateTime<Utc>,
}

/// Request to create a flashcard.
///
/// Every field is optional at the type level so that a missing field reaches
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlashcard {
    /// Question side. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_text: Option<String>,

    /// Answer side. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_text: Option<String>,

    /// Grouping label. Defaults to [`DEFAULT_CATEGORY`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewFlashcard {
    /// Create a request with both sides and an optional category.
    #[must_use]
    pub fn new(
        front_text: impl Into<String>,
        back_text: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            front_text: Some(front_text.into()),
            back_text: Some(back_text.into()),
            category,
        }
    }

    /// Check that both sides are present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if either side is missing or blank.
    pub fn validate(&self) -> Result<()> {
        if is_blank(self.front_text.as_deref()) || is_blank(self.back_text.as_deref()) {
            return Err(Error::validation("Front text and back text are required"));
        }
        Ok(())
    }

    /// The category to store, with the default applied.
    #[must_use]
    pub fn resolved_category(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.trim().is_empty() => category,
            _ => DEFAULT_CATEGORY,
        }
    }
}

/// Partial update of a flashcard.
///
/// An empty string counts as "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardPatch {
    /// New question side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_text: Option<String>,

    /// New answer side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_text: Option<String>,

    /// New category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FlashcardPatch {
    /// Drop fields that are present but blank.
    #[must_use]
    pub fn normalized(self) -> Self {
        let keep = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            front_text: keep(self.front_text),
            back_text: keep(self.back_text),
            category: keep(self.category),
        }
    }

    /// Check whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.front_text.is_none() && self.back_text.is_none() && self.category.is_none()
    }
}

/// Number of flashcards in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category label.
    pub category: String,
    /// How many flashcards carry it. Always at least one.
    pub count: u64,
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
