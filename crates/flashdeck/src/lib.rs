//! `flashdeck` - A flashcard study service
//!
//! This library provides the flashcard store, the HTTP API over it, a client
//! for that API, and the review session used to study cards one at a time.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod flashcard;
pub mod logging;
pub mod review;
pub mod storage;

pub use api::{build_router, AppState, RouterOptions};
pub use client::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use flashcard::{CategoryCount, Flashcard, FlashcardPatch, NewFlashcard, DEFAULT_CATEGORY};
pub use logging::init_logging;
pub use review::{ReviewController, ReviewSession};
pub use storage::{Storage, StorageStats};
