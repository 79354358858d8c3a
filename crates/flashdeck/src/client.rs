//! HTTP client for the flashdeck API.
//!
//! Used by the CLI front end and by the review session. Calls are issued once:
//! there is no retry, timeout policy, or request coalescing.

use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::api::ErrorBody;
use crate::config::parse_base_url;
use crate::error::{Error, Result};
use crate::flashcard::{CategoryCount, Flashcard, FlashcardPatch, NewFlashcard};

/// Client for a running flashdeck server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = parse_base_url(base_url)?;
        // Without a trailing slash `Url::join` would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// The normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the per-category counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failure or [`Error::Api`] on a
    /// non-success response.
    pub async fn list_categories(&self) -> Result<Vec<CategoryCount>> {
        let response = self.http.get(self.endpoint("categories")?).send().await?;
        Self::parse(response).await
    }

    /// Fetch all flashcards, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failure or [`Error::Api`] on a
    /// non-success response.
    pub async fn list_flashcards(&self) -> Result<Vec<Flashcard>> {
        let response = self.http.get(self.endpoint("flashcards")?).send().await?;
        Self::parse(response).await
    }

    /// Fetch one flashcard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 404 if the flashcard does not exist.
    pub async fn get_flashcard(&self, id: Uuid) -> Result<Flashcard> {
        let response = self
            .http
            .get(self.endpoint(&format!("flashcards/{id}"))?)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Create a flashcard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 400 if either side is missing.
    pub async fn create_flashcard(&self, new: &NewFlashcard) -> Result<Flashcard> {
        let response = self
            .http
            .post(self.endpoint("flashcards")?)
            .json(new)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 400 for an empty patch or 404 for an
    /// unknown id.
    pub async fn update_flashcard(&self, id: Uuid, patch: &FlashcardPatch) -> Result<Flashcard> {
        let response = self
            .http
            .put(self.endpoint(&format!("flashcards/{id}"))?)
            .json(patch)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Delete a flashcard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 404 for an unknown id.
    pub async fn delete_flashcard(&self, id: Uuid) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint(&format!("flashcards/{id}"))?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::internal(format!("cannot build URL for {path}: {e}")))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => default_message(status),
        };
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
