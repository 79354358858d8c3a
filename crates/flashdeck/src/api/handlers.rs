//! Request handlers.
//!
//! GET    /categories        flashcard count per category
//! GET    /flashcards        all flashcards, newest first
//! POST   /flashcards        create a flashcard
//! GET    /flashcards/:id    one flashcard
//! PUT    /flashcards/:id    partial update
//! DELETE /flashcards/:id    permanent delete
//! GET    /health            liveness

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::error::Error;
use crate::flashcard::{CategoryCount, Flashcard, FlashcardPatch, NewFlashcard};

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true`.
    pub success: bool,
}

/// Body returned by the health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub(super) async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let counts = state
        .with_storage(|storage| storage.category_counts())
        .await
        .map_err(ApiError::with("Failed to fetch categories"))?;
    Ok(Json(counts))
}

pub(super) async fn list_flashcards(
    State(state): State<AppState>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    let flashcards = state
        .with_storage(|storage| storage.list())
        .await
        .map_err(ApiError::with("Failed to fetch flashcards"))?;
    Ok(Json(flashcards))
}

pub(super) async fn create_flashcard(
    State(state): State<AppState>,
    payload: Result<Json<NewFlashcard>, JsonRejection>,
) -> Result<(StatusCode, Json<Flashcard>), ApiError> {
    const FALLBACK: &str = "Failed to create flashcard";

    let Json(new) = payload.map_err(|rejection| bad_body(&rejection, FALLBACK))?;
    let flashcard = state
        .with_storage(move |storage| storage.create(&new))
        .await
        .map_err(ApiError::with(FALLBACK))?;

    info!(id = %flashcard.id, category = %flashcard.category, "Created flashcard");
    Ok((StatusCode::CREATED, Json(flashcard)))
}

pub(super) async fn get_flashcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Flashcard>, ApiError> {
    const FALLBACK: &str = "Failed to fetch flashcard";

    let id = parse_id(&id).map_err(ApiError::with(FALLBACK))?;
    let flashcard = state
        .with_storage(move |storage| storage.get(id))
        .await
        .map_err(ApiError::with(FALLBACK))?;
    Ok(Json(flashcard))
}

pub(super) async fn update_flashcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<FlashcardPatch>, JsonRejection>,
) -> Result<Json<Flashcard>, ApiError> {
    const FALLBACK: &str = "Failed to update flashcard";

    let Json(patch) = payload.map_err(|rejection| bad_body(&rejection, FALLBACK))?;
    // An empty patch is rejected before the id is looked at.
    let patch = patch.normalized();
    if patch.is_empty() {
        return Err(ApiError::new(
            Error::validation("At least one field must be provided for update"),
            FALLBACK,
        ));
    }

    let id = parse_id(&id).map_err(ApiError::with(FALLBACK))?;
    let flashcard = state
        .with_storage(move |storage| storage.update(id, patch))
        .await
        .map_err(ApiError::with(FALLBACK))?;

    info!(id = %flashcard.id, "Updated flashcard");
    Ok(Json(flashcard))
}

pub(super) async fn delete_flashcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    const FALLBACK: &str = "Failed to delete flashcard";

    let id = parse_id(&id).map_err(ApiError::with(FALLBACK))?;
    state
        .with_storage(move |storage| storage.delete(id))
        .await
        .map_err(ApiError::with(FALLBACK))?;

    info!(%id, "Deleted flashcard");
    Ok(Json(DeleteResponse { success: true }))
}

/// Ids that are not UUIDs cannot name a stored flashcard.
fn parse_id(raw: &str) -> crate::error::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::not_found(raw))
}

fn bad_body(rejection: &JsonRejection, fallback: &'static str) -> ApiError {
    debug!(%rejection, "Rejected request body");
    ApiError::new(Error::validation("Invalid request body"), fallback)
}
