//! Storage layer for flashdeck.
//!
//! This module provides `SQLite`-based persistent storage for flashcards and
//! the per-category aggregation computed from them.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::flashcard::{CategoryCount, Flashcard, FlashcardPatch, NewFlashcard};

const SELECT_COLUMNS: &str =
    "SELECT id, front_text, back_text, category, created_at FROM flashcards";

/// Storage engine for flashcards.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Validated creation with a default category
/// - Lookup by id and newest-first listing
/// - Partial updates and permanent deletion
/// - Per-category counts
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a flashcard.
    ///
    /// The category falls back to [`crate::flashcard::DEFAULT_CATEGORY`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if either side is missing or blank, or a
    /// store error if the insert fails.
    pub fn create(&self, new: &NewFlashcard) -> Result<Flashcard> {
        new.validate()?;

        let flashcard = Flashcard {
            id: Uuid::new_v4(),
            front_text: new.front_text.clone().unwrap_or_default(),
            back_text: new.back_text.clone().unwrap_or_default(),
            category: new.resolved_category().to_string(),
            // Stored with microsecond precision; truncate so the returned record
            // matches what a later read produces.
            created_at: Utc::now().trunc_subsecs(6),
        };

        self.conn.execute(
            r"
            INSERT INTO flashcards (id, front_text, back_text, category, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                flashcard.id.to_string(),
                flashcard.front_text,
                flashcard.back_text,
                flashcard.category,
                format_timestamp(flashcard.created_at),
            ],
        )?;

        debug!(
            "Created flashcard {} in category {}",
            flashcard.id, flashcard.category
        );
        Ok(flashcard)
    }

    /// Get a flashcard by its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no flashcard has this id, or a store
    /// error if the query fails.
    pub fn get(&self, id: Uuid) -> Result<Flashcard> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id.to_string()],
                Self::row_to_flashcard,
            )
            .optional()?
            .ok_or_else(|| Error::not_found(id))
    }

    /// List all flashcards, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self) -> Result<Vec<Flashcard>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC"
        ))?;

        let flashcards = stmt
            .query_map([], Self::row_to_flashcard)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(flashcards)
    }

    /// Apply a partial update and return the updated flashcard.
    ///
    /// Blank fields in the patch are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the patch supplies no field,
    /// [`Error::NotFound`] if the id is unknown, or a store error.
    pub fn update(&self, id: Uuid, patch: FlashcardPatch) -> Result<Flashcard> {
        let patch = patch.normalized();
        if patch.is_empty() {
            return Err(Error::validation(
                "At least one field must be provided for update",
            ));
        }

        let affected = self.conn.execute(
            r"
            UPDATE flashcards SET
                front_text = COALESCE(?2, front_text),
                back_text = COALESCE(?3, back_text),
                category = COALESCE(?4, category)
            WHERE id = ?1
            ",
            params![
                id.to_string(),
                patch.front_text,
                patch.back_text,
                patch.category,
            ],
        )?;

        if affected == 0 {
            return Err(Error::not_found(id));
        }

        debug!("Updated flashcard {}", id);
        self.get(id)
    }

    /// Delete a flashcard permanently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no flashcard has this id, or a store
    /// error if the delete fails.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM flashcards WHERE id = ?1", [id.to_string()])?;

        if affected == 0 {
            return Err(Error::not_found(id));
        }

        debug!("Deleted flashcard {}", id);
        Ok(())
    }

    /// Count flashcards per category.
    ///
    /// Only categories with at least one flashcard are reported, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn category_counts(&self) -> Result<Vec<CategoryCount>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT category, COUNT(*) FROM flashcards
            GROUP BY category ORDER BY category ASC
            ",
        )?;

        let counts = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok(CategoryCount {
                    category: row.get(0)?,
                    count: u64::try_from(count).unwrap_or(0),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    /// Count total flashcards in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM flashcards", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_flashcards = self.count()?;

        let total_categories: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT category) FROM flashcards",
            [],
            |row| row.get(0),
        )?;

        let (oldest, newest): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(created_at), MAX(created_at) FROM flashcards",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_flashcards,
            total_categories,
            oldest_flashcard: oldest.as_deref().and_then(parse_timestamp),
            newest_flashcard: newest.as_deref().and_then(parse_timestamp),
            db_size_bytes,
        })
    }

    fn row_to_flashcard(row: &rusqlite::Row) -> rusqlite::Result<Flashcard> {
        let id_str: String = row.get(0)?;
        let created_at_str: String = row.get(4)?;

        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(Flashcard {
            id,
            front_text: row.get(1)?,
            back_text: row.get(2)?,
            category: row.get(3)?,
            created_at,
        })
    }
}

/// Fixed-width RFC 3339 so that text order matches time order.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of flashcards stored.
    pub total_flashcards: i64,
    /// Number of distinct categories.
    pub total_categories: i64,
    /// Creation time of the oldest flashcard.
    pub oldest_flashcard: Option<DateTime<Utc>>,
    /// Creation time of the newest flashcard.
    pub newest_flashcard: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn card(front: &str, back: &str, category: Option<&str>) -> NewFlashcard {
        NewFlashcard::new(front, back, category.map(ToString::to_string))
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_create_and_get() {
        let storage = create_test_storage();
        let created = storage.create(&card("2+2", "4", Some("Math"))).unwrap();

        let retrieved = storage.get(created.id).unwrap();
        assert_eq!(retrieved, created);
        assert_eq!(retrieved.category, "Math");
    }

    #[test]
    fn test_create_defaults_category() {
        let storage = create_test_storage();

        let without = storage.create(&card("q", "a", None)).unwrap();
        let empty = storage.create(&card("q2", "a2", Some(""))).unwrap();

        assert_eq!(without.category, "General");
        assert_eq!(empty.category, "General");
    }

    #[test]
    fn test_create_rejects_missing_text() {
        let storage = create_test_storage();

        assert!(storage
            .create(&card("", "a", None))
            .unwrap_err()
            .is_validation());
        assert!(storage
            .create(&card("q", "", None))
            .unwrap_err()
            .is_validation());
        assert!(storage
            .create(&NewFlashcard::default())
            .unwrap_err()
            .is_validation());

        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_get_nonexistent() {
        let storage = create_test_storage();
        let err = storage.get(Uuid::new_v4()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_newest_first() {
        let storage = create_test_storage();

        let first = storage.create(&card("first", "1", None)).unwrap();
        let second = storage.create(&card("second", "2", None)).unwrap();
        let third = storage.create(&card("third", "3", None)).unwrap();

        let ids: Vec<Uuid> = storage.list().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn test_list_sorted_by_created_at_descending() {
        let storage = create_test_storage();
        for i in 0..20 {
            storage.create(&card(&format!("q{i}"), "a", None)).unwrap();
        }

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 20);
        for pair in list.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_update_partial() {
        let storage = create_test_storage();
        let created = storage.create(&card("2+2", "5", Some("Math"))).unwrap();

        let patch = FlashcardPatch {
            back_text: Some("4".to_string()),
            ..FlashcardPatch::default()
        };
        let updated = storage.update(created.id, patch).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.front_text, "2+2");
        assert_eq!(updated.back_text, "4");
        assert_eq!(updated.category, "Math");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn test_update_category() {
        let storage = create_test_storage();
        let created = storage.create(&card("q", "a", None)).unwrap();

        let patch = FlashcardPatch {
            category: Some("Science".to_string()),
            ..FlashcardPatch::default()
        };
        let updated = storage.update(created.id, patch).unwrap();
        assert_eq!(updated.category, "Science");
    }

    #[test]
    fn test_update_empty_patch_leaves_record_unchanged() {
        let storage = create_test_storage();
        let created = storage.create(&card("q", "a", Some("Math"))).unwrap();

        let err = storage
            .update(created.id, FlashcardPatch::default())
            .unwrap_err();
        assert!(err.is_validation());

        let blank = FlashcardPatch {
            front_text: Some(String::new()),
            back_text: Some(String::new()),
            category: Some(String::new()),
        };
        assert!(storage.update(created.id, blank).unwrap_err().is_validation());

        assert_eq!(storage.get(created.id).unwrap(), created);
    }

    #[test]
    fn test_update_nonexistent() {
        let storage = create_test_storage();
        let patch = FlashcardPatch {
            front_text: Some("q".to_string()),
            ..FlashcardPatch::default()
        };
        assert!(storage.update(Uuid::new_v4(), patch).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete() {
        let storage = create_test_storage();
        let created = storage.create(&card("q", "a", None)).unwrap();

        storage.delete(created.id).unwrap();
        assert!(storage.get(created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_twice_fails_second_time() {
        let storage = create_test_storage();
        let created = storage.create(&card("q", "a", None)).unwrap();

        assert!(storage.delete(created.id).is_ok());
        assert!(storage.delete(created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_category_counts() {
        let storage = create_test_storage();
        storage.create(&card("1", "a", Some("Math"))).unwrap();
        storage.create(&card("2", "a", Some("Math"))).unwrap();
        storage.create(&card("3", "a", Some("History"))).unwrap();
        storage.create(&card("4", "a", None)).unwrap();

        let counts = storage.category_counts().unwrap();
        assert_eq!(
            counts,
            vec![
                CategoryCount {
                    category: "General".to_string(),
                    count: 1
                },
                CategoryCount {
                    category: "History".to_string(),
                    count: 1
                },
                CategoryCount {
                    category: "Math".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_category_counts_omit_emptied_categories() {
        let storage = create_test_storage();
        let only = storage.create(&card("1", "a", Some("History"))).unwrap();
        storage.create(&card("2", "a", Some("Math"))).unwrap();

        storage.delete(only.id).unwrap();

        let counts = storage.category_counts().unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].category, "Math");
    }

    #[test]
    fn test_category_counts_follow_updates() {
        let storage = create_test_storage();
        let created = storage.create(&card("1", "a", Some("Math"))).unwrap();

        let patch = FlashcardPatch {
            category: Some("Science".to_string()),
            ..FlashcardPatch::default()
        };
        storage.update(created.id, patch).unwrap();

        let counts = storage.category_counts().unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].category, "Science");
    }

    #[test]
    fn test_category_counts_empty_store() {
        let storage = create_test_storage();
        assert!(storage.category_counts().unwrap().is_empty());
    }

    #[test]
    fn test_stats_empty() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();

        assert_eq!(stats.total_flashcards, 0);
        assert_eq!(stats.total_categories, 0);
        assert!(stats.oldest_flashcard.is_none());
        assert!(stats.newest_flashcard.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let storage = create_test_storage();
        let first = storage.create(&card("1", "a", Some("Math"))).unwrap();
        let second = storage.create(&card("2", "a", None)).unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_flashcards, 2);
        assert_eq!(stats.total_categories, 2);
        assert_eq!(stats.oldest_flashcard, Some(first.created_at));
        assert_eq!(stats.newest_flashcard, Some(second.created_at));
    }

    #[test]
    fn test_unicode_content() {
        let storage = create_test_storage();
        let created = storage
            .create(&card("こんにちは", "hello 🌍", Some("Language")))
            .unwrap();

        let retrieved = storage.get(created.id).unwrap();
        assert_eq!(retrieved.front_text, "こんにちは");
        assert_eq!(retrieved.back_text, "hello 🌍");
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("flashcards.db");

        let id = {
            let storage = Storage::open(&db_path).unwrap();
            assert_eq!(storage.path(), db_path);
            storage.create(&card("q", "a", None)).unwrap().id
        };

        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(reopened.get(id).unwrap().front_text, "q");
        assert!(reopened.stats().unwrap().db_size_bytes > 0);
    }
}
