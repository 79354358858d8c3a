//! `SQLite` schema definitions for flashdeck.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the flashcards table.
pub const CREATE_FLASHCARDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flashcards (
    id TEXT PRIMARY KEY NOT NULL,
    front_text TEXT NOT NULL,
    back_text TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'General',
    created_at TEXT NOT NULL
)
";

/// SQL statement to create an index on category for grouping and filtering.
pub const CREATE_CATEGORY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flashcards_category ON flashcards(category)
";

/// SQL statement to create an index on `created_at` for newest-first listing.
pub const CREATE_CREATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flashcards_created_at ON flashcards(created_at DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_FLASHCARDS_TABLE,
    CREATE_CATEGORY_INDEX,
    CREATE_CREATED_AT_INDEX,
    CREATE_METADATA_TABLE,
];
