//! Versioned SQL DDL for the stockroom database.
//! Append new migrations; never edit an applied one.

/// Bookkeeping table recording which migrations have run.
pub const SCHEMA_MIGRATIONS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)
"#;

/// Migration 1:
/// - `users.username` is the primary key, so duplicate inserts are rejected
/// - `inventory_tags` has no uniqueness on (image_id, tag); duplicates are stored
pub const MIGRATION_0001: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY NOT NULL,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS inventory_tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    image_id TEXT NOT NULL,
    tag TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_inventory_tags_tag ON inventory_tags(tag);
CREATE INDEX IF NOT EXISTS idx_inventory_tags_image_id ON inventory_tags(image_id);
"#;

/// Ordered `(version, ddl)` pairs.
pub const MIGRATIONS: &[(i64, &str)] = &[(1, MIGRATION_0001)];
