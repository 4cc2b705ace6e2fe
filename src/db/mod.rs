//! Database module: models, schema and stores for persistent state.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: numbered SQL migrations (SQLite-first)
//! - `sqlite.rs`: pool construction and migration runner
//! - `users.rs`: credential store over `users`
//! - `inventory.rs`: tag index over `inventory_tags`

pub mod inventory;
pub mod models;
pub mod schema;
pub mod sqlite;
pub mod users;

pub use inventory::TagIndex;
pub use models::{NewUser, User};
pub use schema::MIGRATIONS;
pub use sqlite::{SqlitePool, connect, migrate};
pub use users::CredentialStore;
