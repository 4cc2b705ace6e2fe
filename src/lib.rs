pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

pub use db::{CredentialStore, TagIndex};
pub use error::{StockroomError, VerifyError};
