pub mod auth;

pub use auth::{EmployeeSession, SESSION_COOKIE};
