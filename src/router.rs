use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::db::{CredentialStore, SqlitePool, TagIndex};
use crate::handlers::employees::{confirm_tags, employee_home, login, logout};
use crate::handlers::inventory::{list_items, search_items};

/// Shared handler state; every field is cheap to clone.
#[derive(Clone)]
pub struct StockroomState {
    pub credentials: CredentialStore,
    pub tags: TagIndex,
    pub cookie_key: Key,
    pub secure_cookie: bool,
}

impl StockroomState {
    pub fn new(pool: SqlitePool, cfg: &Config) -> Self {
        Self {
            credentials: CredentialStore::new(pool.clone()),
            tags: TagIndex::new(pool),
            cookie_key: cfg.cookie_key(),
            secure_cookie: !cfg.insecure_cookie,
        }
    }
}

impl FromRef<StockroomState> for Key {
    fn from_ref(state: &StockroomState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn stockroom_router(state: StockroomState) -> Router {
    Router::new()
        .route("/", get(list_items))
        .route("/search", get(search_items))
        .route("/employees", get(employee_home))
        .route("/employees/login", post(login))
        .route("/employees/logout", post(logout))
        .route("/employees/uploads/{image_id}", post(confirm_tags))
        .with_state(state)
}
