use crate::db::schema::{MIGRATIONS, SCHEMA_MIGRATIONS_INIT};
use crate::error::StockroomError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool for `database_url` and bring its schema up to date.
///
/// In-memory databases are pinned to a single connection that is never
/// recycled; each SQLite memory connection is its own database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, StockroomError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let mut pool_opts = SqlitePoolOptions::new();
    if database_url.contains(":memory:") {
        pool_opts = pool_opts
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_opts.connect_with(connect_opts).await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply every migration not yet recorded in `schema_migrations`.
/// Each migration runs in its own transaction.
pub async fn migrate(pool: &SqlitePool) -> Result<(), StockroomError> {
    sqlx::query(SCHEMA_MIGRATIONS_INIT).execute(pool).await?;

    for &(version, ddl) in MIGRATIONS {
        let applied: Option<(i64,)> =
            sqlx::query_as("SELECT version FROM schema_migrations WHERE version = ?")
                .bind(version)
                .fetch_optional(pool)
                .await?;
        if applied.is_some() {
            debug!(version, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        // sqlx::query runs a single statement, so split the script
        for stmt in ddl.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO schema_migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!(version, "applied schema migration");
    }
    Ok(())
}
