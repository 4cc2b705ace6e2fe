use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use stockroom::db::CredentialStore;
use stockroom::service::user_loader;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &stockroom::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        insecure_cookie = cfg.insecure_cookie
    );
    if cfg.cookie_secret.is_none() {
        warn!("no cookie_secret configured; sessions will not survive a restart");
    }

    let pool = stockroom::db::connect(&cfg.database_url).await?;

    if let Some(users_path) = cfg.users_path.as_ref() {
        let store = CredentialStore::new(pool.clone());
        match user_loader::load_from_file(users_path) {
            Ok(users) if !users.is_empty() => {
                let count = users.len();
                let added = user_loader::seed(&store, users).await?;
                info!(
                    path = %users_path.display(),
                    count,
                    added,
                    "seeded users from file"
                );
            }
            Ok(_) => {
                info!(path = %users_path.display(), "no users discovered");
            }
            Err(e) => {
                warn!(
                    path = %users_path.display(),
                    error = %e,
                    "failed to load users file"
                );
            }
        }
    }

    let state = stockroom::router::StockroomState::new(pool, cfg);
    let app = stockroom::router::stockroom_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
