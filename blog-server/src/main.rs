use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use data::repositories::Repositories;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level, settings.log_format)?;

    let repos = match settings.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url, settings.database_max_connections).await?;
            run_migrations(&pool).await?;
            Repositories::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL is not set, using in-memory store");
            Repositories::in_memory()
        }
    };

    let jwt = Arc::new(JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds));
    let state = AppState::new(repos, jwt);

    info!(uploads_dir = %settings.uploads_dir.display(), "starting blog server");
    server::run_http(&settings, state).await
}
