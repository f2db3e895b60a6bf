use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use bazaar_auth_types::identity::SessionSecret;
use bazaar_store::config::StoreConfig;
use bazaar_store::router::build_router;
use bazaar_store::state::AppState;
use bazaar_store_migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bazaar_core::tracing::init_tracing();

    let config = StoreConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("failed to apply migrations")?;
        info!("migrations applied");
    }

    let state = AppState {
        db,
        session_secret: SessionSecret::new(config.session_secret),
        cookie_domain: config.cookie_domain,
        session_ttl_secs: config.session_ttl_secs,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.store_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("store service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
