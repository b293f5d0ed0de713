//! Bookshelf application library
//!
//! Wires the books module, database pool, and HTTP server together.

pub mod modules;

use anyhow::Context;
use bookshelf_db::Db;
use bookshelf_kernel::{settings::Settings, InitCtx};

/// Open the database pool described by `settings`.
pub async fn connect(settings: &Settings) -> anyhow::Result<Db> {
    bookshelf_db::open_with(&settings.database, &settings.pool)
        .await
        .context("failed to connect to database")
}

/// Apply every module migration and return.
pub async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let db = connect(settings).await?;
    modules::registry()
        .run_migrations(&db)
        .await
        .context("failed to migrate database")?;
    db.close().await;
    Ok(())
}

/// Connect, migrate, and serve until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let db = connect(&settings).await?;
    let registry = modules::registry();

    registry
        .run_migrations(&db)
        .await
        .context("failed to migrate database")?;

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    bookshelf_http::start_server(&registry, &settings, &db).await?;

    registry.stop_modules().await?;
    db.close().await;
    Ok(())
}
