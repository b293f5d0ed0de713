//! Idempotent schema migrations.

use crate::{Db, DbError};

/// Migration contributed by a module.
///
/// `up` must be safe to run on every startup (`CREATE ... IF NOT EXISTS`);
/// no ledger of applied ids is kept.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Apply `migrations` for `module` in the order given.
pub async fn apply_migrations(
    db: &Db,
    module: &str,
    migrations: &[Migration],
) -> Result<(), DbError> {
    for migration in migrations {
        tracing::info!(
            target: "bookshelf-db",
            module,
            migration = migration.id,
            "applying migration"
        );
        sqlx::raw_sql(migration.up).execute(db).await?;
    }

    Ok(())
}
