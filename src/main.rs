use anyhow::Context;
use bookshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookshelf settings")?;

    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        bind = %settings.server.bind_addr(),
        db = %settings.database.redacted_dsn(),
        "bookshelf starting"
    );

    bookshelf_app::run(settings).await
}
