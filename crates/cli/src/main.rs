use std::path::PathBuf;

use anyhow::Context;
use bookshelf_kernel::settings::{Settings, DEFAULT_ENV_FILE};
use clap::{Args, Parser, Subcommand};

/// Operator CLI for the bookshelf service
#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect, migrate, and serve the HTTP API
    Serve(EnvArgs),
    /// Apply schema migrations and exit
    Migrate(EnvArgs),
    /// Print the resolved configuration with the password masked
    Config(EnvArgs),
}

#[derive(Debug, Args)]
struct EnvArgs {
    /// Env file loaded before reading configuration
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,
}

impl EnvArgs {
    fn settings(&self) -> anyhow::Result<Settings> {
        Settings::load_from(&self.env_file).context("failed to load bookshelf settings")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let settings = args.settings()?;
            bookshelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "serving via CLI");
            bookshelf_app::run(settings).await
        }
        Command::Migrate(args) => {
            let settings = args.settings()?;
            bookshelf_telemetry::init(&settings.telemetry)?;
            bookshelf_app::migrate(&settings).await?;
            tracing::info!("migrations applied");
            Ok(())
        }
        Command::Config(args) => {
            let settings = args.settings()?;
            println!("environment: {:?}", settings.environment);
            println!("bind: {}", settings.server.bind_addr());
            println!("database: {}", settings.database.redacted_dsn());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_defaults_to_dot_env() {
        let cli = Cli::try_parse_from(["bookshelf-cli", "migrate"]).unwrap();
        match cli.command {
            Command::Migrate(args) => assert_eq!(args.env_file, PathBuf::from(".env")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn env_file_can_be_overridden() {
        let cli =
            Cli::try_parse_from(["bookshelf-cli", "serve", "--env-file", "/etc/bookshelf.env"])
                .unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.env_file, PathBuf::from("/etc/bookshelf.env"))
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["bookshelf-cli"]).is_err());
    }
}
