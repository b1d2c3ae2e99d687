//! Photoshare schema migration entry point.
//!
//! Usage: `photoshare-migrate [up|down|fresh|status]` (default `up`).

use anyhow::{Context, bail};
use photoshare_common::Config;
use photoshare_db::migrations::Migrator;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Up,
    Down,
    Fresh,
    Status,
}

impl Command {
    fn parse(arg: Option<&str>) -> anyhow::Result<Self> {
        match arg {
            None | Some("up") => Ok(Self::Up),
            Some("down") => Ok(Self::Down),
            Some("fresh") => Ok(Self::Fresh),
            Some("status") => Ok(Self::Status),
            Some(other) => bail!("unknown command `{other}`, expected up, down, fresh or status"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoshare=debug,sea_orm=info".into()),
        )
        .init();

    let arg = std::env::args().nth(1);
    let command = Command::parse(arg.as_deref())?;

    let config = Config::load().context("failed to load configuration")?;
    let db = photoshare_db::init(&config).await?;

    match command {
        Command::Up => {
            info!("Applying pending migrations...");
            photoshare_db::migrate(&db).await?;
        }
        Command::Down => {
            info!("Rolling back all migrations...");
            photoshare_db::rollback(&db).await?;
        }
        Command::Fresh => {
            info!("Rolling back and re-applying all migrations...");
            photoshare_db::rollback(&db).await?;
            photoshare_db::migrate(&db).await?;
        }
        Command::Status => {
            let pending = Migrator::get_pending_migrations(&db)
                .await
                .context("failed to read migration status")?;
            let applied = Migrator::get_applied_migrations(&db)
                .await
                .context("failed to read migration status")?;
            for migration in &applied {
                info!(name = migration.name(), "applied");
            }
            for migration in &pending {
                info!(name = migration.name(), "pending");
            }
        }
    }

    db.close().await?;
    info!(?command, "Done");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_up() {
        assert_eq!(Command::parse(None).unwrap(), Command::Up);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(Some("down")).unwrap(), Command::Down);
        assert_eq!(Command::parse(Some("fresh")).unwrap(), Command::Fresh);
        assert_eq!(Command::parse(Some("status")).unwrap(), Command::Status);
    }

    #[test]
    fn test_unknown_command_rejected() {
        let err = Command::parse(Some("sideways")).unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }
}
