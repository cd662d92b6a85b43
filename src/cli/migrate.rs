use crate::cli::MigrateCommand;
use crate::{Config, Database};
use anyhow::Result;

/// Human-readable name for each schema version, indexed by `version - 1`.
const SCHEMA_VERSIONS: [&str; 1] = ["blog_posts and projects tables, slug indexes"];

pub async fn run(config: &Config, command: Option<MigrateCommand>) -> Result<()> {
    let db = Database::open(&config.database.path, config.database.pool_size)?;

    match command {
        None => {
            let pending = pending_versions(&db)?;
            db.migrate()?;
            if pending == 0 {
                tracing::info!("Schema already up to date");
            } else {
                tracing::info!("Applied {} migration(s) to {}", pending, config.database.path);
            }
        }
        Some(MigrateCommand::Status) => print_status(&db, &config.database.path)?,
    }

    Ok(())
}

fn pending_versions(db: &Database) -> Result<usize> {
    Ok(db
        .get_migration_status()?
        .iter()
        .filter(|(_, applied_at)| applied_at.is_none())
        .count())
}

fn print_status(db: &Database, path: &str) -> Result<()> {
    let statuses = db.get_migration_status()?;

    println!("Schema status for {}", path);
    for (version, applied_at) in &statuses {
        let name = usize::try_from(*version)
            .ok()
            .and_then(|v| v.checked_sub(1))
            .and_then(|i| SCHEMA_VERSIONS.get(i))
            .copied()
            .unwrap_or("unknown");
        let state = applied_at
            .as_deref()
            .map(|at| format!("applied {}", at))
            .unwrap_or_else(|| "pending".to_string());
        println!("  v{:<4} {:<48} {}", version, name, state);
    }

    let pending = statuses.iter().filter(|(_, at)| at.is_none()).count();
    if pending > 0 {
        println!("{} pending; run `folio migrate` to apply", pending);
    } else {
        println!("up to date");
    }

    Ok(())
}
