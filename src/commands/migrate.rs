//! `doc-intake migrate` - schema management for the intake database.
//!
//! Every action names the migrations it touches, and `fresh` reports the
//! tables and row counts it is about to throw away.

use std::fmt;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::db::MANAGED_TABLES;
use crate::infra::Database;

/// Applied/pending state of every known migration, in run order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    entries: Vec<(String, bool)>,
}

impl MigrationReport {
    pub fn new(entries: Vec<(String, bool)>) -> Self {
        Self { entries }
    }

    pub fn pending(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, applied)| !applied)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn applied_count(&self) -> usize {
        self.entries.iter().filter(|(_, applied)| *applied).count()
    }

    /// The migration `down` would revert.
    pub fn last_applied(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(_, applied)| *applied)
            .map(|(name, _)| name.as_str())
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);
        for (name, applied) in &self.entries {
            let state = if *applied { "applied" } else { "pending" };
            writeln!(f, "{:<width$}  {}", name, state, width = width)?;
        }
        write!(
            f,
            "{} applied, {} pending",
            self.applied_count(),
            self.entries.len() - self.applied_count()
        )
    }
}

async fn report(db: &Database) -> AppResult<MigrationReport> {
    let entries = db
        .migration_status()
        .await
        .map_err(|e| AppError::internal(format!("Cannot read migration state: {}", e)))?;
    Ok(MigrationReport::new(entries))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Schema changes stay explicit here; `serve` is the one that auto-migrates
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            let pending = report(&db).await?;
            let names = pending.pending();
            if names.is_empty() {
                tracing::info!("Schema is up to date");
                return Ok(());
            }
            for name in &names {
                tracing::info!(migration = %name, "Applying");
            }
            db.run_migrations()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            tracing::info!(count = names.len(), "Migrations applied");
        }
        MigrateAction::Down => {
            let current = report(&db).await?;
            let Some(name) = current.last_applied() else {
                tracing::warn!("No applied migration to roll back");
                return Ok(());
            };
            tracing::info!(migration = %name, "Rolling back");
            db.rollback_migration()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            tracing::info!(migration = %name, "Rolled back");
        }
        MigrateAction::Status => {
            println!("{}", report(&db).await?);
        }
        MigrateAction::Fresh => {
            for table in MANAGED_TABLES {
                match db.count_rows(table).await {
                    Ok(rows) => tracing::warn!(table, rows, "Dropping table"),
                    Err(_) => tracing::debug!(table, "Table not present"),
                }
            }
            db.fresh_migrations()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            tracing::info!(
                migrations = report(&db).await?.applied_count(),
                "Database recreated from scratch"
            );
        }
    }

    Ok(())
}
