use std::sync::Arc;

use crate::{
    error::{classify, AppResult},
    models::{WatchlistEntry, MIGRATION_FLAG_KEY},
    services::{identity::IdentityProvider, watchlist::RemoteWatchlist},
};

/// Outcome of a migration attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// The account was already migrated; nothing was attempted
    pub already_migrated: bool,
    pub attempted: usize,
    pub migrated: usize,
    pub failed: usize,
}

/// Moves a guest watchlist into the signed-in account, once per account
///
/// Completion is recorded in the account preference bag under
/// [`MIGRATION_FLAG_KEY`]. Per-entry failures are logged and skipped, and the
/// flag is still set afterwards. Failures reading or writing the flag are
/// returned to the caller, leaving the flag unset so a later login retries.
///
/// Local storage is never touched here.
pub struct MigrationCoordinator {
    identity: Arc<dyn IdentityProvider>,
    remote: Arc<dyn RemoteWatchlist>,
}

impl MigrationCoordinator {
    pub fn new(identity: Arc<dyn IdentityProvider>, remote: Arc<dyn RemoteWatchlist>) -> Self {
        Self { identity, remote }
    }

    pub async fn migrate(
        &self,
        owner_id: &str,
        local_entries: &[WatchlistEntry],
    ) -> AppResult<MigrationReport> {
        let mut prefs = self.identity.preferences().await?;

        if prefs.watchlist_migrated() {
            tracing::info!(owner_id = %owner_id, "Watchlist already migrated, skipping");
            return Ok(MigrationReport {
                already_migrated: true,
                ..Default::default()
            });
        }

        let mut report = MigrationReport {
            attempted: local_entries.len(),
            ..Default::default()
        };

        if !local_entries.is_empty() {
            tracing::info!(
                owner_id = %owner_id,
                entries = local_entries.len(),
                backend = self.remote.name(),
                "Migrating local watchlist"
            );
        }

        for entry in local_entries {
            match self.remote.add(owner_id, entry).await {
                Ok(_) => report.migrated += 1,
                Err(e) => {
                    let classified = classify(&e);
                    tracing::warn!(
                        owner_id = %owner_id,
                        media = %entry.key(),
                        code = classified.code,
                        category = %classified.category,
                        error = %e,
                        "Failed to migrate item"
                    );
                    report.failed += 1;
                }
            }
        }

        prefs.set_flag(MIGRATION_FLAG_KEY, true);
        self.identity.update_preferences(&prefs).await?;

        tracing::info!(
            owner_id = %owner_id,
            migrated = report.migrated,
            failed = report.failed,
            "Watchlist migration completed"
        );

        Ok(report)
    }
}
