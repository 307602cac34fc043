use std::sync::Arc;

use crate::{
    db::KeyValueStore,
    error::{classify, AppError, AppResult},
    models::{Identity, MediaKey, WatchlistEntry},
    services::{
        identity::IdentityProvider,
        migration::{MigrationCoordinator, MigrationReport},
        watchlist::{LocalWatchlist, RemoteWatchlist},
    },
};

enum Mode {
    Guest,
    Authenticated {
        identity: Identity,
        /// Remote view, newest first
        entries: Vec<WatchlistEntry>,
    },
}

/// Watchlist of the current visitor, guest or signed in
///
/// Guests read and write the on-device copy. Once an account is detected the
/// remote collection becomes the source of truth and any guest entries are
/// migrated into it.
pub struct WatchlistSession {
    identity: Arc<dyn IdentityProvider>,
    remote: Arc<dyn RemoteWatchlist>,
    local: LocalWatchlist,
    mode: Mode,
}

impl WatchlistSession {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        remote: Arc<dyn RemoteWatchlist>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            identity,
            remote,
            local: LocalWatchlist::load(store),
            mode: Mode::Guest,
        }
    }

    /// Resolves the account and loads the matching watchlist
    ///
    /// Never fails: identity errors fall back to guest mode. Returns the
    /// migration report when a migration was attempted.
    pub async fn start(&mut self) -> Option<MigrationReport> {
        let identity = match self.identity.current_identity().await {
            Ok(identity) => identity,
            Err(e) if e.code() == 401 => {
                tracing::info!("No active session, using guest watchlist");
                self.mode = Mode::Guest;
                return None;
            }
            Err(e) => {
                let classified = classify(&e);
                tracing::warn!(
                    code = classified.code,
                    category = %classified.category,
                    error = %e,
                    "Failed to resolve account, using guest watchlist"
                );
                self.mode = Mode::Guest;
                return None;
            }
        };

        let owner_id = identity.id.clone();
        let mut entries = self.remote.load(&owner_id).await;
        let mut report = None;

        if !self.local.is_empty() {
            let coordinator = MigrationCoordinator::new(self.identity.clone(), self.remote.clone());
            match coordinator.migrate(&owner_id, self.local.list()).await {
                Ok(outcome) => {
                    entries = self.remote.load(&owner_id).await;
                    // An empty reload may mean the backend is unreachable
                    if !entries.is_empty() {
                        if let Err(e) = self.local.discard() {
                            tracing::warn!(error = %e, "Failed to clear local watchlist");
                        }
                    }
                    report = Some(outcome);
                }
                Err(e) => {
                    let classified = classify(&e);
                    tracing::warn!(
                        owner_id = %owner_id,
                        code = classified.code,
                        category = %classified.category,
                        error = %e,
                        "Watchlist migration failed, keeping local copy"
                    );
                }
            }
        }

        tracing::info!(
            owner_id = %owner_id,
            entries = entries.len(),
            "Signed-in watchlist loaded"
        );
        self.mode = Mode::Authenticated { identity, entries };
        report
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.mode, Mode::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.mode {
            Mode::Authenticated { identity, .. } => Some(identity),
            Mode::Guest => None,
        }
    }

    /// Entries of the active watchlist
    pub fn entries(&self) -> &[WatchlistEntry] {
        match &self.mode {
            Mode::Authenticated { entries, .. } => entries,
            Mode::Guest => self.local.list(),
        }
    }

    pub fn contains(&self, key: &MediaKey) -> bool {
        self.entries().iter().any(|e| e.key() == *key)
    }

    /// Adds the entry if absent, removes it otherwise. Returns whether the
    /// entry is present afterwards.
    ///
    /// Signed-in state only changes once the backend call succeeds.
    ///
    /// The remote collection is unique on `media_id` alone, so adding a media
    /// id that is already listed under the other media type is refused rather
    /// than reported as a duplicate.
    pub async fn toggle(&mut self, entry: WatchlistEntry) -> AppResult<bool> {
        let key = entry.key();
        match &mut self.mode {
            Mode::Guest => self.local.toggle(entry),
            Mode::Authenticated { identity, entries } => {
                if let Some(other) = entries
                    .iter()
                    .find(|e| e.media_id == key.media_id && e.media_type != key.media_type)
                {
                    return Err(AppError::Validation(format!(
                        "{} is already in the watchlist as {}",
                        key, other.media_type
                    )));
                }

                if entries.iter().any(|e| e.key() == key) {
                    self.remote.remove(&identity.id, key.media_id).await?;
                    entries.retain(|e| e.key() != key);
                    Ok(false)
                } else {
                    let saved = self.remote.add(&identity.id, &entry).await?;
                    entries.insert(0, saved);
                    Ok(true)
                }
            }
        }
    }

    /// Ends the account session and returns to an empty guest watchlist
    pub async fn logout(&mut self) -> AppResult<()> {
        if self.is_authenticated() {
            if let Err(e) = self.identity.delete_session().await {
                let classified = classify(&e);
                tracing::warn!(
                    code = classified.code,
                    category = %classified.category,
                    error = %e,
                    "Failed to delete session"
                );
            }
        }

        self.mode = Mode::Guest;
        self.local.clear()
    }
}
