//! Watchlist stores
//!
//! Guests keep their watchlist in on-device storage ([`LocalWatchlist`]);
//! signed-in users keep it in a hosted per-user collection behind the
//! [`RemoteWatchlist`] trait. Both enforce uniqueness of the
//! `(media_id, media_type)` natural key.
use crate::{
    error::{classify, AppResult},
    models::WatchlistEntry,
};

pub mod local;
pub mod remote;

pub use local::LocalWatchlist;
pub use remote::AppwriteWatchlist;

/// Upper bound on entries fetched per owner
pub const MAX_ENTRIES: u32 = 1000;

/// Remote, per-account watchlist
///
/// Ownership is enforced by the backend's row-level permissions; callers never
/// filter by owner themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RemoteWatchlist: Send + Sync {
    /// Fetch the owner's entries, newest first, capped at [`MAX_ENTRIES`]
    async fn try_load(&self, owner_id: &str) -> AppResult<Vec<WatchlistEntry>>;

    /// Like [`try_load`](RemoteWatchlist::try_load) but degrades to an empty
    /// list on failure so callers can fall back to a local view
    async fn load(&self, owner_id: &str) -> Vec<WatchlistEntry> {
        match self.try_load(owner_id).await {
            Ok(entries) => entries,
            Err(e) => {
                let classified = classify(&e);
                tracing::warn!(
                    owner_id = %owner_id,
                    code = classified.code,
                    category = %classified.category,
                    error = %e,
                    "Failed to load remote watchlist"
                );
                Vec::new()
            }
        }
    }

    /// Create an owner-only record. A duplicate natural key is not an error:
    /// the input entry is returned unchanged.
    async fn add(&self, owner_id: &str, entry: &WatchlistEntry) -> AppResult<WatchlistEntry>;

    /// Delete the owner's record for `media_id`. `Ok(false)` when none exists.
    async fn remove(&self, owner_id: &str, media_id: u64) -> AppResult<bool>;

    /// Delete every record of the owner; individual failures are skipped.
    /// Returns the number of records deleted.
    async fn clear(&self, owner_id: &str) -> AppResult<usize>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
