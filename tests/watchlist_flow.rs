use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use watchlist_sync::db::{KeyValueStore, MemoryStore, StorageKey};
use watchlist_sync::error::{AppError, AppResult};
use watchlist_sync::models::{Identity, MediaType, Preferences, WatchlistEntry};
use watchlist_sync::services::identity::IdentityProvider;
use watchlist_sync::services::watchlist::RemoteWatchlist;
use watchlist_sync::WatchlistSession;

const OWNER: &str = "user_123";

struct FakeIdentity {
    signed_in: Mutex<bool>,
    prefs: Mutex<Preferences>,
    pref_writes: Mutex<usize>,
}

impl FakeIdentity {
    fn new(signed_in: bool) -> Self {
        Self {
            signed_in: Mutex::new(signed_in),
            prefs: Mutex::new(Preferences::new()),
            pref_writes: Mutex::new(0),
        }
    }

    fn sign_in(&self) {
        *self.signed_in.lock().unwrap() = true;
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentity {
    async fn current_identity(&self) -> AppResult<Identity> {
        if !*self.signed_in.lock().unwrap() {
            return Err(AppError::backend(
                401,
                "general_unauthorized_scope",
                "User (role: guests) missing scope (account)",
            ));
        }
        Ok(Identity {
            id: OWNER.to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            prefs: self.prefs.lock().unwrap().clone(),
        })
    }

    async fn preferences(&self) -> AppResult<Preferences> {
        Ok(self.prefs.lock().unwrap().clone())
    }

    async fn update_preferences(&self, prefs: &Preferences) -> AppResult<Preferences> {
        *self.prefs.lock().unwrap() = prefs.clone();
        *self.pref_writes.lock().unwrap() += 1;
        Ok(prefs.clone())
    }

    async fn delete_session(&self) -> AppResult<()> {
        *self.signed_in.lock().unwrap() = false;
        Ok(())
    }
}

/// In-memory collection with a unique `(owner, media_id)` index
#[derive(Default)]
struct FakeRemote {
    rows: Mutex<Vec<WatchlistEntry>>,
    failing: HashSet<u64>,
    add_calls: Mutex<usize>,
}

impl FakeRemote {
    fn failing_on(ids: &[u64]) -> Self {
        Self {
            failing: ids.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RemoteWatchlist for FakeRemote {
    async fn try_load(&self, owner_id: &str) -> AppResult<Vec<WatchlistEntry>> {
        let mut rows: Vec<WatchlistEntry> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.owner_id.as_deref() == Some(owner_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(rows)
    }

    async fn add(&self, owner_id: &str, entry: &WatchlistEntry) -> AppResult<WatchlistEntry> {
        *self.add_calls.lock().unwrap() += 1;
        if self.failing.contains(&entry.media_id) {
            return Err(AppError::backend(500, "general_unknown", "Server error"));
        }

        let mut rows = self.rows.lock().unwrap();
        let duplicate = rows
            .iter()
            .any(|e| e.owner_id.as_deref() == Some(owner_id) && e.media_id == entry.media_id);
        if !duplicate {
            let mut row = entry.clone();
            row.owner_id = Some(owner_id.to_string());
            rows.push(row);
        }
        Ok(entry.clone())
    }

    async fn remove(&self, owner_id: &str, media_id: u64) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| !(e.owner_id.as_deref() == Some(owner_id) && e.media_id == media_id));
        Ok(rows.len() != before)
    }

    async fn clear(&self, owner_id: &str) -> AppResult<usize> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.owner_id.as_deref() != Some(owner_id));
        Ok(before - rows.len())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn movie(id: u64, title: &str) -> WatchlistEntry {
    WatchlistEntry::new(id, MediaType::Movie, title)
}

fn session(
    identity: &Arc<FakeIdentity>,
    remote: &Arc<FakeRemote>,
    store: &Arc<dyn KeyValueStore>,
) -> WatchlistSession {
    WatchlistSession::new(identity.clone(), remote.clone(), store.clone())
}

#[tokio::test]
async fn test_guest_list_moves_into_account_on_login() {
    let identity = Arc::new(FakeIdentity::new(false));
    let remote = Arc::new(FakeRemote::default());
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut guest = session(&identity, &remote, &store);
    guest.start().await;
    assert!(!guest.is_authenticated());
    guest.toggle(movie(27205, "Inception")).await.unwrap();
    guest
        .toggle(WatchlistEntry::new(1396, MediaType::Series, "Breaking Bad"))
        .await
        .unwrap();

    identity.sign_in();
    let mut signed_in = session(&identity, &remote, &store);
    let report = signed_in.start().await.unwrap();

    assert_eq!(report.migrated, 2);
    assert!(signed_in.is_authenticated());
    assert_eq!(signed_in.entries().len(), 2);
    assert_eq!(remote.len(), 2);
    assert!(identity.prefs.lock().unwrap().watchlist_migrated());
    assert_eq!(store.get(StorageKey::Watchlist.as_str()).unwrap(), None);
}

#[tokio::test]
async fn test_second_login_does_not_migrate_again() {
    let identity = Arc::new(FakeIdentity::new(true));
    let remote = Arc::new(FakeRemote::default());
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut local = watchlist_sync::services::watchlist::LocalWatchlist::load(store.clone());
    local.add(movie(1, "First")).unwrap();

    session(&identity, &remote, &store).start().await;
    assert_eq!(*remote.add_calls.lock().unwrap(), 1);

    let mut local = watchlist_sync::services::watchlist::LocalWatchlist::load(store.clone());
    local.add(movie(2, "Second")).unwrap();

    let report = session(&identity, &remote, &store).start().await.unwrap();

    assert!(report.already_migrated);
    assert_eq!(*remote.add_calls.lock().unwrap(), 1);
    assert_eq!(*identity.pref_writes.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_partial_failure_still_marks_migrated() {
    let identity = Arc::new(FakeIdentity::new(true));
    let remote = Arc::new(FakeRemote::failing_on(&[3]));
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut local = watchlist_sync::services::watchlist::LocalWatchlist::load(store.clone());
    for id in 1..=5 {
        local.add(movie(id, &format!("Movie {}", id))).unwrap();
    }

    let mut signed_in = session(&identity, &remote, &store);
    let report = signed_in.start().await.unwrap();

    assert_eq!(report.migrated, 4);
    assert_eq!(report.failed, 1);
    assert_eq!(remote.len(), 4);
    assert!(!signed_in.contains(&movie(3, "Movie 3").key()));
    assert!(identity.prefs.lock().unwrap().watchlist_migrated());
}

#[tokio::test]
async fn test_signed_in_toggle_and_logout() {
    let identity = Arc::new(FakeIdentity::new(true));
    let remote = Arc::new(FakeRemote::default());
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut signed_in = session(&identity, &remote, &store);
    assert!(signed_in.start().await.is_none());

    assert!(signed_in.toggle(movie(27205, "Inception")).await.unwrap());
    assert_eq!(remote.len(), 1);
    assert!(!signed_in.toggle(movie(27205, "Inception")).await.unwrap());
    assert_eq!(remote.len(), 0);

    signed_in.toggle(movie(155, "The Dark Knight")).await.unwrap();
    signed_in.logout().await.unwrap();

    assert!(!signed_in.is_authenticated());
    assert!(signed_in.entries().is_empty());
    assert_eq!(remote.len(), 1);
    assert!(!*identity.signed_in.lock().unwrap());
}
