use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod filters;
pub mod identity;

pub use filters::{FilterType, SearchFilters};
pub use identity::{Identity, Preferences, MIGRATION_FLAG_KEY};

/// Kind of title in the external catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv", alias = "series")]
    Series,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "tv",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural key of a watchlist entry: unique per owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub media_id: u64,
    pub media_type: MediaType,
}

impl Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.media_type, self.media_id)
    }
}

/// One saved title for one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub media_id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Set once at creation
    pub added_at: DateTime<Utc>,
    /// Absent for guest entries, required remotely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl WatchlistEntry {
    /// Creates a guest entry stamped with the current time
    pub fn new(media_id: u64, media_type: MediaType, title: impl Into<String>) -> Self {
        Self {
            media_id,
            media_type,
            title: title.into(),
            poster_path: None,
            added_at: Utc::now(),
            owner_id: None,
        }
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    pub fn key(&self) -> MediaKey {
        MediaKey {
            media_id: self.media_id,
            media_type: self.media_type,
        }
    }

    /// Poster path with empty strings normalized to `None`
    pub fn poster(&self) -> Option<&str> {
        self.poster_path.as_deref().filter(|p| !p.is_empty())
    }
}

// ============================================================================
// Appwrite API Types
// ============================================================================

/// Watchlist document as stored in the Appwrite collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistDocument {
    #[serde(rename = "$id", default, skip_serializing)]
    pub id: String,
    pub user_id: String,
    pub media_id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl WatchlistDocument {
    pub fn from_entry(owner_id: &str, entry: &WatchlistEntry) -> Self {
        let title = if entry.title.trim().is_empty() {
            "Unknown".to_string()
        } else {
            entry.title.clone()
        };

        Self {
            id: String::new(),
            user_id: owner_id.to_string(),
            media_id: entry.media_id,
            media_type: entry.media_type,
            title,
            poster_path: Some(entry.poster().unwrap_or_default().to_string()),
            added_at: entry.added_at,
        }
    }
}

impl From<WatchlistDocument> for WatchlistEntry {
    fn from(doc: WatchlistDocument) -> Self {
        WatchlistEntry {
            media_id: doc.media_id,
            media_type: doc.media_type,
            title: doc.title,
            poster_path: doc.poster_path.filter(|p| !p.is_empty()),
            added_at: doc.added_at,
            owner_id: Some(doc.user_id),
        }
    }
}

/// Paged list response from `GET .../documents`
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList<T> {
    #[serde(default)]
    pub total: u64,
    pub documents: Vec<T>,
}

/// Minimal document view used when only the `$id` is needed
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRef {
    #[serde(rename = "$id")]
    pub id: String,
}

/// Error body returned by Appwrite on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: u16,
    #[serde(rename = "type", default)]
    pub kind: String,
}
