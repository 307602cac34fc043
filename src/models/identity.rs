use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Preference key recording that the guest watchlist has been migrated
pub const MIGRATION_FLAG_KEY: &str = "watchlist_migrated";

/// The signed-in account as reported by `GET /account`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prefs: Preferences,
}

/// Durable per-account preference bag
///
/// The backend replaces the whole bag on update, so callers must write back
/// the full map with their key merged in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Preferences(pub Map<String, Value>);

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a flag; missing or non-boolean values count as `false`
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.0.insert(key.to_string(), Value::Bool(value));
    }

    pub fn watchlist_migrated(&self) -> bool {
        self.flag(MIGRATION_FLAG_KEY)
    }
}
