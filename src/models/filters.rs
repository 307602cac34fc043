use serde::{Deserialize, Serialize};

use super::MediaType;

/// Discovery filters remembered between visits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Genre id or `"all"`
    pub genre_id: String,
    pub year: String,
    pub min_rating: String,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            genre_id: "all".to_string(),
            year: String::new(),
            min_rating: String::new(),
        }
    }
}

impl SearchFilters {
    /// True when no filter narrows the results
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Media type the discovery view is filtered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterType(pub MediaType);

impl FilterType {
    /// Parses the stored bare-text value; anything unrecognized is `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "movie" => Some(FilterType(MediaType::Movie)),
            "tv" => Some(FilterType(MediaType::Series)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.0.as_str()
    }
}
