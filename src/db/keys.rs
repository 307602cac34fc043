use std::fmt::Display;

/// Fixed keys used in on-device storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Guest watchlist, JSON array of entries
    Watchlist,
    /// Discovery filters, JSON object
    Filters,
    /// Active type filter, bare text (`movie` or `tv`)
    FilterType,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Watchlist => "csmss-watchlist",
            StorageKey::Filters => "csmss-filters",
            StorageKey::FilterType => "csmss-filter-type",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
