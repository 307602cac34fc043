use std::sync::Arc;

use crate::{
    db::{read_json, write_json, KeyValueStore, StorageKey},
    error::AppResult,
    models::{FilterType, SearchFilters},
};

/// Discovery filter state remembered in on-device storage
pub struct FilterState {
    store: Arc<dyn KeyValueStore>,
    filters: SearchFilters,
    filter_type: FilterType,
}

impl FilterState {
    /// Restores the last saved state; missing or corrupt values fall back to
    /// the defaults
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let filters = read_json(store.as_ref(), StorageKey::Filters).unwrap_or_default();

        let filter_type = match store.get(StorageKey::FilterType.as_str()) {
            Ok(Some(raw)) => FilterType::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Ignoring unknown stored filter type");
                FilterType::default()
            }),
            Ok(None) => FilterType::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read filter type");
                FilterType::default()
            }
        };

        Self {
            store,
            filters,
            filter_type,
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn set_filters(&mut self, filters: SearchFilters) -> AppResult<()> {
        self.filters = filters;
        write_json(self.store.as_ref(), StorageKey::Filters, &self.filters)
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) -> AppResult<()> {
        self.filter_type = filter_type;
        self.store
            .set(StorageKey::FilterType.as_str(), filter_type.as_str())
    }

    /// Restores default filters; the type filter is kept
    pub fn reset(&mut self) -> AppResult<()> {
        self.set_filters(SearchFilters::default())
    }
}
