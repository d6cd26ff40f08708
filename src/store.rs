//! Daily feature persistence boundary
//!
//! The pipeline reads assembled daily vectors through [`DailyFeatureStore`];
//! how they are persisted is the host application's concern. The in-memory
//! implementation covers tests and single-run CLI use.

use crate::types::DailyBehaviorFeatures;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Read access to per-day feature vectors keyed by calendar date
pub trait DailyFeatureStore {
    /// All dates that have a stored vector, in no particular order.
    fn known_dates(&self) -> Vec<NaiveDate>;

    /// The vector for one date, if stored.
    fn load(&self, date: NaiveDate) -> Option<DailyBehaviorFeatures>;
}

/// HashMap-backed store
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeatureStore {
    days: HashMap<NaiveDate, DailyBehaviorFeatures>,
}

impl InMemoryFeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the vector for a date.
    pub fn save(&mut self, date: NaiveDate, features: DailyBehaviorFeatures) {
        self.days.insert(date, features);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl DailyFeatureStore for InMemoryFeatureStore {
    fn known_dates(&self) -> Vec<NaiveDate> {
        self.days.keys().copied().collect()
    }

    fn load(&self, date: NaiveDate) -> Option<DailyBehaviorFeatures> {
        self.days.get(&date).cloned()
    }
}

/// Materialize a store's full contents as a date-keyed map, the input shape
/// the windowing stage works over.
pub fn collect_feature_map(
    store: &dyn DailyFeatureStore,
) -> HashMap<NaiveDate, DailyBehaviorFeatures> {
    store
        .known_dates()
        .into_iter()
        .filter_map(|date| store.load(date).map(|features| (date, features)))
        .collect()
}
