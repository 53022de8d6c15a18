use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use chrono::NaiveDate;

use crate::{analytics::ConsumptionProfile, core::asset::AssetId};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CacheKey {
    asset_id: AssetId,
    window_days: u32,
    as_of_date: NaiveDate,
}

impl CacheKey {
    pub const fn new(asset_id: AssetId, window_days: u32, as_of_date: NaiveDate) -> Self {
        Self { asset_id, window_days, as_of_date }
    }
}

/// In-memory profile cache for the watch loop.
///
/// Entries are keyed by the calendar date, so they never outlive the day they were computed for.
pub struct ProfileCache {
    time_to_live: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, ConsumptionProfile)>>,
}

impl ProfileCache {
    pub const MAX_TIME_TO_LIVE: Duration = Duration::from_secs(86400);

    pub fn new(time_to_live: Duration) -> Self {
        Self {
            time_to_live: time_to_live.min(Self::MAX_TIME_TO_LIVE),
            entries: Mutex::default(),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<ConsumptionProfile> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some((inserted_at, profile)) if inserted_at.elapsed() < self.time_to_live => {
                Some(profile.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: CacheKey, profile: ConsumptionProfile) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, (inserted_at, _)| inserted_at.elapsed() < self.time_to_live);
        entries.insert(key, (Instant::now(), profile));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{analytics::AnalysisConfig, core::asset::Asset};

    fn profile() -> ConsumptionProfile {
        let asset = Asset::builder().id("tank-7").build();
        let as_of = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        ConsumptionProfile::compute(&asset, &[], &as_of, &AnalysisConfig::default())
    }

    fn key(day: u32) -> CacheKey {
        CacheKey::new(AssetId::from("tank-7"), 30, NaiveDate::from_ymd_opt(2025, 6, day).unwrap())
    }

    #[test]
    fn hit_ok() {
        let cache = ProfileCache::new(Duration::from_secs(60));
        cache.insert(key(1), profile());
        assert!(cache.get(&key(1)).is_some());
        assert!(cache.get(&key(2)).is_none());
    }

    #[test]
    fn zero_time_to_live_always_misses() {
        let cache = ProfileCache::new(Duration::ZERO);
        cache.insert(key(1), profile());
        assert!(cache.get(&key(1)).is_none());
    }

    #[test]
    fn time_to_live_is_capped() {
        let cache = ProfileCache::new(Duration::from_secs(7 * 86400));
        assert_eq!(cache.time_to_live, ProfileCache::MAX_TIME_TO_LIVE);
    }
}
