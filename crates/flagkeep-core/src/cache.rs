//! # State Cache
//!
//! Read-through caching decorator for a [`StateRepository`].
//!
//! Each cached entry remembers the result of one `get_feature_state` call,
//! including the "never written" answer, for at most [`CacheConfig::ttl`].
//! When the cache grows past [`CacheConfig::capacity`], least recently used
//! entries are evicted.
//!
//! ## Design Principles
//!
//! - Entries are kept in a `BTreeMap` keyed by [`FeatureId`]
//! - Recency uses a logical clock (monotonic counter); the wall clock is only
//!   consulted for TTL expiry
//! - The cache lock is never held while the delegate runs
//! - Every write drops the feature's entry and bumps a write generation both
//!   before and after delegating. A read only fills the cache if no write
//!   started or finished while it was reading the delegate, so a read that
//!   overlaps a write cannot re-cache the value the write replaced

use crate::error::RepositoryError;
use crate::repository::StateRepository;
use crate::{FeatureId, FeatureState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// =============================================================================
// CACHE CONFIGURATION
// =============================================================================

/// Default maximum number of cached features.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Default time a cached read stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Sizing and expiry for [`CachingStateRepository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached features (at least 1).
    pub capacity: usize,

    /// Lifetime of a cached read. Zero disables caching.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

// =============================================================================
// CACHE ENTRY
// =============================================================================

#[derive(Debug, Clone)]
struct CacheEntry {
    /// Result of the delegate read. `None` is a cached miss.
    state: Option<FeatureState>,

    /// Wall-clock time the entry was filled (TTL only).
    stored_at: Instant,

    /// Logical timestamp of last access (LRU ordering).
    last_access: u64,
}

// =============================================================================
// STATE CACHE
// =============================================================================

/// LRU map from feature to its last known state, with TTL expiry.
#[derive(Debug)]
struct StateCache {
    entries: BTreeMap<FeatureId, CacheEntry>,
    capacity: usize,
    ttl: Duration,
    logical_clock: u64,
    /// Bumped on each side of every write.
    write_generation: u64,
    hits: u64,
    misses: u64,
}

impl StateCache {
    fn new(config: CacheConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: config.capacity.max(1),
            ttl: config.ttl,
            logical_clock: 0,
            write_generation: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.logical_clock = self.logical_clock.saturating_add(1);
        self.logical_clock
    }

    /// Outer `None`: not cached or expired. Inner `None`: cached miss.
    fn get(&mut self, feature: &FeatureId, now: Instant) -> Option<Option<FeatureState>> {
        let timestamp = self.tick();
        let ttl = self.ttl;

        let fresh = match self.entries.get_mut(feature) {
            Some(entry) if now.saturating_duration_since(entry.stored_at) < ttl => {
                entry.last_access = timestamp;
                Some(entry.state.clone())
            }
            Some(_) => {
                self.entries.remove(feature);
                None
            }
            None => None,
        };

        if fresh.is_some() {
            self.hits = self.hits.saturating_add(1);
        } else {
            self.misses = self.misses.saturating_add(1);
        }
        fresh
    }

    fn insert(&mut self, feature: FeatureId, state: Option<FeatureState>, now: Instant) {
        if self.ttl.is_zero() {
            return;
        }
        let timestamp = self.tick();

        if self.entries.len() >= self.capacity && !self.entries.contains_key(&feature) {
            self.evict_lru();
        }

        self.entries.insert(
            feature,
            CacheEntry {
                state,
                stored_at: now,
                last_access: timestamp,
            },
        );
    }

    /// Insert only if no write touched the cache since `generation` was read.
    fn insert_if_unchanged(
        &mut self,
        feature: FeatureId,
        state: Option<FeatureState>,
        now: Instant,
        generation: u64,
    ) -> bool {
        if self.write_generation != generation {
            return false;
        }
        self.insert(feature, state, now);
        true
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(feature, _)| feature.clone());

        if let Some(feature) = oldest {
            self.entries.remove(&feature);
        }
    }

    fn invalidate(&mut self, feature: &FeatureId) {
        self.write_generation = self.write_generation.wrapping_add(1);
        self.entries.remove(feature);
    }

    fn clear(&mut self) {
        // Stats survive a clear.
        self.entries.clear();
    }

    fn stats(&self) -> CacheStats {
        let total = self.hits.saturating_add(self.misses);
        let hit_rate_percent = if total == 0 {
            0
        } else {
            (self.hits.saturating_mul(100) / total) as u8
        };

        CacheStats {
            size: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            hit_rate_percent,
        }
    }
}

// =============================================================================
// CACHE STATISTICS
// =============================================================================

/// Snapshot of cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries.
    pub size: usize,

    /// Maximum number of entries.
    pub capacity: usize,

    /// Reads answered from the cache.
    pub hits: u64,

    /// Reads passed to the delegate.
    pub misses: u64,

    /// Hit rate as integer percentage (0-100).
    pub hit_rate_percent: u8,
}

// =============================================================================
// CACHING STATE REPOSITORY
// =============================================================================

/// Decorator caching reads of its delegate.
#[derive(Debug)]
pub struct CachingStateRepository<R> {
    delegate: R,
    cache: Mutex<StateCache>,
}

impl<R: StateRepository> CachingStateRepository<R> {
    pub fn new(delegate: R, config: CacheConfig) -> Self {
        Self {
            delegate,
            cache: Mutex::new(StateCache::new(config)),
        }
    }

    /// Cache with [`CacheConfig::default`].
    pub fn with_defaults(delegate: R) -> Self {
        Self::new(delegate, CacheConfig::default())
    }

    /// Drop every cached entry.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        self.cache.lock()?.clear();
        Ok(())
    }

    pub fn stats(&self) -> Result<CacheStats, RepositoryError> {
        Ok(self.cache.lock()?.stats())
    }

    pub fn delegate(&self) -> &R {
        &self.delegate
    }

    pub fn into_inner(self) -> R {
        self.delegate
    }
}

impl<R: StateRepository> StateRepository for CachingStateRepository<R> {
    fn get_feature_state(&self, feature: &FeatureId) -> Result<Option<FeatureState>, RepositoryError> {
        let generation = {
            let mut cache = self.cache.lock()?;
            if let Some(cached) = cache.get(feature, Instant::now()) {
                tracing::trace!(feature = %feature, "state cache hit");
                return Ok(cached);
            }
            cache.write_generation
        };

        tracing::trace!(feature = %feature, "state cache miss");
        let state = self.delegate.get_feature_state(feature)?;
        let stored = self.cache.lock()?.insert_if_unchanged(
            feature.clone(),
            state.clone(),
            Instant::now(),
            generation,
        );
        if !stored {
            tracing::trace!(feature = %feature, "write overlapped read, result not cached");
        }
        Ok(state)
    }

    fn set_feature_state(&self, state: &FeatureState) -> Result<(), RepositoryError> {
        self.cache.lock()?.invalidate(state.feature());
        let result = self.delegate.set_feature_state(state);
        // Drops anything a read cached while the delegate was writing.
        self.cache.lock()?.invalidate(state.feature());
        result
    }
}

// =============================================================================
// TESTS
// =============================================================================
