//! Process-lifetime side-lookup caches.
//!
//! Two resolvers live here: the quarantine events store (SQLite, keyed
//! by event UUID) and the security-zone name cache (registry-backed on
//! Windows). Both are created once before any file is processed and
//! borrowed per file by the aggregator.

pub mod events;
pub mod zones;

pub use events::EventStore;
pub use zones::{DisplayNameSource, ZoneCache};

/// URL and referrer recovered from a side lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPair {
    /// Download URL, if the store had one.
    pub url: Option<String>,
    /// Referrer URL, if the store had one.
    pub referrer: Option<String>,
}

/// Resolves a quarantine event identifier into a URL pair.
///
/// Never fails from the caller's perspective; a store that cannot be
/// opened or queried degrades to an empty pair.
pub trait UrlLookup {
    /// Look up one event identifier.
    fn lookup(&mut self, key: &str) -> UrlPair;
}

/// Both caches, bundled for the aggregator.
pub struct Caches {
    /// Quarantine events store (UUID → URL pair).
    pub events: EventStore,
    /// Security-zone display names (zone id → name).
    pub zones: ZoneCache,
}

impl Caches {
    /// Platform-default caches.
    #[must_use]
    pub fn new(quarantine_db: Option<std::path::PathBuf>) -> Self {
        Caches {
            events: EventStore::new(quarantine_db),
            zones: ZoneCache::new(),
        }
    }
}
