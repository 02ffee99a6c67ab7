//! Bounded cache of security-zone display names.
//!
//! Zone ids repeat constantly (a handful of zones exist in practice),
//! so resolved names are memoized in a small parallel list and found by
//! linear scan. To keep the scan from degrading to O(n²) if something
//! pathological hands us many distinct ids, the cache is fully flushed
//! (not LRU-evicted) once it reaches [`ZONE_CACHE_MAX`] entries.

use tracing::debug;

/// Hard cap before the cache flushes itself.
pub const ZONE_CACHE_MAX: usize = 100;

/// Platform lookup for a zone's display name.
pub trait DisplayNameSource {
    /// The display name for a zone id, if the platform knows one.
    fn display_name(&self, zone: &str) -> Option<String>;
}

/// The registry-backed source: `HKCU` first, then `HKLM`, under
/// `SOFTWARE\Microsoft\Windows\CurrentVersion\Internet Settings\Zones\{id}`,
/// value `DisplayName`.
#[cfg(windows)]
pub struct RegistrySource;

#[cfg(windows)]
impl DisplayNameSource for RegistrySource {
    fn display_name(&self, zone: &str) -> Option<String> {
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};
        use winreg::RegKey;

        let subkey = format!(
            "SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Internet Settings\\Zones\\{zone}"
        );
        for root in [HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE] {
            if let Ok(key) = RegKey::predef(root).open_subkey(&subkey) {
                if let Ok(name) = key.get_value::<String, _>("DisplayName") {
                    return Some(name);
                }
            }
        }
        None
    }
}

/// Source for platforms without a zone registry.
#[cfg(not(windows))]
pub struct NullSource;

#[cfg(not(windows))]
impl DisplayNameSource for NullSource {
    fn display_name(&self, _zone: &str) -> Option<String> {
        None
    }
}

/// Memoized zone-id → display-name mapping.
pub struct ZoneCache {
    entries: Vec<(String, String)>,
    source: Box<dyn DisplayNameSource>,
}

impl ZoneCache {
    /// A cache over the platform's name source.
    #[must_use]
    pub fn new() -> Self {
        #[cfg(windows)]
        let source: Box<dyn DisplayNameSource> = Box::new(RegistrySource);
        #[cfg(not(windows))]
        let source: Box<dyn DisplayNameSource> = Box::new(NullSource);
        ZoneCache::with_source(source)
    }

    /// A cache over an explicit source (tests, alternate backends).
    #[must_use]
    pub fn with_source(source: Box<dyn DisplayNameSource>) -> Self {
        ZoneCache {
            entries: Vec::new(),
            source,
        }
    }

    /// Resolve a zone id to a display name.
    ///
    /// Degrades to returning the id itself when no name is known, and
    /// caches that too so repeated misses stay cheap.
    pub fn resolve(&mut self, zone: &str) -> String {
        if let Some((_, name)) = self.entries.iter().find(|(id, _)| id == zone) {
            return name.clone();
        }

        if self.entries.len() >= ZONE_CACHE_MAX {
            debug!(entries = self.entries.len(), "Flushing zone-name cache");
            self.entries.clear();
        }

        let name = self
            .source
            .display_name(zone)
            .unwrap_or_else(|| zone.to_string());
        self.entries.push((zone.to_string(), name.clone()));
        name
    }

    /// Number of memoized entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ZoneCache {
    fn default() -> Self {
        ZoneCache::new()
    }
}
