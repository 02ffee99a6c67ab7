//! The quarantine events store: a read-only SQLite database mapping
//! event UUIDs to the URLs a download came from.

use std::path::PathBuf;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use super::{UrlLookup, UrlPair};

/// Database path relative to the home directory.
const DB_RELATIVE_PATH: &str = "Library/Preferences/com.apple.LaunchServices.QuarantineEventsV2";

/// Only these two columns of the event row are consumed.
const COL_URL: &str = "LSQuarantineDataURLString";
const COL_REFERRER: &str = "LSQuarantineOriginURLString";

enum StoreState {
    Unopened,
    Open(Connection),
    Failed,
}

/// Lazily opened, read-only handle to the quarantine events database.
///
/// The connection is opened on the first lookup. If opening fails, the
/// failure is sticky: no retry is attempted for the rest of the
/// process, and every later lookup silently resolves to nothing.
pub struct EventStore {
    path: Option<PathBuf>,
    state: StoreState,
}

impl EventStore {
    /// A store over the platform-default database, or an explicit
    /// override (used by configuration and tests).
    #[must_use]
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let path = path_override.or_else(|| dirs::home_dir().map(|h| h.join(DB_RELATIVE_PATH)));
        EventStore {
            path,
            state: StoreState::Unopened,
        }
    }

    fn connection(&mut self) -> Option<&Connection> {
        if let StoreState::Unopened = self.state {
            self.state = match &self.path {
                Some(path) => {
                    match Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
                        Ok(conn) => StoreState::Open(conn),
                        Err(e) => {
                            debug!(path = %path.display(), error = %e, "Could not open events database");
                            StoreState::Failed
                        }
                    }
                }
                None => {
                    debug!("No home directory; events database unavailable");
                    StoreState::Failed
                }
            };
        }
        match &self.state {
            StoreState::Open(conn) => Some(conn),
            _ => None,
        }
    }

    fn query(conn: &Connection, key: &str) -> rusqlite::Result<UrlPair> {
        let mut stmt = conn
            .prepare("SELECT * FROM LSQuarantineEvent WHERE LSQuarantineEventIdentifier == ?1")?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let mut pair = UrlPair::default();
        let mut rows = stmt.query([key])?;
        while let Some(row) = rows.next()? {
            for (i, name) in names.iter().enumerate() {
                let slot = match name.as_str() {
                    COL_URL => &mut pair.url,
                    COL_REFERRER => &mut pair.referrer,
                    _ => continue,
                };
                // First occurrence of each column wins.
                if slot.is_none() {
                    *slot = row.get::<_, Option<String>>(i)?;
                }
            }
        }
        Ok(pair)
    }
}

impl UrlLookup for EventStore {
    fn lookup(&mut self, key: &str) -> UrlPair {
        let Some(conn) = self.connection() else {
            return UrlPair::default();
        };
        match Self::query(conn, key) {
            Ok(pair) => pair,
            Err(e) => {
                debug!(key, error = %e, "Events query failed");
                UrlPair::default()
            }
        }
    }
}
