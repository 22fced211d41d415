//! Durable place cache: normalized place name → coordinates.
//!
//! Loaded whole from a JSON file once per run, flushed whole at most once
//! after all resolutions complete. Entries are only ever added, never
//! overwritten, which keeps re-resolution idempotent.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use common::{Coordinates, Error, Result};
use tracing::{debug, warn};

/// In-memory working copy of the durable place mapping.
#[derive(Debug, Default)]
pub struct PlaceCache {
    entries: BTreeMap<String, Coordinates>,
    added: usize,
}

impl PlaceCache {
    /// Load the cache file. A missing file is an empty cache, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No place cache at {}; starting empty", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let entries: BTreeMap<String, Coordinates> = serde_json::from_str(&raw)?;
        debug!(
            "Loaded {} cached places from {}",
            entries.len(),
            path.display()
        );

        Ok(Self { entries, added: 0 })
    }

    /// Look up a place. `None` is a cache miss.
    pub fn resolve(&self, place: &str) -> Option<Coordinates> {
        self.entries.get(place).copied()
    }

    /// Store a resolved place. First write wins: an existing entry is
    /// never overwritten, so re-recording is a harmless no-op.
    pub fn record(&mut self, place: &str, coords: Coordinates) {
        if !self.entries.contains_key(place) {
            self.entries.insert(place.to_string(), coords);
            self.added += 1;
        }
    }

    /// Whether any entries were added since load.
    pub fn is_dirty(&self) -> bool {
        self.added > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the full mapping, replacing prior contents.
    ///
    /// Writes to a temp file in the same directory, then renames over the
    /// target so a crash mid-write cannot corrupt previously cached
    /// coordinates. One internal retry; a second failure surfaces as
    /// `CacheWrite` and leaves the in-memory state intact.
    pub fn flush(&self, path: &Path) -> Result<()> {
        match self.write_atomic(path) {
            Ok(()) => Ok(()),
            Err(first) => {
                warn!("Place cache flush failed ({}); retrying once", first);
                self.write_atomic(path)
                    .map_err(|e| Error::CacheWrite(format!("{} (after retry)", e)))
            }
        }
    }

    fn write_atomic(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let json = serde_json::to_string(&self.entries)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        debug!(
            "Flushed {} places ({} new) to {}",
            self.entries.len(),
            self.added,
            path.display()
        );
        Ok(())
    }
}
