//! Durable per-club override ranges.
//!
//! Overrides persist independently of any scan; a scan takes an immutable
//! snapshot at start and never observes later edits. Overrides carry only a
//! maximum; there is no lower-bound override.

use std::fs;
use std::path::PathBuf;

use caddie_model::{ClubId, ClubOverride, OverrideRanges};
use tracing::warn;

use crate::error::Result;

pub struct OverrideStore {
    path: PathBuf,
}

impl std::fmt::Debug for OverrideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideStore")
            .field("path", &self.path)
            .finish()
    }
}

impl OverrideStore {
    pub fn new(path: PathBuf) -> Self {
        OverrideStore { path }
    }

    /// Current override snapshot. A missing file is an empty set; a corrupt
    /// file is reported and treated as empty rather than blocking scans.
    pub fn load(&self) -> Result<OverrideRanges> {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(OverrideRanges::new());
            }
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&body) {
            Ok(ranges) => Ok(ranges),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt override file");
                Ok(OverrideRanges::new())
            }
        }
    }

    pub fn set(&self, club_id: ClubId, max_meters: f64) -> Result<()> {
        let mut ranges = self.load()?;
        ranges.insert(club_id, ClubOverride { max_meters });
        self.save(&ranges)
    }

    /// Returns true when an override for the club existed.
    pub fn remove(&self, club_id: ClubId) -> Result<bool> {
        let mut ranges = self.load()?;
        let removed = ranges.remove(club_id).is_some();
        if removed {
            self.save(&ranges)?;
        }
        Ok(removed)
    }

    fn save(&self, ranges: &OverrideRanges) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a half-written file.
        let staged = self.path.with_extension("json.tmp");
        fs::write(&staged, serde_json::to_string_pretty(ranges)?)?;
        fs::rename(&staged, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = OverrideStore::new(dir.path().join("overrides.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn set_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = OverrideStore::new(dir.path().join("overrides.json"));

        store.set(ClubId(100), 120.0).unwrap();
        store.set(ClubId(101), 80.0).unwrap();

        let ranges = store.load().unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges.get(ClubId(100)).unwrap().max_meters, 120.0);

        assert!(store.remove(ClubId(100)).unwrap());
        assert!(!store.remove(ClubId(100)).unwrap());
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        fs::write(&path, "not json at all").unwrap();

        let store = OverrideStore::new(path);
        assert!(store.load().unwrap().is_empty());
    }
}
