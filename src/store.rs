//! State Store
//!
//! Persists the managed RAID state record between runs as JSON.

use crate::resource::RaidState;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default state file, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "maas-raid.state.json";

/// File-backed state record
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored state, `None` when no state file exists
    pub fn load(&self) -> Result<Option<RaidState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file {:?}", self.path))?;
        let state = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {:?}", self.path))?;
        Ok(Some(state))
    }

    /// Replace the stored state
    pub fn save(&self, state: &RaidState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Write then rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(&tmp, content).with_context(|| format!("Failed to write {:?}", tmp))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace state file {:?}", self.path))?;

        tracing::debug!("Saved state for RAID {} to {:?}", state.id, self.path);
        Ok(())
    }

    /// Forget the stored state
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove state file {:?}", self.path))?;
        }
        Ok(())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Membership;

    fn state() -> RaidState {
        RaidState {
            id: "42".into(),
            machine: "abc123".into(),
            name: "raid-a".into(),
            uuid: "u-42".into(),
            level: "raid-1".into(),
            membership: Membership {
                partitions: vec!["p1".into(), "p2".into()],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_missing_file_is_no_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        store.save(&state()).unwrap();
        assert_eq!(store.load().unwrap(), Some(state()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(StateStore::new(path).load().is_err());
    }
}
