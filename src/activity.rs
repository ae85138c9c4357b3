//! Last-seen timestamps for the inactivity sweep.
//!
//! The snapshot on disk is a JSON object mapping user ids to unix-millisecond
//! timestamps, rewritten wholesale on every change. An unreadable file is
//! treated as empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::Error;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ActivityRegistry {
    last_seen: HashMap<u64, i64>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tracked action for `user`. Last writer wins.
    pub fn touch(&mut self, user: u64, at: DateTime<Utc>) {
        self.last_seen.insert(user, at.timestamp_millis());
    }

    /// Unix-millisecond timestamp of the user's last tracked action.
    pub fn last_seen(&self, user: u64) -> Option<i64> {
        self.last_seen.get(&user).copied()
    }

    /// Drop the record after the user leaves or is removed.
    pub fn forget(&mut self, user: u64) {
        self.last_seen.remove(&user);
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }

    pub async fn load(path: &Path) -> Self {
        match Self::read_file(path).await {
            Ok(registry) => registry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read activity snapshot, starting empty");
                Self::default()
            }
        }
    }

    async fn read_file(path: &Path) -> Result<Self, Error> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(Self::default());
        }
        let data = tokio::fs::read(path).await?;
        if data.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    /// Rewrite the snapshot wholesale, via a temp file so a crash mid-write
    /// never leaves a truncated snapshot behind.
    pub async fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        let json = serde_json::to_vec_pretty(self)?;
        let tmp_path: PathBuf = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        if tokio::fs::rename(&tmp_path, path).await.is_err() {
            tokio::fs::write(path, &json).await?;
            let _ = tokio::fs::remove_file(&tmp_path).await;
        }
        Ok(())
    }

    /// Best-effort save used from handlers that are not waiting on the result.
    pub async fn save_or_log(&self, path: &Path) {
        if let Err(e) = self.save(path).await {
            error!(path = %path.display(), error = %e, "Failed to persist activity snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn touch_overwrites_last_writer_wins() {
        let mut registry = ActivityRegistry::new();
        registry.touch(1, at(100));
        registry.touch(1, at(200));
        assert_eq!(registry.last_seen(1), Some(200));
    }

    #[test]
    fn forget_is_idempotent() {
        let mut registry = ActivityRegistry::new();
        registry.touch(1, at(100));
        registry.forget(1);
        registry.forget(1);
        assert_eq!(registry.last_seen(1), None);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.json");

        let mut registry = ActivityRegistry::new();
        registry.touch(42, at(1_000));
        registry.touch(7, at(2_000));
        registry.save(&path).await.unwrap();

        let loaded = ActivityRegistry::load(&path).await;
        assert_eq!(loaded.last_seen(42), Some(1_000));
        assert_eq!(loaded.last_seen(7), Some(2_000));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ActivityRegistry::load(&dir.path().join("nope.json")).await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let loaded = ActivityRegistry::load(&path).await;
        assert!(loaded.is_empty());
    }
}
