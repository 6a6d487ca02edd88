//! Keyed JSON snapshots on disk.
//!
//! Each key is one `<key>.json` file holding the data and the time it was
//! saved. Writes go through a temporary file and a rename so a crash never
//! leaves a half-written snapshot behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::StoreError;
use crate::models::{Member, UserProfile};

/// Key of the saved roster.
pub const ROSTER_KEY: &str = "alumnae-list";

/// Key of the saved "my profile" card.
pub const PROFILE_KEY: &str = "user-profile";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub data: T,
    pub saved_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            saved_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Snapshot<T>>, StoreError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)?;
        let snapshot = serde_json::from_str(&contents).map_err(|source| StoreError::Snapshot {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(snapshot))
    }

    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<(), StoreError> {
        let snapshot = Snapshot::new(data);
        let contents = serde_json::to_string_pretty(&snapshot).map_err(|source| StoreError::Snapshot {
            key: key.to_string(),
            source,
        })?;

        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)?;
        debug!(key = key, "Saved snapshot");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    // ===== Roster =====

    pub fn load_roster(&self) -> Result<Option<Snapshot<Vec<Member>>>, StoreError> {
        self.load(ROSTER_KEY)
    }

    pub fn save_roster(&self, roster: &[Member]) -> Result<(), StoreError> {
        self.save(ROSTER_KEY, &roster)
    }

    // ===== User Profile =====

    /// Saved profile, or the built-in default when none was saved.
    pub fn load_profile(&self) -> Result<UserProfile, StoreError> {
        Ok(self
            .load::<UserProfile>(PROFILE_KEY)?
            .map(|s| s.data)
            .unwrap_or_default())
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.save(PROFILE_KEY, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_age_display() {
        let mut snapshot = Snapshot::new(());
        assert_eq!(snapshot.age_display(), "just now");

        snapshot.saved_at = Utc::now() - Duration::minutes(5);
        assert_eq!(snapshot.age_display(), "5m ago");

        snapshot.saved_at = Utc::now() - Duration::minutes(125);
        assert_eq!(snapshot.age_display(), "2h ago");

        snapshot.saved_at = Utc::now() - Duration::days(3);
        assert_eq!(snapshot.age_display(), "3d ago");

        snapshot.saved_at = Utc::now() + Duration::minutes(10);
        assert_eq!(snapshot.age_display(), "just now");
    }

    #[test]
    fn test_profile_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(storage.load_profile().unwrap(), UserProfile::default());

        let mut profile = UserProfile::default();
        profile.name = "Lee".to_string();
        storage.save_profile(&profile).unwrap();
        assert_eq!(storage.load_profile().unwrap().name, "Lee");
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alumnae-list.json"), "{not json").unwrap();
        let storage = LocalStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(storage.load_roster(), Err(StoreError::Snapshot { .. })));
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_path_buf()).unwrap();
        storage.save(ROSTER_KEY, &Vec::<Member>::new()).unwrap();
        assert!(storage.load_roster().unwrap().is_some());
        storage.remove(ROSTER_KEY).unwrap();
        assert!(storage.load_roster().unwrap().is_none());
    }
}
