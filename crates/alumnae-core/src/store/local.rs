use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{sort_by_name, LocalStorage, RosterStore, StoreError};
use crate::models::{ApprovalStatus, Member, MemberId, MemberProfile, NewMember};
use crate::seed;

/// Roster kept as a single JSON snapshot on disk.
///
/// The snapshot is read once and cached; every mutation writes the whole
/// roster back before the cache is updated, so a failed write leaves both
/// untouched.
pub struct LocalRosterStore {
    storage: LocalStorage,
    seed_size: usize,
    roster: Mutex<Option<Vec<Member>>>,
}

impl LocalRosterStore {
    pub fn new(storage: LocalStorage, seed_size: usize) -> Self {
        Self {
            storage,
            seed_size,
            roster: Mutex::new(None),
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Read the snapshot, seeding and saving a fresh roster when none exists.
    fn read_or_seed(&self) -> Result<Vec<Member>, StoreError> {
        if let Some(snapshot) = self.storage.load_roster()? {
            info!(count = snapshot.data.len(), saved = %snapshot.age_display(), "Loaded roster snapshot");
            return Ok(snapshot.data);
        }

        let roster = {
            let mut rng = rand::thread_rng();
            seed::generate_roster(self.seed_size, &mut rng)
        };
        self.storage.save_roster(&roster)?;
        info!(count = roster.len(), "Seeded new roster");
        Ok(roster)
    }

    /// Apply `change` to a copy of the roster, persist it, then commit.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<Member>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.roster.lock().await;
        let mut roster = match guard.as_ref() {
            Some(roster) => roster.clone(),
            None => self.read_or_seed()?,
        };

        let result = change(&mut roster)?;
        if let Err(e) = self.storage.save_roster(&roster) {
            warn!(error = %e, "Failed to persist roster");
            return Err(e);
        }
        *guard = Some(roster);
        Ok(result)
    }
}

#[async_trait]
impl RosterStore for LocalRosterStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn load(&self) -> Result<Vec<Member>, StoreError> {
        let mut guard = self.roster.lock().await;
        let mut roster = self.read_or_seed()?;
        sort_by_name(&mut roster);
        *guard = Some(roster.clone());
        Ok(roster)
    }

    async fn create(&self, member: NewMember) -> Result<Member, StoreError> {
        self.mutate(|roster| {
            let id = roster.iter().map(|m| m.id).max().map_or(1, |max| max + 1);
            let member = Member::from_new(id, member);
            roster.insert(0, member.clone());
            Ok(member)
        })
        .await
    }

    async fn update(&self, id: MemberId, profile: MemberProfile) -> Result<Member, StoreError> {
        self.mutate(|roster| {
            let member = roster
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or(StoreError::NotFound(id))?;
            member.apply_profile(profile);
            Ok(member.clone())
        })
        .await
    }

    async fn set_approval(&self, id: MemberId, status: ApprovalStatus) -> Result<Member, StoreError> {
        self.mutate(|roster| {
            let member = roster
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or(StoreError::NotFound(id))?;
            member.approval_status = status;
            Ok(member.clone())
        })
        .await
    }

    async fn delete(&self, id: MemberId) -> Result<(), StoreError> {
        self.mutate(|roster| {
            let index = roster
                .iter()
                .position(|m| m.id == id)
                .ok_or(StoreError::NotFound(id))?;
            roster.remove(index);
            Ok(())
        })
        .await
    }

    /// Saves an empty snapshot rather than removing it, so the next load
    /// does not seed again.
    async fn delete_all(&self) -> Result<(), StoreError> {
        self.mutate(|roster| {
            roster.clear();
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Birthday, PaymentStatus};

    fn profile(name: &str, cohort: u32) -> MemberProfile {
        MemberProfile {
            name: name.to_string(),
            cohort,
            region: "Seoul".to_string(),
            job: "Engineer".to_string(),
            company: "Acme".to_string(),
            email: "a@example.com".to_string(),
            phone: "010-0000-0000".to_string(),
            introduction: "Hi".to_string(),
            tags: vec!["IT".to_string()],
        }
    }

    fn store(dir: &tempfile::TempDir, seed: usize) -> LocalRosterStore {
        LocalRosterStore::new(LocalStorage::new(dir.path().to_path_buf()).unwrap(), seed)
    }

    #[tokio::test]
    async fn test_first_load_empty_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 0);
        assert!(store.load().await.unwrap().is_empty());
        // The empty roster was persisted
        assert!(store.storage().load_roster().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ids_assigned_max_plus_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 0);
        let birthday = Birthday::new(1, 1).unwrap();

        let a = store.create(NewMember::new(profile("A", 1), birthday)).await.unwrap();
        let b = store.create(NewMember::new(profile("B", 2), birthday)).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        store.delete(1).await.unwrap();
        let c = store.create(NewMember::new(profile("C", 3), birthday)).await.unwrap();
        assert_eq!(c.id, 3);
        assert_eq!(c.payment_status, PaymentStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 3);
        let before = store.load().await.unwrap();

        assert!(matches!(store.delete(999).await, Err(StoreError::NotFound(999))));
        assert!(matches!(
            store.update(999, profile("X", 1)).await,
            Err(StoreError::NotFound(999))
        ));
        assert_eq!(store.load().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_all_does_not_reseed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 5);
        assert_eq!(store.load().await.unwrap().len(), 5);

        store.delete_all().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_approval_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 0);
        let birthday = Birthday::new(6, 1).unwrap();
        let created = store.create(NewMember::new(profile("Shin", 34), birthday)).await.unwrap();
        assert_eq!(created.approval_status, ApprovalStatus::Pending);

        let approved = store.set_approval(created.id, ApprovalStatus::Approved).await.unwrap();
        assert_eq!(approved.approval_status, ApprovalStatus::Approved);
        assert!(matches!(
            store.set_approval(999, ApprovalStatus::Rejected).await,
            Err(StoreError::NotFound(999))
        ));

        let reopened = LocalRosterStore::new(LocalStorage::new(dir.path().to_path_buf()).unwrap(), 0);
        assert_eq!(reopened.load().await.unwrap()[0].approval_status, ApprovalStatus::Approved);
    }

    #[tokio::test]
    async fn test_snapshot_with_invalid_member_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"data":[{"id":1,"name":"","cohort":0,"tags":[]}],"saved_at":"2024-10-18T00:00:00Z"}"#;
        std::fs::write(dir.path().join("alumnae-list.json"), body).unwrap();

        let store = store(&dir, 5);
        assert!(matches!(store.load().await, Err(StoreError::Snapshot { .. })));
        // Nothing was reseeded over the bad file
        let contents = std::fs::read_to_string(dir.path().join("alumnae-list.json")).unwrap();
        assert_eq!(contents, body);
    }

    #[tokio::test]
    async fn test_snapshot_fills_missing_tags() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"data":[{"id":1,"name":"Kim","cohort":10,"tags":[]}],"saved_at":"2024-10-18T00:00:00Z"}"#;
        std::fs::write(dir.path().join("alumnae-list.json"), body).unwrap();

        let roster = store(&dir, 0).load().await.unwrap();
        assert_eq!(roster[0].tags, vec![crate::directory::form::DEFAULT_TAG]);
    }
}
