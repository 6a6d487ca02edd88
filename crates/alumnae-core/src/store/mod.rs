//! Roster persistence.
//!
//! Two interchangeable backends implement [`RosterStore`]:
//!
//! - [`LocalRosterStore`]: a JSON snapshot on disk, rewritten in full on
//!   every mutation. Seeds a random roster on first run if configured to.
//! - [`RemoteRosterStore`]: the hosted `alumnae` table, one request per
//!   mutation.
//!
//! Both report a missing id as [`StoreError::NotFound`].

pub mod local;
pub mod remote;
pub mod snapshot;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::config::{Backend, Config};
use crate::models::{ApprovalStatus, Member, MemberId, MemberProfile, NewMember};

pub use local::LocalRosterStore;
pub use remote::RemoteRosterStore;
pub use snapshot::{LocalStorage, Snapshot, PROFILE_KEY, ROSTER_KEY};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Member {0} not found")]
    NotFound(MemberId),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt snapshot '{key}': {source}")]
    Snapshot {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid row from backend: {0}")]
    InvalidRow(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Persistence contract shared by the local and remote rosters.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Short name for status lines and logs.
    fn name(&self) -> &'static str;

    /// Full roster, ordered by name.
    async fn load(&self) -> Result<Vec<Member>, StoreError>;

    /// Persist a new member and return it with its assigned id.
    async fn create(&self, member: NewMember) -> Result<Member, StoreError>;

    /// Replace the profile fields of `id`, keeping id, birthday and payment status.
    async fn update(&self, id: MemberId, profile: MemberProfile) -> Result<Member, StoreError>;

    /// Record an approval decision for `id`.
    async fn set_approval(&self, id: MemberId, status: ApprovalStatus) -> Result<Member, StoreError>;

    async fn delete(&self, id: MemberId) -> Result<(), StoreError>;

    async fn delete_all(&self) -> Result<(), StoreError>;
}

/// Build the store selected by the configuration.
pub fn open(config: &Config) -> Result<Arc<dyn RosterStore>> {
    match config.backend {
        Backend::Local => {
            let dir = config.storage_dir()?;
            let storage = LocalStorage::new(dir.clone())
                .with_context(|| format!("Failed to open storage directory {}", dir.display()))?;
            Ok(Arc::new(LocalRosterStore::new(storage, config.seed_size)))
        }
        Backend::Remote => Ok(Arc::new(RemoteRosterStore::new(api_client(config)?))),
    }
}

/// API client for the configured backend.
pub fn api_client(config: &Config) -> Result<ApiClient> {
    let url = config
        .api_url
        .as_deref()
        .context("No API URL configured (set ALUMNAE_API_URL)")?;
    let key = config
        .api_key
        .as_deref()
        .context("No API key configured (set ALUMNAE_API_KEY)")?;
    ApiClient::new(url, key).context("Failed to build API client")
}

/// Sort a roster by name, case-insensitive first.
pub fn sort_by_name(roster: &mut [Member]) {
    roster.sort_by(|a, b| crate::utils::cmp_ignore_case(&a.name, &b.name));
}
