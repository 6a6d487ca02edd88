use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{RosterStore, StoreError};
use crate::api::{ApiClient, MEMBERS_TABLE};
use crate::models::{ApprovalStatus, Birthday, Member, MemberId, MemberProfile, NewMember, PaymentStatus};

/// Sort applied by the backend on load.
const NAME_ORDER: &str = "name.asc";

/// Insert payload for the `alumnae` table (snake_case columns).
#[derive(Debug, Serialize)]
struct MemberRow<'a> {
    #[serde(flatten)]
    profile: &'a MemberProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    birthday: Option<Birthday>,
    payment_status: PaymentStatus,
    approval_status: ApprovalStatus,
}

/// Roster backed by the hosted `alumnae` table.
pub struct RemoteRosterStore {
    client: ApiClient,
}

impl RemoteRosterStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn parse_row(row: Value) -> Result<Member, StoreError> {
        serde_json::from_value(row).map_err(|e| StoreError::InvalidRow(e.to_string()))
    }

    /// The single row a by-id write returned, or not-found when it matched nothing.
    fn single_row(rows: Vec<Value>, id: MemberId) -> Result<Member, StoreError> {
        match rows.into_iter().next() {
            Some(row) => Self::parse_row(row),
            None => Err(StoreError::NotFound(id)),
        }
    }
}

#[async_trait]
impl RosterStore for RemoteRosterStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    /// Rows that fail validation are skipped and logged.
    async fn load(&self) -> Result<Vec<Member>, StoreError> {
        let rows: Vec<Value> = self.client.select(MEMBERS_TABLE, NAME_ORDER).await?;
        let total = rows.len();

        let members: Vec<Member> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.get("id").cloned();
                match Self::parse_row(row) {
                    Ok(member) => Some(member),
                    Err(e) => {
                        warn!(id = ?id, error = %e, "Skipping invalid member row");
                        None
                    }
                }
            })
            .collect();

        debug!(loaded = members.len(), total = total, "Loaded remote roster");
        Ok(members)
    }

    async fn create(&self, member: NewMember) -> Result<Member, StoreError> {
        let row = MemberRow {
            profile: &member.profile,
            birthday: member.birthday,
            payment_status: member.payment_status,
            approval_status: member.approval_status,
        };
        let created: Value = self.client.insert(MEMBERS_TABLE, &row).await?;
        Self::parse_row(created)
    }

    async fn update(&self, id: MemberId, profile: MemberProfile) -> Result<Member, StoreError> {
        let rows: Vec<Value> = self.client.update(MEMBERS_TABLE, id, &profile).await?;
        Self::single_row(rows, id)
    }

    async fn set_approval(&self, id: MemberId, status: ApprovalStatus) -> Result<Member, StoreError> {
        let rows: Vec<Value> = self
            .client
            .update(MEMBERS_TABLE, id, &json!({ "approval_status": status }))
            .await?;
        Self::single_row(rows, id)
    }

    async fn delete(&self, id: MemberId) -> Result<(), StoreError> {
        let rows: Vec<Value> = self.client.delete(MEMBERS_TABLE, id).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        Ok(self.client.delete_all(MEMBERS_TABLE).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_row_uses_snake_case() {
        let profile = MemberProfile {
            name: "Kim".to_string(),
            cohort: 10,
            region: "Seoul".to_string(),
            job: "Engineer".to_string(),
            company: "Acme".to_string(),
            email: "kim@example.com".to_string(),
            phone: "010".to_string(),
            introduction: "Hi".to_string(),
            tags: vec!["IT".to_string()],
        };
        let row = MemberRow {
            profile: &profile,
            birthday: Birthday::new(5, 1),
            payment_status: PaymentStatus::Unpaid,
            approval_status: ApprovalStatus::Pending,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["payment_status"], "unpaid");
        assert_eq!(value["approval_status"], "pending");
        assert_eq!(value["birthday"], "05-01");
        assert_eq!(value["name"], "Kim");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_single_row_empty_is_not_found() {
        assert!(matches!(
            RemoteRosterStore::single_row(Vec::new(), 4),
            Err(StoreError::NotFound(4))
        ));
    }

    #[test]
    fn test_parse_row_rejects_negative_cohort() {
        let row = json!({"id": 1, "name": "Kim", "cohort": -1});
        assert!(matches!(
            RemoteRosterStore::parse_row(row),
            Err(StoreError::InvalidRow(_))
        ));
    }
}
