use std::sync::Arc;

use alumnae_core::directory::{
    apply_filters, paginate, pending_members, BirthdayFilter, Directory, FilterState, MemberForm,
    NoticeKind, PaymentFilter, PAGE_SIZE,
};
use alumnae_core::directory::form::{DEFAULT_COMPANY, DEFAULT_EMAIL, DEFAULT_TAG};
use alumnae_core::models::{ApprovalStatus, Member, MemberId, MemberProfile, NewMember, PaymentStatus};
use alumnae_core::store::{LocalRosterStore, LocalStorage, RosterStore, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 24).unwrap()
}

fn member(id: i64, name: &str, cohort: u32, region: &str, tag: &str, payment: PaymentStatus) -> Member {
    Member {
        id,
        name: name.to_string(),
        cohort,
        region: region.to_string(),
        job: "Engineer".to_string(),
        company: "Acme".to_string(),
        email: String::new(),
        phone: String::new(),
        introduction: String::new(),
        tags: vec![tag.to_string()],
        birthday: None,
        payment_status: payment,
        approval_status: ApprovalStatus::Approved,
    }
}

fn kim_and_lee() -> Vec<Member> {
    vec![
        member(1, "Kim", 10, "Seoul", "IT", PaymentStatus::Paid),
        member(2, "Lee", 20, "Busan", "Art", PaymentStatus::Unpaid),
    ]
}

fn local_directory(dir: &tempfile::TempDir, seed: usize) -> Directory {
    let storage = LocalStorage::new(dir.path().to_path_buf()).unwrap();
    Directory::new(Arc::new(LocalRosterStore::new(storage, seed)), today())
}

fn form(name: &str, cohort: &str) -> MemberForm {
    MemberForm {
        name: name.to_string(),
        cohort: cohort.to_string(),
        ..Default::default()
    }
}

// ===== Filter Scenarios =====

#[test]
fn unpaid_filter_returns_only_lee() {
    let roster = kim_and_lee();
    let filter = FilterState {
        payment: PaymentFilter::Only(PaymentStatus::Unpaid),
        ..Default::default()
    };
    let names: Vec<&str> = apply_filters(&roster, &filter, today())
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["Lee"]);
}

#[test]
fn cohort_range_and_tag_exclude_both() {
    let roster = kim_and_lee();
    let filter = FilterState {
        cohort_range: 15..=25,
        tags: ["IT".to_string()].into_iter().collect(),
        ..Default::default()
    };
    assert!(apply_filters(&roster, &filter, today()).is_empty());
}

#[test]
fn thirteen_members_make_two_pages() {
    let roster: Vec<Member> = (1..=13)
        .map(|i| member(i, &format!("M{:02}", i), 1, "Seoul", "IT", PaymentStatus::Paid))
        .collect();
    let filtered = apply_filters(&roster, &FilterState::default(), today());
    let page = paginate(&filtered, 2, PAGE_SIZE);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, 13);
}

#[test]
fn search_ten_matches_cohort_digits() {
    let roster: Vec<Member> = [1, 10, 21, 100, 210, 101, 11]
        .iter()
        .enumerate()
        .map(|(i, &c)| member(i as i64, &format!("M{}", i), c, "Seoul", "IT", PaymentStatus::Paid))
        .collect();
    let filter = FilterState {
        search: "10".to_string(),
        ..Default::default()
    };
    let cohorts: Vec<u32> = apply_filters(&roster, &filter, today())
        .iter()
        .map(|m| m.cohort)
        .collect();
    assert_eq!(cohorts, vec![10, 100, 210, 101]);
}

#[test]
fn birthday_today_uses_given_date() {
    let mut roster = kim_and_lee();
    roster[1].birthday = "10-24".parse().ok();
    let filter = FilterState {
        birthday: BirthdayFilter::Today,
        ..Default::default()
    };
    let result = apply_filters(&roster, &filter, today());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "Lee");
}

// ===== Directory With Local Store =====

#[tokio::test]
async fn create_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut directory = local_directory(&dir, 0);
    directory.load().await;
    assert!(directory.state().roster().is_empty());

    directory.state_mut().set_search("nobody");
    let created = directory.register(&form("Kim", "10")).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(directory.state().filter().search, "");
    assert_eq!(directory.state().current_page().items[0].id, 1);

    let notices = directory.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);

    let mut reopened = local_directory(&dir, 0);
    reopened.load().await;
    let loaded = reopened.state().member(1).unwrap();
    assert_eq!(loaded.company, DEFAULT_COMPANY);
    assert_eq!(loaded.email, DEFAULT_EMAIL);
    assert_eq!(loaded.tags, vec![DEFAULT_TAG]);
    assert_eq!(loaded.payment_status, PaymentStatus::Unpaid);
    assert_eq!(loaded.approval_status, ApprovalStatus::Pending);
    assert!(loaded.birthday.is_some());
}

#[tokio::test]
async fn approve_and_reject_registrations() {
    let dir = tempfile::tempdir().unwrap();
    let mut directory = local_directory(&dir, 0);
    directory.load().await;
    let shin = directory.register(&form("Shin", "34")).await.unwrap();
    let kim = directory.register(&form("Kim", "35")).await.unwrap();
    directory.drain_notices();
    assert_eq!(pending_members(directory.state().roster()).len(), 2);

    let approved = directory.approve(shin.id).await.unwrap();
    assert_eq!(approved.approval_status, ApprovalStatus::Approved);
    directory.reject(kim.id).await.unwrap();
    assert!(pending_members(directory.state().roster()).is_empty());

    let notices = directory.drain_notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert!(notices[0].line().contains("Shin's membership was approved"));
    assert_eq!(notices[1].kind, NoticeKind::Error);
    assert!(notices[1].line().contains("Kim's membership was rejected"));

    // Unknown ids leave the roster alone
    let before = directory.state().roster().to_vec();
    assert!(directory.approve(999).await.is_none());
    assert_eq!(directory.state().roster(), before.as_slice());
    assert!(directory.drain_notices()[0].is_error());

    let mut reopened = local_directory(&dir, 0);
    reopened.load().await;
    assert_eq!(reopened.state().member(kim.id).unwrap().approval_status, ApprovalStatus::Rejected);
}

#[tokio::test]
async fn update_then_load_keeps_id_birthday_payment() {
    let dir = tempfile::tempdir().unwrap();
    let mut directory = local_directory(&dir, 0);
    directory.load().await;
    let created = directory.register(&form("Kim", "10")).await.unwrap();

    let mut edit = MemberForm::from_member(&created);
    edit.job = "Judge".to_string();
    edit.tags = "Law, Finance".to_string();
    directory.save_edit(created.id, &edit).await.unwrap();

    let mut reopened = local_directory(&dir, 0);
    reopened.load().await;
    let loaded = reopened.state().member(created.id).unwrap();
    assert_eq!(loaded.job, "Judge");
    assert_eq!(loaded.tags, vec!["Law", "Finance"]);
    assert_eq!(loaded.name, created.name);
    assert_eq!(loaded.birthday, created.birthday);
    assert_eq!(loaded.payment_status, created.payment_status);
}

#[tokio::test]
async fn invalid_form_is_rejected_without_store_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut directory = local_directory(&dir, 0);
    directory.load().await;

    assert!(directory.register(&form("", "abc")).await.is_none());
    assert!(directory.state().roster().is_empty());

    let notices = directory.drain_notices();
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert!(notices[0].line().contains("name, cohort (positive number)"));
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let mut directory = local_directory(&dir, 5);
    directory.load().await;
    let id = directory.state().roster()[0].id;
    directory.state_mut().select(id);

    directory.request_delete(id);
    directory.cancel_delete();
    assert!(!directory.confirm_delete().await);
    assert_eq!(directory.state().roster().len(), 5);

    directory.request_delete(id);
    assert!(directory.confirm_delete().await);
    assert_eq!(directory.state().roster().len(), 4);
    assert!(directory.state().selected().is_none());
}

#[tokio::test]
async fn deleting_missing_id_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut directory = local_directory(&dir, 3);
    directory.load().await;
    let before = directory.state().roster().to_vec();
    directory.drain_notices();

    directory.request_delete(12345);
    assert!(!directory.confirm_delete().await);
    assert_eq!(directory.state().roster(), before.as_slice());

    let notices = directory.drain_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_error());
    assert!(notices[0].line().contains("12345"));
}

#[tokio::test]
async fn delete_all_persists_empty_roster() {
    let dir = tempfile::tempdir().unwrap();
    let mut directory = local_directory(&dir, 8);
    directory.load().await;
    assert_eq!(directory.state().roster().len(), 8);

    directory.request_delete_all();
    assert!(directory.confirm_delete().await);
    assert!(directory.state().roster().is_empty());

    let mut reopened = local_directory(&dir, 8);
    reopened.load().await;
    assert!(reopened.state().roster().is_empty());
}

// ===== Failure Policy =====

/// Store whose every call fails.
struct BrokenStore;

#[async_trait]
impl RosterStore for BrokenStore {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn load(&self) -> Result<Vec<Member>, StoreError> {
        Err(StoreError::InvalidRow("backend offline".to_string()))
    }

    async fn create(&self, _member: NewMember) -> Result<Member, StoreError> {
        Err(StoreError::InvalidRow("backend offline".to_string()))
    }

    async fn update(&self, id: MemberId, _profile: MemberProfile) -> Result<Member, StoreError> {
        Err(StoreError::NotFound(id))
    }

    async fn set_approval(&self, id: MemberId, _status: ApprovalStatus) -> Result<Member, StoreError> {
        Err(StoreError::NotFound(id))
    }

    async fn delete(&self, id: MemberId) -> Result<(), StoreError> {
        Err(StoreError::NotFound(id))
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        Err(StoreError::InvalidRow("backend offline".to_string()))
    }
}

#[tokio::test]
async fn failed_read_yields_empty_roster_and_error() {
    let mut directory = Directory::new(Arc::new(BrokenStore), today());
    directory.state_mut().set_roster(kim_and_lee());

    directory.load().await;
    assert!(directory.state().roster().is_empty());
    let notices = directory.drain_notices();
    assert!(notices[0].is_error());
    assert!(notices[0].line().contains("backend offline"));
}

#[tokio::test]
async fn failed_writes_leave_roster_unchanged() {
    let mut directory = Directory::new(Arc::new(BrokenStore), today());
    directory.state_mut().set_roster(kim_and_lee());
    let before = directory.state().roster().to_vec();

    assert!(directory.register(&form("Park", "30")).await.is_none());
    assert!(directory.save_edit(1, &form("Kim", "11")).await.is_none());
    directory.request_delete_all();
    assert!(!directory.confirm_delete().await);

    assert_eq!(directory.state().roster(), before.as_slice());
    let notices = directory.drain_notices();
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|n| n.is_error()));
}
