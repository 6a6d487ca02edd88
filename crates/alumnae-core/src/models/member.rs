use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directory::form::DEFAULT_TAG;

/// Directory-wide member identifier.
pub type MemberId = i64;

/// Dues payment state stored on each member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "Paid"),
            PaymentStatus::Unpaid => write!(f, "Unpaid"),
        }
    }
}

/// Membership approval state. Rows written before approvals existed count as approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    #[default]
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ApprovalStatus::Pending)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "Pending"),
            ApprovalStatus::Approved => write!(f, "Approved"),
            ApprovalStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid birthday '{0}', expected MM-DD or YYYY-MM-DD")]
pub struct BirthdayParseError(pub String);

/// A month/day pair with no year, stored as `MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday {
    month: u32,
    day: u32,
}

impl Birthday {
    /// Build a birthday, rejecting impossible dates. Feb 29 is allowed.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so every real month/day pair validates
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Pick a uniformly random day of a leap year.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let ordinal = rng.gen_range(1..=366);
        NaiveDate::from_yo_opt(2000, ordinal)
            .map(Self::from_date)
            .unwrap_or(Self { month: 1, day: 1 })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// True when the birthday falls on the given calendar date.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.month == date.month() && self.day == date.day()
    }

    /// True when the birthday falls in the same month as the given date.
    pub fn is_in_month_of(&self, date: NaiveDate) -> bool {
        self.month == date.month()
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for Birthday {
    type Err = BirthdayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || BirthdayParseError(trimmed.to_string());

        // Full dates and timestamps: keep the month and day only
        let date_part = trimmed.get(..10).unwrap_or(trimmed);
        if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        let (month, day) = trimmed.split_once('-').ok_or_else(err)?;
        let month: u32 = month.parse().map_err(|_| err())?;
        let day: u32 = day.parse().map_err(|_| err())?;
        Self::new(month, day).ok_or_else(err)
    }
}

impl TryFrom<String> for Birthday {
    type Error = BirthdayParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Birthday> for String {
    fn from(value: Birthday) -> Self {
        value.to_string()
    }
}

/// Normalized profile fields produced by the registration/edit form.
///
/// Everything the edit form replaces lives here; `id`, `birthday` and
/// `payment_status` are owned by the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub name: String,
    pub cohort: u32,
    pub region: String,
    pub job: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub introduction: String,
    pub tags: Vec<String>,
}

/// A member that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub profile: MemberProfile,
    pub birthday: Option<Birthday>,
    pub payment_status: PaymentStatus,
    pub approval_status: ApprovalStatus,
}

impl NewMember {
    /// New registrations start unpaid and wait for approval.
    pub fn new(profile: MemberProfile, birthday: Birthday) -> Self {
        Self {
            profile,
            birthday: Some(birthday),
            payment_status: PaymentStatus::Unpaid,
            approval_status: ApprovalStatus::Pending,
        }
    }
}

/// A stored member that breaks the record invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMember {
    #[error("member {0} has no name")]
    MissingName(MemberId),

    #[error("member {0} has no cohort of at least 1")]
    MissingCohort(MemberId),
}

/// One directory entry.
///
/// Deserialization goes through [`MemberRecord`], so every loaded member has
/// a name, a cohort of at least 1 and at least one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MemberRecord")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub cohort: u32,
    pub region: String,
    pub job: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub introduction: String,
    pub tags: Vec<String>,
    pub birthday: Option<Birthday>,
    pub payment_status: PaymentStatus,
    pub approval_status: ApprovalStatus,
}

/// Stored shape of a member, as found in snapshots (camelCase) and backend
/// rows (snake_case). Optional columns may be absent or null.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberRecord {
    id: MemberId,
    name: Option<String>,
    cohort: Option<u32>,
    region: Option<String>,
    job: Option<String>,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    introduction: Option<String>,
    tags: Option<Vec<String>>,
    birthday: Option<Birthday>,
    #[serde(alias = "payment_status")]
    payment_status: Option<PaymentStatus>,
    #[serde(alias = "approval_status")]
    approval_status: Option<ApprovalStatus>,
}

impl TryFrom<MemberRecord> for Member {
    type Error = InvalidMember;

    fn try_from(record: MemberRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let name = record
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(InvalidMember::MissingName(id))?;
        let cohort = record
            .cohort
            .filter(|c| *c >= 1)
            .ok_or(InvalidMember::MissingCohort(id))?;

        let mut tags: Vec<String> = record
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect();
        if tags.is_empty() {
            tags.push(DEFAULT_TAG.to_string());
        }

        Ok(Self {
            id,
            name,
            cohort,
            region: record.region.unwrap_or_default(),
            job: record.job.unwrap_or_default(),
            company: record.company.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            phone: record.phone.unwrap_or_default(),
            introduction: record.introduction.unwrap_or_default(),
            tags,
            birthday: record.birthday,
            payment_status: record.payment_status.unwrap_or_default(),
            approval_status: record.approval_status.unwrap_or_default(),
        })
    }
}

impl Member {
    pub fn from_new(id: MemberId, new: NewMember) -> Self {
        let NewMember {
            profile,
            birthday,
            payment_status,
            approval_status,
        } = new;
        Self {
            id,
            name: profile.name,
            cohort: profile.cohort,
            region: profile.region,
            job: profile.job,
            company: profile.company,
            email: profile.email,
            phone: profile.phone,
            introduction: profile.introduction,
            tags: profile.tags,
            birthday,
            payment_status,
            approval_status,
        }
    }

    /// Replace every profile field, keeping id, birthday and payment status.
    pub fn apply_profile(&mut self, profile: MemberProfile) {
        self.name = profile.name;
        self.cohort = profile.cohort;
        self.region = profile.region;
        self.job = profile.job;
        self.company = profile.company;
        self.email = profile.email;
        self.phone = profile.phone;
        self.introduction = profile.introduction;
        self.tags = profile.tags;
    }

    pub fn profile(&self) -> MemberProfile {
        MemberProfile {
            name: self.name.clone(),
            cohort: self.cohort,
            region: self.region.clone(),
            job: self.job.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            introduction: self.introduction.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn tags_display(&self) -> String {
        self.tags.join(", ")
    }

    pub fn birthday_display(&self) -> String {
        self.birthday
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub fn is_pending(&self) -> bool {
        self.approval_status.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> MemberProfile {
        MemberProfile {
            name: "Kim".to_string(),
            cohort: 10,
            region: "Seoul".to_string(),
            job: "Engineer".to_string(),
            company: "Acme".to_string(),
            email: "kim@example.com".to_string(),
            phone: "010-1234-5678".to_string(),
            introduction: "Hi".to_string(),
            tags: vec!["IT".to_string()],
        }
    }

    #[test]
    fn test_birthday_parse_month_day() {
        let b: Birthday = "03-05".parse().unwrap();
        assert_eq!(b.month(), 3);
        assert_eq!(b.day(), 5);
        assert_eq!(b.to_string(), "03-05");
    }

    #[test]
    fn test_birthday_parse_full_date_and_timestamp() {
        let b: Birthday = "1990-12-31".parse().unwrap();
        assert_eq!(b.to_string(), "12-31");
        let b: Birthday = "1988-02-29T00:00:00.000Z".parse().unwrap();
        assert_eq!(b.to_string(), "02-29");
    }

    #[test]
    fn test_birthday_rejects_impossible_dates() {
        assert!("02-30".parse::<Birthday>().is_err());
        assert!("13-01".parse::<Birthday>().is_err());
        assert!("".parse::<Birthday>().is_err());
        assert!("march".parse::<Birthday>().is_err());
    }

    #[test]
    fn test_birthday_matches_dates() {
        let b = Birthday::new(10, 18).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(b.is_on(today));
        assert!(b.is_in_month_of(today));

        let other = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        assert!(!b.is_on(other));
        assert!(b.is_in_month_of(other));
    }

    #[test]
    fn test_birthday_random_is_valid() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let b = Birthday::random(&mut rng);
            assert!(Birthday::new(b.month(), b.day()).is_some());
        }
    }

    #[test]
    fn test_member_serializes_camel_case() {
        let member = Member::from_new(7, NewMember::new(profile(), Birthday::new(1, 2).unwrap()));
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["paymentStatus"], "unpaid");
        assert_eq!(json["birthday"], "01-02");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_member_accepts_snake_case_payment_status() {
        let json = r#"{"id":1,"name":"Lee","cohort":20,"payment_status":"paid","birthday":"1990-05-01"}"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert!(member.is_paid());
        assert_eq!(member.birthday_display(), "05-01");
        assert_eq!(member.tags, vec![DEFAULT_TAG]);
        assert_eq!(member.approval_status, ApprovalStatus::Approved);
    }

    #[test]
    fn test_member_rejects_blank_name_and_zero_cohort() {
        let blank = r#"{"id":1,"name":"  ","cohort":3}"#;
        assert!(serde_json::from_str::<Member>(blank).is_err());

        let zero = r#"{"id":1,"name":"Kim","cohort":0,"tags":["IT"]}"#;
        let err = serde_json::from_str::<Member>(zero).unwrap_err();
        assert!(err.to_string().contains("no cohort"));

        let missing = r#"{"id":1,"name":"Kim"}"#;
        assert!(serde_json::from_str::<Member>(missing).is_err());
    }

    #[test]
    fn test_member_null_columns_take_defaults() {
        let json = r#"{
            "id": 4, "name": "Schema Check", "cohort": 999,
            "region": null, "job": null, "company": null, "email": null,
            "phone": null, "introduction": null, "tags": null, "birthday": null,
            "payment_status": null, "approval_status": null, "photo_url": null
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.name, "Schema Check");
        assert_eq!(member.region, "");
        assert_eq!(member.tags, vec![DEFAULT_TAG]);
        assert_eq!(member.birthday, None);
        assert_eq!(member.payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_member_snapshot_round_trip_keeps_approval() {
        let member = Member::from_new(9, NewMember::new(profile(), Birthday::new(2, 3).unwrap()));
        assert!(member.is_pending());
        let json = serde_json::to_string(&member).unwrap();
        assert!(json.contains("\"approvalStatus\":\"pending\""));
        let back: Member = serde_json::from_str(&json).unwrap();
        assert_eq!(back, member);
    }

    #[test]
    fn test_apply_profile_keeps_stored_fields() {
        let birthday = Birthday::new(4, 9).unwrap();
        let mut member = Member::from_new(3, NewMember::new(profile(), birthday));
        member.payment_status = PaymentStatus::Paid;

        let mut changed = profile();
        changed.name = "Kim Updated".to_string();
        changed.cohort = 11;
        member.apply_profile(changed);

        assert_eq!(member.id, 3);
        assert_eq!(member.name, "Kim Updated");
        assert_eq!(member.cohort, 11);
        assert_eq!(member.birthday, Some(birthday));
        assert_eq!(member.payment_status, PaymentStatus::Paid);
    }
}
