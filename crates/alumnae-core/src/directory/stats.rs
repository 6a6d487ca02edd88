//! Dashboard statistics over a roster.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Member, PaymentStatus};

/// Entries kept in each top-N breakdown.
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub paid_count: usize,
    pub unpaid_count: usize,
    /// Rounded paid share, 0 for an empty roster.
    pub paid_percent: u32,
    /// Registrations waiting for approval.
    pub pending_count: usize,
    pub today_birthdays: Vec<Member>,
    pub by_cohort: Vec<CountEntry>,
    pub by_region: Vec<CountEntry>,
    pub by_job: Vec<CountEntry>,
}

impl DashboardStats {
    pub fn compute(roster: &[Member], today: NaiveDate) -> Self {
        let total = roster.len();
        let paid_count = roster
            .iter()
            .filter(|m| m.payment_status == PaymentStatus::Paid)
            .count();
        let unpaid_count = total - paid_count;
        let paid_percent = if total == 0 {
            0
        } else {
            ((paid_count as f64 / total as f64) * 100.0).round() as u32
        };

        let today_birthdays = roster
            .iter()
            .filter(|m| m.birthday.is_some_and(|b| b.is_on(today)))
            .cloned()
            .collect();

        Self {
            total,
            paid_count,
            unpaid_count,
            paid_percent,
            pending_count: roster.iter().filter(|m| m.is_pending()).count(),
            today_birthdays,
            by_cohort: top_counts(roster.iter().map(|m| m.cohort.to_string())),
            by_region: top_counts(roster.iter().map(|m| m.region.clone())),
            by_job: top_counts(roster.iter().map(|m| m.job.clone())),
        }
    }
}

/// Count keys and keep the `TOP_N` largest, ties broken by key. Blank keys
/// are not counted.
fn top_counts(keys: impl Iterator<Item = String>) -> Vec<CountEntry> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for key in keys.filter(|k| !k.trim().is_empty()) {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(key, count)| CountEntry { key, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    entries.truncate(TOP_N);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApprovalStatus, Birthday};

    fn member(id: i64, cohort: u32, region: &str, job: &str, paid: bool) -> Member {
        Member {
            id,
            name: format!("M{}", id),
            cohort,
            region: region.to_string(),
            job: job.to_string(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            introduction: String::new(),
            tags: vec!["IT".to_string()],
            birthday: None,
            payment_status: if paid { PaymentStatus::Paid } else { PaymentStatus::Unpaid },
            approval_status: ApprovalStatus::Approved,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_empty_roster() {
        let stats = DashboardStats::compute(&[], today());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.paid_percent, 0);
        assert!(stats.by_cohort.is_empty());
    }

    #[test]
    fn test_dues_counts_and_percent() {
        let mut roster = vec![
            member(1, 10, "Seoul", "Lawyer", true),
            member(2, 10, "Seoul", "Doctor", false),
            member(3, 20, "Busan", "Lawyer", false),
        ];
        roster[1].approval_status = ApprovalStatus::Pending;
        let stats = DashboardStats::compute(&roster, today());
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.paid_count, 1);
        assert_eq!(stats.unpaid_count, 2);
        assert_eq!(stats.paid_percent, 33);
    }

    #[test]
    fn test_today_birthdays() {
        let mut a = member(1, 10, "Seoul", "Lawyer", true);
        a.birthday = Birthday::new(3, 5);
        let mut b = member(2, 10, "Seoul", "Lawyer", true);
        b.birthday = Birthday::new(3, 6);
        let stats = DashboardStats::compute(&[a, b], today());
        assert_eq!(stats.today_birthdays.len(), 1);
        assert_eq!(stats.today_birthdays[0].id, 1);
    }

    #[test]
    fn test_top_counts_sorted_and_truncated() {
        let regions = ["B", "A", "A", "C", "C", "D", "E", "F", ""];
        let roster: Vec<Member> = regions
            .iter()
            .enumerate()
            .map(|(i, r)| member(i as i64, 1, r, "x", false))
            .collect();
        let stats = DashboardStats::compute(&roster, today());
        let keys: Vec<&str> = stats.by_region.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "C", "B", "D", "E"]);
        assert_eq!(stats.by_region[0].count, 2);
        assert_eq!(stats.by_cohort, vec![CountEntry { key: "1".to_string(), count: 9 }]);
    }
}
