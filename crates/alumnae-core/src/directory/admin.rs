//! Membership administration: the approval queue and the dues summary.

use serde::Serialize;

use super::notice::Notice;
use super::stats::DashboardStats;
use crate::models::{ApprovalStatus, Member};
use crate::utils::format_won;

/// Members waiting for an approval decision, oldest registration (lowest id) first.
pub fn pending_members(roster: &[Member]) -> Vec<&Member> {
    let mut pending: Vec<&Member> = roster.iter().filter(|m| m.is_pending()).collect();
    pending.sort_by_key(|m| m.id);
    pending
}

/// Numbers shown on the admin panel's summary cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminSummary {
    pub pending: usize,
    pub rejected: usize,
    pub paid_count: usize,
    pub unpaid_count: usize,
    /// Paid share of the roster, the same figure the dashboard shows.
    pub paid_percent: u32,
    /// Dues collected so far, `paid_count * annual_dues`.
    pub dues_collected: u64,
    /// Dues expected if everyone paid.
    pub dues_target: u64,
}

impl AdminSummary {
    pub fn compute(roster: &[Member], stats: &DashboardStats, annual_dues: u64) -> Self {
        let count = |status: ApprovalStatus| roster.iter().filter(|m| m.approval_status == status).count();

        Self {
            pending: count(ApprovalStatus::Pending),
            rejected: count(ApprovalStatus::Rejected),
            paid_count: stats.paid_count,
            unpaid_count: stats.unpaid_count,
            paid_percent: stats.paid_percent,
            dues_collected: stats.paid_count as u64 * annual_dues,
            dues_target: stats.total as u64 * annual_dues,
        }
    }

    pub fn dues_display(&self) -> String {
        format!("{} of {}", format_won(self.dues_collected), format_won(self.dues_target))
    }
}

/// Contact spreadsheets cannot be imported yet; the action only says so.
pub fn bulk_upload_notice() -> Notice {
    Notice::info("Upload in preparation")
        .with_detail("Spreadsheet import (.xlsx, .csv) will be available once the backend import is connected.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::notice::NoticeKind;
    use crate::models::{Birthday, MemberProfile, NewMember, PaymentStatus};
    use chrono::NaiveDate;

    fn member(id: i64, status: ApprovalStatus, paid: bool) -> Member {
        let profile = MemberProfile {
            name: format!("M{}", id),
            cohort: 30,
            region: "Seoul".to_string(),
            job: "Designer".to_string(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            introduction: String::new(),
            tags: vec!["Art".to_string()],
        };
        let mut member = Member::from_new(id, NewMember::new(profile, Birthday::new(1, 1).unwrap()));
        member.approval_status = status;
        member.payment_status = if paid { PaymentStatus::Paid } else { PaymentStatus::Unpaid };
        member
    }

    #[test]
    fn test_pending_members_ordered_by_id() {
        let roster = vec![
            member(5, ApprovalStatus::Pending, false),
            member(2, ApprovalStatus::Approved, true),
            member(3, ApprovalStatus::Pending, false),
            member(4, ApprovalStatus::Rejected, false),
        ];
        let ids: Vec<i64> = pending_members(&roster).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 5]);
    }

    #[test]
    fn test_summary_uses_dashboard_payment_figures() {
        let roster = vec![
            member(1, ApprovalStatus::Approved, true),
            member(2, ApprovalStatus::Approved, true),
            member(3, ApprovalStatus::Approved, true),
            member(4, ApprovalStatus::Pending, false),
            member(5, ApprovalStatus::Rejected, false),
        ];
        let stats = DashboardStats::compute(&roster, NaiveDate::from_ymd_opt(2024, 10, 18).unwrap());
        let summary = AdminSummary::compute(&roster, &stats, 50_000);

        assert_eq!(summary.pending, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.paid_count, 3);
        assert_eq!(summary.unpaid_count, 2);
        assert_eq!(summary.paid_percent, 60);
        assert_eq!(summary.dues_collected, 150_000);
        assert_eq!(summary.dues_target, 250_000);
        assert_eq!(summary.dues_display(), "₩150,000 of ₩250,000");
    }

    #[test]
    fn test_empty_roster_summary() {
        let stats = DashboardStats::compute(&[], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(AdminSummary::compute(&[], &stats, 50_000), AdminSummary::default());
    }

    #[test]
    fn test_bulk_upload_is_informational() {
        let notice = bulk_upload_notice();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_eq!(notice.title, "Upload in preparation");
    }
}
