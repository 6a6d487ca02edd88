//! The directory filter predicate.
//!
//! A member is included when it passes all six sub-predicates: text search,
//! region set, cohort range, tag set, payment status and birthday window.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::models::{Member, PaymentStatus};

/// Lowest cohort a member can have.
pub const MIN_COHORT: u32 = 1;

/// Payment filter choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentFilter {
    #[default]
    All,
    Only(PaymentStatus),
}

impl PaymentFilter {
    pub fn matches(&self, status: PaymentStatus) -> bool {
        match self {
            PaymentFilter::All => true,
            PaymentFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Cycle all -> paid -> unpaid -> all.
    pub fn cycle(&self) -> Self {
        match self {
            PaymentFilter::All => PaymentFilter::Only(PaymentStatus::Paid),
            PaymentFilter::Only(PaymentStatus::Paid) => PaymentFilter::Only(PaymentStatus::Unpaid),
            PaymentFilter::Only(PaymentStatus::Unpaid) => PaymentFilter::All,
        }
    }
}

impl fmt::Display for PaymentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFilter::All => write!(f, "All"),
            PaymentFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Birthday window choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BirthdayFilter {
    #[default]
    All,
    Today,
    Month,
}

impl BirthdayFilter {
    /// Members without a stored birthday only pass `All`.
    pub fn matches(&self, member: &Member, today: NaiveDate) -> bool {
        match self {
            BirthdayFilter::All => true,
            BirthdayFilter::Today => member.birthday.is_some_and(|b| b.is_on(today)),
            BirthdayFilter::Month => member.birthday.is_some_and(|b| b.is_in_month_of(today)),
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            BirthdayFilter::All => BirthdayFilter::Today,
            BirthdayFilter::Today => BirthdayFilter::Month,
            BirthdayFilter::Month => BirthdayFilter::All,
        }
    }
}

impl fmt::Display for BirthdayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BirthdayFilter::All => write!(f, "All"),
            BirthdayFilter::Today => write!(f, "Today"),
            BirthdayFilter::Month => write!(f, "This month"),
        }
    }
}

/// All active search and filter criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub regions: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub cohort_range: RangeInclusive<u32>,
    pub payment: PaymentFilter,
    pub birthday: BirthdayFilter,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            regions: BTreeSet::new(),
            tags: BTreeSet::new(),
            cohort_range: Self::full_cohort_range(),
            payment: PaymentFilter::All,
            birthday: BirthdayFilter::All,
        }
    }
}

impl FilterState {
    /// Range spanning every positive cohort.
    pub fn full_cohort_range() -> RangeInclusive<u32> {
        MIN_COHORT..=u32::MAX
    }

    /// True when any criterion differs from the defaults.
    pub fn is_active(&self) -> bool {
        self != &Self::default()
    }

    /// Evaluate the full predicate for one member.
    pub fn matches(&self, member: &Member, today: NaiveDate) -> bool {
        self.matches_search(member)
            && (self.regions.is_empty() || self.regions.contains(&member.region))
            && self.cohort_range.contains(&member.cohort)
            && (self.tags.is_empty() || member.tags.iter().any(|t| self.tags.contains(t)))
            && self.payment.matches(member.payment_status)
            && self.birthday.matches(member, today)
    }

    /// Case-sensitive substring match against name, cohort, job and tags.
    fn matches_search(&self, member: &Member) -> bool {
        let needle = self.search.as_str();
        if needle.is_empty() {
            return true;
        }
        member.name.contains(needle)
            || member.cohort.to_string().contains(needle)
            || member.job.contains(needle)
            || member.tags.iter().any(|t| t.contains(needle))
    }
}

/// Members of `roster` that pass `filter`, in roster order.
pub fn apply_filters<'a>(roster: &'a [Member], filter: &FilterState, today: NaiveDate) -> Vec<&'a Member> {
    roster.iter().filter(|m| filter.matches(m, today)).collect()
}

/// Sorted unique regions present in the roster. Blank regions are skipped.
pub fn unique_regions(roster: &[Member]) -> Vec<String> {
    roster
        .iter()
        .filter(|m| !m.region.is_empty())
        .map(|m| m.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted unique tags present in the roster.
pub fn unique_tags(roster: &[Member]) -> Vec<String> {
    roster
        .iter()
        .flat_map(|m| m.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
