//! Directory view state: roster, filters, page, selection and pending deletes.
//!
//! All methods are synchronous and free of I/O; persistence happens in
//! [`super::Directory`], which only touches this state after a store call
//! succeeds.

use chrono::NaiveDate;

use super::deep_link::DeepLink;
use super::filter::{apply_filters, unique_regions, unique_tags, BirthdayFilter, FilterState, PaymentFilter};
use super::pagination::{clamp_page, paginate, total_pages, Page, PAGE_SIZE};
use crate::models::{Member, MemberId};
use crate::store::sort_by_name;

/// A destructive action waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    One(MemberId),
    All,
}

#[derive(Debug, Clone)]
pub struct DirectoryState {
    roster: Vec<Member>,
    filter: FilterState,
    page: usize,
    /// Copy of the member shown in the detail view.
    selected: Option<Member>,
    pending: Option<PendingDelete>,
    today: NaiveDate,
}

impl DirectoryState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            roster: Vec::new(),
            filter: FilterState::default(),
            page: 1,
            selected: None,
            pending: None,
            today,
        }
    }

    // ===== Accessors =====

    pub fn roster(&self) -> &[Member] {
        &self.roster
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn selected(&self) -> Option<&Member> {
        self.selected.as_ref()
    }

    pub fn pending(&self) -> Option<PendingDelete> {
        self.pending
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.roster.iter().find(|m| m.id == id)
    }

    // ===== Derived Views =====

    pub fn filtered(&self) -> Vec<&Member> {
        apply_filters(&self.roster, &self.filter, self.today)
    }

    pub fn current_page(&self) -> Page<&Member> {
        paginate(&self.filtered(), self.page, PAGE_SIZE)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), PAGE_SIZE)
    }

    pub fn regions(&self) -> Vec<String> {
        unique_regions(&self.roster)
    }

    pub fn tags(&self) -> Vec<String> {
        unique_tags(&self.roster)
    }

    // ===== Filters =====
    // Every filter change sends the view back to page 1.

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.page = 1;
    }

    pub fn toggle_region(&mut self, region: &str) {
        if !self.filter.regions.remove(region) {
            self.filter.regions.insert(region.to_string());
        }
        self.page = 1;
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.filter.tags.remove(tag) {
            self.filter.tags.insert(tag.to_string());
        }
        self.page = 1;
    }

    /// Set the cohort range. Bounds are swapped if reversed and kept positive.
    pub fn set_cohort_range(&mut self, lo: u32, hi: u32) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.filter.cohort_range = lo.max(1)..=hi.max(1);
        self.page = 1;
    }

    pub fn set_payment(&mut self, payment: PaymentFilter) {
        self.filter.payment = payment;
        self.page = 1;
    }

    pub fn set_birthday(&mut self, birthday: BirthdayFilter) {
        self.filter.birthday = birthday;
        self.page = 1;
    }

    /// Clear every filter except the search text.
    pub fn reset_filters(&mut self) {
        self.filter = FilterState {
            search: std::mem::take(&mut self.filter.search),
            ..FilterState::default()
        };
        self.page = 1;
    }

    pub fn apply_deep_link(&mut self, link: &DeepLink) {
        link.apply_to(&mut self.filter);
        self.page = 1;
    }

    // ===== Pagination =====

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self) {
        self.page = clamp_page(self.page + 1, self.total_pages());
    }

    pub fn last_page(&mut self) {
        self.page = clamp_page(self.total_pages(), self.total_pages());
    }

    fn clamp(&mut self) {
        self.page = clamp_page(self.page, self.total_pages());
    }

    // ===== Selection =====

    /// Open the detail view for `id`. Returns false when no such member.
    pub fn select(&mut self, id: MemberId) -> bool {
        self.selected = self.member(id).cloned();
        self.selected.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ===== Roster Updates =====
    // Called only after the store has accepted the change.

    /// Replace the roster, sorting it by name.
    pub fn set_roster(&mut self, mut roster: Vec<Member>) {
        sort_by_name(&mut roster);
        self.roster = roster;
        if let Some(id) = self.selected.as_ref().map(|m| m.id) {
            self.selected = self.member(id).cloned();
        }
        self.clamp();
    }

    /// New members go to the front so they show on page 1.
    pub fn insert_front(&mut self, member: Member) {
        self.roster.insert(0, member);
        self.page = 1;
    }

    /// Swap in an updated record, keeping its position.
    pub fn replace(&mut self, member: Member) {
        if let Some(slot) = self.roster.iter_mut().find(|m| m.id == member.id) {
            *slot = member.clone();
        }
        if self.selected.as_ref().is_some_and(|s| s.id == member.id) {
            self.selected = Some(member);
        }
        self.clamp();
    }

    pub fn remove(&mut self, id: MemberId) {
        self.roster.retain(|m| m.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
        self.clamp();
    }

    pub fn clear(&mut self) {
        self.roster.clear();
        self.selected = None;
        self.page = 1;
    }

    // ===== Confirmation =====

    pub fn request_delete(&mut self, id: MemberId) {
        self.pending = Some(PendingDelete::One(id));
    }

    pub fn request_delete_all(&mut self) {
        self.pending = Some(PendingDelete::All);
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    pub fn take_pending(&mut self) -> Option<PendingDelete> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApprovalStatus, PaymentStatus};

    fn member(id: i64, name: &str, cohort: u32) -> Member {
        Member {
            id,
            name: name.to_string(),
            cohort,
            region: "Seoul".to_string(),
            job: "Engineer".to_string(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            introduction: String::new(),
            tags: vec!["IT".to_string()],
            birthday: None,
            payment_status: PaymentStatus::Unpaid,
            approval_status: ApprovalStatus::Approved,
        }
    }

    fn state_with(count: usize) -> DirectoryState {
        let mut state = DirectoryState::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        state.set_roster((1..=count as i64).map(|i| member(i, &format!("M{:03}", i), 1)).collect());
        state
    }

    #[test]
    fn test_navigation_clamps() {
        let mut state = state_with(30);
        assert_eq!(state.total_pages(), 3);

        state.prev_page();
        assert_eq!(state.page(), 1);
        state.next_page();
        state.next_page();
        state.next_page();
        assert_eq!(state.page(), 3);
        state.first_page();
        assert_eq!(state.page(), 1);
        state.last_page();
        assert_eq!(state.page(), 3);
        assert_eq!(state.current_page().items.len(), 6);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = state_with(30);
        state.last_page();
        state.set_search("M0");
        assert_eq!(state.page(), 1);

        state.last_page();
        state.toggle_tag("IT");
        assert_eq!(state.page(), 1);
        assert!(state.filter().tags.contains("IT"));
        state.toggle_tag("IT");
        assert!(state.filter().tags.is_empty());
    }

    #[test]
    fn test_empty_roster_stays_on_page_one() {
        let mut state = state_with(0);
        state.next_page();
        state.last_page();
        assert_eq!(state.page(), 1);
        assert_eq!(state.total_pages(), 0);
        assert!(state.current_page().is_empty());
    }

    #[test]
    fn test_removing_selected_clears_detail_view() {
        let mut state = state_with(3);
        assert!(state.select(2));
        state.remove(3);
        assert_eq!(state.selected().map(|m| m.id), Some(2));
        state.remove(2);
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_remove_clamps_page() {
        let mut state = state_with(13);
        state.last_page();
        assert_eq!(state.page(), 2);
        state.remove(13);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_replace_updates_selected_copy() {
        let mut state = state_with(2);
        state.select(1);
        let mut updated = member(1, "Renamed", 5);
        updated.payment_status = PaymentStatus::Paid;
        state.replace(updated);
        assert_eq!(state.selected().unwrap().name, "Renamed");
        assert_eq!(state.member(1).unwrap().cohort, 5);
    }

    #[test]
    fn test_replace_clamps_page_when_edit_leaves_filter() {
        let mut state = state_with(13);
        state.set_cohort_range(1, 1);
        state.last_page();
        assert_eq!(state.page(), 2);

        state.replace(member(13, "M013", 5));
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_insert_front_and_sort_on_load() {
        let mut state = DirectoryState::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        state.set_roster(vec![member(1, "lee", 1), member(2, "Kim", 1), member(3, "Park", 1)]);
        let names: Vec<&str> = state.roster().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Kim", "lee", "Park"]);

        state.insert_front(member(4, "Zed", 1));
        assert_eq!(state.roster()[0].name, "Zed");
    }

    #[test]
    fn test_cohort_range_normalized() {
        let mut state = state_with(0);
        state.set_cohort_range(25, 0);
        assert_eq!(state.filter().cohort_range, 1..=25);
    }

    #[test]
    fn test_reset_keeps_search() {
        let mut state = state_with(0);
        state.set_search("Kim");
        state.toggle_region("Seoul");
        state.set_payment(PaymentFilter::Only(PaymentStatus::Paid));
        state.reset_filters();
        assert_eq!(state.filter().search, "Kim");
        assert!(state.filter().regions.is_empty());
        assert_eq!(state.filter().payment, PaymentFilter::All);
    }

    #[test]
    fn test_pending_delete_flow() {
        let mut state = state_with(2);
        state.request_delete(1);
        assert_eq!(state.pending(), Some(PendingDelete::One(1)));
        state.cancel_pending();
        assert_eq!(state.take_pending(), None);

        state.request_delete_all();
        assert_eq!(state.take_pending(), Some(PendingDelete::All));
        assert_eq!(state.pending(), None);
    }
}
