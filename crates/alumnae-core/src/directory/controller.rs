use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info};

use super::form::MemberForm;
use super::notice::{Notice, NoticeQueue};
use super::state::{DirectoryState, PendingDelete};
use crate::models::{ApprovalStatus, Member, MemberId};
use crate::store::{RosterStore, StoreError};

/// The directory: view state synchronized with a roster store.
///
/// Store calls come first; the in-memory state is only changed when they
/// succeed. Outcomes are reported as notices.
pub struct Directory {
    store: Arc<dyn RosterStore>,
    state: DirectoryState,
    notices: NoticeQueue,
}

impl Directory {
    pub fn new(store: Arc<dyn RosterStore>, today: NaiveDate) -> Self {
        Self {
            store,
            state: DirectoryState::new(today),
            notices: NoticeQueue::default(),
        }
    }

    pub fn store(&self) -> Arc<dyn RosterStore> {
        Arc::clone(&self.store)
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DirectoryState {
        &mut self.state
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    // ===== Loading =====

    pub async fn load(&mut self) {
        let result = self.store.load().await;
        self.apply_loaded(result);
    }

    /// Install a load result. A failed read leaves an empty roster.
    pub fn apply_loaded(&mut self, result: Result<Vec<Member>, StoreError>) {
        match result {
            Ok(roster) => {
                info!(count = roster.len(), store = self.store.name(), "Roster loaded");
                self.state.set_roster(roster);
            }
            Err(e) => {
                error!(error = %e, "Failed to load roster");
                self.state.set_roster(Vec::new());
                self.notify(Notice::error("Could not load the directory").with_detail(e.to_string()));
            }
        }
    }

    // ===== Registration / Edit =====

    /// Validate and create a member. Returns the new member on success.
    pub async fn register(&mut self, form: &MemberForm) -> Option<Member> {
        let new = match form.validate_new(&mut rand::thread_rng()) {
            Ok(new) => new,
            Err(e) => {
                self.notify(Notice::error("Please check the form").with_detail(e.to_string()));
                return None;
            }
        };

        match self.store.create(new).await {
            Ok(member) => {
                info!(id = member.id, "Member registered");
                self.notify(
                    Notice::success("Registered")
                        .with_detail(format!("{} was added to the directory.", member.name)),
                );
                self.state.insert_front(member.clone());
                self.state.set_search(String::new());
                Some(member)
            }
            Err(e) => {
                self.write_failed("register", e);
                None
            }
        }
    }

    /// Validate and save an edit. Id, birthday and payment status are kept.
    pub async fn save_edit(&mut self, id: MemberId, form: &MemberForm) -> Option<Member> {
        let profile = match form.validate() {
            Ok(profile) => profile,
            Err(e) => {
                self.notify(Notice::error("Please check the form").with_detail(e.to_string()));
                return None;
            }
        };

        match self.store.update(id, profile).await {
            Ok(member) => {
                info!(id = member.id, "Member updated");
                self.notify(Notice::success("Changes saved"));
                self.state.replace(member.clone());
                Some(member)
            }
            Err(e) => {
                self.write_failed("update", e);
                None
            }
        }
    }

    // ===== Approval =====

    pub async fn approve(&mut self, id: MemberId) -> Option<Member> {
        self.decide(id, ApprovalStatus::Approved).await
    }

    pub async fn reject(&mut self, id: MemberId) -> Option<Member> {
        self.decide(id, ApprovalStatus::Rejected).await
    }

    async fn decide(&mut self, id: MemberId, status: ApprovalStatus) -> Option<Member> {
        match self.store.set_approval(id, status).await {
            Ok(member) => {
                info!(id = id, status = status.as_str(), "Approval recorded");
                let notice = match status {
                    ApprovalStatus::Rejected => Notice::error("Rejected")
                        .with_detail(format!("{}'s membership was rejected.", member.name)),
                    _ => Notice::success("Approved")
                        .with_detail(format!("{}'s membership was approved.", member.name)),
                };
                self.notify(notice);
                self.state.replace(member.clone());
                Some(member)
            }
            Err(e) => {
                self.write_failed("approval", e);
                None
            }
        }
    }

    // ===== Deletion =====

    pub fn request_delete(&mut self, id: MemberId) {
        self.state.request_delete(id);
    }

    pub fn request_delete_all(&mut self) {
        self.state.request_delete_all();
    }

    pub fn cancel_delete(&mut self) {
        self.state.cancel_pending();
    }

    /// Run the pending delete, if any. Returns true when something was deleted.
    pub async fn confirm_delete(&mut self) -> bool {
        match self.state.take_pending() {
            Some(PendingDelete::One(id)) => match self.store.delete(id).await {
                Ok(()) => {
                    info!(id = id, "Member deleted");
                    self.state.remove(id);
                    self.notify(Notice::success("Deleted"));
                    true
                }
                Err(e) => {
                    self.write_failed("delete", e);
                    false
                }
            },
            Some(PendingDelete::All) => match self.store.delete_all().await {
                Ok(()) => {
                    info!("All members deleted");
                    self.state.clear();
                    self.notify(Notice::success("All members were deleted"));
                    true
                }
                Err(e) => {
                    self.write_failed("delete all", e);
                    false
                }
            },
            None => false,
        }
    }

    fn write_failed(&mut self, action: &str, e: StoreError) {
        error!(action = action, error = %e, "Roster write failed");
        self.notify(Notice::error("Something went wrong").with_detail(e.to_string()));
    }
}
