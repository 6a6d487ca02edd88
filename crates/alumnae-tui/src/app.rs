use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use alumnae_core::api::{ApiClient, ApiError};
use alumnae_core::directory::{
    bulk_upload_notice, pending_members, AdminSummary, BirthdayFilter, DashboardStats, DeepLink, Directory,
    FilterState, FormField, MemberForm, Notice, NoticeKind, PendingDelete,
};
use alumnae_core::models::{
    board, newsletter_issues, ArchivePhoto, Gathering, GatheringField, GatheringForm, GatheringStatus, Member,
    MemberId, NewsletterIssue, PaymentStatus, ProfileField, UserProfile,
};
use alumnae_core::store::{self, LocalStorage, RosterStore, StoreError};
use alumnae_core::Config;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background refresh channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length of the search query.
const MAX_SEARCH_LENGTH: usize = 64;

/// Maximum length of a single form field.
const MAX_FIELD_LENGTH: usize = 200;

/// Maximum length of the cohort range input ("120-135").
const MAX_COHORT_INPUT_LENGTH: usize = 16;

// ============================================================================
// Tabs and States
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Directory,
    Gatherings,
    Archive,
    Admin,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Dashboard, Tab::Directory, Tab::Gatherings, Tab::Archive, Tab::Admin];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Directory => "Directory",
            Tab::Gatherings => "Gatherings",
            Tab::Archive => "Archive",
            Tab::Admin => "Admin",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Dashboard => Tab::Directory,
            Tab::Directory => Tab::Gatherings,
            Tab::Gatherings => Tab::Archive,
            Tab::Archive => Tab::Admin,
            Tab::Admin => Tab::Dashboard,
        }
    }

    pub fn prev(&self) -> Tab {
        match self {
            Tab::Dashboard => Tab::Admin,
            Tab::Directory => Tab::Dashboard,
            Tab::Gatherings => Tab::Directory,
            Tab::Archive => Tab::Gatherings,
            Tab::Admin => Tab::Archive,
        }
    }
}

/// Which list the archive tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveView {
    #[default]
    Photos,
    Newsletters,
}

impl ArchiveView {
    pub fn toggle(&self) -> ArchiveView {
        match self {
            ArchiveView::Photos => ArchiveView::Newsletters,
            ArchiveView::Newsletters => ArchiveView::Photos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    /// Directory filter panel (regions, tags, payment, birthday).
    Filtering,
    EditingCohortRange,
    ViewingMember,
    /// Registration when `editing_id` is None, edit otherwise.
    EditingMember,
    ConfirmingDelete,
    EditingProfile,
    CreatingGathering,
    ConfirmingGatheringDelete,
    Quitting,
}

/// A toggleable entry in the filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterItem {
    Region(String),
    Tag(String),
}

/// Results sent back from the background refresh task.
#[derive(Debug)]
pub enum RefreshResult {
    Roster(Result<Vec<Member>, StoreError>),
    Gatherings(Result<Vec<Gathering>, ApiError>),
    Photos(Result<Vec<ArchivePhoto>, ApiError>),
    RefreshComplete,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub state: AppState,
    pub current_tab: Tab,

    storage: LocalStorage,
    api: Option<ApiClient>,
    pub directory: Directory,

    // Directory view
    pub search_input: String,
    pub row_selection: usize,
    pub filter_selection: usize,
    pub cohort_input: String,
    pub member_form: MemberForm,
    pub form_field: usize,
    pub editing_id: Option<MemberId>,

    // Dashboard
    pub profile: UserProfile,
    pub profile_form: UserProfile,
    pub profile_field: usize,

    // Gatherings board
    pub gatherings: Vec<Gathering>,
    pub gathering_column: usize,
    pub gathering_row: usize,
    pub gathering_form: GatheringForm,
    pub gathering_field: usize,
    pending_gathering_delete: Option<i64>,

    // Archive
    pub archive_view: ArchiveView,
    pub photos: Vec<ArchivePhoto>,
    pub photo_selection: usize,
    pub newsletters: Vec<NewsletterIssue>,
    pub newsletter_selection: usize,

    // Admin
    pub admin_selection: usize,

    pub refreshing: bool,
    pub status: Option<Notice>,
    refresh_tx: mpsc::Sender<RefreshResult>,
    refresh_rx: mpsc::Receiver<RefreshResult>,
}

impl App {
    pub fn new(config: Config, today: NaiveDate) -> Result<Self> {
        let dir = config.storage_dir()?;
        let storage = LocalStorage::new(dir.clone())
            .with_context(|| format!("Failed to open storage directory {}", dir.display()))?;
        let roster_store: Arc<dyn RosterStore> = store::open(&config)?;

        let api = if config.has_remote() {
            Some(store::api_client(&config)?)
        } else {
            None
        };

        let profile = match storage.load_profile() {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Failed to load profile, using default");
                UserProfile::default()
            }
        };

        info!(store = roster_store.name(), remote = api.is_some(), "App initialized");

        let (refresh_tx, refresh_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            storage,
            api,
            directory: Directory::new(roster_store, today),
            search_input: String::new(),
            row_selection: 0,
            filter_selection: 0,
            cohort_input: String::new(),
            member_form: MemberForm::default(),
            form_field: 0,
            editing_id: None,
            profile_form: profile.clone(),
            profile,
            profile_field: 0,
            gatherings: Vec::new(),
            gathering_column: 0,
            gathering_row: 0,
            gathering_form: GatheringForm::default(),
            gathering_field: 0,
            pending_gathering_delete: None,
            archive_view: ArchiveView::default(),
            photos: Vec::new(),
            photo_selection: 0,
            newsletters: newsletter_issues(),
            newsletter_selection: 0,
            admin_selection: 0,
            refreshing: false,
            status: None,
            refresh_tx,
            refresh_rx,
        })
    }

    pub fn has_remote(&self) -> bool {
        self.api.is_some()
    }

    pub fn store_name(&self) -> &'static str {
        self.directory.store().name()
    }

    // ===== Notices =====

    /// Move queued directory notices to the status bar. Last one wins.
    pub fn flush_notices(&mut self) {
        for notice in self.directory.drain_notices() {
            if notice.is_error() {
                debug!(notice = %notice.line(), "Directory error notice");
            }
            self.status = Some(notice);
        }
    }

    fn report_api_error(&mut self, action: &str, e: ApiError) {
        error!(action = action, error = %e, "Request failed");
        self.status = Some(Notice::error("Something went wrong").with_detail(e.to_string()));
    }

    // ===== Background Refresh =====

    /// Reload the roster, and gatherings and photos when a remote backend is
    /// configured, without blocking the UI.
    pub fn refresh_all_background(&mut self) {
        if self.refreshing {
            debug!("Refresh already running");
            return;
        }
        info!("Starting background refresh");

        let tx = self.refresh_tx.clone();
        let roster_store = self.directory.store();
        let api = self.api.clone();

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, roster_store, api).await;
        });

        self.refreshing = true;
        self.status = Some(Notice::info("Refreshing data..."));
    }

    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    async fn execute_background_refresh(
        tx: mpsc::Sender<RefreshResult>,
        roster_store: Arc<dyn RosterStore>,
        api: Option<ApiClient>,
    ) {
        match api {
            Some(api) => {
                let (roster, gatherings, photos) = futures::join!(
                    roster_store.load(),
                    api.fetch_gatherings(),
                    api.fetch_photos()
                );
                Self::send_result(&tx, RefreshResult::Roster(roster)).await;
                Self::send_result(&tx, RefreshResult::Gatherings(gatherings)).await;
                Self::send_result(&tx, RefreshResult::Photos(photos)).await;
            }
            None => {
                let roster = roster_store.load().await;
                Self::send_result(&tx, RefreshResult::Roster(roster)).await;
            }
        }
        Self::send_result(&tx, RefreshResult::RefreshComplete).await;
    }

    /// Drain finished background work. Called once per frame.
    pub async fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.refresh_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_refresh_result(result);
        }
        self.flush_notices();
    }

    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Roster(result) => {
                self.directory.apply_loaded(result);
                self.clamp_row_selection();
                self.clamp_admin_selection();
            }
            RefreshResult::Gatherings(Ok(gatherings)) => {
                debug!(count = gatherings.len(), "Gatherings loaded");
                self.gatherings = gatherings;
                self.clamp_gathering_selection();
            }
            RefreshResult::Gatherings(Err(e)) => {
                error!(error = %e, "Failed to load gatherings");
                self.status = Some(Notice::error("Could not load gatherings").with_detail(e.to_string()));
            }
            RefreshResult::Photos(Ok(photos)) => {
                debug!(count = photos.len(), "Photos loaded");
                self.photos = photos;
                self.photo_selection = self.photo_selection.min(self.photos.len().saturating_sub(1));
            }
            RefreshResult::Photos(Err(e)) => {
                error!(error = %e, "Failed to load photo archive");
                self.status = Some(Notice::error("Could not load the archive").with_detail(e.to_string()));
            }
            RefreshResult::RefreshComplete => {
                self.refreshing = false;
                if self.status.as_ref().is_some_and(|n| n.kind == NoticeKind::Info) {
                    self.status = None;
                }
                info!("Background refresh complete");
            }
        }
    }

    // ===== Dashboard =====

    pub fn stats(&self) -> DashboardStats {
        let state = self.directory.state();
        DashboardStats::compute(state.roster(), state.today())
    }

    /// Jump to the directory with a fresh filter seeded from `link`.
    pub fn open_directory_with(&mut self, link: &DeepLink) {
        let state = self.directory.state_mut();
        state.reset_filters();
        state.set_search(String::new());
        state.apply_deep_link(link);
        self.search_input = state.filter().search.clone();
        self.row_selection = 0;
        self.current_tab = Tab::Directory;
        self.state = AppState::Normal;
    }

    pub fn show_unpaid(&mut self) {
        self.open_directory_with(&DeepLink {
            payment: Some(PaymentStatus::Unpaid),
            ..DeepLink::default()
        });
    }

    pub fn show_birthdays_today(&mut self) {
        self.open_directory_with(&DeepLink {
            birthday: Some(BirthdayFilter::Today),
            ..DeepLink::default()
        });
    }

    pub fn start_profile_edit(&mut self) {
        self.profile_form = self.profile.clone();
        self.profile_field = 0;
        self.state = AppState::EditingProfile;
    }

    pub fn current_profile_field(&self) -> ProfileField {
        ProfileField::ALL[self.profile_field.min(ProfileField::ALL.len() - 1)]
    }

    pub fn save_profile(&mut self) {
        match self.storage.save_profile(&self.profile_form) {
            Ok(()) => {
                info!("Profile saved");
                self.profile = self.profile_form.clone();
                self.status = Some(Notice::success("Profile saved"));
                self.state = AppState::Normal;
            }
            Err(e) => {
                error!(error = %e, "Failed to save profile");
                self.status = Some(Notice::error("Something went wrong").with_detail(e.to_string()));
            }
        }
    }

    // ===== Directory =====

    pub fn page_members(&self) -> Vec<&Member> {
        self.directory.state().current_page().items
    }

    pub fn highlighted_member(&self) -> Option<&Member> {
        self.page_members().get(self.row_selection).copied()
    }

    pub fn clamp_row_selection(&mut self) {
        let len = self.page_members().len();
        self.row_selection = self.row_selection.min(len.saturating_sub(1));
    }

    pub fn set_search(&mut self, query: String) {
        self.directory.state_mut().set_search(query.clone());
        self.search_input = query;
        self.row_selection = 0;
    }

    pub fn open_member_detail(&mut self) {
        if let Some(id) = self.highlighted_member().map(|m| m.id) {
            if self.directory.state_mut().select(id) {
                self.state = AppState::ViewingMember;
            }
        }
    }

    pub fn close_member_detail(&mut self) {
        self.directory.state_mut().clear_selection();
        self.state = AppState::Normal;
    }

    pub fn filter_items(&self) -> Vec<FilterItem> {
        let state = self.directory.state();
        state
            .regions()
            .into_iter()
            .map(FilterItem::Region)
            .chain(state.tags().into_iter().map(FilterItem::Tag))
            .collect()
    }

    pub fn toggle_filter_item(&mut self) {
        let Some(item) = self.filter_items().into_iter().nth(self.filter_selection) else {
            return;
        };
        let state = self.directory.state_mut();
        match item {
            FilterItem::Region(region) => state.toggle_region(&region),
            FilterItem::Tag(tag) => state.toggle_tag(&tag),
        }
        self.row_selection = 0;
    }

    pub fn cycle_payment_filter(&mut self) {
        let state = self.directory.state_mut();
        let next = state.filter().payment.cycle();
        state.set_payment(next);
        self.row_selection = 0;
    }

    pub fn cycle_birthday_filter(&mut self) {
        let state = self.directory.state_mut();
        let next = state.filter().birthday.cycle();
        state.set_birthday(next);
        self.row_selection = 0;
    }

    pub fn reset_filters(&mut self) {
        self.directory.state_mut().reset_filters();
        self.row_selection = 0;
        self.status = Some(Notice::info("Filters cleared"));
    }

    pub fn start_cohort_input(&mut self) {
        let range = self.directory.state().filter().cohort_range.clone();
        self.cohort_input = if range == FilterState::full_cohort_range() {
            String::new()
        } else if range.start() == range.end() {
            range.start().to_string()
        } else {
            format!("{}-{}", range.start(), range.end())
        };
        self.state = AppState::EditingCohortRange;
    }

    /// Apply the cohort input. Empty input clears the range.
    pub fn apply_cohort_input(&mut self) {
        let input = self.cohort_input.trim();
        let (lo, hi) = if input.is_empty() {
            let full = FilterState::full_cohort_range();
            (*full.start(), *full.end())
        } else {
            match parse_cohort_range(input) {
                Some(range) => range,
                None => {
                    self.status = Some(
                        Notice::error("Please check the cohort range").with_detail("Use a number or a range like 10-20"),
                    );
                    return;
                }
            }
        };
        self.directory.state_mut().set_cohort_range(lo, hi);
        self.row_selection = 0;
        self.state = AppState::Filtering;
    }

    pub fn next_page(&mut self) {
        self.directory.state_mut().next_page();
        self.row_selection = 0;
    }

    pub fn prev_page(&mut self) {
        self.directory.state_mut().prev_page();
        self.row_selection = 0;
    }

    pub fn first_page(&mut self) {
        self.directory.state_mut().first_page();
        self.row_selection = 0;
    }

    pub fn last_page(&mut self) {
        self.directory.state_mut().last_page();
        self.row_selection = 0;
    }

    pub fn start_register(&mut self) {
        self.member_form = MemberForm::default();
        self.form_field = 0;
        self.editing_id = None;
        self.state = AppState::EditingMember;
    }

    pub fn start_edit(&mut self) {
        let member = match self.state {
            AppState::ViewingMember => self.directory.state().selected().cloned(),
            _ => self.highlighted_member().cloned(),
        };
        if let Some(member) = member {
            self.member_form = MemberForm::from_member(&member);
            self.editing_id = Some(member.id);
            self.form_field = 0;
            self.state = AppState::EditingMember;
        }
    }

    pub fn current_form_field(&self) -> FormField {
        FormField::ALL[self.form_field.min(FormField::ALL.len() - 1)]
    }

    /// Submit the member form. The form stays open when validation or the
    /// store rejects it.
    pub async fn submit_member_form(&mut self) {
        let saved = match self.editing_id {
            Some(id) => self.directory.save_edit(id, &self.member_form).await,
            None => self.directory.register(&self.member_form).await,
        };
        if saved.is_some() {
            if self.editing_id.is_none() {
                self.search_input.clear();
                self.first_page();
            }
            self.editing_id = None;
            self.state = if self.directory.state().selected().is_some() {
                AppState::ViewingMember
            } else {
                AppState::Normal
            };
        }
        self.flush_notices();
    }

    pub fn request_delete_highlighted(&mut self) {
        let member = match self.state {
            AppState::ViewingMember => self.directory.state().selected(),
            _ => self.highlighted_member(),
        };
        if let Some(id) = member.map(|m| m.id) {
            self.directory.request_delete(id);
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn request_delete_all(&mut self) {
        if self.directory.state().roster().is_empty() {
            self.status = Some(Notice::info("The directory is already empty"));
            return;
        }
        self.directory.request_delete_all();
        self.state = AppState::ConfirmingDelete;
    }

    /// Name of the member a pending delete targets, or None for delete-all.
    pub fn pending_delete_label(&self) -> Option<String> {
        match self.directory.state().pending() {
            Some(PendingDelete::One(id)) => Some(
                self.directory
                    .state()
                    .member(id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| format!("#{}", id)),
            ),
            _ => None,
        }
    }

    pub async fn confirm_delete(&mut self) {
        self.directory.confirm_delete().await;
        self.directory.state_mut().clear_selection();
        self.clamp_row_selection();
        self.state = AppState::Normal;
        self.flush_notices();
    }

    pub fn cancel_delete(&mut self) {
        self.directory.cancel_delete();
        self.state = if self.directory.state().selected().is_some() {
            AppState::ViewingMember
        } else {
            AppState::Normal
        };
    }

    // ===== Gatherings =====

    pub fn selected_gathering(&self) -> Option<&Gathering> {
        board(&self.gatherings)
            .into_iter()
            .nth(self.gathering_column)
            .and_then(|column| column.items.get(self.gathering_row).copied())
    }

    fn column_len(&self, column: usize) -> usize {
        board(&self.gatherings)
            .get(column)
            .map(|c| c.items.len())
            .unwrap_or(0)
    }

    pub fn clamp_gathering_selection(&mut self) {
        self.gathering_column = self.gathering_column.min(GatheringStatus::ALL.len() - 1);
        let len = self.column_len(self.gathering_column);
        self.gathering_row = self.gathering_row.min(len.saturating_sub(1));
    }

    pub fn select_gathering_column(&mut self, column: usize) {
        self.gathering_column = column.min(GatheringStatus::ALL.len() - 1);
        self.gathering_row = 0;
    }

    pub fn move_gathering_row(&mut self, down: bool) {
        let len = self.column_len(self.gathering_column);
        if down {
            if self.gathering_row + 1 < len {
                self.gathering_row += 1;
            }
        } else {
            self.gathering_row = self.gathering_row.saturating_sub(1);
        }
    }

    fn require_api(&mut self) -> Option<ApiClient> {
        if self.api.is_none() {
            self.status = Some(
                Notice::error("No remote backend").with_detail("Set ALUMNAE_API_URL and ALUMNAE_API_KEY"),
            );
        }
        self.api.clone()
    }

    /// Keep the board selection on `id` after it changed columns.
    fn follow_gathering(&mut self, id: i64) {
        for (column, col) in board(&self.gatherings).iter().enumerate() {
            if let Some(row) = col.items.iter().position(|g| g.id == id) {
                self.gathering_column = column;
                self.gathering_row = row;
                return;
            }
        }
        self.clamp_gathering_selection();
    }

    fn replace_gathering(&mut self, updated: Gathering) {
        let id = updated.id;
        if let Some(slot) = self.gatherings.iter_mut().find(|g| g.id == id) {
            *slot = updated;
        }
        self.follow_gathering(id);
    }

    /// Move the selected card one column forward or back.
    pub async fn move_gathering(&mut self, forward: bool) {
        let Some(gathering) = self.selected_gathering().cloned() else {
            return;
        };
        let status = if forward {
            gathering.status.next()
        } else {
            gathering.status.prev()
        };
        if status == gathering.status {
            return;
        }
        let Some(api) = self.require_api() else {
            return;
        };
        match api.update_gathering_status(gathering.id, status).await {
            Ok(updated) => {
                info!(id = updated.id, status = updated.status.as_str(), "Gathering moved");
                self.status = Some(Notice::success(format!("Moved to {}", updated.status.title())));
                self.replace_gathering(updated);
            }
            Err(e) => self.report_api_error("move gathering", e),
        }
    }

    pub async fn sign_up_selected(&mut self) {
        let Some(gathering) = self.selected_gathering().cloned() else {
            return;
        };
        if !gathering.accepts_signups() {
            self.status = Some(Notice::info(format!("'{}' is not taking sign-ups", gathering.title)));
            return;
        }
        let Some(api) = self.require_api() else {
            return;
        };
        match api.sign_up(&gathering).await {
            Ok(updated) => {
                self.status = Some(
                    Notice::success("Signed up").with_detail(format!("{} now has {}", updated.title, updated.participants_display())),
                );
                self.replace_gathering(updated);
            }
            Err(e) => self.report_api_error("sign up", e),
        }
    }

    pub fn start_gathering_create(&mut self) {
        self.gathering_form = GatheringForm::default();
        self.gathering_field = 0;
        self.state = AppState::CreatingGathering;
    }

    pub fn current_gathering_field(&self) -> GatheringField {
        GatheringField::ALL[self.gathering_field.min(GatheringField::ALL.len() - 1)]
    }

    pub async fn submit_gathering_form(&mut self) {
        let new = match self.gathering_form.validate() {
            Ok(new) => new,
            Err(e) => {
                self.status = Some(Notice::error("Please check the form").with_detail(e.to_string()));
                return;
            }
        };
        let Some(api) = self.require_api() else {
            return;
        };
        match api.create_gathering(&new).await {
            Ok(created) => {
                info!(id = created.id, "Gathering created");
                self.status = Some(Notice::success("Gathering created").with_detail(created.title.clone()));
                let id = created.id;
                self.gatherings.push(created);
                self.follow_gathering(id);
                self.state = AppState::Normal;
            }
            Err(e) => self.report_api_error("create gathering", e),
        }
    }

    pub fn request_gathering_delete(&mut self) {
        if let Some(id) = self.selected_gathering().map(|g| g.id) {
            self.pending_gathering_delete = Some(id);
            self.state = AppState::ConfirmingGatheringDelete;
        }
    }

    pub fn pending_gathering_title(&self) -> Option<&str> {
        let id = self.pending_gathering_delete?;
        self.gatherings.iter().find(|g| g.id == id).map(|g| g.title.as_str())
    }

    pub fn cancel_gathering_delete(&mut self) {
        self.pending_gathering_delete = None;
        self.state = AppState::Normal;
    }

    pub async fn confirm_gathering_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(id) = self.pending_gathering_delete.take() else {
            return;
        };
        let Some(api) = self.require_api() else {
            return;
        };
        match api.delete_gathering(id).await {
            Ok(()) => {
                info!(id = id, "Gathering deleted");
                self.gatherings.retain(|g| g.id != id);
                self.clamp_gathering_selection();
                self.status = Some(Notice::success("Deleted"));
            }
            Err(e) => self.report_api_error("delete gathering", e),
        }
    }

    // ===== Archive =====

    pub fn selected_photo(&self) -> Option<&ArchivePhoto> {
        self.photos.get(self.photo_selection)
    }

    pub fn toggle_archive_view(&mut self) {
        self.archive_view = self.archive_view.toggle();
    }

    pub fn selected_newsletter(&self) -> Option<&NewsletterIssue> {
        self.newsletters.get(self.newsletter_selection)
    }

    /// Public PDF link of an issue, when the archive bucket is reachable.
    pub fn newsletter_url(&self, issue: &NewsletterIssue) -> Option<String> {
        self.api
            .as_ref()
            .map(|api| api.public_url(&self.config.photo_bucket, &issue.pdf_key()))
    }

    /// Move the selection of whichever archive list is showing.
    pub fn move_archive_selection(&mut self, down: bool) {
        let (selection, len) = match self.archive_view {
            ArchiveView::Photos => (&mut self.photo_selection, self.photos.len()),
            ArchiveView::Newsletters => (&mut self.newsletter_selection, self.newsletters.len()),
        };
        *selection = step_selection(*selection, len, down);
    }

    pub fn jump_archive_selection(&mut self, last: bool) {
        let (selection, len) = match self.archive_view {
            ArchiveView::Photos => (&mut self.photo_selection, self.photos.len()),
            ArchiveView::Newsletters => (&mut self.newsletter_selection, self.newsletters.len()),
        };
        *selection = if last { len.saturating_sub(1) } else { 0 };
    }

    // ===== Admin =====

    pub fn pending_members(&self) -> Vec<&Member> {
        pending_members(self.directory.state().roster())
    }

    pub fn admin_summary(&self) -> AdminSummary {
        AdminSummary::compute(self.directory.state().roster(), &self.stats(), self.config.annual_dues)
    }

    pub fn highlighted_pending(&self) -> Option<&Member> {
        self.pending_members().get(self.admin_selection).copied()
    }

    pub fn clamp_admin_selection(&mut self) {
        let len = self.pending_members().len();
        self.admin_selection = self.admin_selection.min(len.saturating_sub(1));
    }

    pub fn move_admin_selection(&mut self, down: bool) {
        self.admin_selection = step_selection(self.admin_selection, self.pending_members().len(), down);
    }

    pub async fn approve_highlighted(&mut self) {
        if let Some(id) = self.highlighted_pending().map(|m| m.id) {
            self.directory.approve(id).await;
            self.after_admin_decision();
        }
    }

    pub async fn reject_highlighted(&mut self) {
        if let Some(id) = self.highlighted_pending().map(|m| m.id) {
            self.directory.reject(id).await;
            self.after_admin_decision();
        }
    }

    fn after_admin_decision(&mut self) {
        self.flush_notices();
        self.clamp_admin_selection();
        self.clamp_row_selection();
    }

    pub fn bulk_upload(&mut self) {
        info!("Bulk contact upload requested");
        self.status = Some(bulk_upload_notice());
    }
}

/// Move a list selection one step, staying inside `0..len`.
fn step_selection(selection: usize, len: usize, down: bool) -> usize {
    if down {
        if selection + 1 < len {
            selection + 1
        } else {
            selection
        }
    } else {
        selection.saturating_sub(1)
    }
}

// ============================================================================
// Input Validation
// ============================================================================

fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && is_valid_input_char(c)
}

pub fn can_add_form_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

/// Digits, a dash and spaces only.
pub fn can_add_cohort_char(current_len: usize, c: char) -> bool {
    current_len < MAX_COHORT_INPUT_LENGTH && (c.is_ascii_digit() || c == '-' || c == ' ')
}

/// Parse "10" or "10-20" into inclusive bounds. Zero is rejected.
pub fn parse_cohort_range(input: &str) -> Option<(u32, u32)> {
    let parse = |s: &str| s.trim().parse::<u32>().ok().filter(|&n| n >= 1);
    match input.split_once('-') {
        Some((lo, hi)) => Some((parse(lo)?, parse(hi)?)),
        None => parse(input).map(|n| (n, n)),
    }
}

// ============================================================================
// Tests
// ============================================================================
