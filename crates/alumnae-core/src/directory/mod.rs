//! The directory engine.
//!
//! Pure pieces (`filter`, `pagination`, `form`, `deep_link`, `stats`) take
//! their inputs explicitly, including today's date, so they can be tested
//! without a store or a terminal. [`DirectoryState`] holds the view state
//! and [`Directory`] ties it to a [`crate::store::RosterStore`]. `admin`
//! covers the approval queue and the dues summary.

pub mod admin;
pub mod controller;
pub mod deep_link;
pub mod filter;
pub mod form;
pub mod notice;
pub mod pagination;
pub mod state;
pub mod stats;

pub use admin::{bulk_upload_notice, pending_members, AdminSummary};
pub use controller::Directory;
pub use deep_link::DeepLink;
pub use filter::{apply_filters, unique_regions, unique_tags, BirthdayFilter, FilterState, PaymentFilter};
pub use form::{parse_tags, FormField, MemberForm, ValidationError};
pub use notice::{Notice, NoticeKind, NoticeQueue};
pub use pagination::{paginate, total_pages, Page, PAGE_SIZE};
pub use state::{DirectoryState, PendingDelete};
pub use stats::{CountEntry, DashboardStats};
