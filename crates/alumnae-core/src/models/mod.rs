//! Data models for directory entities.
//!
//! This module contains the record types shared by the directory engine,
//! the persistence backends and the front-end:
//!
//! - `Member`, `MemberProfile`, `NewMember`: directory entries and their
//!   normalized form input
//! - `Birthday`, `PaymentStatus`, `ApprovalStatus`: stored member attributes
//! - `Gathering`, `GatheringStatus`: event board cards
//! - `ArchivePhoto`: photo archive entries
//! - `NewsletterIssue`: published newsletter issues
//! - `UserProfile`: the locally saved "my profile" card

pub mod gathering;
pub mod member;
pub mod newsletter;
pub mod photo;
pub mod profile;

pub use gathering::{board, BoardColumn, Gathering, GatheringField, GatheringForm, GatheringStatus, NewGathering};
pub use member::{
    ApprovalStatus, Birthday, BirthdayParseError, InvalidMember, Member, MemberId, MemberProfile, NewMember,
    PaymentStatus,
};
pub use newsletter::{newsletter_issues, NewsletterIssue};
pub use photo::{content_type_for, photo_object_key, ArchivePhoto, NewArchivePhoto};
pub use profile::{ProfileField, UserProfile};
