//! Core library for the alumnae directory.
//!
//! - `models`: members, gatherings, archive photos and the profile card
//! - `directory`: filtering, pagination, form validation and view state
//! - `store`: local snapshot and remote table roster backends
//! - `api`: REST client for the hosted tables and object storage
//! - `config`: file and environment configuration

pub mod api;
pub mod config;
pub mod directory;
pub mod models;
pub mod seed;
pub mod store;
pub mod utils;

pub use config::{Backend, Config};
pub use directory::{Directory, DirectoryState, FilterState};
pub use models::Member;
pub use store::{RosterStore, StoreError};
