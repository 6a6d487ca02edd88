//! REST client for the hosted backend.
//!
//! The backend exposes PostgREST-style table endpoints under `/rest/v1` and
//! an object store under `/storage/v1`. Every request carries the project
//! key as both the `apikey` header and a bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, ARCHIVE_TABLE, GATHERINGS_TABLE, MEMBERS_TABLE};
pub use error::ApiError;
