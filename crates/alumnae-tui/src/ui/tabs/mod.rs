//! Per-tab content rendering.

pub mod admin;
pub mod archive;
pub mod dashboard;
pub mod directory;
pub mod gatherings;
