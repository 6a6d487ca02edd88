//! Utility functions for string formatting and comparison.

pub mod format;

pub use format::{cmp_ignore_case, format_cohort, format_cohort_str, format_percent, format_won, truncate};
