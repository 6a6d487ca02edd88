use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the random suffix appended to uploaded object keys.
const OBJECT_KEY_SUFFIX_LEN: usize = 8;

/// A row of the `archive_photos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivePhoto {
    pub id: i64,
    pub photo_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub taken_at: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ArchivePhoto {
    pub fn taken_display(&self) -> String {
        self.taken_at
            .map(|d| d.format("%Y. %m. %d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Insert payload for the `archive_photos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewArchivePhoto {
    pub photo_url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<NaiveDate>,
}

/// Generate a collision-resistant storage key for an upload:
/// `<unix-millis>-<random>.<ext>`.
pub fn photo_object_key<R: Rng + ?Sized>(file_name: &str, now: DateTime<Utc>, rng: &mut R) -> String {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    let suffix: String = (0..OBJECT_KEY_SUFFIX_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect();

    format!("{}-{}.{}", now.timestamp_millis(), suffix, extension)
}

/// MIME type for an object key, based on its extension.
pub fn content_type_for(key: &str) -> &'static str {
    let extension = Path::new(key)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
