//! API client for the hosted table and object storage endpoints.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use reqwest::{header, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::ApiError;
use crate::models::{
    content_type_for, photo_object_key, ArchivePhoto, Gathering, GatheringStatus, NewArchivePhoto,
    NewGathering,
};

// ============================================================================
// Constants
// ============================================================================

/// Table holding directory members.
pub const MEMBERS_TABLE: &str = "alumnae";

/// Table holding event board cards.
pub const GATHERINGS_TABLE: &str = "gatherings";

/// Table holding photo archive rows.
pub const ARCHIVE_TABLE: &str = "archive_photos";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Ask the backend to echo written rows back.
const RETURN_REPRESENTATION: &str = "return=representation";

/// API client for the hosted backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", header::HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    // ===== Tables =====

    /// `GET /rest/v1/{table}?select=*&order={order}`
    pub async fn select<T: DeserializeOwned>(&self, table: &str, order: &str) -> Result<Vec<T>, ApiError> {
        let url = self.table_url(table);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .query(&[("select", "*"), ("order", order)])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let rows: Vec<T> = Self::read_json(response, table).await?;
        debug!(table = table, count = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// Insert one row and return it as stored.
    pub async fn insert<T: DeserializeOwned, B: Serialize>(&self, table: &str, body: &B) -> Result<T, ApiError> {
        let url = self.table_url(table);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let rows: Vec<T> = Self::read_json(response, table).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidResponse(format!("Insert into {} returned no rows", table)))
    }

    /// Patch the row with `id`. Returns the updated rows, empty when no row matched.
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        id: i64,
        patch: &B,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.table_url(table);
        let response = self
            .client
            .patch(&url)
            .headers(self.auth_headers()?)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&[("id", format!("eq.{}", id))])
            .json(patch)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::read_json(response, table).await
    }

    /// Delete the row with `id`. Returns the deleted rows, empty when no row matched.
    pub async fn delete<T: DeserializeOwned>(&self, table: &str, id: i64) -> Result<Vec<T>, ApiError> {
        let url = self.table_url(table);
        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::read_json(response, table).await
    }

    /// Delete every row. PostgREST refuses unfiltered deletes, so match on
    /// a non-null id.
    pub async fn delete_all(&self, table: &str) -> Result<(), ApiError> {
        let url = self.table_url(table);
        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .query(&[("id", "not.is.null")])
            .send()
            .await?;

        Self::check_response(response).await?;
        info!(table = table, "Deleted all rows");
        Ok(())
    }

    // ===== Object Storage =====

    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, key);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        Self::check_response(response).await?;
        debug!(bucket = bucket, key = key, "Uploaded object");
        Ok(())
    }

    /// Public URL of an object in a public bucket. No request is made.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, key)
    }

    // ===== Gatherings =====

    pub async fn fetch_gatherings(&self) -> Result<Vec<Gathering>, ApiError> {
        self.select(GATHERINGS_TABLE, "id.asc").await
    }

    pub async fn create_gathering(&self, gathering: &NewGathering) -> Result<Gathering, ApiError> {
        self.insert(GATHERINGS_TABLE, gathering).await
    }

    pub async fn update_gathering_status(&self, id: i64, status: GatheringStatus) -> Result<Gathering, ApiError> {
        let rows: Vec<Gathering> = self
            .update(GATHERINGS_TABLE, id, &json!({ "status": status }))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("gathering {}", id)))
    }

    /// Add one participant to an open gathering.
    pub async fn sign_up(&self, gathering: &Gathering) -> Result<Gathering, ApiError> {
        if !gathering.accepts_signups() {
            return Err(ApiError::BadRequest(format!(
                "'{}' is not accepting sign-ups",
                gathering.title
            )));
        }
        let rows: Vec<Gathering> = self
            .update(
                GATHERINGS_TABLE,
                gathering.id,
                &json!({ "participants": gathering.participants + 1 }),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("gathering {}", gathering.id)))
    }

    pub async fn delete_gathering(&self, id: i64) -> Result<(), ApiError> {
        let rows: Vec<Gathering> = self.delete(GATHERINGS_TABLE, id).await?;
        if rows.is_empty() {
            return Err(ApiError::NotFound(format!("gathering {}", id)));
        }
        Ok(())
    }

    // ===== Photo Archive =====

    /// Newest photos first.
    pub async fn fetch_photos(&self) -> Result<Vec<ArchivePhoto>, ApiError> {
        self.select(ARCHIVE_TABLE, "taken_at.desc.nullslast").await
    }

    /// Upload an image under a generated key and record it in the archive.
    pub async fn upload_photo(
        &self,
        bucket: &str,
        file_name: &str,
        bytes: Vec<u8>,
        title: &str,
        description: Option<String>,
        taken_at: Option<NaiveDate>,
    ) -> Result<ArchivePhoto, ApiError> {
        let key = photo_object_key(file_name, Utc::now(), &mut rand::thread_rng());
        let content_type = content_type_for(&key);

        self.upload_object(bucket, &key, bytes, content_type).await?;

        let row = NewArchivePhoto {
            photo_url: self.public_url(bucket, &key),
            title: title.to_string(),
            description,
            taken_at,
        };
        let photo: ArchivePhoto = self.insert(ARCHIVE_TABLE, &row).await?;
        info!(id = photo.id, key = %key, "Archived photo");
        Ok(photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = ApiClient::new("https://demo.example.co/", "anon").unwrap();
        assert_eq!(client.base_url(), "https://demo.example.co");
        assert_eq!(client.table_url("alumnae"), "https://demo.example.co/rest/v1/alumnae");
        assert_eq!(
            client.public_url("alumnae-photos", "1-abc.jpg"),
            "https://demo.example.co/storage/v1/object/public/alumnae-photos/1-abc.jpg"
        );
    }

    #[test]
    fn test_auth_headers() {
        let client = ApiClient::new("http://localhost", "secret-key").unwrap();
        let headers = client.auth_headers().unwrap();
        assert_eq!(headers["apikey"], "secret-key");
        assert_eq!(headers[header::AUTHORIZATION], "Bearer secret-key");
    }

    #[test]
    fn test_debug_hides_key() {
        let client = ApiClient::new("http://localhost", "secret-key").unwrap();
        assert!(!format!("{:?}", client).contains("secret-key"));
    }
}
