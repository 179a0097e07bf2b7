//! HTTP client for the remote library service
//!
//! The backend is an opaque collaborator: list, create, and delete of
//! library entries for an authenticated user. Every call here is one-shot
//! and best-effort from the manager's point of view; failures are mapped
//! to `RemoteError` and left to the caller to log and ignore.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::types::{CreateRequest, CreateResponse, LibraryListResponse, RemoteRecord};

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

/// Errors from remote library calls
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure (connection, timeout, malformed body)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status} for {endpoint}")]
    Status { status: u16, endpoint: String },
}

/// The remote library service contract
///
/// The seam between the library manager and the network; test doubles
/// implement this in-memory.
#[async_trait]
pub trait LibraryService: Send + Sync {
    /// Fetch the full library list for a user
    async fn fetch_library(&self, user_id: &str) -> Result<Vec<RemoteRecord>, RemoteError>;

    /// Create a library entry; returns the backend-assigned id
    async fn create_entry(&self, request: &CreateRequest) -> Result<i64, RemoteError>;

    /// Delete a library entry by its backend id
    async fn delete_entry(&self, item_id: i64) -> Result<(), RemoteError>;
}

/// `LibraryService` implementation over HTTP
pub struct HttpLibraryService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLibraryService {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .user_agent("biblio/0.3")
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticate against the backend
    ///
    /// Returns `Ok(true)` on success, `Ok(false)` when the credentials are
    /// rejected, and an error for anything else.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, RemoteError> {
        let endpoint = self.url("/api/v1/login");
        let response = self
            .client
            .post(&endpoint)
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(true),
            reqwest::StatusCode::UNAUTHORIZED => Ok(false),
            s => Err(RemoteError::Status {
                status: s.as_u16(),
                endpoint,
            }),
        }
    }
}

#[async_trait]
impl LibraryService for HttpLibraryService {
    async fn fetch_library(&self, user_id: &str) -> Result<Vec<RemoteRecord>, RemoteError> {
        let endpoint = self.url(&format!("/library/{}", user_id));
        debug!("Fetching remote library from {}", endpoint);

        let response = self.client.get(&endpoint).send().await?;
        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                endpoint,
            });
        }

        let body: LibraryListResponse = response.json().await?;
        Ok(body.library)
    }

    async fn create_entry(&self, request: &CreateRequest) -> Result<i64, RemoteError> {
        let endpoint = self.url("/library");
        debug!(
            "Creating remote entry for {} on shelf {}",
            request.google_books_id, request.shelf_type
        );

        let response = self.client.post(&endpoint).json(request).send().await?;
        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                endpoint,
            });
        }

        let body: CreateResponse = response.json().await?;
        Ok(body.item.id)
    }

    async fn delete_entry(&self, item_id: i64) -> Result<(), RemoteError> {
        let endpoint = self.url(&format!("/library/{}", item_id));
        debug!("Deleting remote entry {}", item_id);

        let response = self.client.delete(&endpoint).send().await?;
        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                endpoint,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let service = HttpLibraryService::new("http://localhost:5000/").unwrap();
        assert_eq!(service.url("/library/u1"), "http://localhost:5000/library/u1");

        let service = HttpLibraryService::new("http://localhost:5000").unwrap();
        assert_eq!(service.url("/library"), "http://localhost:5000/library");
    }

    #[test]
    fn test_status_error_display() {
        let err = RemoteError::Status {
            status: 503,
            endpoint: "http://localhost:5000/library/u1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("/library/u1"));
    }
}
