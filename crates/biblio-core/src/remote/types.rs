//! Wire types for the remote library service
//!
//! Explicit records for the backend's JSON payloads, validated at this
//! boundary. Authors travel as a single comma-separated string on the
//! wire; the split/join happens here and nowhere else. Records naming an
//! unrecognized `shelf_type` are dropped rather than propagated.

use serde::{Deserialize, Serialize};

use crate::models::{BookEntry, Session, Shelf};

/// Response body of `GET /library/{userId}`
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryListResponse {
    pub library: Vec<RemoteRecord>,
}

/// One library entry as the backend stores it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteRecord {
    /// Backend row id; becomes the entry's `remote_id`
    pub id: i64,
    /// Catalog identifier
    pub google_books_id: String,
    pub title: String,
    /// Comma-separated author names
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub shelf_type: String,
}

impl RemoteRecord {
    /// Convert into a local entry, mapping `shelf_type` onto a shelf
    ///
    /// Returns `None` when the shelf type is unrecognized; such records
    /// are dropped during reconciliation.
    pub fn into_entry(self) -> Option<(Shelf, BookEntry)> {
        let shelf = Shelf::from_wire(&self.shelf_type)?;
        let mut entry = BookEntry::new(self.google_books_id, self.title)
            .with_authors(split_authors(&self.authors));
        entry.remote_id = Some(self.id);
        entry.cover_url = self.thumbnail;
        entry.progress = match shelf {
            Shelf::InProgress => Some(0),
            _ => None,
        };
        Some((shelf, entry))
    }
}

/// Request body of `POST /library`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateRequest {
    pub user_id: String,
    pub google_books_id: String,
    pub title: String,
    pub authors: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub shelf_type: String,
}

impl CreateRequest {
    /// Build a create request from a local entry and its target shelf
    pub fn from_entry(session: &Session, entry: &BookEntry, shelf: Shelf) -> Self {
        Self {
            user_id: session.id.clone(),
            google_books_id: entry.external_id.clone(),
            title: entry.title.clone(),
            authors: join_authors(&entry.authors),
            thumbnail: entry.cover_url.clone(),
            shelf_type: shelf.wire_name().to_string(),
        }
    }
}

/// Response body of `POST /library`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResponse {
    pub item: CreatedItem,
}

/// The created row; only the id matters to us
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedItem {
    pub id: i64,
}

/// Split a comma-separated authors string into trimmed names
pub fn split_authors(authors: &str) -> Vec<String> {
    authors
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join author names into the backend's comma-separated form
pub fn join_authors(authors: &[String]) -> String {
    authors.join(", ")
}
