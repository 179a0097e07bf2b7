//! Data models for BiblioDrift
//!
//! Defines the core data structures: Shelf, BookEntry, ShelfState, and
//! Session. A book's identity is its catalog id (`external_id`); display
//! metadata never participates in identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three fixed categories partitioning a user's tracked books.
///
/// Serialized (and stored) under the short wire names used by the backend:
/// `current`, `want`, and `finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shelf {
    /// Currently being read
    #[serde(rename = "current")]
    InProgress,
    /// Wished for / to be read
    #[serde(rename = "want")]
    WishedFor,
    /// Finished reading
    #[serde(rename = "finished")]
    Completed,
}

impl Shelf {
    /// All shelves, in display order
    pub const ALL: [Shelf; 3] = [Shelf::InProgress, Shelf::WishedFor, Shelf::Completed];

    /// The wire name (`shelf_type` on the backend, key in the local store)
    pub fn wire_name(&self) -> &'static str {
        match self {
            Shelf::InProgress => "current",
            Shelf::WishedFor => "want",
            Shelf::Completed => "finished",
        }
    }

    /// Map a backend `shelf_type` value onto a shelf
    ///
    /// Returns `None` for unrecognized values; records naming an unknown
    /// shelf are dropped at the boundary rather than propagated.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "current" => Some(Shelf::InProgress),
            "want" => Some(Shelf::WishedFor),
            "finished" => Some(Shelf::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for Shelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Shelf::InProgress => "in progress",
            Shelf::WishedFor => "wished for",
            Shelf::Completed => "completed",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for Shelf {
    type Err = String;

    /// Accepts both wire names and human aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "current" | "in-progress" | "in_progress" | "reading" => Ok(Shelf::InProgress),
            "want" | "wished-for" | "wished_for" | "wishlist" => Ok(Shelf::WishedFor),
            "finished" | "completed" | "done" => Ok(Shelf::Completed),
            other => Err(format!(
                "unknown shelf '{}' (expected current, want, or finished)",
                other
            )),
        }
    }
}

/// A tracked book on one of the user's shelves
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookEntry {
    /// Stable catalog identifier (Google Books volume id); the entry's identity
    pub external_id: String,
    /// Identifier assigned by the backend once the entry is persisted there.
    /// Absent for entries that have never been synced.
    #[serde(default)]
    pub remote_id: Option<i64>,
    /// Display title
    pub title: String,
    /// Author(s), in catalog order
    #[serde(default)]
    pub authors: Vec<String>,
    /// Cover thumbnail URL
    #[serde(default)]
    pub cover_url: Option<String>,
    /// Reading progress 0-100; meaningful only on the in-progress shelf
    #[serde(default)]
    pub progress: Option<u8>,
    /// When this entry was added locally
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl BookEntry {
    /// Create a new entry with the given catalog id and title
    pub fn new(external_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            remote_id: None,
            title: title.into(),
            authors: Vec::new(),
            cover_url: None,
            progress: None,
            added_at: Utc::now(),
        }
    }

    /// Set the authors
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set the cover thumbnail URL
    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }
}

/// The three shelves, each an insertion-ordered sequence of entries
///
/// Invariant: no `external_id` appears on more than one shelf or twice
/// within a shelf. `push` refuses duplicates; higher layers treat a
/// duplicate add as a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShelfState {
    #[serde(default)]
    pub current: Vec<BookEntry>,
    #[serde(default)]
    pub want: Vec<BookEntry>,
    #[serde(default)]
    pub finished: Vec<BookEntry>,
}

impl ShelfState {
    /// Create an empty state (three empty shelves)
    pub fn new() -> Self {
        Self::default()
    }

    /// The entries on a shelf, in display order
    pub fn shelf(&self, shelf: Shelf) -> &[BookEntry] {
        match shelf {
            Shelf::InProgress => &self.current,
            Shelf::WishedFor => &self.want,
            Shelf::Completed => &self.finished,
        }
    }

    fn shelf_mut(&mut self, shelf: Shelf) -> &mut Vec<BookEntry> {
        match shelf {
            Shelf::InProgress => &mut self.current,
            Shelf::WishedFor => &mut self.want,
            Shelf::Completed => &mut self.finished,
        }
    }

    /// Locate an entry by catalog id across all shelves
    pub fn find(&self, external_id: &str) -> Option<(Shelf, usize)> {
        for shelf in Shelf::ALL {
            if let Some(idx) = self
                .shelf(shelf)
                .iter()
                .position(|e| e.external_id == external_id)
            {
                return Some((shelf, idx));
            }
        }
        None
    }

    /// Whether any shelf holds an entry with this catalog id
    pub fn contains(&self, external_id: &str) -> bool {
        self.find(external_id).is_some()
    }

    /// Get an entry by catalog id
    pub fn get(&self, external_id: &str) -> Option<&BookEntry> {
        let (shelf, idx) = self.find(external_id)?;
        Some(&self.shelf(shelf)[idx])
    }

    /// Get a mutable entry by catalog id
    pub fn get_mut(&mut self, external_id: &str) -> Option<&mut BookEntry> {
        let (shelf, idx) = self.find(external_id)?;
        Some(&mut self.shelf_mut(shelf)[idx])
    }

    /// Append an entry to a shelf, refusing duplicates
    ///
    /// Returns `false` (leaving the state untouched) if the entry's
    /// catalog id already exists anywhere in the state.
    pub fn push(&mut self, shelf: Shelf, entry: BookEntry) -> bool {
        if self.contains(&entry.external_id) {
            return false;
        }
        self.shelf_mut(shelf).push(entry);
        true
    }

    /// Remove an entry by catalog id, returning it if found
    pub fn remove(&mut self, external_id: &str) -> Option<BookEntry> {
        let (shelf, idx) = self.find(external_id)?;
        Some(self.shelf_mut(shelf).remove(idx))
    }

    /// Total entry count across all shelves
    pub fn total(&self) -> usize {
        self.current.len() + self.want.len() + self.finished.len()
    }

    /// Whether all shelves are empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Compare visible shelf contents: the catalog-id sequences per shelf.
    /// Metadata and remote ids are ignored.
    pub fn same_books(&self, other: &ShelfState) -> bool {
        Shelf::ALL.iter().all(|&shelf| {
            let a = self.shelf(shelf).iter().map(|e| e.external_id.as_str());
            let b = other.shelf(shelf).iter().map(|e| e.external_id.as_str());
            a.eq(b)
        })
    }
}

/// An authenticated user session
///
/// Presence of a session gates whether remote sync is attempted; absence
/// means purely local mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Backend user identifier
    pub id: String,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
