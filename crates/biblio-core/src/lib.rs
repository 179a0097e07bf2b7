//! BiblioDrift Core Library
//!
//! This crate provides the core functionality for BiblioDrift, a personal
//! book-tracking layer: a user's library of three shelves (in progress,
//! wished for, completed), kept consistent between a durable local store
//! and a remote backend of record.
//!
//! # Architecture
//!
//! - **Local store**: source of truth between syncs; written synchronously
//!   before every mutation returns
//! - **Remote service**: backend of record; written best-effort and
//!   reconciled by full sync
//!
//! # Quick Start
//!
//! ```text
//! let store = LocalStore::new(Config::load()?);
//! let remote = Arc::new(HttpLibraryService::new(&config.api_url)?);
//! let manager = LibraryManager::new(store, remote);
//!
//! // Shelve a book
//! let entry = BookEntry::new("zyTCAlFPjgYC", "The Google Story");
//! manager.add_book(entry, Shelf::WishedFor)?;
//!
//! // Reconcile with the backend
//! manager.sync_with_backend().await?;
//! ```
//!
//! # Modules
//!
//! - `library`: the library manager (main entry point)
//! - `models`: shelves, book entries, shelf state, session
//! - `storage`: durable local persistence
//! - `remote`: remote library service client
//! - `purchase`: retailer purchase-link generation
//! - `config`: application configuration

pub mod config;
pub mod library;
pub mod models;
pub mod purchase;
pub mod remote;
pub mod storage;

pub use config::Config;
pub use library::LibraryManager;
pub use models::{BookEntry, Session, Shelf, ShelfState};
pub use purchase::{purchase_links, PurchaseLink, Retailer};
pub use remote::{HttpLibraryService, LibraryService, RemoteError};
pub use storage::{LocalStore, StorageError};
