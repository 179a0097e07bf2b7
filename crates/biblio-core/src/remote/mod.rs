//! Remote library service client
//!
//! Consumes (never implements) the backend's HTTP contract:
//!
//! - `GET /library/{userId}` - full library list
//! - `POST /library` - create an entry, returns the backend id
//! - `DELETE /library/{itemId}` - best-effort delete
//!
//! A failed call never blocks, delays, or rolls back a local mutation.

pub mod client;
pub mod types;

pub use client::{HttpLibraryService, LibraryService, RemoteError};
pub use types::{CreateRequest, CreateResponse, LibraryListResponse, RemoteRecord};
