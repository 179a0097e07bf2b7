//! Storage layer
//!
//! Durable local persistence for the shelf collection and session record.
//! The local store is always written before a mutation returns to its
//! caller, so it is never behind the in-memory state at any observable
//! point.

pub mod error;
pub mod local;

pub use error::{StorageError, StorageResult};
pub use local::LocalStore;
