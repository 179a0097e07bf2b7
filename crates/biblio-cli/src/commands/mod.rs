//! Command handlers

pub mod book;
pub mod buy;
pub mod config;
pub mod session;
pub mod status;
pub mod sync;
