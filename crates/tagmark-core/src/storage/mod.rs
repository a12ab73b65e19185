//! Storage layer
//!
//! The bookmark collection is persisted wholesale as a JSON array. There is
//! no delta persistence: every mutation rewrites the file.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::JsonStorage;
