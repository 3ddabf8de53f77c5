//! Storage layer for persisted table preferences.
//!
//! Only one piece of table state outlives a table: the column visibility override
//! map. It is written to a [`KeyValueStore`] under a caller-chosen key.
//!
//! # Modules
//!
//! - `backend`: The key/value store trait
//! - `memory`: In-process store
//! - `json`: JSON file store with atomic writes

pub mod backend;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
