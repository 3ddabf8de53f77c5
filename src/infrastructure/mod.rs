//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where preferences are stored on disk and expands user-supplied
//! paths from configuration.

pub mod paths;

pub use paths::{data_dir, default_preferences_file, expand_tilde};
