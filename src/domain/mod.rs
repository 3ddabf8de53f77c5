//! Domain layer for data tables.
//!
//! Core types shared by the managers and the host composition, independent of
//! storage and rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`row`]: The [`TableRow`] trait rows must implement
//! - [`column`]: Column definitions and cell formatting hooks
//! - [`filter`]: Quick filter definitions and change descriptors
//! - [`date_range`]: Date range presets and the calculator collaborator

pub mod column;
pub mod date_range;
pub mod error;
pub mod filter;
pub mod row;

pub use column::{
    BadgeColor, BadgeColorFn, CellFormatter, ColumnDef, ColumnType, ACTIONS_COLUMN_KEY,
    SELECT_COLUMN_KEY,
};
pub use date_range::{
    DateRange, DateRangeCalculator, DateRangePreset, DateRangeSelection,
    RollingDateRangeCalculator,
};
pub use error::{Result, TableError};
pub use filter::{FilterChange, FilterPredicate, QuickFilter};
pub use row::{serialized_cell, TableRow};
