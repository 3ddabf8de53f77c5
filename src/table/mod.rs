//! Table state managers and the host that composes them.
//!
//! # Modules
//!
//! - [`columns`]: Column visibility with persisted overrides
//! - [`filters`]: Quick filters and the date range selector
//! - [`pagination`]: Page index and page size
//! - [`selection`]: Multi-row selection
//! - [`state`]: [`DataTable`], the host composing the four managers
//! - [`handler`]: [`TableEvent`] processing
//! - [`actions`]: [`TableAction`]s returned to the caller
//!
//! The managers are independent of one another; only [`DataTable`] knows about
//! all four.

pub mod actions;
pub mod columns;
pub mod filters;
pub mod handler;
pub mod pagination;
pub mod selection;
pub mod state;

pub use actions::TableAction;
pub use columns::{ColumnVisibilityManager, DisplayOptions};
pub use filters::{FilterConfig, FilterManager};
pub use handler::{handle_event, TableEvent};
pub use pagination::{PageChange, PageEvent, PaginationConfig, PaginationManager};
pub use selection::{SelectionChange, SelectionManager, SelectionModel};
pub use state::DataTable;
