//! Actions the table host hands back to its caller.
//!
//! [`TableAction`]s are the relay side of the change descriptors produced by the
//! managers. The host returns a `Vec<TableAction>` from every event so the
//! caller can forward filter and page changes to its backend query, refresh the
//! display, or show a message to the user.
//!
//! # Example
//!
//! ```rust
//! use tablestate::domain::FilterChange;
//! use tablestate::table::TableAction;
//!
//! let actions = vec![
//!     TableAction::ApplyFilter(FilterChange::new("errors", true)),
//!     TableAction::FetchPage { page_index: 0, page_size: 50 },
//!     TableAction::Render,
//! ];
//! assert_eq!(actions.len(), 3);
//! ```

use crate::domain::{DateRangeSelection, FilterChange};

/// Side effects requested by the table host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    /// Forward a quick filter change to the server-side query.
    ApplyFilter(FilterChange),

    /// All quick filters were cleared.
    ClearFilters,

    /// Forward new date bounds to the server-side query.
    ApplyDateRange(DateRangeSelection),

    /// Load (or re-slice) the given page.
    FetchPage {
        page_index: usize,
        page_size: usize,
    },

    /// The selection changed; bulk-action toolbars may need updating.
    SelectionChanged {
        /// Rows selected after the change.
        count: usize,
    },

    /// Show a message to the user.
    Notify {
        message: String,
    },

    /// Re-render the table from a fresh view model.
    Render,
}
