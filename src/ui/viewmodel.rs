//! View model types representing a renderable table.
//!
//! View models are produced by [`DataTable::compute_viewmodel`] and consumed by
//! the renderer or any other front end. They hold display-ready data only:
//! formatted cell text, badge colours, highlight ranges and paginator captions.
//!
//! [`DataTable::compute_viewmodel`]: crate::table::DataTable::compute_viewmodel
//!
//! # Example
//!
//! ```rust
//! use tablestate::ui::viewmodel::{HeaderCell, PaginatorView, SelectionSummary, TableViewModel};
//!
//! let vm = TableViewModel {
//!     displayed_columns: vec!["name".into()],
//!     headers: vec![HeaderCell { key: "name".into(), label: "Name".into(), sortable: true }],
//!     rows: vec![],
//!     paginator: PaginatorView {
//!         page_index: 0,
//!         page_size: 50,
//!         page_size_options: vec![10, 25, 50, 100],
//!         total: 0,
//!         page_count: 1,
//!         range_label: "0 of 0".into(),
//!     },
//!     filter_chips: vec![],
//!     date_range: None,
//!     selection: SelectionSummary::default(),
//!     search_query: String::new(),
//!     empty_state: Some("No rows".into()),
//! };
//! assert!(vm.is_empty());
//! ```

use crate::domain::BadgeColor;
use serde::Serialize;

/// Complete table view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableViewModel {
    /// Ordered column keys including the `select`/`actions` pseudo-columns.
    pub displayed_columns: Vec<String>,

    /// Header cells for the visible data columns.
    pub headers: Vec<HeaderCell>,

    /// Rows on the current page.
    pub rows: Vec<RowView>,

    pub paginator: PaginatorView,

    /// One chip per quick filter, in configuration order.
    pub filter_chips: Vec<FilterChipView>,

    /// Date range picker state; `None` when the picker is disabled.
    pub date_range: Option<DateRangeView>,

    pub selection: SelectionSummary,

    pub search_query: String,

    /// Message to show instead of rows, when there are none.
    pub empty_state: Option<String>,
}

impl TableViewModel {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: i64,
    pub selected: bool,
    /// Cells for the visible data columns, aligned with `headers`.
    pub cells: Vec<CellView>,
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub text: String,

    /// Set for badge columns only.
    pub badge: Option<BadgeColor>,

    /// Character ranges matching the search query.
    ///
    /// Each tuple is `(start, end)` in character indices, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatorView {
    pub page_index: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    /// Total row count (server total when known).
    pub total: usize,
    pub page_count: usize,
    /// Caption such as `"1 - 50 of 230"`.
    pub range_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChipView {
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRangeView {
    /// Preset key (`"24h"`, `"7d"`, `"30d"`, `"all"`).
    pub preset: String,
    pub icon: String,
    pub label: String,
}

/// Selection state for bulk-action toolbars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    pub count: usize,
    pub has_selection: bool,
    /// Every row on the current page is selected.
    pub all_selected: bool,
}
