//! Plain-text table renderer.
//!
//! Draws a [`TableViewModel`] as fixed-width text, suitable for terminals and
//! logs. Layout, top to bottom:
//!
//! 1. Filter chips and the date range picker, when present
//! 2. The search query, when non-empty
//! 3. Header row and data rows, or the empty-state message
//! 4. Paginator caption and selection summary
//!
//! # Example
//!
//! ```rust
//! use tablestate::ui::render;
//! # use tablestate::ui::viewmodel::*;
//! # let vm = TableViewModel {
//! #     displayed_columns: vec![], headers: vec![], rows: vec![],
//! #     paginator: PaginatorView { page_index: 0, page_size: 50, page_size_options: vec![50],
//! #         total: 0, page_count: 1, range_label: "0 of 0".into() },
//! #     filter_chips: vec![], date_range: None, selection: SelectionSummary::default(),
//! #     search_query: String::new(), empty_state: Some("No rows to display".into()),
//! # };
//! let text = render(&vm);
//! assert!(text.contains("No rows to display"));
//! ```

use crate::domain::{ACTIONS_COLUMN_KEY, SELECT_COLUMN_KEY};
use crate::ui::helpers::truncate;
use crate::ui::viewmodel::{RowView, TableViewModel};
use std::fmt::Write as _;

/// Widest a rendered column may get.
pub const MAX_COLUMN_WIDTH: usize = 32;

const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";
const ACTIONS_MARKER: &str = "...";

/// Renders `vm` to a string ending in a newline.
#[must_use]
pub fn render(vm: &TableViewModel) -> String {
    let mut out = String::new();

    if let Some(toolbar) = render_toolbar(vm) {
        out.push_str(&toolbar);
        out.push('\n');
    }
    if !vm.search_query.is_empty() {
        let _ = writeln!(out, "Search: {}", vm.search_query);
    }

    let selectable = vm.displayed_columns.iter().any(|key| key == SELECT_COLUMN_KEY);
    let has_actions = vm.displayed_columns.iter().any(|key| key == ACTIONS_COLUMN_KEY);
    let widths = column_widths(vm);

    let mut header = Vec::new();
    if selectable {
        header.push(if vm.selection.all_selected { CHECKED } else { UNCHECKED }.to_string());
    }
    header.extend(
        vm.headers
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(&truncate(&cell.label, *width), *width)),
    );
    let _ = writeln!(out, "{}", header.join("  ").trim_end());

    if let Some(message) = &vm.empty_state {
        let _ = writeln!(out, "  {message}");
    } else {
        for row in &vm.rows {
            let _ = writeln!(out, "{}", render_row(row, &widths, selectable, has_actions));
        }
    }

    let _ = write!(
        out,
        "{}  (page {}/{}, {} per page)",
        vm.paginator.range_label,
        vm.paginator.page_index + 1,
        vm.paginator.page_count,
        vm.paginator.page_size
    );
    if vm.selection.has_selection {
        let _ = write!(out, "  {} selected", vm.selection.count);
    }
    out.push('\n');
    out
}

fn render_toolbar(vm: &TableViewModel) -> Option<String> {
    let mut parts: Vec<String> = vm
        .filter_chips
        .iter()
        .map(|chip| {
            let mark = if chip.active { CHECKED } else { UNCHECKED };
            format!("{mark} {}", chip.label)
        })
        .collect();

    if let Some(range) = &vm.date_range {
        parts.push(format!("Range: {}", range.label));
    }

    (!parts.is_empty()).then(|| parts.join("  "))
}

fn render_row(row: &RowView, widths: &[usize], selectable: bool, has_actions: bool) -> String {
    let mut cells = Vec::with_capacity(row.cells.len() + 2);
    if selectable {
        cells.push(if row.selected { CHECKED } else { UNCHECKED }.to_string());
    }
    cells.extend(row.cells.iter().zip(widths).map(|(cell, width)| {
        let text = match cell.badge {
            Some(color) => format!("{} ({})", cell.text, color.as_str()),
            None => cell.text.clone(),
        };
        pad(&truncate(&text, *width), *width)
    }));
    if has_actions {
        cells.push(ACTIONS_MARKER.to_string());
    }
    cells.join("  ").trim_end().to_string()
}

/// Per-column width: the longest header or cell, capped at [`MAX_COLUMN_WIDTH`].
fn column_widths(vm: &TableViewModel) -> Vec<usize> {
    vm.headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let widest_cell = vm
                .rows
                .iter()
                .filter_map(|row| row.cells.get(idx))
                .map(|cell| {
                    let badge = cell.badge.map_or(0, |color| color.as_str().len() + 3);
                    cell.text.chars().count() + badge
                })
                .max()
                .unwrap_or(0);
            widest_cell
                .max(header.label.chars().count())
                .min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}
