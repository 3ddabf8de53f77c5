//! The data table host and view model computation.
//!
//! [`DataTable`] owns the row data and the four managers, and is the single
//! place where they are combined: quick filters and search narrow the rows,
//! pagination slices them, selection marks them, and column visibility decides
//! which cells are shown. Events are applied by [`handle_event`], and
//! [`DataTable::compute_viewmodel`] turns the current state into a
//! [`TableViewModel`].
//!
//! # Client-side and server-side data
//!
//! Without a server total the rows are the full data set and the host slices
//! the current page itself. With a server total (see [`DataTable::set_rows`])
//! the rows are already one page of a larger result; the host only reports the
//! total and relays page changes as [`TableAction::FetchPage`].
//!
//! [`handle_event`]: crate::table::handle_event

use super::actions::TableAction;
use super::columns::{ColumnVisibilityManager, DisplayOptions};
use super::filters::{FilterConfig, FilterManager};
use super::pagination::{PaginationConfig, PaginationManager};
use super::selection::SelectionManager;
use crate::domain::{ColumnDef, QuickFilter, RollingDateRangeCalculator, TableRow};
use crate::reactive::Signal;
use crate::storage::KeyValueStore;
use crate::ui::helpers::{cell_badge, cell_text, coalesce_indices};
use crate::ui::viewmodel::{
    CellView, DateRangeView, FilterChipView, HeaderCell, PaginatorView, RowView, SelectionSummary,
    TableViewModel,
};
use crate::Config;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Empty-state message when there is no data at all.
pub const NO_ROWS_MESSAGE: &str = "No rows to display";

/// Empty-state message when filters or search hide every row.
pub const NO_MATCHES_MESSAGE: &str = "No rows match the current filters";

/// Table state container: rows, managers and search query.
pub struct DataTable<T> {
    rows: Signal<Vec<Rc<T>>>,
    server_total: Option<usize>,
    columns: ColumnVisibilityManager<T>,
    filters: FilterManager<T>,
    pagination: PaginationManager,
    selection: SelectionManager<T>,
    search_query: String,
    options: DisplayOptions,
    preferences_key: Option<String>,
}

impl<T: TableRow> DataTable<T> {
    /// Creates an empty table.
    ///
    /// Column preferences are neither loaded nor saved until a key is set with
    /// [`DataTable::with_preferences_key`].
    pub fn new(
        columns: Signal<Vec<ColumnDef<T>>>,
        filter_config: FilterConfig<T>,
        pagination_config: PaginationConfig,
        store: Rc<dyn KeyValueStore>,
        options: DisplayOptions,
    ) -> Self {
        Self {
            rows: Signal::new(Vec::new()),
            server_total: None,
            columns: ColumnVisibilityManager::new(columns, store),
            filters: FilterManager::new(filter_config),
            pagination: PaginationManager::new(pagination_config),
            selection: SelectionManager::new(),
            search_query: String::new(),
            options,
            preferences_key: None,
        }
    }

    /// Creates a table from a loaded [`Config`].
    ///
    /// When the date range picker is enabled, presets are resolved with a
    /// [`RollingDateRangeCalculator`].
    pub fn from_config(
        config: &Config,
        columns: Signal<Vec<ColumnDef<T>>>,
        quick_filters: Vec<QuickFilter<T>>,
        store: Rc<dyn KeyValueStore>,
    ) -> Self {
        let date_calculator = config.enable_date_range.then(|| {
            let calculator: Rc<dyn crate::domain::DateRangeCalculator> =
                Rc::new(RollingDateRangeCalculator);
            calculator
        });

        let filter_config = FilterConfig {
            filters: quick_filters,
            single_selection: config.single_selection,
            enable_date_range: config.enable_date_range,
            default_date_range: config.default_date_range,
            date_calculator,
        };

        let table = Self::new(
            columns,
            filter_config,
            config.pagination(),
            store,
            config.display_options(),
        );

        match &config.preferences_key {
            Some(key) => table.with_preferences_key(key.clone()),
            None => table,
        }
    }

    /// Sets the store key column preferences are persisted under.
    #[must_use]
    pub fn with_preferences_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.preferences_key = (!key.is_empty()).then_some(key);
        self
    }

    /// Loads column preferences and activates the first quick filter when in
    /// single-selection mode.
    ///
    /// Returns the actions needed to load the first page.
    pub fn initialize(&mut self) -> Vec<TableAction> {
        let _span = tracing::debug_span!(
            "initialize",
            preferences_key = ?self.preferences_key,
            filters = self.filters.filters().len()
        )
        .entered();

        self.columns.load_preferences(self.preferences_key.as_deref());

        let mut actions = Vec::new();
        if let Some(change) = self.filters.initialize_first_filter() {
            tracing::debug!(filter_key = %change.filter_key, "first filter activated");
            actions.push(TableAction::ApplyFilter(change));
        }
        actions.push(self.fetch_page_action());
        actions.push(TableAction::Render);
        actions
    }

    /// Replaces the row data.
    ///
    /// `server_total` marks `rows` as a single page of a larger server-side
    /// result with that many rows in total. Existing selections are kept; rows
    /// are compared by reference, so replaced rows drop out of
    /// [`SelectionManager::is_selected`] naturally.
    pub fn set_rows(&mut self, rows: Vec<Rc<T>>, server_total: Option<usize>) {
        tracing::debug!(count = rows.len(), ?server_total, "rows replaced");
        self.rows.set(rows);
        self.server_total = server_total;
    }

    /// All rows as last set.
    #[must_use]
    pub fn rows(&self) -> Vec<Rc<T>> {
        self.rows.get()
    }

    /// Reactive handle to the row data.
    #[must_use]
    pub fn rows_signal(&self) -> &Signal<Vec<Rc<T>>> {
        &self.rows
    }

    #[must_use]
    pub fn find_row(&self, id: i64) -> Option<Rc<T>> {
        self.rows
            .with(|rows| rows.iter().find(|row| row.id() == id).cloned())
    }

    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        self.server_total.is_some()
    }

    /// Rows passing the active quick filters and the search query.
    ///
    /// The query is split on whitespace and lowercased; a row is kept when
    /// every token fuzzy-matches the text of at least one visible cell.
    #[must_use]
    pub fn filtered_rows(&self) -> Vec<Rc<T>> {
        let _span = tracing::debug_span!(
            "filtered_rows",
            total_rows = self.rows.with(Vec::len),
            query_len = self.search_query.len()
        )
        .entered();

        let mut rows = self.rows.with(|rows| self.filters.apply(rows));

        let tokens = search_tokens(&self.search_query);
        if !tokens.is_empty() {
            let matcher = SkimMatcherV2::default();
            let columns = self.columns.visible_columns();
            rows.retain(|row| {
                let texts: Vec<String> = columns
                    .iter()
                    .map(|column| cell_text(column, row).to_lowercase())
                    .collect();
                tokens.iter().all(|token| {
                    texts
                        .iter()
                        .any(|text| matcher.fuzzy_match(text, token).is_some())
                })
            });
        }

        tracing::trace!(filtered_count = rows.len(), "rows filtered");
        rows
    }

    /// Rows shown on the current page.
    ///
    /// Server-side tables show every loaded row; client-side tables slice the
    /// filtered rows by the current page bounds.
    #[must_use]
    pub fn page_rows(&self) -> Vec<Rc<T>> {
        let filtered = self.filtered_rows();
        if self.is_server_side() {
            return filtered;
        }
        let bounds = self.pagination.page_bounds(filtered.len());
        filtered[bounds].to_vec()
    }

    /// Row count the paginator reports: the server total when known.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.server_total
            .unwrap_or_else(|| self.filtered_rows().len())
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Replaces the search query; returns whether it changed.
    pub fn set_search_query(&mut self, query: &str) -> bool {
        if self.search_query == query {
            return false;
        }
        query.clone_into(&mut self.search_query);
        true
    }

    #[must_use]
    pub const fn display_options(&self) -> DisplayOptions {
        self.options
    }

    #[must_use]
    pub fn preferences_key(&self) -> Option<&str> {
        self.preferences_key.as_deref()
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnVisibilityManager<T> {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnVisibilityManager<T> {
        &mut self.columns
    }

    #[must_use]
    pub fn filters(&self) -> &FilterManager<T> {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterManager<T> {
        &mut self.filters
    }

    #[must_use]
    pub fn pagination(&self) -> &PaginationManager {
        &self.pagination
    }

    pub fn pagination_mut(&mut self) -> &mut PaginationManager {
        &mut self.pagination
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionManager<T> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionManager<T> {
        &mut self.selection
    }

    pub(crate) fn fetch_page_action(&self) -> TableAction {
        TableAction::FetchPage {
            page_index: self.pagination.page_index(),
            page_size: self.pagination.page_size(),
        }
    }

    /// Computes a renderable view model from the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> TableViewModel {
        let _span = tracing::debug_span!("compute_viewmodel").entered();

        let visible = self.columns.visible_columns();
        let filtered = self.filtered_rows();
        let total = self.server_total.unwrap_or(filtered.len());
        let page_rows = if self.is_server_side() {
            filtered
        } else {
            let bounds = self.pagination.page_bounds(total);
            filtered[bounds].to_vec()
        };

        let headers = visible
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.label.clone(),
                sortable: column.sortable,
            })
            .collect();

        let query = self.search_query.trim();
        let matcher = (!query.is_empty()).then(SkimMatcherV2::default);

        let rows = page_rows
            .iter()
            .map(|row| self.compute_row(row, &visible, matcher.as_ref()))
            .collect();

        TableViewModel {
            displayed_columns: self.columns.displayed_columns(self.options),
            headers,
            rows,
            paginator: self.compute_paginator(total),
            filter_chips: self.compute_filter_chips(),
            date_range: self.compute_date_range(),
            selection: self.compute_selection_summary(&page_rows),
            search_query: self.search_query.clone(),
            empty_state: self.compute_empty_state(&page_rows),
        }
    }

    fn compute_row(
        &self,
        row: &Rc<T>,
        visible: &[ColumnDef<T>],
        matcher: Option<&SkimMatcherV2>,
    ) -> RowView {
        let cells = visible
            .iter()
            .map(|column| {
                let text = cell_text(column, row);
                let highlight_ranges = matcher
                    .map_or_else(Vec::new, |m| self.compute_highlight_ranges(&text, m));
                CellView {
                    badge: cell_badge(column, row),
                    text,
                    highlight_ranges,
                }
            })
            .collect();

        RowView {
            id: row.id(),
            selected: self.selection.is_selected(row),
            cells,
        }
    }

    /// Character ranges of `text` matched by any search token.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        let lowered = text.to_lowercase();
        // Lowercasing can change the char count for a few scripts; skip those.
        if lowered.chars().count() != text.chars().count() {
            return Vec::new();
        }

        let indices: BTreeSet<usize> = search_tokens(&self.search_query)
            .iter()
            .filter_map(|token| matcher.fuzzy_indices(&lowered, token))
            .flat_map(|(_score, indices)| indices)
            .collect();

        coalesce_indices(&indices.into_iter().collect::<Vec<_>>())
    }

    fn compute_paginator(&self, total: usize) -> PaginatorView {
        PaginatorView {
            page_index: self.pagination.page_index(),
            page_size: self.pagination.page_size(),
            page_size_options: self.pagination.page_size_options().to_vec(),
            total,
            page_count: self.pagination.page_count(total),
            range_label: self.pagination.range_label(total),
        }
    }

    fn compute_filter_chips(&self) -> Vec<FilterChipView> {
        self.filters
            .filters()
            .iter()
            .map(|filter| FilterChipView {
                key: filter.key.clone(),
                label: filter.label.clone(),
                icon: filter.icon.clone(),
                active: self.filters.is_filter_active(&filter.key),
            })
            .collect()
    }

    fn compute_date_range(&self) -> Option<DateRangeView> {
        if !self.filters.date_range_enabled() {
            return None;
        }
        Some(DateRangeView {
            preset: self.filters.selected_date_range().key().to_string(),
            icon: self.filters.date_range_icon().to_string(),
            label: self.filters.date_range_label().to_string(),
        })
    }

    fn compute_selection_summary(&self, page_rows: &[Rc<T>]) -> SelectionSummary {
        SelectionSummary {
            count: self.selection.selected_count(),
            has_selection: self.selection.has_selection(),
            all_selected: !page_rows.is_empty()
                && page_rows.iter().all(|row| self.selection.is_selected(row)),
        }
    }

    fn compute_empty_state(&self, page_rows: &[Rc<T>]) -> Option<String> {
        if !page_rows.is_empty() {
            return None;
        }
        let narrowed = self.filters.has_active_filters() || !self.search_query.trim().is_empty();
        let message = if self.rows.with(Vec::is_empty) || !narrowed {
            NO_ROWS_MESSAGE
        } else {
            NO_MATCHES_MESSAGE
        };
        Some(message.to_string())
    }
}

/// Lowercased whitespace-separated search tokens.
fn search_tokens(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

impl<T: TableRow> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("rows", &self.rows.with(Vec::len))
            .field("server_total", &self.server_total)
            .field("columns", &self.columns)
            .field("filters", &self.filters)
            .field("pagination", &self.pagination)
            .field("selection", &self.selection)
            .field("search_query", &self.search_query)
            .field("options", &self.options)
            .field("preferences_key", &self.preferences_key)
            .finish()
    }
}
