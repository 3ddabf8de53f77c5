//! Event handling for the data table host.
//!
//! [`handle_event`] applies one [`TableEvent`] to a [`DataTable`] and returns
//! the [`TableAction`]s the caller should carry out. The flow is
//! unidirectional:
//!
//! ```text
//! UI input -> TableEvent -> handle_event -> manager mutations -> Vec<TableAction>
//! ```
//!
//! Filter, date range and search changes send the paginator back to the first
//! page. Column toggles persist preferences when the table has a preferences
//! key; a failed save is logged and reported as [`TableAction::Notify`].
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use tablestate::domain::{FilterChange, QuickFilter, TableRow};
//! use tablestate::reactive::Signal;
//! use tablestate::storage::MemoryStore;
//! use tablestate::table::{handle_event, DataTable, FilterConfig, TableAction, TableEvent};
//!
//! struct Row;
//! impl TableRow for Row {
//!     fn id(&self) -> i64 { 0 }
//!     fn cell(&self, _key: &str) -> serde_json::Value { serde_json::Value::Null }
//! }
//!
//! let filters = FilterConfig {
//!     filters: vec![QuickFilter::new("open", "Open")],
//!     ..Default::default()
//! };
//! let mut table = DataTable::<Row>::new(
//!     Signal::new(vec![]),
//!     filters,
//!     Default::default(),
//!     Rc::new(MemoryStore::new()),
//!     Default::default(),
//! );
//!
//! let actions = handle_event(&mut table, &TableEvent::ToggleFilter("open".into()));
//! assert_eq!(actions[0], TableAction::ApplyFilter(FilterChange::new("open", true)));
//! ```

use super::actions::TableAction;
use super::pagination::PageEvent;
use super::state::DataTable;
use crate::domain::{DateRangePreset, FilterChange, TableRow};

/// Input events understood by the table host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// Flips a quick filter.
    ToggleFilter(String),
    /// Ensures a quick filter is active.
    ActivateFilter(String),
    ClearFilters,
    ChangeDateRange(DateRangePreset),
    /// Paginator navigation or page-size change.
    PageChanged(PageEvent),
    /// Page-size selector; non-positive values are ignored.
    SetPageSize(i64),
    /// Flips the visibility of a column.
    ToggleColumn(String),
    /// Drops all column overrides.
    ResetColumns,
    /// Flips selection of the row with this id.
    ToggleRow(i64),
    /// Selects or clears every row on the current page.
    ToggleAll,
    ClearSelection,
    /// Replaces the free-text search query.
    Search(String),
}

/// Applies `event` to `table` and returns the resulting actions.
///
/// An empty vector means the event changed nothing.
pub fn handle_event<T: TableRow>(table: &mut DataTable<T>, event: &TableEvent) -> Vec<TableAction> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    let mut actions = Vec::new();

    match event {
        TableEvent::ToggleFilter(key) => {
            let change = table.filters_mut().toggle_filter(key);
            actions.push(TableAction::ApplyFilter(change));
            push_first_page(table, &mut actions);
        }
        TableEvent::ActivateFilter(key) => {
            let before = table.filters().active_filters();
            table.filters_mut().activate_filter(key);
            if table.filters().active_filters() == before {
                tracing::debug!(filter_key = %key, "filter already active");
                return actions;
            }
            actions.push(TableAction::ApplyFilter(FilterChange::new(key.as_str(), true)));
            push_first_page(table, &mut actions);
        }
        TableEvent::ClearFilters => {
            if !table.filters().has_active_filters() {
                return actions;
            }
            table.filters_mut().clear_filters();
            actions.push(TableAction::ClearFilters);
            push_first_page(table, &mut actions);
        }
        TableEvent::ChangeDateRange(preset) => {
            let previous = table.filters().selected_date_range();
            let selection = table.filters_mut().change_date_range(*preset);
            match selection {
                Some(selection) => actions.push(TableAction::ApplyDateRange(selection)),
                None if previous == *preset => {
                    tracing::debug!(preset = %preset, "date range unchanged");
                    return actions;
                }
                None => {}
            }
            push_first_page(table, &mut actions);
        }
        TableEvent::PageChanged(page_event) => {
            let change = table.pagination_mut().handle_page_change(*page_event);
            if !change.any() {
                tracing::debug!("page unchanged, skipping fetch");
                return actions;
            }
            actions.push(table.fetch_page_action());
            actions.push(TableAction::Render);
        }
        TableEvent::SetPageSize(size) => {
            let before = table.pagination().page_size();
            table.pagination_mut().set_page_size(*size);
            if table.pagination().page_size() == before {
                return actions;
            }
            actions.push(table.fetch_page_action());
            actions.push(TableAction::Render);
        }
        TableEvent::ToggleColumn(key) => {
            let before = table.columns().overrides();
            table.columns_mut().toggle_column(key);
            if table.columns().overrides() == before {
                return actions;
            }
            save_column_preferences(table, &mut actions);
            actions.push(TableAction::Render);
        }
        TableEvent::ResetColumns => {
            table.columns_mut().reset_overrides();
            save_column_preferences(table, &mut actions);
            actions.push(TableAction::Render);
        }
        TableEvent::ToggleRow(id) => {
            let Some(row) = table.find_row(*id) else {
                tracing::debug!(row_id = *id, "ignoring toggle of unknown row");
                return actions;
            };
            table.selection_mut().toggle(row);
            push_selection_changed(table, &mut actions);
        }
        TableEvent::ToggleAll => {
            let page_rows = table.page_rows();
            if page_rows.is_empty() {
                return actions;
            }
            table.selection_mut().toggle_all(&page_rows);
            push_selection_changed(table, &mut actions);
        }
        TableEvent::ClearSelection => {
            if !table.selection().has_selection() {
                return actions;
            }
            table.selection_mut().clear();
            push_selection_changed(table, &mut actions);
        }
        TableEvent::Search(query) => {
            if !table.set_search_query(query) {
                return actions;
            }
            tracing::trace!(query = %query, "search query updated");
            push_first_page(table, &mut actions);
        }
    }

    actions
}

/// Resets to the first page and asks for it to be loaded and rendered.
fn push_first_page<T: TableRow>(table: &mut DataTable<T>, actions: &mut Vec<TableAction>) {
    table.pagination_mut().reset_to_first_page();
    actions.push(table.fetch_page_action());
    actions.push(TableAction::Render);
}

fn push_selection_changed<T: TableRow>(table: &DataTable<T>, actions: &mut Vec<TableAction>) {
    let count = table.selection().selected_count();
    tracing::debug!(count, "selection changed");
    actions.push(TableAction::SelectionChanged { count });
    actions.push(TableAction::Render);
}

fn save_column_preferences<T: TableRow>(table: &DataTable<T>, actions: &mut Vec<TableAction>) {
    let Some(key) = table.preferences_key() else {
        return;
    };
    if let Err(error) = table.columns().save_preferences(Some(key)) {
        tracing::warn!(error = %error, storage_key = %key, "failed to save column preferences");
        actions.push(TableAction::Notify {
            message: format!("Could not save column preferences: {error}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnDef, QuickFilter, Result, TableError};
    use crate::reactive::Signal;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::table::{DisplayOptions, FilterConfig, PaginationConfig};
    use serde_json::{json, Value};
    use std::rc::Rc;

    struct Item {
        id: i64,
        open: bool,
    }

    impl TableRow for Item {
        fn id(&self) -> i64 {
            self.id
        }

        fn cell(&self, key: &str) -> Value {
            match key {
                "id" => json!(self.id),
                "state" => json!(if self.open { "open" } else { "closed" }),
                _ => Value::Null,
            }
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(TableError::Storage("disk full".into()))
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn table_with(store: Rc<dyn KeyValueStore>, single_selection: bool) -> DataTable<Item> {
        let columns = Signal::new(vec![
            ColumnDef::new("id", "Id"),
            ColumnDef::new("state", "State"),
        ]);
        let filters = FilterConfig {
            filters: vec![
                QuickFilter::new("open", "Open").predicate(|item: &Item| item.open),
                QuickFilter::new("closed", "Closed").predicate(|item: &Item| !item.open),
            ],
            single_selection,
            ..Default::default()
        };
        let mut table = DataTable::new(
            columns,
            filters,
            PaginationConfig {
                page_size_options: vec![2, 5],
                default_page_size: 2,
            },
            store,
            DisplayOptions::default(),
        )
        .with_preferences_key("items.columns");
        let rows = (1..=5).map(|id| Rc::new(Item { id, open: id % 2 == 1 })).collect();
        table.set_rows(rows, None);
        table
    }

    fn table() -> DataTable<Item> {
        table_with(Rc::new(MemoryStore::new()), false)
    }

    fn fetch(page_index: usize, page_size: usize) -> TableAction {
        TableAction::FetchPage { page_index, page_size }
    }

    #[test]
    fn toggle_filter_resets_page_and_relays_change() {
        let mut table = table();
        table.pagination_mut().set_page_index(2);

        let actions = handle_event(&mut table, &TableEvent::ToggleFilter("open".into()));

        assert_eq!(
            actions,
            vec![
                TableAction::ApplyFilter(FilterChange::new("open", true)),
                fetch(0, 2),
                TableAction::Render,
            ]
        );
        assert_eq!(table.pagination().page_index(), 0);
    }

    #[test]
    fn activate_filter_is_idempotent() {
        let mut table = table();
        let first = handle_event(&mut table, &TableEvent::ActivateFilter("open".into()));
        assert_eq!(first.len(), 3);

        let second = handle_event(&mut table, &TableEvent::ActivateFilter("open".into()));
        assert!(second.is_empty());
    }

    #[test]
    fn single_selection_activation_replaces_filter() {
        let mut table = table_with(Rc::new(MemoryStore::new()), true);
        let init = table.initialize();
        assert_eq!(init[0], TableAction::ApplyFilter(FilterChange::new("open", true)));

        let actions = handle_event(&mut table, &TableEvent::ActivateFilter("closed".into()));
        assert_eq!(actions[0], TableAction::ApplyFilter(FilterChange::new("closed", true)));
        assert_eq!(table.filters().active_filters(), vec!["closed".to_string()]);
    }

    #[test]
    fn clear_filters_only_when_something_is_active() {
        let mut table = table();
        assert!(handle_event(&mut table, &TableEvent::ClearFilters).is_empty());

        handle_event(&mut table, &TableEvent::ToggleFilter("open".into()));
        let actions = handle_event(&mut table, &TableEvent::ClearFilters);
        assert_eq!(actions[0], TableAction::ClearFilters);
    }

    #[test]
    fn page_events() {
        let mut table = table();
        let unchanged = PageEvent { page_index: 0, page_size: 2 };
        assert!(handle_event(&mut table, &TableEvent::PageChanged(unchanged)).is_empty());

        let next = PageEvent { page_index: 1, page_size: 2 };
        let actions = handle_event(&mut table, &TableEvent::PageChanged(next));
        assert_eq!(actions, vec![fetch(1, 2), TableAction::Render]);

        let actions = handle_event(&mut table, &TableEvent::SetPageSize(5));
        assert_eq!(actions, vec![fetch(0, 5), TableAction::Render]);
        assert!(handle_event(&mut table, &TableEvent::SetPageSize(-1)).is_empty());
    }

    #[test]
    fn column_toggle_persists_preferences() {
        let store = Rc::new(MemoryStore::new());
        let mut table = table_with(store.clone(), false);

        let actions = handle_event(&mut table, &TableEvent::ToggleColumn("state".into()));

        assert_eq!(actions, vec![TableAction::Render]);
        assert!(!table.columns().is_column_visible("state"));
        let saved = store.get_item("items.columns").ok().flatten();
        assert_eq!(saved.as_deref(), Some(r#"{"state":false}"#));
    }

    #[test]
    fn unknown_column_toggle_changes_nothing() {
        let store = Rc::new(MemoryStore::new());
        let mut table = table_with(store.clone(), false);

        let actions = handle_event(&mut table, &TableEvent::ToggleColumn("missing".into()));

        assert!(actions.is_empty());
        assert!(table.columns().overrides().is_empty());
        assert_eq!(store.get_item("items.columns").ok().flatten(), None);
    }

    #[test]
    fn same_date_range_keeps_the_page() {
        let mut table = table();
        table.pagination_mut().set_page_index(1);

        let actions = handle_event(
            &mut table,
            &TableEvent::ChangeDateRange(DateRangePreset::Last24Hours),
        );
        assert!(actions.is_empty());
        assert_eq!(table.pagination().page_index(), 1);

        let actions = handle_event(&mut table, &TableEvent::ChangeDateRange(DateRangePreset::All));
        assert_eq!(actions, vec![fetch(0, 2), TableAction::Render]);
        assert_eq!(table.filters().selected_date_range(), DateRangePreset::All);
    }

    #[test]
    fn failing_store_surfaces_notify() {
        let mut table = table_with(Rc::new(FailingStore), false);

        let actions = handle_event(&mut table, &TableEvent::ToggleColumn("state".into()));

        assert!(matches!(actions[0], TableAction::Notify { .. }));
        assert_eq!(actions[1], TableAction::Render);
        assert!(!table.columns().is_column_visible("state"));
    }

    #[test]
    fn row_selection_events() {
        let mut table = table();
        let actions = handle_event(&mut table, &TableEvent::ToggleRow(3));
        assert_eq!(actions[0], TableAction::SelectionChanged { count: 1 });
        assert!(handle_event(&mut table, &TableEvent::ToggleRow(42)).is_empty());

        // Page one holds rows 1 and 2; toggling all keeps row 3 selected.
        let actions = handle_event(&mut table, &TableEvent::ToggleAll);
        assert_eq!(actions[0], TableAction::SelectionChanged { count: 3 });

        let actions = handle_event(&mut table, &TableEvent::ToggleAll);
        assert_eq!(actions[0], TableAction::SelectionChanged { count: 0 });
        assert!(handle_event(&mut table, &TableEvent::ClearSelection).is_empty());
    }

    #[test]
    fn search_narrows_rows_and_resets_page() {
        let mut table = table();
        table.pagination_mut().set_page_index(1);

        let actions = handle_event(&mut table, &TableEvent::Search("closed".into()));

        assert_eq!(actions, vec![fetch(0, 2), TableAction::Render]);
        let ids: Vec<i64> = table.filtered_rows().iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(handle_event(&mut table, &TableEvent::Search("closed".into())).is_empty());
    }
}
