//! Column visibility with persisted user overrides.

use crate::domain::column::{ColumnDef, ACTIONS_COLUMN_KEY, SELECT_COLUMN_KEY};
use crate::domain::error::Result;
use crate::reactive::{Computed, Signal};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Which synthetic columns surround the data columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Prepend the `"select"` checkbox column.
    pub selectable: bool,
    /// Append the `"actions"` column.
    pub has_row_actions: bool,
}

/// Resolves effective column visibility from definitions plus overrides.
///
/// Effective visibility of a column is its override when one exists, otherwise
/// the definition's `visible` default. Overrides can be saved to and loaded from
/// a [`KeyValueStore`] as a flat JSON object of key to bool.
pub struct ColumnVisibilityManager<T> {
    columns: Signal<Vec<ColumnDef<T>>>,
    overrides: Signal<BTreeMap<String, bool>>,
    visible: Computed<Vec<ColumnDef<T>>>,
    store: Rc<dyn KeyValueStore>,
}

fn effective<T>(column: &ColumnDef<T>, overrides: &BTreeMap<String, bool>) -> bool {
    overrides.get(&column.key).copied().unwrap_or(column.visible)
}

impl<T: 'static> ColumnVisibilityManager<T> {
    /// Creates a manager over an externally owned column list.
    ///
    /// `columns` may be updated by its owner at any time; the visible column
    /// list follows on its next read.
    pub fn new(columns: Signal<Vec<ColumnDef<T>>>, store: Rc<dyn KeyValueStore>) -> Self {
        let overrides: Signal<BTreeMap<String, bool>> = Signal::new(BTreeMap::new());

        let defs = columns.clone();
        let current = overrides.clone();
        let visible = Computed::new(vec![columns.as_source(), overrides.as_source()], move || {
            defs.with(|defs| {
                current.with(|overrides| {
                    defs.iter()
                        .filter(|column| effective(column, overrides))
                        .cloned()
                        .collect()
                })
            })
        });

        Self {
            columns,
            overrides,
            visible,
            store,
        }
    }

    /// Visible column definitions in definition order.
    #[must_use]
    pub fn visible_columns(&self) -> Vec<ColumnDef<T>> {
        self.visible.get()
    }

    /// Reactive handle to the visible column list.
    #[must_use]
    pub fn visible_columns_signal(&self) -> &Computed<Vec<ColumnDef<T>>> {
        &self.visible
    }

    /// Display keys: optional `"select"`, visible column keys, optional `"actions"`.
    #[must_use]
    pub fn displayed_columns(&self, options: DisplayOptions) -> Vec<String> {
        let mut keys = Vec::new();
        if options.selectable {
            keys.push(SELECT_COLUMN_KEY.to_string());
        }
        self.visible
            .with(|columns| keys.extend(columns.iter().map(|column| column.key.clone())));
        if options.has_row_actions {
            keys.push(ACTIONS_COLUMN_KEY.to_string());
        }
        keys
    }

    /// Effective visibility of `key`; unknown keys count as visible.
    #[must_use]
    pub fn is_column_visible(&self, key: &str) -> bool {
        self.columns.with(|defs| {
            defs.iter()
                .find(|column| column.key == key)
                .map_or(true, |column| self.overrides.with(|o| effective(column, o)))
        })
    }

    /// Flips the effective visibility of `key` and records it as an override.
    ///
    /// Unknown keys are ignored.
    pub fn toggle_column(&mut self, key: &str) {
        let Some(next) = self.columns.with(|defs| {
            defs.iter()
                .find(|column| column.key == key)
                .map(|column| !self.overrides.with(|o| effective(column, o)))
        }) else {
            tracing::trace!(key = %key, "ignoring toggle of unknown column");
            return;
        };

        self.overrides.update(|overrides| {
            overrides.insert(key.to_string(), next);
        });
        tracing::debug!(key = %key, visible = next, "column visibility toggled");
    }

    /// Drops every override, returning all columns to their defaults.
    pub fn reset_overrides(&mut self) {
        self.overrides.update_if(|overrides| {
            let had_any = !overrides.is_empty();
            overrides.clear();
            had_any
        });
    }

    /// Replaces overrides with the map stored under `storage_key`.
    ///
    /// A `None` or empty key does nothing. A missing entry, unreadable store,
    /// or anything other than a JSON object of booleans leaves the current
    /// overrides untouched. Entries for keys with no matching column are kept
    /// but have no effect.
    pub fn load_preferences(&mut self, storage_key: Option<&str>) {
        let Some(storage_key) = storage_key.filter(|k| !k.is_empty()) else {
            return;
        };

        let raw = match self.store.get_item(storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::trace!(storage_key = %storage_key, "no stored column preferences");
                return;
            }
            Err(e) => {
                tracing::debug!(storage_key = %storage_key, error = %e, "column preferences unreadable");
                return;
            }
        };

        match serde_json::from_str::<BTreeMap<String, bool>>(&raw) {
            Ok(loaded) => {
                tracing::debug!(storage_key = %storage_key, count = loaded.len(), "column preferences loaded");
                self.overrides.set(loaded);
            }
            Err(e) => {
                tracing::debug!(storage_key = %storage_key, error = %e, "ignoring malformed column preferences");
            }
        }
    }

    /// Writes the current overrides under `storage_key`, replacing any prior value.
    ///
    /// A `None` or empty key does nothing.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write fails.
    pub fn save_preferences(&self, storage_key: Option<&str>) -> Result<()> {
        let Some(storage_key) = storage_key.filter(|k| !k.is_empty()) else {
            return Ok(());
        };

        let json = self.overrides.with(serde_json::to_string)?;
        self.store.set_item(storage_key, &json)
    }

    /// Current overrides.
    #[must_use]
    pub fn overrides(&self) -> BTreeMap<String, bool> {
        self.overrides.get()
    }

    /// The upstream column definitions.
    #[must_use]
    pub fn columns(&self) -> &Signal<Vec<ColumnDef<T>>> {
        &self.columns
    }
}

impl<T> fmt::Debug for ColumnVisibilityManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnVisibilityManager")
            .field("overrides", &self.overrides)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}
