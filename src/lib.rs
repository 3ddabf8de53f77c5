//! tablestate: state management for interactive data tables.
//!
//! The crate keeps the UI-facing state of a paginated, filterable, selectable
//! table independent of any rendering toolkit:
//! - Column visibility with per-user overrides persisted to a key/value store
//! - Quick filters (single- or multi-selection) and a date range selector
//! - Page index and page size tracking
//! - Multi-row selection with bulk "select all" semantics
//! - A host, [`DataTable`], that composes the four and relays changes to the
//!   caller as [`TableAction`]s
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Demo REPL (main.rs)                                │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Table Layer (table/)                               │  ← Host + managers
//! │  - Event handling                                   │
//! │  - Action relaying                                  │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Reactive      │
//! │ (ui/)         │   │ (storage/)    │   │ (reactive/)   │
//! │ - View models │   │ - JSON file   │   │ - Signals     │
//! │ - Formatting  │   │ - In-memory   │   │ - Computed    │
//! │ - Rendering   │   │ - Backend API │   │ - Emitters    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data paths (infrastructure/)                     │
//! │  - Error types (domain/error)                       │
//! │  - Rows, columns, filters, date ranges (domain/)    │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing-subscriber setup                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Rows, column definitions, quick filters, date ranges, errors
//! - [`reactive`]: Single-threaded signals, memoised derived values, emitters
//! - [`storage`]: Key/value stores for persisted preferences
//! - [`table`]: The four managers, the [`DataTable`] host and its events
//! - [`ui`]: View models, cell formatting and a plain-text renderer
//! - [`infrastructure`]: Data directory and path helpers
//! - [`observability`]: Tracing subscriber setup
//!
//! # Configuration
//!
//! Tables can be configured from TOML:
//!
//! ```toml
//! page_size_options = [10, 25, 50]
//! default_page_size = 25
//! single_selection = true
//! enable_date_range = true
//! default_date_range = "7d"
//! preferences_key = "users.columns"
//! preferences_file = "~/.local/share/tablestate/preferences.json"
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use tablestate::domain::{ColumnDef, QuickFilter, TableRow};
//! use tablestate::reactive::Signal;
//! use tablestate::storage::MemoryStore;
//! use tablestate::table::{handle_event, TableEvent};
//! use tablestate::{Config, DataTable};
//!
//! struct Ticket { id: i64, open: bool }
//!
//! impl TableRow for Ticket {
//!     fn id(&self) -> i64 { self.id }
//!     fn cell(&self, key: &str) -> serde_json::Value {
//!         match key {
//!             "id" => self.id.into(),
//!             "open" => self.open.into(),
//!             _ => serde_json::Value::Null,
//!         }
//!     }
//! }
//!
//! let config = Config::from_toml_str("default_page_size = 10\npage_size_options = [10, 20]")?;
//! let columns = Signal::new(vec![ColumnDef::new("id", "Id"), ColumnDef::new("open", "Open")]);
//! let filters = vec![QuickFilter::new("open", "Open").predicate(|t: &Ticket| t.open)];
//!
//! let mut table = DataTable::from_config(&config, columns, filters, Rc::new(MemoryStore::new()));
//! table.set_rows((1..=30).map(|id| Rc::new(Ticket { id, open: id % 3 == 0 })).collect(), None);
//!
//! handle_event(&mut table, &TableEvent::ToggleFilter("open".into()));
//! assert_eq!(table.total_count(), 10);
//! # Ok::<(), tablestate::TableError>(())
//! ```

pub mod domain;
pub mod infrastructure;
pub mod reactive;
pub mod storage;
pub mod table;

pub mod ui;

pub mod observability;

pub use domain::{Result, TableError};
pub use table::{handle_event, DataTable, TableAction, TableEvent};

use domain::DateRangePreset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use table::pagination::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS};
use table::{DisplayOptions, PaginationConfig};

/// Table configuration, loadable from TOML or a string map.
///
/// Every field has a default, so an empty document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sizes offered by the page-size selector. Default: `[10, 25, 50, 100]`
    pub page_size_options: Vec<usize>,

    /// Initial page size. Default: 50
    pub default_page_size: usize,

    /// Activating a quick filter deactivates the others. Default: `false`
    pub single_selection: bool,

    /// Offer the date range selector. Default: `false`
    pub enable_date_range: bool,

    /// Initially selected date range. Default: `"24h"`
    pub default_date_range: DateRangePreset,

    /// Store key for column preferences; `None` disables persistence.
    pub preferences_key: Option<String>,

    /// JSON preferences file. `~` is expanded. Default: see
    /// [`infrastructure::default_preferences_file`].
    pub preferences_file: Option<String>,

    /// Show the row selection column. Default: `true`
    pub selectable: bool,

    /// Show the row actions column. Default: `false`
    pub has_row_actions: bool,

    /// Log level for [`observability::init_tracing`].
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            default_page_size: DEFAULT_PAGE_SIZE,
            single_selection: false,
            enable_date_range: false,
            default_date_range: DateRangePreset::default(),
            preferences_key: None,
            preferences_file: None,
            selectable: true,
            has_row_actions: false,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat string map, such as element attributes
    /// or command-line `key=value` pairs.
    ///
    /// # Parsing Rules
    ///
    /// - `page_size_options`: comma-separated positive integers
    /// - `default_page_size`: positive integer
    /// - `single_selection`, `enable_date_range`, `selectable`,
    ///   `has_row_actions`: `true`/`false`
    /// - `default_date_range`: `24h`, `7d`, `30d` or `all`
    /// - `preferences_key`, `preferences_file`, `trace_level`: taken as-is
    ///
    /// Missing or unparsable values fall back to their defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use tablestate::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size_options".to_string(), "5, 10".to_string());
    /// map.insert("default_page_size".to_string(), "abc".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size_options, vec![5, 10]);
    /// assert_eq!(config.default_page_size, 50);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let page_size_options = map
            .get("page_size_options")
            .and_then(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(|p| p.parse::<usize>().ok().filter(|n| *n > 0))
                    .collect::<Option<Vec<_>>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.page_size_options);

        let default_page_size = map
            .get("default_page_size")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.default_page_size);

        let flag = |key: &str, default: bool| {
            map.get(key)
                .and_then(|s| s.trim().parse::<bool>().ok())
                .unwrap_or(default)
        };
        let text = |key: &str| {
            map.get(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            page_size_options,
            default_page_size,
            single_selection: flag("single_selection", defaults.single_selection),
            enable_date_range: flag("enable_date_range", defaults.enable_date_range),
            default_date_range: map
                .get("default_date_range")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_date_range),
            preferences_key: text("preferences_key"),
            preferences_file: text("preferences_file"),
            selectable: flag("selectable", defaults.selectable),
            has_row_actions: flag("has_row_actions", defaults.has_row_actions),
            trace_level: text("trace_level"),
        }
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be read, and
    /// [`TableError::Config`] if it does not parse or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let _span = tracing::debug_span!("load_config", path = %path.display()).entered();

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("configuration loaded");
        Ok(config)
    }

    /// Parses and validates configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Config`] on a parse error, an empty
    /// `page_size_options`, or a zero page size.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| TableError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.page_size_options.is_empty() {
            return Err(TableError::Config(
                "page_size_options must not be empty".to_string(),
            ));
        }
        if self.page_size_options.contains(&0) {
            return Err(TableError::Config(
                "page_size_options must be positive".to_string(),
            ));
        }
        if self.default_page_size == 0 {
            return Err(TableError::Config(
                "default_page_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig {
            page_size_options: self.page_size_options.clone(),
            default_page_size: self.default_page_size,
        }
    }

    #[must_use]
    pub const fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            selectable: self.selectable,
            has_row_actions: self.has_row_actions,
        }
    }

    /// Preferences file location with `~` expanded, or the default location.
    #[must_use]
    pub fn preferences_path(&self) -> PathBuf {
        self.preferences_file.as_deref().map_or_else(
            infrastructure::default_preferences_file,
            infrastructure::expand_tilde,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = Config::from_toml_str("").expect("empty config parses");
        assert_eq!(config, Config::default());
        assert!(config.selectable);
        assert_eq!(config.default_date_range, DateRangePreset::Last24Hours);
    }

    #[test]
    fn toml_fields() {
        let config = Config::from_toml_str(
            r#"
            page_size_options = [5, 15]
            default_page_size = 15
            single_selection = true
            enable_date_range = true
            default_date_range = "30d"
            preferences_key = "audit.columns"
            has_row_actions = true
            "#,
        )
        .expect("config parses");

        assert_eq!(config.pagination().page_size_options, vec![5, 15]);
        assert_eq!(config.pagination().default_page_size, 15);
        assert!(config.single_selection);
        assert_eq!(config.default_date_range, DateRangePreset::Last30Days);
        assert_eq!(config.preferences_key.as_deref(), Some("audit.columns"));
        assert_eq!(
            config.display_options(),
            DisplayOptions { selectable: true, has_row_actions: true }
        );
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = Config::from_toml_str("default_page_size = \"many\"").unwrap_err();
        assert!(matches!(err, TableError::Config(_)));

        let err = Config::from_toml_str("page_size_options = []").unwrap_err();
        assert!(matches!(err, TableError::Config(_)));

        let err = Config::from_toml_str("default_page_size = 0").unwrap_err();
        assert!(matches!(err, TableError::Config(_)));

        let err = Config::from_toml_str("default_date_range = \"1y\"").unwrap_err();
        assert!(matches!(err, TableError::Config(_)));
    }

    #[test]
    fn map_values_fall_back_on_parse_errors() {
        let map: BTreeMap<String, String> = [
            ("page_size_options", "10, x"),
            ("default_page_size", "0"),
            ("single_selection", "true"),
            ("selectable", "nope"),
            ("default_date_range", " 7d "),
            ("preferences_key", "  "),
            ("trace_level", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_map(&map);

        assert_eq!(config.page_size_options, vec![10, 25, 50, 100]);
        assert_eq!(config.default_page_size, 50);
        assert!(config.single_selection);
        assert!(config.selectable);
        assert_eq!(config.default_date_range, DateRangePreset::Last7Days);
        assert_eq!(config.preferences_key, None);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::from_file("/nonexistent/tablestate.toml").unwrap_err();
        assert!(matches!(err, TableError::Io(_)));
    }

    #[test]
    fn preferences_path_prefers_configured_file() {
        let config = Config {
            preferences_file: Some("/tmp/prefs.json".to_string()),
            ..Config::default()
        };
        assert_eq!(config.preferences_path(), PathBuf::from("/tmp/prefs.json"));
        assert!(Config::default().preferences_path().ends_with("preferences.json"));
    }
}
