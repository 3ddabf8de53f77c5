//! Column definitions for data tables.
//!
//! A [`ColumnDef`] describes one column of a table: its key, header label,
//! whether it can be sorted, whether it is shown by default, and how its cells are
//! formatted. Definitions are supplied by the host and never mutated by the
//! managers; the only runtime state about columns is the visibility override map
//! owned by [`crate::table::ColumnVisibilityManager`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Synthetic display key for the leading checkbox column.
pub const SELECT_COLUMN_KEY: &str = "select";

/// Synthetic display key for the trailing row-actions column.
pub const ACTIONS_COLUMN_KEY: &str = "actions";

/// Maps a cell value (and the whole row) to display text.
pub type CellFormatter<T> = Rc<dyn Fn(&Value, &T) -> String>;

/// Maps a cell value (and the whole row) to a badge colour.
pub type BadgeColorFn<T> = Rc<dyn Fn(&Value, &T) -> BadgeColor>;

/// How a column's cells are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Plain text (default).
    #[default]
    Text,
    /// Timestamp rendered as a date.
    Date,
    /// Short status value rendered as a coloured badge.
    Badge,
    /// Per-row action buttons; carries no cell text.
    Actions,
}

/// Colour tag for badge cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    #[default]
    Neutral,
    Primary,
    Success,
    Warning,
    Danger,
}

impl BadgeColor {
    /// Lowercase tag, as used in stylesheets and serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Primary => "primary",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// Describes one column of a table over rows of type `T`.
///
/// # Examples
///
/// ```
/// use tablestate::domain::{BadgeColor, ColumnDef, ColumnType};
///
/// struct User;
///
/// let status = ColumnDef::<User>::new("status", "Status")
///     .column_type(ColumnType::Badge)
///     .badge_color(|value, _| {
///         if value == "active" { BadgeColor::Success } else { BadgeColor::Neutral }
///     });
/// let email = ColumnDef::<User>::new("email", "Email").hidden();
///
/// assert!(status.visible);
/// assert!(!email.visible);
/// ```
pub struct ColumnDef<T> {
    /// Unique key within the table; also the cell lookup key.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Whether the header offers sorting.
    pub sortable: bool,
    /// Default visibility, used when no override exists.
    pub visible: bool,
    /// Rendering hint for the cell.
    pub column_type: ColumnType,
    /// Custom cell text.
    pub formatter: Option<CellFormatter<T>>,
    /// Custom badge colour for [`ColumnType::Badge`] columns.
    pub badge_color: Option<BadgeColorFn<T>>,
}

impl<T> ColumnDef<T> {
    /// Creates a visible, sortable text column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            visible: true,
            column_type: ColumnType::Text,
            formatter: None,
            badge_color: None,
        }
    }

    #[must_use]
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Hides the column unless the user turns it on.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    #[must_use]
    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: impl Fn(&Value, &T) -> String + 'static) -> Self {
        self.formatter = Some(Rc::new(formatter));
        self
    }

    #[must_use]
    pub fn badge_color(mut self, badge_color: impl Fn(&Value, &T) -> BadgeColor + 'static) -> Self {
        self.badge_color = Some(Rc::new(badge_color));
        self
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            visible: self.visible,
            column_type: self.column_type,
            formatter: self.formatter.clone(),
            badge_color: self.badge_color.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("visible", &self.visible)
            .field("column_type", &self.column_type)
            .field("formatter", &self.formatter.is_some())
            .field("badge_color", &self.badge_color.is_some())
            .finish()
    }
}
