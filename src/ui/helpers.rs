//! Cell formatting and text utilities shared by the view model and renderer.
//!
//! # Formatting Rules
//!
//! - A column's own formatter always wins
//! - `Actions` columns carry no text
//! - `Date` columns render RFC 3339 strings or unix seconds as `%Y-%m-%d %H:%M` (UTC)
//! - Everything else: strings as-is, numbers via `to_string`, booleans as `Yes`/`No`,
//!   null as `-`

use crate::domain::{BadgeColor, ColumnDef, ColumnType, TableRow};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Display format for date cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Placeholder for empty cells.
pub const EMPTY_CELL: &str = "-";

/// Display text for `column` in `row`.
#[must_use]
pub fn cell_text<T: TableRow>(column: &ColumnDef<T>, row: &T) -> String {
    let value = row.cell(&column.key);
    if let Some(formatter) = &column.formatter {
        return formatter(&value, row);
    }
    match column.column_type {
        ColumnType::Actions => String::new(),
        ColumnType::Date => format_date(&value),
        ColumnType::Text | ColumnType::Badge => format_value(&value),
    }
}

/// Badge colour for `column` in `row`; `None` unless the column is a badge column.
#[must_use]
pub fn cell_badge<T: TableRow>(column: &ColumnDef<T>, row: &T) -> Option<BadgeColor> {
    if column.column_type != ColumnType::Badge {
        return None;
    }
    let color = column.badge_color.as_ref().map_or(BadgeColor::Neutral, |badge_color| {
        badge_color(&row.cell(&column.key), row)
    });
    Some(color)
}

/// Generic text for a JSON cell value.
#[must_use]
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_CELL.to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Date text for a JSON cell value; unparsable values fall back to [`format_value`].
#[must_use]
pub fn format_date(value: &Value) -> String {
    let parsed = match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        _ => None,
    };

    parsed.map_or_else(|| format_value(value), |dt| dt.format(DATE_FORMAT).to_string())
}

/// Truncates `text` to `width` characters, marking the cut with `...`.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let kept: String = text.chars().take(width - 3).collect();
    format!("{kept}...")
}

/// Collapses consecutive character indices into `(start, end)` ranges, end exclusive.
#[must_use]
pub fn coalesce_indices(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}
