//! Row abstraction consumed by every table component.
//!
//! Rows are opaque to the managers. The only things the table layer needs from a
//! row are a stable integer id (used by the host to resolve click events) and a
//! way to read a cell value by column key for formatting and search.

use serde::Serialize;
use serde_json::Value;

/// A record that can be displayed in a data table.
///
/// Rows are supplied by the host on every data load and are shared as `Rc<T>`;
/// selection compares rows by reference, never by [`TableRow::id`].
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use tablestate::domain::{serialized_cell, TableRow};
///
/// #[derive(Serialize)]
/// struct User {
///     id: i64,
///     email: String,
/// }
///
/// impl TableRow for User {
///     fn id(&self) -> i64 {
///         self.id
///     }
///
///     fn cell(&self, key: &str) -> serde_json::Value {
///         serialized_cell(self, key)
///     }
/// }
///
/// let user = User { id: 7, email: "ada@example.com".into() };
/// assert_eq!(user.cell("email"), "ada@example.com");
/// assert!(user.cell("missing").is_null());
/// ```
pub trait TableRow: 'static {
    /// Integer identity of the row.
    fn id(&self) -> i64;

    /// Raw value of the cell under `key`, or `Value::Null` when absent.
    fn cell(&self, key: &str) -> Value;
}

/// Reads a field of a serializable row as a JSON value.
///
/// Serializes the row and looks up `key` on the resulting object. Returns
/// `Value::Null` when serialization fails, the row is not an object, or the key
/// is absent.
#[must_use]
pub fn serialized_cell<R: Serialize + ?Sized>(row: &R, key: &str) -> Value {
    match serde_json::to_value(row) {
        Ok(Value::Object(mut fields)) => fields.remove(key).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
