//! Quick filter definitions and filter change descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Client-side row predicate attached to a quick filter.
pub type FilterPredicate<T> = Rc<dyn Fn(&T) -> bool>;

/// A named, togglable shortcut for narrowing the displayed rows.
///
/// Filters without a predicate are server-side filters: toggling them only
/// produces a [`FilterChange`] for the host to relay.
pub struct QuickFilter<T> {
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
    pub predicate: Option<FilterPredicate<T>>,
}

impl<T> QuickFilter<T> {
    /// Creates a server-side filter with no icon.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            icon: None,
            predicate: None,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Attaches a client-side predicate.
    #[must_use]
    pub fn predicate(mut self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        self.predicate = Some(Rc::new(predicate));
        self
    }

    /// Evaluates the predicate; filters without one accept every row.
    #[must_use]
    pub fn matches(&self, row: &T) -> bool {
        self.predicate.as_ref().map_or(true, |p| p(row))
    }
}

impl<T> Clone for QuickFilter<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            icon: self.icon.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> fmt::Debug for QuickFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuickFilter")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

/// Change descriptor returned by filter toggles.
///
/// Serializes as `{"filterKey": "...", "active": true}` for relaying to a
/// server-side query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterChange {
    pub filter_key: String,
    pub active: bool,
}

impl FilterChange {
    pub fn new(filter_key: impl Into<String>, active: bool) -> Self {
        Self {
            filter_key: filter_key.into(),
            active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_without_predicate_matches_everything() {
        let filter = QuickFilter::<i32>::new("all", "All");
        assert!(filter.matches(&-4));
        assert!(filter.matches(&10));
    }

    #[test]
    fn predicate_is_applied() {
        let filter = QuickFilter::<i32>::new("positive", "Positive").predicate(|n| *n > 0);
        assert!(filter.matches(&3));
        assert!(!filter.matches(&0));
    }

    #[test]
    fn filter_change_serializes_camel_case() {
        let change = FilterChange::new("errors", true);
        let json = serde_json::to_string(&change).unwrap();
        assert_eq!(json, r#"{"filterKey":"errors","active":true}"#);
    }
}
