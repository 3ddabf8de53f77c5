//! Quick filters and the date-range filter.

use crate::domain::date_range::{DateRangeCalculator, DateRangePreset, DateRangeSelection};
use crate::domain::filter::{FilterChange, QuickFilter};
use crate::reactive::{Computed, Signal};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Construction-time filter settings. Not mutable after construction.
pub struct FilterConfig<T> {
    /// Quick filter definitions, in chip order. Default empty.
    pub filters: Vec<QuickFilter<T>>,
    /// Activating one filter deactivates the others. Default `false`.
    pub single_selection: bool,
    /// Whether the date-range selector is offered. Default `false`.
    pub enable_date_range: bool,
    /// Initially selected range. Default `24h`.
    pub default_date_range: DateRangePreset,
    /// Turns presets into concrete bounds. Default `None`.
    pub date_calculator: Option<Rc<dyn DateRangeCalculator>>,
}

impl<T> Default for FilterConfig<T> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            single_selection: false,
            enable_date_range: false,
            default_date_range: DateRangePreset::default(),
            date_calculator: None,
        }
    }
}

impl<T> fmt::Debug for FilterConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterConfig")
            .field("filters", &self.filters)
            .field("single_selection", &self.single_selection)
            .field("enable_date_range", &self.enable_date_range)
            .field("default_date_range", &self.default_date_range)
            .field("date_calculator", &self.date_calculator.is_some())
            .finish()
    }
}

/// Tracks active quick filters and the selected date range.
///
/// Keys are plain strings and are not checked against the definitions, so a
/// host may toggle server-side filters it never declared.
///
/// # Examples
///
/// ```
/// use tablestate::domain::{FilterChange, QuickFilter};
/// use tablestate::table::{FilterConfig, FilterManager};
///
/// let mut filters = FilterManager::<()>::new(FilterConfig {
///     filters: vec![QuickFilter::new("active", "Active"), QuickFilter::new("locked", "Locked")],
///     single_selection: true,
///     ..Default::default()
/// });
///
/// assert_eq!(filters.initialize_first_filter(), Some(FilterChange::new("active", true)));
/// filters.toggle_filter("locked");
/// assert!(!filters.is_filter_active("active"));
/// assert!(filters.is_filter_active("locked"));
/// ```
pub struct FilterManager<T> {
    filters: Vec<QuickFilter<T>>,
    single_selection: bool,
    enable_date_range: bool,
    date_calculator: Option<Rc<dyn DateRangeCalculator>>,
    active: Signal<BTreeSet<String>>,
    date_range: Signal<DateRangePreset>,
    date_range_icon: Computed<&'static str>,
    date_range_label: Computed<&'static str>,
}

impl<T: 'static> FilterManager<T> {
    #[must_use]
    pub fn new(config: FilterConfig<T>) -> Self {
        let date_range = Signal::new(config.default_date_range);

        let reader = date_range.clone();
        let date_range_icon = Computed::new(vec![date_range.as_source()], move || reader.get().icon());
        let reader = date_range.clone();
        let date_range_label = Computed::new(vec![date_range.as_source()], move || reader.get().label());

        Self {
            filters: config.filters,
            single_selection: config.single_selection,
            enable_date_range: config.enable_date_range,
            date_calculator: config.date_calculator,
            active: Signal::new(BTreeSet::new()),
            date_range,
            date_range_icon,
            date_range_label,
        }
    }

    /// Flips `key` and reports its new state.
    ///
    /// In single-selection mode activating a key evicts any other active key, and
    /// toggling the active key leaves no filter active.
    pub fn toggle_filter(&mut self, key: &str) -> FilterChange {
        let active = !self.is_filter_active(key);
        let single = self.single_selection;

        self.active.update(|set| {
            if active {
                if single {
                    set.clear();
                }
                set.insert(key.to_string());
            } else {
                set.remove(key);
            }
        });

        tracing::debug!(filter_key = %key, active, "filter toggled");
        FilterChange::new(key, active)
    }

    /// Ensures `key` is active. Idempotent.
    pub fn activate_filter(&mut self, key: &str) {
        let single = self.single_selection;
        self.active.update_if(|set| {
            if set.contains(key) && (!single || set.len() == 1) {
                return false;
            }
            if single {
                set.clear();
            }
            set.insert(key.to_string());
            true
        });
    }

    #[must_use]
    pub fn is_filter_active(&self, key: &str) -> bool {
        self.active.with(|set| set.contains(key))
    }

    pub fn clear_filters(&mut self) {
        self.active.update_if(|set| {
            let had_any = !set.is_empty();
            set.clear();
            had_any
        });
    }

    /// Activates the first defined filter when nothing is active yet.
    ///
    /// Only meaningful in single-selection mode; returns `None` in multi mode,
    /// with no definitions, or when a filter is already active. Safe to call more
    /// than once.
    pub fn initialize_first_filter(&mut self) -> Option<FilterChange> {
        if !self.single_selection || self.has_active_filters() {
            return None;
        }
        let key = self.filters.first()?.key.clone();
        self.activate_filter(&key);
        Some(FilterChange::new(key, true))
    }

    /// Selects `preset` and, when a calculator is configured, returns its bounds.
    ///
    /// The selection is updated either way. Without a calculator the caller
    /// cannot derive concrete bounds and gets `None`.
    pub fn change_date_range(&mut self, preset: DateRangePreset) -> Option<DateRangeSelection> {
        if self.date_range.get() != preset {
            self.date_range.set(preset);
        }
        tracing::debug!(preset = %preset, "date range changed");

        let calculator = self.date_calculator.as_ref()?;
        let range = calculator.compute(preset, chrono::Utc::now());
        Some(DateRangeSelection {
            start_date: range.start,
            end_date: range.end,
            preset,
        })
    }

    #[must_use]
    pub fn selected_date_range(&self) -> DateRangePreset {
        self.date_range.get()
    }

    /// Icon for the selected date range.
    #[must_use]
    pub fn date_range_icon(&self) -> &'static str {
        self.date_range_icon.get()
    }

    /// Label for the selected date range.
    #[must_use]
    pub fn date_range_label(&self) -> &'static str {
        self.date_range_label.get()
    }

    /// Active keys in sorted order.
    #[must_use]
    pub fn active_filters(&self) -> Vec<String> {
        self.active.with(|set| set.iter().cloned().collect())
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.active.with(|set| !set.is_empty())
    }

    /// Reactive handle to the active key set.
    #[must_use]
    pub fn active_signal(&self) -> &Signal<BTreeSet<String>> {
        &self.active
    }

    #[must_use]
    pub fn filters(&self) -> &[QuickFilter<T>] {
        &self.filters
    }

    #[must_use]
    pub const fn is_single_selection(&self) -> bool {
        self.single_selection
    }

    #[must_use]
    pub const fn date_range_enabled(&self) -> bool {
        self.enable_date_range
    }

    /// Whether `row` passes every active filter that carries a predicate.
    ///
    /// Active keys without a predicate, or without a definition, are
    /// server-side filters and never exclude a row here.
    #[must_use]
    pub fn matches(&self, row: &T) -> bool {
        self.active.with(|active| {
            self.filters
                .iter()
                .filter(|filter| active.contains(&filter.key))
                .all(|filter| filter.matches(row))
        })
    }

    /// Keeps the rows that pass [`FilterManager::matches`], preserving order.
    #[must_use]
    pub fn apply(&self, rows: &[Rc<T>]) -> Vec<Rc<T>> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

impl<T> fmt::Debug for FilterManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterManager")
            .field("filters", &self.filters)
            .field("single_selection", &self.single_selection)
            .field("active", &self.active)
            .field("date_range", &self.date_range)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_range::{DateRange, RollingDateRangeCalculator};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    #[derive(Debug)]
    struct Request {
        status: &'static str,
        urgent: bool,
    }

    fn definitions() -> Vec<QuickFilter<Request>> {
        vec![
            QuickFilter::new("pending", "Pending").predicate(|r: &Request| r.status == "pending"),
            QuickFilter::new("urgent", "Urgent").icon("priority_high").predicate(|r: &Request| r.urgent),
            QuickFilter::new("mine", "Assigned to me"),
        ]
    }

    fn single() -> FilterManager<Request> {
        FilterManager::new(FilterConfig {
            filters: definitions(),
            single_selection: true,
            ..Default::default()
        })
    }

    fn multi() -> FilterManager<Request> {
        FilterManager::new(FilterConfig {
            filters: definitions(),
            ..Default::default()
        })
    }

    struct FixedCalculator;

    impl DateRangeCalculator for FixedCalculator {
        fn compute(&self, preset: DateRangePreset, _now: DateTime<Utc>) -> DateRange {
            let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
            RollingDateRangeCalculator.compute(preset, end)
        }
    }

    #[test]
    fn toggle_twice_reports_on_then_off() {
        let mut filters = multi();
        assert_eq!(filters.toggle_filter("urgent"), FilterChange::new("urgent", true));
        assert!(filters.is_filter_active("urgent"));
        assert_eq!(filters.toggle_filter("urgent"), FilterChange::new("urgent", false));
        assert!(!filters.is_filter_active("urgent"));
    }

    #[test]
    fn single_mode_never_holds_more_than_one_filter() {
        let mut filters = single();
        let script: [(&str, bool); 7] = [
            ("pending", true),
            ("urgent", false),
            ("urgent", true),
            ("mine", false),
            ("undeclared", true),
            ("pending", false),
            ("pending", true),
        ];

        for (key, toggle) in script {
            if toggle {
                filters.toggle_filter(key);
            } else {
                filters.activate_filter(key);
            }
            assert!(filters.active_filters().len() <= 1);
        }
    }

    #[test]
    fn single_mode_toggle_of_active_filter_clears_it() {
        let mut filters = single();
        filters.toggle_filter("pending");
        filters.toggle_filter("urgent");
        assert_eq!(filters.active_filters(), vec!["urgent"]);

        filters.toggle_filter("urgent");
        assert!(!filters.has_active_filters());
    }

    #[test]
    fn multi_mode_accumulates() {
        let mut filters = multi();
        filters.activate_filter("pending");
        filters.activate_filter("urgent");
        filters.activate_filter("urgent");
        assert_eq!(filters.active_filters(), vec!["pending", "urgent"]);

        filters.clear_filters();
        assert!(filters.active_filters().is_empty());
    }

    #[test]
    fn activate_is_idempotent() {
        let mut filters = single();
        filters.activate_filter("mine");
        let version = filters.active_signal().version();
        filters.activate_filter("mine");
        assert_eq!(filters.active_signal().version(), version);
    }

    #[test]
    fn initialize_first_filter_runs_once() {
        let mut filters = single();
        assert_eq!(filters.initialize_first_filter(), Some(FilterChange::new("pending", true)));
        let version = filters.active_signal().version();

        assert_eq!(filters.initialize_first_filter(), None);
        assert_eq!(filters.active_signal().version(), version);
        assert_eq!(filters.active_filters(), vec!["pending"]);
    }

    #[test]
    fn initialize_first_filter_respects_existing_state_and_mode() {
        let mut filters = single();
        filters.toggle_filter("urgent");
        assert_eq!(filters.initialize_first_filter(), None);
        assert_eq!(filters.active_filters(), vec!["urgent"]);

        let mut empty = FilterManager::<Request>::new(FilterConfig {
            single_selection: true,
            ..Default::default()
        });
        assert_eq!(empty.initialize_first_filter(), None);

        assert_eq!(multi().initialize_first_filter(), None);
    }

    #[test]
    fn date_range_without_calculator_updates_state_only() {
        let mut filters = multi();
        assert_eq!(filters.selected_date_range(), DateRangePreset::Last24Hours);
        assert_eq!(filters.date_range_icon(), "schedule");

        assert_eq!(filters.change_date_range(DateRangePreset::Last7Days), None);
        assert_eq!(filters.selected_date_range(), DateRangePreset::Last7Days);
        assert_eq!(filters.date_range_label(), "Last 7 days");
        assert_eq!(filters.date_range_icon(), "date_range");
    }

    #[test]
    fn date_range_with_calculator_returns_bounds() {
        let mut filters = FilterManager::<Request>::new(FilterConfig {
            enable_date_range: true,
            default_date_range: DateRangePreset::All,
            date_calculator: Some(Rc::new(FixedCalculator)),
            ..Default::default()
        });
        assert!(filters.date_range_enabled());
        assert_eq!(filters.date_range_label(), "All time");

        let selection = filters.change_date_range(DateRangePreset::Last30Days).unwrap();
        let end = selection.end_date.unwrap();
        assert_eq!(end - selection.start_date.unwrap(), Duration::days(30));
        assert_eq!(selection.preset, DateRangePreset::Last30Days);

        let all = filters.change_date_range(DateRangePreset::All).unwrap();
        assert_eq!((all.start_date, all.end_date), (None, None));
    }

    #[test]
    fn apply_uses_predicates_of_active_filters_only() {
        let rows: Vec<Rc<Request>> = vec![
            Rc::new(Request { status: "pending", urgent: true }),
            Rc::new(Request { status: "pending", urgent: false }),
            Rc::new(Request { status: "approved", urgent: true }),
        ];
        let mut filters = multi();
        assert_eq!(filters.apply(&rows).len(), 3);

        filters.activate_filter("mine");
        filters.activate_filter("not-declared");
        assert_eq!(filters.apply(&rows).len(), 3);

        filters.activate_filter("pending");
        assert_eq!(filters.apply(&rows).len(), 2);

        filters.activate_filter("urgent");
        let kept = filters.apply(&rows);
        assert_eq!(kept.len(), 1);
        assert!(Rc::ptr_eq(&kept[0], &rows[0]));
    }
}
