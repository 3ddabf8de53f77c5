//! Multi-row selection for bulk operations.
//!
//! [`SelectionModel`] is the underlying container: an ordered set of rows
//! compared by reference, which emits a [`SelectionChange`] whenever its contents
//! change. [`SelectionManager`] subscribes to that change stream and republishes
//! it as reactive state (`selected`, `has_selection`, `selected_count`).

use crate::reactive::{Computed, Emitter, Signal, Subscription};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Emitted by [`SelectionModel`] after every effective mutation.
pub struct SelectionChange<T> {
    pub added: Vec<Rc<T>>,
    pub removed: Vec<Rc<T>>,
    /// Full selection after the change, in selection order.
    pub selected: Vec<Rc<T>>,
}

/// Ordered multi-selection of rows, compared with [`Rc::ptr_eq`].
pub struct SelectionModel<T> {
    selected: Vec<Rc<T>>,
    index: HashSet<*const T>,
    changed: Emitter<SelectionChange<T>>,
}

impl<T: 'static> SelectionModel<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selected: Vec::new(),
            index: HashSet::new(),
            changed: Emitter::new(),
        }
    }

    /// Adds rows that are not selected yet.
    pub fn select(&mut self, rows: impl IntoIterator<Item = Rc<T>>) {
        let mut added = Vec::new();
        for row in rows {
            if self.index.insert(Rc::as_ptr(&row)) {
                self.selected.push(Rc::clone(&row));
                added.push(row);
            }
        }
        self.emit(added, Vec::new());
    }

    /// Removes rows that are currently selected.
    pub fn deselect(&mut self, rows: impl IntoIterator<Item = Rc<T>>) {
        let mut removed = Vec::new();
        for row in rows {
            if self.index.remove(&Rc::as_ptr(&row)) {
                removed.push(row);
            }
        }
        if !removed.is_empty() {
            let index = &self.index;
            self.selected.retain(|row| index.contains(&Rc::as_ptr(row)));
        }
        self.emit(Vec::new(), removed);
    }

    /// Flips one row's membership.
    pub fn toggle(&mut self, row: Rc<T>) {
        if self.is_selected(&row) {
            self.deselect([row]);
        } else {
            self.select([row]);
        }
    }

    pub fn clear(&mut self) {
        self.index.clear();
        let removed = std::mem::take(&mut self.selected);
        self.emit(Vec::new(), removed);
    }

    #[must_use]
    pub fn is_selected(&self, row: &Rc<T>) -> bool {
        self.index.contains(&Rc::as_ptr(row))
    }

    #[must_use]
    pub fn selected(&self) -> &[Rc<T>] {
        &self.selected
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Change stream; listeners run synchronously inside the mutating call.
    #[must_use]
    pub fn changed(&self) -> &Emitter<SelectionChange<T>> {
        &self.changed
    }

    fn emit(&self, added: Vec<Rc<T>>, removed: Vec<Rc<T>>) {
        if added.is_empty() && removed.is_empty() {
            return;
        }
        self.changed.emit(&SelectionChange {
            added,
            removed,
            selected: self.selected.clone(),
        });
    }
}

impl<T: 'static> Default for SelectionModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SelectionModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionModel")
            .field("selected", &self.selected.len())
            .field("changed", &self.changed)
            .finish()
    }
}

/// Reactive multi-selection state for a table.
///
/// The manager owns a subscription to its model's change stream. The
/// subscription is released when the manager is dropped or
/// [`SelectionManager::dispose`]d.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use tablestate::table::SelectionManager;
///
/// let rows: Vec<Rc<&str>> = vec![Rc::new("a"), Rc::new("b")];
/// let mut selection = SelectionManager::new();
///
/// selection.toggle_all(&rows);
/// assert!(selection.is_all_selected(rows.len()));
///
/// selection.toggle_all(&rows);
/// assert!(!selection.has_selection());
/// ```
pub struct SelectionManager<T> {
    model: SelectionModel<T>,
    selected: Signal<Vec<Rc<T>>>,
    has_selection: Computed<bool>,
    selected_count: Computed<usize>,
    subscription: Option<Subscription>,
}

impl<T: 'static> SelectionManager<T> {
    #[must_use]
    pub fn new() -> Self {
        let model = SelectionModel::new();
        let selected: Signal<Vec<Rc<T>>> = Signal::new(Vec::new());

        let sink = selected.clone();
        let subscription = model
            .changed()
            .subscribe(move |change: &SelectionChange<T>| sink.set(change.selected.clone()));

        let reader = selected.clone();
        let has_selection = Computed::new(vec![selected.as_source()], move || {
            reader.with(|rows| !rows.is_empty())
        });
        let reader = selected.clone();
        let selected_count = Computed::new(vec![selected.as_source()], move || reader.with(Vec::len));

        Self {
            model,
            selected,
            has_selection,
            selected_count,
            subscription: Some(subscription),
        }
    }

    /// Underlying model, for fine-grained select/deselect.
    #[must_use]
    pub fn model(&self) -> &SelectionModel<T> {
        &self.model
    }

    #[must_use]
    pub fn model_mut(&mut self) -> &mut SelectionModel<T> {
        &mut self.model
    }

    pub fn select(&mut self, rows: impl IntoIterator<Item = Rc<T>>) {
        self.model.select(rows);
    }

    pub fn deselect(&mut self, rows: impl IntoIterator<Item = Rc<T>>) {
        self.model.deselect(rows);
    }

    pub fn toggle(&mut self, row: Rc<T>) {
        self.model.toggle(row);
    }

    #[must_use]
    pub fn is_selected(&self, row: &Rc<T>) -> bool {
        self.model.is_selected(row)
    }

    /// Selects every row of `data`, or clears the whole selection if all of
    /// `data` is already selected.
    ///
    /// Selecting is additive: rows selected outside `data` stay selected.
    /// Clearing removes everything, including rows outside `data`.
    pub fn toggle_all(&mut self, data: &[Rc<T>]) {
        let all_selected = !data.is_empty() && data.iter().all(|row| self.model.is_selected(row));
        if all_selected {
            self.model.clear();
        } else {
            self.model.select(data.iter().cloned());
        }
    }

    /// True iff exactly `data_len` rows are selected and `data_len > 0`.
    #[must_use]
    pub fn is_all_selected(&self, data_len: usize) -> bool {
        data_len > 0 && self.selected_count() == data_len
    }

    pub fn clear(&mut self) {
        self.model.clear();
    }

    /// Selected rows in selection order.
    #[must_use]
    pub fn selected(&self) -> Vec<Rc<T>> {
        self.selected.get()
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.has_selection.get()
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected_count.get()
    }

    /// Reactive handle to the selected rows.
    #[must_use]
    pub fn selected_signal(&self) -> &Signal<Vec<Rc<T>>> {
        &self.selected
    }

    /// Whether the change-stream subscription is still attached.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Releases the change-stream subscription ahead of drop.
    ///
    /// After disposal the model still works but the reactive state stops
    /// following it.
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl<T: 'static> Default for SelectionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SelectionManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionManager")
            .field("model", &self.model)
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn rows(n: usize) -> Vec<Rc<usize>> {
        (0..n).map(Rc::new).collect()
    }

    #[test]
    fn selection_is_by_reference() {
        let mut selection = SelectionManager::new();
        let a = Rc::new(1);
        let twin = Rc::new(1);

        selection.select([Rc::clone(&a)]);
        assert!(selection.is_selected(&a));
        assert!(!selection.is_selected(&twin));
    }

    #[test]
    fn derived_state_follows_the_model() {
        let data = rows(3);
        let mut selection = SelectionManager::new();
        assert!(!selection.has_selection());
        assert_eq!(selection.selected_count(), 0);

        selection.select([Rc::clone(&data[2]), Rc::clone(&data[0])]);
        assert!(selection.has_selection());
        assert_eq!(selection.selected_count(), 2);
        let order: Vec<usize> = selection.selected().iter().map(|r| **r).collect();
        assert_eq!(order, vec![2, 0]);

        selection.toggle(Rc::clone(&data[2]));
        assert_eq!(selection.selected_count(), 1);

        selection.clear();
        assert!(!selection.has_selection());
    }

    #[test]
    fn duplicate_select_emits_nothing() {
        let data = rows(1);
        let mut model = SelectionModel::new();
        let events = Rc::new(Cell::new(0));
        let counter = Rc::clone(&events);
        let _sub = model.changed().subscribe(move |_| counter.set(counter.get() + 1));

        model.select([Rc::clone(&data[0])]);
        model.select([Rc::clone(&data[0])]);
        model.deselect(rows(1));
        model.clear();
        model.clear();

        assert_eq!(events.get(), 2);
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let data = rows(4);
        let mut selection = SelectionManager::new();

        selection.toggle_all(&data);
        assert_eq!(selection.selected_count(), 4);
        assert!(selection.is_all_selected(4));

        selection.toggle_all(&data);
        assert_eq!(selection.selected_count(), 0);
    }

    #[test]
    fn toggle_all_completes_a_partial_selection() {
        let data = rows(3);
        let mut selection = SelectionManager::new();
        selection.select([Rc::clone(&data[1])]);

        selection.toggle_all(&data);
        assert_eq!(selection.selected_count(), 3);
    }

    #[test]
    fn toggle_all_keeps_rows_from_other_pages_when_selecting() {
        let first_page = rows(2);
        let second_page = rows(2);
        let mut selection = SelectionManager::new();

        selection.toggle_all(&first_page);
        selection.toggle_all(&second_page);
        assert_eq!(selection.selected_count(), 4);

        selection.toggle_all(&second_page);
        assert_eq!(selection.selected_count(), 0);
    }

    #[test]
    fn toggle_all_on_empty_data_is_a_no_op() {
        let data = rows(2);
        let mut selection = SelectionManager::new();
        selection.select([Rc::clone(&data[0])]);

        selection.toggle_all(&[]);
        assert_eq!(selection.selected_count(), 1);
    }

    #[test]
    fn empty_data_is_never_all_selected() {
        let mut selection = SelectionManager::<usize>::new();
        assert!(!selection.is_all_selected(0));
        selection.select(rows(2));
        assert!(!selection.is_all_selected(0));
        assert!(selection.is_all_selected(2));
        assert!(!selection.is_all_selected(3));
    }

    #[test]
    fn dispose_releases_subscription() {
        let data = rows(2);
        let mut selection = SelectionManager::new();
        assert!(selection.is_subscribed());
        assert_eq!(selection.model().changed().listener_count(), 1);

        selection.dispose();
        assert!(!selection.is_subscribed());
        assert_eq!(selection.model().changed().listener_count(), 0);

        selection.select([Rc::clone(&data[0])]);
        assert_eq!(selection.model().len(), 1);
        assert_eq!(selection.selected_count(), 0);
    }
}
