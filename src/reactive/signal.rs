//! Writable signals, change emitters and scoped subscriptions.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::Source;

type Listener<E> = Rc<dyn Fn(&E)>;

struct Listeners<E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener<E>)>>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }
}

trait Detach {
    fn detach(&self, id: u64);
}

impl<E> Detach for Listeners<E> {
    fn detach(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Handle to a registered listener.
///
/// The listener stays registered for as long as the handle lives. Dropping the
/// handle, or calling [`Subscription::unsubscribe`], removes it, so a
/// subscription owned by a component is released on every exit path of that
/// component.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    source: Option<Weak<dyn Detach>>,
}

impl Subscription {
    /// Removes the listener now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Whether the listener is still attached to a live source.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| source.strong_count() > 0)
    }

    fn release(&mut self) {
        if let Some(source) = self.source.take().and_then(|weak| weak.upgrade()) {
            source.detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Synchronous event stream with any number of listeners.
///
/// Listeners run in registration order, on the caller's stack, before
/// [`Emitter::emit`] returns.
pub struct Emitter<E> {
    listeners: Rc<Listeners<E>>,
}

impl<E: 'static> Emitter<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(Listeners::default()),
        }
    }

    /// Registers `listener`; it receives every event emitted while the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        self.listeners
            .entries
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let detach: Rc<dyn Detach> = self.listeners.clone();
        Subscription {
            id,
            source: Some(Rc::downgrade(&detach)),
        }
    }

    /// Delivers `event` to every current listener.
    pub fn emit(&self, event: &E) {
        // Snapshot so listeners may subscribe or unsubscribe while being called.
        let listeners: Vec<Listener<E>> = self
            .listeners
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.entries.borrow().len()
    }
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.entries.borrow().len())
            .finish()
    }
}

struct SignalInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    changed: Emitter<T>,
}

/// Shared, writable reactive value.
///
/// Cloning a `Signal` yields another handle to the same value. Every write bumps
/// a version counter that [`super::Computed`] values use to decide whether to
/// recompute, and notifies subscribers with the new value.
///
/// Listeners must not write back to the signal they observe.
///
/// # Examples
///
/// ```
/// use tablestate::reactive::Signal;
///
/// let count = Signal::new(1);
/// let handle = count.clone();
/// handle.set(2);
/// assert_eq!(count.get(), 2);
/// assert_eq!(count.version(), 1);
/// ```
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                changed: Emitter::new(),
            }),
        }
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replaces the value and notifies subscribers.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutates the value in place and notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    /// Mutates the value in place; notifies only when `f` reports a change.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = f(&mut self.inner.value.borrow_mut());
        if changed {
            self.notify();
        }
        changed
    }

    /// Number of writes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Calls `listener` with the new value after every write.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        self.inner.changed.subscribe(listener)
    }

    /// Type-erased dependency handle for [`super::Computed::new`].
    #[must_use]
    pub fn as_source(&self) -> Rc<dyn Source> {
        Rc::new(self.clone())
    }

    fn notify(&self) {
        self.inner.version.set(self.inner.version.get() + 1);
        let value = self.inner.value.borrow();
        self.inner.changed.emit(&value);
    }
}

impl<T: 'static> Source for Signal<T> {
    fn version(&self) -> u64 {
        self.inner.version.get()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}
