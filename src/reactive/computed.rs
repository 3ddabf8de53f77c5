//! Lazily recomputed derived values.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::Source;

struct Cached<T> {
    seen: Vec<u64>,
    value: T,
}

struct ComputedInner<T> {
    deps: Vec<Rc<dyn Source>>,
    derive: Box<dyn Fn() -> T>,
    cache: RefCell<Option<Cached<T>>>,
    revision: Cell<u64>,
}

/// Memoized value derived from one or more [`Source`]s.
///
/// Reading a `Computed` compares the current versions of its dependencies with
/// the versions seen at the last computation and only re-runs the derivation
/// when one of them moved. Nothing is computed until the first read.
///
/// # Examples
///
/// ```
/// use tablestate::reactive::{Computed, Signal};
///
/// let items = Signal::new(vec![1, 2, 3]);
/// let source = items.clone();
/// let total = Computed::new(vec![items.as_source()], move || source.with(|v| v.iter().sum::<i32>()));
///
/// assert_eq!(total.get(), 6);
/// items.update(|v| v.push(4));
/// assert_eq!(total.get(), 10);
/// ```
pub struct Computed<T> {
    inner: Rc<ComputedInner<T>>,
}

impl<T: 'static> Computed<T> {
    pub fn new(deps: Vec<Rc<dyn Source>>, derive: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: Rc::new(ComputedInner {
                deps,
                derive: Box::new(derive),
                cache: RefCell::new(None),
                revision: Cell::new(0),
            }),
        }
    }

    /// Returns a copy of the (possibly refreshed) value.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Reads the (possibly refreshed) value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let seen: Vec<u64> = self.inner.deps.iter().map(|dep| dep.version()).collect();
        let mut cache = self.inner.cache.borrow_mut();

        let fresh = match cache.take() {
            Some(cached) if cached.seen == seen => cached,
            _ => {
                self.inner.revision.set(self.inner.revision.get() + 1);
                Cached {
                    seen,
                    value: (self.inner.derive)(),
                }
            }
        };

        let out = f(&fresh.value);
        *cache = Some(fresh);
        out
    }

    /// How many times the derivation has run.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Type-erased dependency handle, for chaining computations.
    #[must_use]
    pub fn as_source(&self) -> Rc<dyn Source> {
        Rc::new(self.clone())
    }
}

impl<T: 'static> Source for Computed<T> {
    fn version(&self) -> u64 {
        self.with(|_| ());
        self.inner.revision.get()
    }
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("deps", &self.inner.deps.len())
            .field("revision", &self.inner.revision.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;

    #[test]
    fn recomputes_only_after_dependency_changes() {
        let base = Signal::new(2);
        let reader = base.clone();
        let doubled = Computed::new(vec![base.as_source()], move || reader.get() * 2);

        assert_eq!(doubled.revision(), 0);
        assert_eq!(doubled.get(), 4);
        assert_eq!(doubled.get(), 4);
        assert_eq!(doubled.revision(), 1);

        base.set(5);
        assert_eq!(doubled.revision(), 1);
        assert_eq!(doubled.get(), 10);
        assert_eq!(doubled.revision(), 2);
    }

    #[test]
    fn chained_computations_propagate() {
        let base = Signal::new(1);
        let reader = base.clone();
        let plus_one = Computed::new(vec![base.as_source()], move || reader.get() + 1);
        let upstream = plus_one.clone();
        let squared = Computed::new(vec![plus_one.as_source()], move || {
            let v = upstream.get();
            v * v
        });

        assert_eq!(squared.get(), 4);
        base.set(3);
        assert_eq!(squared.get(), 16);
        assert_eq!(squared.revision(), 2);
    }
}
