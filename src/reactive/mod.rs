//! Minimal single-threaded reactivity.
//!
//! Managers expose their state as [`Signal`]s (writable, versioned values) and
//! [`Computed`]s (memoized derivations). Derivations are pull-based: a write only
//! bumps a version counter, and the derived value is recomputed on the next read
//! if any dependency's version moved. [`Emitter`] carries discrete change events,
//! and [`Subscription`] ties a listener's lifetime to its owner.
//!
//! Everything here is `Rc`/`RefCell` based and deliberately `!Send`.

pub mod computed;
pub mod signal;

pub use computed::Computed;
pub use signal::{Emitter, Signal, Subscription};

/// Anything a [`Computed`] can depend on.
pub trait Source {
    /// Monotonic counter that moves whenever the value may have changed.
    fn version(&self) -> u64;
}
