//! Structured logging setup.
//!
//! Library code only emits `tracing` spans and events; installing a subscriber
//! is left to binaries. [`init_tracing`] wires up the default one: an
//! `EnvFilter` plus a `fmt` layer on stderr.
//!
//! ```text
//! tracing macros -> EnvFilter -> fmt layer -> stderr
//! ```

mod init;

pub use init::{init_tracing, DEFAULT_LEVEL};
