//! The record contract consumed by matching and dispatch.
//!
//! A record is one unit of business data to be routed: the engine only
//! requires that it can be probed by field name for the dimensions the
//! registry declares, and that it can name itself for error reporting.
//! Ownership is transient — a record is borrowed for the duration of a
//! single dispatch call and never stored.
//!
//! Domain types implement [`Record`] directly; [`MapRecord`] is the
//! provided keyed-value-bag implementation for loaders and tests.

mod types;

pub use types::{MapRecord, Record};
