//! Dispatch: find-and-invoke over an immutable rule snapshot.
//!
//! A [`Dispatcher`] is created by snapshotting a
//! [`Registry`](crate::registry::Registry): the rule sequence is copied,
//! so inserts into the live registry after the snapshot never change the
//! behavior of an existing dispatcher — freezing is per snapshot, and a
//! dispatcher observes new rules only by being re-created.
//!
//! Dispatch itself is a pure read plus one handler invocation; the
//! dispatcher contributes no mutation of its own, and independent
//! records may be dispatched in parallel.
//!
//! The batch helpers in this module are the harness-support surface:
//! fail-fast and collect modes over a record slice, with an optional
//! cancel token checked between records. Neither mode ever drops a
//! failure. With the `parallel` feature, collect mode fans records out
//! with rayon.

mod batch;
mod dispatcher;

pub use batch::BatchReport;
pub use dispatcher::Dispatcher;
