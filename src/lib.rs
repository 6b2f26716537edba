//! Domain-agnostic rule registry and dispatch engine.
//!
//! Routes individual records to the correct computation handler based on
//! multi-dimensional classification criteria (exact and bounded-range
//! axes), with priority-based conflict resolution and a factory
//! mechanism that binds immutable configuration parameters to reusable
//! computation templates:
//!
//! - **Catalog**: process-wide table of named handler factories with
//!   declared parameter schemas, sealed after an initialization phase.
//! - **Configuration & Validation**: immutable rule descriptions checked
//!   against the catalog and dimension specs before compilation; batch
//!   validation aggregates every issue in one pass.
//! - **Compilation**: resolves a configuration's template and produces a
//!   handler that owns everything it captured.
//! - **Registry**: ordered storage of compiled rules; multi-dimensional
//!   matching with wildcard-derived default priorities and a
//!   deterministic earliest-inserted tie-break.
//! - **Dispatch**: immutable registry snapshots exposing find-and-invoke
//!   per record, plus fail-fast and collect batch modes for an external
//!   execution harness.
//!
//! # Architecture
//!
//! The engine follows a build-then-freeze discipline: templates are
//! registered and the catalog sealed, configurations are validated and
//! compiled, rules are inserted into a registry, and a
//! [`Dispatcher`](dispatch::Dispatcher) snapshot freezes the rule
//! sequence before any record is dispatched. Under this discipline no
//! synchronization is required; dispatch is a pure read plus one
//! handler invocation, so independent records may be processed in
//! parallel (see the `parallel` feature).
//!
//! This crate contains no domain-specific concepts — insurance
//! cashflows, claim grids, reserving, etc. are defined by consumers
//! supplying their own record types, handler outputs, and templates.
//! The insurance-flavored names appearing in examples and tests are
//! illustration only.

pub mod catalog;
pub mod compile;
pub mod config;
pub mod dimension;
pub mod dispatch;
pub mod error;
pub mod record;
pub mod registry;
