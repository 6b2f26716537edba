//! Rule registry: ordered storage of compiled rules and matching queries.
//!
//! A [`Registry`] owns the fixed dimension-spec list and an
//! insertion-ordered sequence of compiled rules. It is mutable only
//! during the build phase; freezing happens by taking a
//! [`Dispatcher`](crate::dispatch::Dispatcher) snapshot — the live
//! registry may keep accepting inserts, but no existing snapshot ever
//! observes them.
//!
//! Matching evaluates the conjunction of all dimensions per rule and
//! resolves conflicts by priority (higher wins), with a deterministic
//! earliest-inserted tie-break among equals. A record lacking a field
//! required by an active dimension is reported as a missing-field
//! error before any rule is consulted, never silently skipped.
//!
//! # Key Types
//!
//! - [`CompiledRule`] / [`RuleDescriptor`]: stored rules and their
//!   handler-free listing view
//! - [`Registry`]: insertion, [`matching`](Registry::matching) and
//!   [`best_match`](Registry::best_match) queries
//! - [`default_priority`]: the `100 − 10 × wildcard_count` formula

mod engine;
mod priority;
mod types;

pub use engine::Registry;
pub(crate) use engine::{best_rule, probe_record};
pub use priority::{default_priority, wildcard_count, BASE_PRIORITY, WILDCARD_PENALTY};
pub use types::{CompiledRule, RuleDescriptor};
