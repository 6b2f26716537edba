//! Dimension axes and the values matched along them.
//!
//! A *dimension* is a named axis used to route records: either an exact
//! axis (equality against one backing field) or a bounded-range axis
//! (record value tested against a lower/upper pair). Rule-side values
//! are explicit tagged variants — [`DimValue::Wildcard`],
//! [`DimValue::Exact`], [`DimValue::Range`] — so "matches anything" is
//! never encoded as a magic value inside the scalar domain.
//!
//! # Key Types
//!
//! - [`DimScalar`]: a concrete record/dimension value (string or integer)
//! - [`DimValue`]: a rule-side value, including wildcards and ranges
//! - [`DimensionSpec`]: a named axis with its kind and backing fields
//!
//! The dimension list of a registry is fixed at creation and immutable
//! thereafter.

mod types;

pub use types::{DimScalar, DimValue, DimensionKind, DimensionSpec};
