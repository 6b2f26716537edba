//! Default rule priority from wildcard counts.

use crate::dimension::DimValue;

/// Priority of a rule with no wildcards.
pub const BASE_PRIORITY: i32 = 100;

/// Priority deducted per wildcarded dimension.
pub const WILDCARD_PENALTY: i32 = 10;

/// Number of wildcarded dimensions in a tuple.
///
/// A `Range` with either bound wildcarded counts as one wildcard — the
/// flat penalty; see [`DimValue::wildcard_weight`].
pub fn wildcard_count(values: &[DimValue]) -> usize {
    values.iter().map(DimValue::wildcard_weight).sum()
}

/// Computed priority for a dimension tuple: `100 − 10 × wildcard_count`.
///
/// More specific rules therefore always outrank their generalizations
/// unless a caller overrides the priority explicitly.
///
/// # Examples
///
/// ```
/// use u_dispatch::dimension::DimValue;
/// use u_dispatch::registry::default_priority;
///
/// let exact = vec![DimValue::exact("axa"), DimValue::exact("death")];
/// let partial = vec![DimValue::exact("axa"), DimValue::Wildcard];
/// let catch_all = vec![DimValue::Wildcard, DimValue::Wildcard];
///
/// assert_eq!(default_priority(&exact), 100);
/// assert_eq!(default_priority(&partial), 90);
/// assert_eq!(default_priority(&catch_all), 80);
/// ```
pub fn default_priority(values: &[DimValue]) -> i32 {
    BASE_PRIORITY - WILDCARD_PENALTY * wildcard_count(values) as i32
}
