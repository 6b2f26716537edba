//! Dimension value and axis definitions.

use std::cmp::Ordering;
use std::fmt;

/// A concrete value carried by a record field or a rule dimension.
///
/// Only strings and integers are admitted as routing keys. Ordering is
/// defined *within* a variant only: comparing a string against an
/// integer yields no ordering, and a range bound of the wrong type
/// therefore never matches. ISO-formatted dates sort correctly as
/// strings, so date axes are expressed as `Str` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimScalar {
    /// Textual key (counterparty code, product line, ISO date, …).
    Str(String),
    /// Integral key (underwriting year, tranche number, …).
    Int(i64),
}

impl DimScalar {
    /// Same-type comparison; `None` when the variants differ.
    pub fn same_type_cmp(&self, other: &DimScalar) -> Option<Ordering> {
        match (self, other) {
            (DimScalar::Str(a), DimScalar::Str(b)) => Some(a.cmp(b)),
            (DimScalar::Int(a), DimScalar::Int(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// The string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DimScalar::Str(s) => Some(s),
            DimScalar::Int(_) => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DimScalar::Int(i) => Some(*i),
            DimScalar::Str(_) => None,
        }
    }
}

impl fmt::Display for DimScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimScalar::Str(s) => f.write_str(s),
            DimScalar::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for DimScalar {
    fn from(s: &str) -> Self {
        DimScalar::Str(s.to_owned())
    }
}

impl From<String> for DimScalar {
    fn from(s: String) -> Self {
        DimScalar::Str(s)
    }
}

impl From<i64> for DimScalar {
    fn from(i: i64) -> Self {
        DimScalar::Int(i)
    }
}

impl From<i32> for DimScalar {
    fn from(i: i32) -> Self {
        DimScalar::Int(i64::from(i))
    }
}

/// A rule-side dimension value.
///
/// The wildcard is an explicit variant, never a sentinel mixed into the
/// scalar domain. Range bounds are individually optional; a `None` bound
/// is a wildcarded bound.
///
/// # Examples
///
/// ```
/// use u_dispatch::dimension::{DimScalar, DimValue};
///
/// let exact = DimValue::exact("axa");
/// assert!(exact.matches(&DimScalar::from("axa")));
/// assert!(!exact.matches(&DimScalar::from("cf")));
///
/// // Half-bounded range: 2023 and later.
/// let from_2023 = DimValue::range_from(2023);
/// assert!(from_2023.matches(&DimScalar::from(2024)));
/// assert!(!from_2023.matches(&DimScalar::from(2022)));
///
/// assert!(DimValue::Wildcard.matches(&DimScalar::from("anything")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimValue {
    /// Matches any record value for this dimension.
    Wildcard,
    /// Matches iff the record value equals this value.
    Exact(DimScalar),
    /// Matches iff `lower ≤ value ≤ upper`, each bound optional.
    Range(Option<DimScalar>, Option<DimScalar>),
}

impl DimValue {
    /// An exact value.
    pub fn exact(value: impl Into<DimScalar>) -> Self {
        DimValue::Exact(value.into())
    }

    /// A fully bounded range (inclusive on both sides).
    pub fn range(lower: impl Into<DimScalar>, upper: impl Into<DimScalar>) -> Self {
        DimValue::Range(Some(lower.into()), Some(upper.into()))
    }

    /// A range with only a lower bound.
    pub fn range_from(lower: impl Into<DimScalar>) -> Self {
        DimValue::Range(Some(lower.into()), None)
    }

    /// A range with only an upper bound.
    pub fn range_to(upper: impl Into<DimScalar>) -> Self {
        DimValue::Range(None, Some(upper.into()))
    }

    /// Whether this value constrains nothing at all.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, DimValue::Wildcard | DimValue::Range(None, None))
    }

    /// Contribution of this value to a rule's wildcard count.
    ///
    /// A `Range` with *either* bound wildcarded weighs the same as a
    /// fully wildcarded dimension (flat penalty). Callers that need a
    /// finer ranking between half-bounded and unbounded ranges supply an
    /// explicit priority instead.
    pub fn wildcard_weight(&self) -> usize {
        match self {
            DimValue::Wildcard => 1,
            DimValue::Exact(_) => 0,
            DimValue::Range(lower, upper) => {
                if lower.is_none() || upper.is_none() {
                    1
                } else {
                    0
                }
            }
        }
    }

    /// Tests a record value against this rule value.
    ///
    /// A range bound of a different scalar type than the record value
    /// never matches.
    pub fn matches(&self, actual: &DimScalar) -> bool {
        match self {
            DimValue::Wildcard => true,
            DimValue::Exact(expected) => expected == actual,
            DimValue::Range(lower, upper) => {
                let above = lower.as_ref().map_or(true, |b| {
                    matches!(
                        actual.same_type_cmp(b),
                        Some(Ordering::Greater | Ordering::Equal)
                    )
                });
                let below = upper.as_ref().map_or(true, |b| {
                    matches!(
                        actual.same_type_cmp(b),
                        Some(Ordering::Less | Ordering::Equal)
                    )
                });
                above && below
            }
        }
    }
}

impl fmt::Display for DimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimValue::Wildcard => f.write_str("*"),
            DimValue::Exact(v) => write!(f, "{v}"),
            DimValue::Range(lower, upper) => {
                match lower {
                    Some(v) => write!(f, "[{v}")?,
                    None => f.write_str("[*")?,
                }
                match upper {
                    Some(v) => write!(f, "..{v}]"),
                    None => f.write_str("..*]"),
                }
            }
        }
    }
}

impl From<DimScalar> for DimValue {
    fn from(v: DimScalar) -> Self {
        DimValue::Exact(v)
    }
}

impl From<&str> for DimValue {
    fn from(s: &str) -> Self {
        DimValue::Exact(DimScalar::from(s))
    }
}

impl From<i64> for DimValue {
    fn from(i: i64) -> Self {
        DimValue::Exact(DimScalar::from(i))
    }
}

impl From<i32> for DimValue {
    fn from(i: i32) -> Self {
        DimValue::Exact(DimScalar::from(i))
    }
}

/// How a dimension matches, and which backing fields it reads.
///
/// Exact dimensions read one field; range dimensions probe the record at
/// `field` while the declarative rule source supplies the bounds through
/// the `lower_field`/`upper_field` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionKind {
    /// Equality match on a single backing field.
    Exact {
        /// Record field holding the value.
        field: String,
    },
    /// Bounded-range match.
    Range {
        /// Record field holding the probed value.
        field: String,
        /// Rule-source field carrying the lower bound.
        lower_field: String,
        /// Rule-source field carrying the upper bound.
        upper_field: String,
    },
}

/// A named routing axis.
///
/// The spec list of a registry is fixed once the registry is created.
///
/// # Examples
///
/// ```
/// use u_dispatch::dimension::DimensionSpec;
///
/// // Exact axis backed by the field of the same name.
/// let ceding = DimensionSpec::exact("ceding_company");
/// assert_eq!(ceding.field(), "ceding_company");
///
/// // Range axis probing `uw_year`, bounds declared as
/// // `uw_year_min` / `uw_year_max` in the rule source.
/// let uw_year = DimensionSpec::range("uw_year");
/// assert!(uw_year.is_range());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionSpec {
    /// Dimension name, the key configurations assign values under.
    pub name: String,
    /// Matching kind and backing fields.
    pub kind: DimensionKind,
}

impl DimensionSpec {
    /// Exact dimension backed by the field of the same name.
    pub fn exact(name: impl Into<String>) -> Self {
        let name = name.into();
        let field = name.clone();
        Self {
            name,
            kind: DimensionKind::Exact { field },
        }
    }

    /// Exact dimension probing a differently named record field.
    pub fn exact_on(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::Exact {
                field: field.into(),
            },
        }
    }

    /// Range dimension with derived `<name>_min` / `<name>_max` bound fields.
    pub fn range(name: impl Into<String>) -> Self {
        let name = name.into();
        let field = name.clone();
        let lower_field = format!("{name}_min");
        let upper_field = format!("{name}_max");
        Self {
            name,
            kind: DimensionKind::Range {
                field,
                lower_field,
                upper_field,
            },
        }
    }

    /// Range dimension with fully explicit backing fields.
    pub fn range_on(
        name: impl Into<String>,
        field: impl Into<String>,
        lower_field: impl Into<String>,
        upper_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DimensionKind::Range {
                field: field.into(),
                lower_field: lower_field.into(),
                upper_field: upper_field.into(),
            },
        }
    }

    /// The record field this dimension probes.
    pub fn field(&self) -> &str {
        match &self.kind {
            DimensionKind::Exact { field } | DimensionKind::Range { field, .. } => field,
        }
    }

    /// Whether this is a range dimension.
    pub fn is_range(&self) -> bool {
        matches!(self.kind, DimensionKind::Range { .. })
    }

    /// Whether a rule-side value has the right shape for this dimension.
    ///
    /// Wildcards fit either kind; an exact value on a range dimension
    /// (or a range on an exact dimension) is a configuration mistake
    /// the validator reports as a kind mismatch.
    pub fn accepts(&self, value: &DimValue) -> bool {
        match (&self.kind, value) {
            (_, DimValue::Wildcard) => true,
            (DimensionKind::Exact { .. }, DimValue::Exact(_)) => true,
            (DimensionKind::Range { .. }, DimValue::Range(..)) => true,
            _ => false,
        }
    }
}
