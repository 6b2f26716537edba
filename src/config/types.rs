//! Configuration value types and the rule configuration itself.

use crate::dimension::DimValue;
use std::collections::BTreeMap;
use std::fmt;

/// The kind of a template parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamKind {
    Str,
    Int,
    Float,
    Bool,
    List,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Str => "string",
            ParamKind::Int => "integer",
            ParamKind::Float => "float",
            ParamKind::Bool => "boolean",
            ParamKind::List => "list",
        };
        f.write_str(name)
    }
}

/// A template-specific parameter value.
///
/// Parameters are typed at construction and validated exhaustively
/// against the template's declared schema before compilation — never
/// lazily at first use inside a handler.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// The kind of this value.
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Str(_) => ParamKind::Str,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::List(_) => ParamKind::List,
        }
    }

    /// The string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float payload; integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The list payload, if any.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i64::from(i))
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// The immutable description of one routing rule.
///
/// Carries the template identifier, a batch-unique rule name, one
/// [`DimValue`] per declared dimension (keyed by dimension name), the
/// typed parameter bag, and an optional explicit priority override.
///
/// # Examples
///
/// ```
/// use u_dispatch::config::RuleConfig;
/// use u_dispatch::dimension::DimValue;
///
/// let config = RuleConfig::new("cqs", "axa_cqs_death")
///     .with_dimension("ceding_company", "axa")
///     .with_dimension("risk_class", "death")
///     .with_dimension("uw_year", DimValue::range_from(2023))
///     .with_param("shock_basis", "best_estimate")
///     .with_param("quota_share", 0.5);
///
/// assert_eq!(config.template, "cqs");
/// assert_eq!(config.str_param("shock_basis"), Some("best_estimate"));
/// assert_eq!(config.float_param("quota_share"), Some(0.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleConfig {
    /// Identifier of the template that builds this rule's handler.
    pub template: String,
    /// Rule name, unique within its batch.
    pub name: String,
    /// Explicit priority override; `None` means the computed default.
    pub priority: Option<i32>,
    dimensions: BTreeMap<String, DimValue>,
    params: BTreeMap<String, ParamValue>,
}

impl RuleConfig {
    /// Creates a configuration for `template` named `name`.
    pub fn new(template: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            name: name.into(),
            priority: None,
            dimensions: BTreeMap::new(),
            params: BTreeMap::new(),
        }
    }

    /// Assigns a dimension value (wildcard, exact, or range).
    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<DimValue>) -> Self {
        self.dimensions.insert(name.into(), value.into());
        self
    }

    /// Adds a template parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Overrides the computed priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// The value assigned to `dimension`, if any.
    pub fn dimension(&self, dimension: &str) -> Option<&DimValue> {
        self.dimensions.get(dimension)
    }

    /// Iterates assigned dimensions in name order.
    pub fn dimensions(&self) -> impl Iterator<Item = (&str, &DimValue)> {
        self.dimensions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The parameter named `name`, if any.
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Iterates parameters in name order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Typed accessor: string parameter.
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(ParamValue::as_str)
    }

    /// Typed accessor: integer parameter.
    pub fn int_param(&self, name: &str) -> Option<i64> {
        self.params.get(name).and_then(ParamValue::as_int)
    }

    /// Typed accessor: float parameter (integers widen).
    pub fn float_param(&self, name: &str) -> Option<f64> {
        self.params.get(name).and_then(ParamValue::as_float)
    }

    /// Typed accessor: boolean parameter.
    pub fn bool_param(&self, name: &str) -> Option<bool> {
        self.params.get(name).and_then(ParamValue::as_bool)
    }
}
