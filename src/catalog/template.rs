//! Handler and factory contracts, plus template parameter schemas.

use crate::config::{ParamKind, ParamValue, RuleConfig};
use crate::error::{CompileError, HandlerError};
use std::sync::Arc;

/// The compiled, parameter-bound computation produced for one rule.
///
/// # Contract
///
/// A handler must be callable repeatedly, must not depend on invocation
/// order, and must not hold or mutate shared state — dispatch is a pure
/// read plus one handler invocation, and records may be dispatched in
/// parallel. A failed computation is reported as an error; returning an
/// error description as if it were valid output is disallowed.
///
/// Handlers are `'static` trait objects: everything they need is
/// captured by value at compile time, so a handler can never observe
/// later mutation of the configuration that produced it.
///
/// Any `Fn(&R) -> Result<O, HandlerError> + Send + Sync` closure is a
/// handler.
pub trait RuleHandler<R, O>: Send + Sync {
    /// Runs the computation for one record.
    fn call(&self, record: &R) -> Result<O, HandlerError>;
}

impl<R, O, F> RuleHandler<R, O> for F
where
    F: Fn(&R) -> Result<O, HandlerError> + Send + Sync,
{
    fn call(&self, record: &R) -> Result<O, HandlerError> {
        self(record)
    }
}

/// Shared, immutable handler reference as stored in compiled rules.
pub type SharedHandler<R, O> = Arc<dyn RuleHandler<R, O>>;

/// Builds a handler from a validated configuration.
///
/// The factory receives the configuration read-only and must clone
/// every value the handler will need; the configuration is discarded
/// after compilation. A factory rejecting a configuration returns
/// [`CompileError::InvalidConfiguration`] (see [`CompileError::invalid`])
/// so the failure stays traceable to the rule name.
///
/// Any `Fn(&RuleConfig) -> Result<SharedHandler<R, O>, CompileError> +
/// Send + Sync` closure is a factory.
pub trait HandlerFactory<R, O>: Send + Sync {
    /// Produces the handler for `config`.
    fn build(&self, config: &RuleConfig) -> Result<SharedHandler<R, O>, CompileError>;
}

impl<R, O, F> HandlerFactory<R, O> for F
where
    F: Fn(&RuleConfig) -> Result<SharedHandler<R, O>, CompileError> + Send + Sync,
{
    fn build(&self, config: &RuleConfig) -> Result<SharedHandler<R, O>, CompileError> {
        self(config)
    }
}

/// Declaration of one template parameter.
///
/// # Examples
///
/// ```
/// use u_dispatch::catalog::ParamSpec;
/// use u_dispatch::config::{ParamKind, ParamValue};
///
/// let basis = ParamSpec::required("shock_basis", ParamKind::Str)
///     .one_of(vec!["best_estimate".into(), "stressed".into()]);
///
/// assert!(basis.check(&ParamValue::from("stressed")).is_ok());
/// assert!(basis.check(&ParamValue::from("percentile")).is_err());
/// assert!(basis.check(&ParamValue::from(0.995)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Expected value kind.
    pub kind: ParamKind,
    /// Whether a configuration must supply this parameter.
    pub required: bool,
    /// Enumerated set of admissible values, if restricted.
    pub allowed: Option<Vec<ParamValue>>,
}

impl ParamSpec {
    /// A parameter every configuration must supply.
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            allowed: None,
        }
    }

    /// A parameter configurations may omit.
    pub fn optional(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            allowed: None,
        }
    }

    /// Restricts the parameter to an enumerated value set.
    pub fn one_of(mut self, allowed: Vec<ParamValue>) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Checks a supplied value against this declaration.
    pub fn check(&self, value: &ParamValue) -> Result<(), String> {
        if value.kind() != self.kind {
            return Err(format!("expected {}, got {}", self.kind, value.kind()));
        }
        if let Some(allowed) = &self.allowed {
            if !allowed.contains(value) {
                let set = allowed
                    .iter()
                    .map(ParamValue::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(format!("value `{value}` not in allowed set {{{set}}}"));
            }
        }
        Ok(())
    }
}

/// The declared shape of a template: its identifier and parameter schema.
///
/// Registered together with the factory; the validator checks every
/// configuration against it before compilation.
///
/// # Examples
///
/// ```
/// use u_dispatch::catalog::{ParamSpec, TemplateSpec};
/// use u_dispatch::config::ParamKind;
///
/// let spec = TemplateSpec::new("cqs")
///     .with_param(ParamSpec::required("quota_share", ParamKind::Float))
///     .with_param(
///         ParamSpec::required("shock_basis", ParamKind::Str)
///             .one_of(vec!["best_estimate".into(), "stressed".into()]),
///     );
///
/// assert_eq!(spec.name, "cqs");
/// assert!(spec.param("quota_share").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateSpec {
    /// Template identifier.
    pub name: String,
    /// Declared parameters.
    pub params: Vec<ParamSpec>,
}

impl TemplateSpec {
    /// Creates a template declaration with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Declares a parameter.
    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// The declaration for `name`, if any.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// First problem with the declaration itself, if any.
    ///
    /// Registration rejects a malformed declaration rather than letting
    /// it corrupt later validation.
    pub(crate) fn declaration_error(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("template name is empty".into());
        }
        for (i, param) in self.params.iter().enumerate() {
            if param.name.is_empty() {
                return Some(format!("parameter #{i} has an empty name"));
            }
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Some(format!("parameter `{}` is declared twice", param.name));
            }
            if let Some(allowed) = &param.allowed {
                if allowed.is_empty() {
                    return Some(format!("parameter `{}` allows no values", param.name));
                }
                if let Some(off) = allowed.iter().find(|v| v.kind() != param.kind) {
                    return Some(format!(
                        "parameter `{}` allows `{off}`, which is not a {}",
                        param.name, param.kind
                    ));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_check_kind() {
        let spec = ParamSpec::required("quota_share", ParamKind::Float);
        assert!(spec.check(&ParamValue::from(0.5)).is_ok());
        assert!(spec.check(&ParamValue::from("0.5")).is_err());
    }

    #[test]
    fn test_param_check_allowed_set() {
        let spec = ParamSpec::required("shock_basis", ParamKind::Str)
            .one_of(vec!["best_estimate".into(), "stressed".into()]);
        assert!(spec.check(&ParamValue::from("best_estimate")).is_ok());
        let err = spec.check(&ParamValue::from("percentile")).unwrap_err();
        assert!(err.contains("allowed set"));
    }

    #[test]
    fn test_declaration_rejects_duplicates() {
        let spec = TemplateSpec::new("cqs")
            .with_param(ParamSpec::required("q", ParamKind::Float))
            .with_param(ParamSpec::optional("q", ParamKind::Int));
        assert!(spec.declaration_error().unwrap().contains("declared twice"));
    }

    #[test]
    fn test_declaration_rejects_off_kind_allowed_values() {
        let spec = TemplateSpec::new("cqs").with_param(
            ParamSpec::required("shock_basis", ParamKind::Str).one_of(vec![ParamValue::from(1)]),
        );
        assert!(spec.declaration_error().is_some());
    }

    #[test]
    fn test_declaration_rejects_empty_name() {
        assert!(TemplateSpec::new("").declaration_error().is_some());
        assert!(TemplateSpec::new("cqs").declaration_error().is_none());
    }

    #[test]
    fn test_closures_are_handlers_and_factories() {
        let handler: SharedHandler<i64, i64> = Arc::new(|record: &i64| Ok(record * 2));
        assert_eq!(handler.call(&21).unwrap(), 42);

        let factory = |_config: &RuleConfig| -> Result<SharedHandler<i64, i64>, CompileError> {
            Ok(Arc::new(|record: &i64| Ok(record + 1)))
        };
        let built = factory.build(&RuleConfig::new("t", "r")).unwrap();
        assert_eq!(built.call(&1).unwrap(), 2);
    }
}
