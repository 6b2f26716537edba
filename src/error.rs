//! Error types for every phase of the build-then-dispatch lifecycle.
//!
//! The taxonomy mirrors the phases of the engine: registration into the
//! [`TemplateCatalog`](crate::catalog::TemplateCatalog), configuration
//! validation, compilation, registry construction, matching, and finally
//! dispatch. Build-phase errors are fail-fast and aggregate every
//! offending configuration; dispatch-phase errors always carry the
//! identity of the record that triggered them.

use crate::dimension::DimScalar;
use std::fmt;

/// Error raised when populating the template catalog.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// A template with the same identifier is already registered.
    #[error("template `{0}` is already registered")]
    DuplicateTemplate(String),

    /// The template declaration itself is malformed.
    ///
    /// The factory *signature* is enforced by the type system; what
    /// remains checkable at runtime is the declared parameter schema
    /// (empty template name, duplicate parameter declarations, allowed
    /// values that do not match their declared kind).
    #[error("template `{name}` has an invalid declaration: {reason}")]
    InvalidFactory { name: String, reason: String },

    /// The catalog has been sealed; the registration phase is over.
    #[error("catalog is sealed; registration is closed")]
    CatalogSealed,
}

/// Lookup failure for a template identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("template `{0}` is not registered")]
pub struct UnknownTemplate(pub String);

/// A single problem found while validating a configuration batch.
///
/// Issues are collected, never raised one at a time: a batch validation
/// pass reports every problem it can find in one sweep.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationIssue {
    /// The configuration references a template the catalog does not know.
    #[error("rule `{config}`: template `{template}` is not registered")]
    UnknownTemplate { config: String, template: String },

    /// The configuration has an empty rule name.
    #[error("configuration for template `{template}` has an empty name")]
    EmptyName { template: String },

    /// Two or more configurations in the batch share this rule name.
    #[error("rule name `{name}` is used by more than one configuration")]
    DuplicateName { name: String },

    /// A declared dimension has no value (wildcard counts as a value).
    #[error("rule `{config}`: no value for dimension `{dimension}`")]
    MissingDimension { config: String, dimension: String },

    /// The configuration assigns a dimension the registry does not declare.
    #[error("rule `{config}`: unknown dimension `{dimension}`")]
    UnknownDimension { config: String, dimension: String },

    /// The assigned value shape does not fit the dimension kind.
    #[error("rule `{config}`: dimension `{dimension}`: {reason}")]
    KindMismatch {
        config: String,
        dimension: String,
        reason: String,
    },

    /// A required template parameter is absent.
    #[error("rule `{config}`: missing required parameter `{parameter}`")]
    MissingParameter { config: String, parameter: String },

    /// A template parameter is present but rejected by its declaration.
    #[error("rule `{config}`: parameter `{parameter}`: {reason}")]
    InvalidParameter {
        config: String,
        parameter: String,
        reason: String,
    },

    /// A parameter not declared by the template was supplied.
    #[error("rule `{config}`: parameter `{parameter}` is not declared by template `{template}`")]
    UnknownParameter {
        config: String,
        parameter: String,
        template: String,
    },

    /// Two or more rules share an identical dimension tuple *and*
    /// effective priority, which would make matching nondeterministic.
    #[error("ambiguous rule set: {} share the same dimension tuple and priority", .names.join(", "))]
    AmbiguousRuleSet { names: Vec<String> },
}

/// Aggregated outcome of [`Validator::validate_batch`].
///
/// [`Validator::validate_batch`]: crate::config::Validator::validate_batch
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Every issue found across the whole batch.
    pub issues: Vec<ValidationIssue>,
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} configuration issue(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  - {issue}")?;
        }
        Ok(())
    }
}

/// Error raised while compiling a single configuration into a handler.
///
/// Always annotated with the originating configuration's name so a
/// failure in a batch of hundreds of rules is traceable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The configuration's template identifier is not in the catalog.
    #[error("rule `{config}`: template `{template}` is not registered")]
    UnknownTemplate { config: String, template: String },

    /// The factory rejected the configuration.
    #[error("rule `{config}`: invalid configuration: {reason}")]
    InvalidConfiguration { config: String, reason: String },
}

impl CompileError {
    /// Shorthand for factories rejecting a configuration.
    pub fn invalid(config: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            config: config.into(),
            reason: reason.into(),
        }
    }
}

/// Aggregated outcome of [`RuleCompiler::compile_batch`].
///
/// [`RuleCompiler::compile_batch`]: crate::compile::RuleCompiler::compile_batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileErrors(pub Vec<CompileError>);

impl std::error::Error for CompileErrors {}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} rule(s) failed to compile:", self.0.len())?;
        for err in &self.0 {
            writeln!(f, "  - {err}")?;
        }
        Ok(())
    }
}

/// Structural error while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A registry must declare at least one dimension.
    #[error("a registry requires at least one dimension")]
    NoDimensionsSpecified,

    /// An inserted rule's tuple length does not match the spec list.
    #[error("rule `{rule}` carries {got} dimension value(s), registry declares {expected}")]
    DimensionCountMismatch {
        rule: String,
        expected: usize,
        got: usize,
    },
}

/// Error raised while matching a record against the rule set.
///
/// Reported to the caller, never silently skipped: a record lacking a
/// field required by an active dimension is a data problem, not a
/// no-match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The record does not expose a field required by a dimension.
    #[error("record is missing field `{0}` required by an active dimension")]
    MissingField(String),
}

/// Failure inside an invoked handler.
///
/// Handler failures must propagate with the originating record's
/// identity attached (see [`DispatchError::Handler`]); returning an
/// error description as if it were valid output is disallowed by the
/// handler contract.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HandlerError {
    /// Creates a handler error from a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The human-readable failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of dispatching one record, surfaced to the harness.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No rule in the snapshot matched the record.
    ///
    /// Carries the dimension values that were evaluated so the failure
    /// is diagnosable without re-running the match.
    #[error("record `{record_id}`: no rule matched (evaluated {attempted:?})")]
    NoMatchingRule {
        record_id: String,
        attempted: Vec<(String, DimScalar)>,
    },

    /// The record lacks a field required by an active dimension.
    #[error("record `{record_id}`: missing field `{field}`")]
    MissingField { record_id: String, field: String },

    /// The matched handler failed; the cause is preserved.
    #[error("record `{record_id}`: handler of rule `{rule}` failed: {source}")]
    Handler {
        record_id: String,
        rule: String,
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// Identity of the record this failure belongs to.
    pub fn record_id(&self) -> &str {
        match self {
            Self::NoMatchingRule { record_id, .. }
            | Self::MissingField { record_id, .. }
            | Self::Handler { record_id, .. } => record_id,
        }
    }
}
