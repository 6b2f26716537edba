//! Registry construction and matching queries.

use super::priority::default_priority;
use super::types::{CompiledRule, RuleDescriptor};
use crate::catalog::SharedHandler;
use crate::compile::CompiledHandler;
use crate::dimension::{DimScalar, DimValue, DimensionSpec};
use crate::error::{MatchError, RegistryError};
use crate::record::Record;
use tracing::debug;

/// Reads one record value per dimension spec, in spec order.
///
/// Fails on the first field the record cannot produce; no rule is
/// consulted against a record the registry cannot fully probe.
pub(crate) fn probe_record<R: Record>(
    specs: &[DimensionSpec],
    record: &R,
) -> Result<Vec<DimScalar>, MatchError> {
    specs
        .iter()
        .map(|spec| {
            record
                .field(spec.field())
                .ok_or_else(|| MatchError::MissingField(spec.field().to_owned()))
        })
        .collect()
}

/// Selects the best rule among those passing: maximum priority, and
/// among equals the earliest inserted (strict `>` over an in-order scan).
pub(crate) fn best_rule<'a, R, O>(
    rules: &'a [CompiledRule<R, O>],
    probe: &[DimScalar],
) -> Option<&'a CompiledRule<R, O>> {
    let mut best: Option<&CompiledRule<R, O>> = None;
    for rule in rules {
        if !rule.matches(probe) {
            continue;
        }
        match best {
            Some(current) if rule.priority() <= current.priority() => {}
            _ => best = Some(rule),
        }
    }
    best
}

/// Ordered collection of compiled rules over a fixed dimension-spec list.
///
/// Generic over the record type `R` and the handler output `O`. Mutable
/// during the build phase only; a [`Dispatcher`](crate::dispatch::Dispatcher)
/// snapshot freezes the rule sequence as of the moment it is taken.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_dispatch::catalog::SharedHandler;
/// use u_dispatch::dimension::{DimValue, DimensionSpec};
/// use u_dispatch::record::MapRecord;
/// use u_dispatch::registry::Registry;
///
/// let mut registry: Registry<MapRecord, &'static str> = Registry::new(vec![
///     DimensionSpec::exact("ceding_company"),
///     DimensionSpec::exact("risk_class"),
/// ])
/// .unwrap();
///
/// let h1: SharedHandler<MapRecord, &'static str> = Arc::new(|_r: &MapRecord| Ok("h1"));
/// let h2: SharedHandler<MapRecord, &'static str> = Arc::new(|_r: &MapRecord| Ok("h2"));
/// registry
///     .insert(vec![DimValue::exact("axa"), DimValue::exact("death")], h1, "axa_death")
///     .unwrap();
/// registry
///     .insert(vec![DimValue::exact("axa"), DimValue::Wildcard], h2, "axa_any")
///     .unwrap();
///
/// let record = MapRecord::new("mp-1")
///     .with_field("ceding_company", "axa")
///     .with_field("risk_class", "death");
/// let best = registry.best_match(&record).unwrap().unwrap();
/// assert_eq!(best.name(), "axa_death"); // more specific rule wins
/// ```
pub struct Registry<R, O> {
    specs: Vec<DimensionSpec>,
    rules: Vec<CompiledRule<R, O>>,
}

impl<R, O> std::fmt::Debug for Registry<R, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("specs", &self.specs)
            .field("rule_count", &self.rules.len())
            .finish()
    }
}

impl<R: Record, O> Registry<R, O> {
    /// Creates an empty registry over `specs`.
    ///
    /// Fails with [`RegistryError::NoDimensionsSpecified`] if the list
    /// is empty; the spec list is immutable afterwards.
    pub fn new(specs: Vec<DimensionSpec>) -> Result<Self, RegistryError> {
        if specs.is_empty() {
            return Err(RegistryError::NoDimensionsSpecified);
        }
        Ok(Self {
            specs,
            rules: Vec::new(),
        })
    }

    /// Appends a rule with the computed default priority
    /// (`100 − 10 × wildcard_count`).
    pub fn insert(
        &mut self,
        values: Vec<DimValue>,
        handler: SharedHandler<R, O>,
        name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let priority = default_priority(&values);
        self.push(values, handler, name.into(), priority)
    }

    /// Appends a rule with an explicit priority override.
    pub fn insert_with_priority(
        &mut self,
        values: Vec<DimValue>,
        handler: SharedHandler<R, O>,
        name: impl Into<String>,
        priority: i32,
    ) -> Result<(), RegistryError> {
        self.push(values, handler, name.into(), priority)
    }

    /// Appends the output of [`RuleCompiler::compile`].
    ///
    /// [`RuleCompiler::compile`]: crate::compile::RuleCompiler::compile
    pub fn insert_compiled(&mut self, compiled: CompiledHandler<R, O>) -> Result<(), RegistryError> {
        let CompiledHandler {
            name,
            values,
            priority,
            handler,
        } = compiled;
        let priority = priority.unwrap_or_else(|| default_priority(&values));
        self.push(values, handler, name, priority)
    }

    fn push(
        &mut self,
        values: Vec<DimValue>,
        handler: SharedHandler<R, O>,
        name: String,
        priority: i32,
    ) -> Result<(), RegistryError> {
        if values.len() != self.specs.len() {
            return Err(RegistryError::DimensionCountMismatch {
                rule: name,
                expected: self.specs.len(),
                got: values.len(),
            });
        }
        let index = self.rules.len();
        debug!(rule = %name, priority, index, "inserted rule");
        self.rules
            .push(CompiledRule::new(name, values, priority, handler, index));
        Ok(())
    }

    /// The fixed dimension-spec list.
    pub fn specs(&self) -> &[DimensionSpec] {
        &self.specs
    }

    /// Handler-free descriptors of all rules, in insertion order.
    pub fn rules(&self) -> Vec<RuleDescriptor> {
        self.rules.iter().map(CompiledRule::descriptor).collect()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn parts(&self) -> (&[DimensionSpec], &[CompiledRule<R, O>]) {
        (&self.specs, &self.rules)
    }

    /// All rules passing the conjunction for `record`, in insertion order.
    ///
    /// Diagnostic counterpart of [`best_match`](Self::best_match).
    pub fn matching(&self, record: &R) -> Result<Vec<&CompiledRule<R, O>>, MatchError> {
        let probe = probe_record(&self.specs, record)?;
        Ok(self
            .rules
            .iter()
            .filter(|rule| rule.matches(&probe))
            .collect())
    }

    /// The single best-matching rule for `record`, if any.
    ///
    /// `Ok(None)` is the no-match signal — the caller decides how to
    /// surface it. A record missing a required field fails with
    /// [`MatchError::MissingField`] before any rule is consulted.
    pub fn best_match(&self, record: &R) -> Result<Option<&CompiledRule<R, O>>, MatchError> {
        let probe = probe_record(&self.specs, record)?;
        Ok(best_rule(&self.rules, &probe))
    }
}
