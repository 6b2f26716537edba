//! Configuration validation against the catalog and dimension specs.

use super::types::RuleConfig;
use crate::catalog::TemplateCatalog;
use crate::dimension::{DimValue, DimensionSpec};
use crate::error::{ValidationError, ValidationIssue};
use crate::registry::default_priority;
use std::collections::HashMap;

/// Validates configurations before compilation.
///
/// Borrows the sealed catalog and the registry's dimension-spec list;
/// both stay read-only. Single-config validation returns every issue
/// found in that configuration; batch validation additionally runs the
/// cross-configuration checks (duplicate rule names, ambiguous
/// tuple/priority pairs) and never stops at the first failure.
///
/// # Examples
///
/// ```ignore
/// let validator = Validator::new(&catalog, &specs);
/// validator.validate_batch(&configs)?; // all issues at once, or Ok
/// ```
pub struct Validator<'a, R, O> {
    catalog: &'a TemplateCatalog<R, O>,
    specs: &'a [DimensionSpec],
}

impl<'a, R, O> Validator<'a, R, O> {
    /// Creates a validator over `catalog` and `specs`.
    pub fn new(catalog: &'a TemplateCatalog<R, O>, specs: &'a [DimensionSpec]) -> Self {
        Self { catalog, specs }
    }

    /// Validates one configuration, returning every issue found.
    ///
    /// An empty vector means the configuration is acceptable on its own;
    /// batch-level problems (duplicate names, ambiguity) are only
    /// detectable by [`validate_batch`](Self::validate_batch).
    pub fn validate(&self, config: &RuleConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if config.name.is_empty() {
            issues.push(ValidationIssue::EmptyName {
                template: config.template.clone(),
            });
        }

        let template = match self.catalog.get(&config.template) {
            Ok(spec) => Some(spec),
            Err(_) => {
                issues.push(ValidationIssue::UnknownTemplate {
                    config: config.name.clone(),
                    template: config.template.clone(),
                });
                None
            }
        };

        for spec in self.specs {
            match config.dimension(&spec.name) {
                None => issues.push(ValidationIssue::MissingDimension {
                    config: config.name.clone(),
                    dimension: spec.name.clone(),
                }),
                Some(value) if !spec.accepts(value) => {
                    let kind = if spec.is_range() { "range" } else { "exact" };
                    issues.push(ValidationIssue::KindMismatch {
                        config: config.name.clone(),
                        dimension: spec.name.clone(),
                        reason: format!("a {kind} dimension cannot take the value `{value}`"),
                    });
                }
                Some(_) => {}
            }
        }

        for (dimension, _) in config.dimensions() {
            if !self.specs.iter().any(|spec| spec.name == dimension) {
                issues.push(ValidationIssue::UnknownDimension {
                    config: config.name.clone(),
                    dimension: dimension.to_owned(),
                });
            }
        }

        if let Some(template) = template {
            for param in &template.params {
                match config.param(&param.name) {
                    None if param.required => issues.push(ValidationIssue::MissingParameter {
                        config: config.name.clone(),
                        parameter: param.name.clone(),
                    }),
                    None => {}
                    Some(value) => {
                        if let Err(reason) = param.check(value) {
                            issues.push(ValidationIssue::InvalidParameter {
                                config: config.name.clone(),
                                parameter: param.name.clone(),
                                reason,
                            });
                        }
                    }
                }
            }
            for (parameter, _) in config.params() {
                if template.param(parameter).is_none() {
                    issues.push(ValidationIssue::UnknownParameter {
                        config: config.name.clone(),
                        parameter: parameter.to_owned(),
                        template: template.name.clone(),
                    });
                }
            }
        }

        issues
    }

    /// Validates a whole batch, aggregating every issue.
    ///
    /// Runs [`validate`](Self::validate) on each configuration
    /// independently, then the cross-configuration checks: each
    /// configuration whose name is shared gets its own duplicate-name
    /// issue, and groups of rules with an identical dimension tuple and
    /// identical effective priority are reported as ambiguous (two such
    /// rules would make matching nondeterministic). A batch with any
    /// issue is rejected as a whole — no rule from it should reach a
    /// registry.
    pub fn validate_batch(&self, configs: &[RuleConfig]) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        for config in configs {
            issues.extend(self.validate(config));
        }

        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for config in configs {
            *name_counts.entry(config.name.as_str()).or_default() += 1;
        }
        for config in configs {
            if !config.name.is_empty() && name_counts[config.name.as_str()] > 1 {
                issues.push(ValidationIssue::DuplicateName {
                    name: config.name.clone(),
                });
            }
        }

        // Ambiguity check over complete tuples; incomplete ones are
        // already reported as missing dimensions above.
        let mut groups: HashMap<(Vec<DimValue>, i32), Vec<String>> = HashMap::new();
        for config in configs {
            let tuple: Option<Vec<DimValue>> = self
                .specs
                .iter()
                .map(|spec| config.dimension(&spec.name).cloned())
                .collect();
            let Some(tuple) = tuple else { continue };
            let priority = config.priority.unwrap_or_else(|| default_priority(&tuple));
            groups
                .entry((tuple, priority))
                .or_default()
                .push(config.name.clone());
        }
        let mut ambiguous: Vec<Vec<String>> = groups
            .into_values()
            .filter(|names| names.len() > 1)
            .collect();
        ambiguous.sort();
        for names in ambiguous {
            issues.push(ValidationIssue::AmbiguousRuleSet { names });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}
