//! The single-record dispatch operation.

use crate::dimension::DimensionSpec;
use crate::error::{DispatchError, MatchError};
use crate::record::Record;
use crate::registry::{CompiledRule, Registry, RuleDescriptor};
use tracing::{debug, trace};

/// An immutable snapshot of a registry's rule sequence.
///
/// Owns its own copy of the dimension specs and rules — no back
/// reference to the live registry — and exposes one operation: find the
/// best-matching rule for a record and invoke its handler.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_dispatch::catalog::SharedHandler;
/// use u_dispatch::dimension::{DimValue, DimensionSpec};
/// use u_dispatch::dispatch::Dispatcher;
/// use u_dispatch::record::MapRecord;
/// use u_dispatch::registry::Registry;
///
/// let mut registry: Registry<MapRecord, &'static str> =
///     Registry::new(vec![DimensionSpec::exact("risk_class")]).unwrap();
/// let handler: SharedHandler<MapRecord, &'static str> =
///     Arc::new(|_r: &MapRecord| Ok("priced"));
/// registry
///     .insert(vec![DimValue::Wildcard], handler, "catch_all")
///     .unwrap();
///
/// let dispatcher = Dispatcher::snapshot(&registry);
/// let record = MapRecord::new("mp-1").with_field("risk_class", "death");
/// assert_eq!(dispatcher.dispatch(&record).unwrap(), "priced");
/// ```
pub struct Dispatcher<R, O> {
    specs: Vec<DimensionSpec>,
    rules: Vec<CompiledRule<R, O>>,
}

impl<R: Record, O> Dispatcher<R, O> {
    /// Takes an immutable snapshot of `registry`.
    ///
    /// The rule sequence is copied; inserts into the live registry
    /// after this call are invisible to the snapshot.
    pub fn snapshot(registry: &Registry<R, O>) -> Self {
        let (specs, rules) = registry.parts();
        debug!(rules = rules.len(), "dispatcher snapshot taken");
        Self {
            specs: specs.to_vec(),
            rules: rules.to_vec(),
        }
    }

    /// Routes one record to its best-matching handler and runs it.
    ///
    /// Outcomes:
    /// - `Ok(output)` — a rule matched and its handler succeeded;
    /// - [`DispatchError::NoMatchingRule`] — no rule passed; carries the
    ///   record's identity and the dimension values that were evaluated;
    /// - [`DispatchError::MissingField`] — the record cannot be probed
    ///   for a required field; no handler is invoked;
    /// - [`DispatchError::Handler`] — the handler failed; the cause
    ///   propagates with the record's identity and the rule's name, and
    ///   is never converted into a placeholder success.
    pub fn dispatch(&self, record: &R) -> Result<O, DispatchError> {
        let probe = match crate::registry::probe_record(&self.specs, record) {
            Ok(probe) => probe,
            Err(MatchError::MissingField(field)) => {
                return Err(DispatchError::MissingField {
                    record_id: record.id(),
                    field,
                });
            }
        };

        let Some(rule) = crate::registry::best_rule(&self.rules, &probe) else {
            let attempted = self
                .specs
                .iter()
                .map(|spec| spec.name.clone())
                .zip(probe)
                .collect();
            return Err(DispatchError::NoMatchingRule {
                record_id: record.id(),
                attempted,
            });
        };

        trace!(rule = %rule.name(), priority = rule.priority(), "dispatching record");
        rule.handler()
            .call(record)
            .map_err(|source| DispatchError::Handler {
                record_id: record.id(),
                rule: rule.name().to_owned(),
                source,
            })
    }

    /// Handler-free descriptors of the snapshot, in insertion order.
    pub fn rules(&self) -> Vec<RuleDescriptor> {
        self.rules.iter().map(CompiledRule::descriptor).collect()
    }

    /// The snapshot's dimension specs.
    pub fn specs(&self) -> &[DimensionSpec] {
        &self.specs
    }

    /// Number of rules in the snapshot.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the snapshot holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SharedHandler;
    use crate::dimension::{DimScalar, DimValue};
    use crate::error::HandlerError;
    use crate::record::MapRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type Disp = Dispatcher<MapRecord, &'static str>;

    fn handler(tag: &'static str) -> SharedHandler<MapRecord, &'static str> {
        Arc::new(move |_record: &MapRecord| Ok(tag))
    }

    fn record(ceding: &str, risk: &str) -> MapRecord {
        MapRecord::new(format!("mp_{ceding}_{risk}"))
            .with_field("ceding_company", ceding)
            .with_field("risk_class", risk)
    }

    fn scenario_registry() -> Registry<MapRecord, &'static str> {
        let mut registry = Registry::new(vec![
            DimensionSpec::exact("ceding_company"),
            DimensionSpec::exact("risk_class"),
        ])
        .unwrap();
        registry
            .insert_with_priority(
                vec![DimValue::exact("axa"), DimValue::exact("death")],
                handler("h1"),
                "axa_death",
                100,
            )
            .unwrap();
        registry
            .insert_with_priority(
                vec![DimValue::exact("axa"), DimValue::Wildcard],
                handler("h2"),
                "axa_any",
                90,
            )
            .unwrap();
        registry
            .insert_with_priority(
                vec![DimValue::Wildcard, DimValue::Wildcard],
                handler("h3"),
                "catch_all",
                70,
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_specificity_ladder_dispatch() {
        let dispatcher = Dispatcher::snapshot(&scenario_registry());

        assert_eq!(dispatcher.dispatch(&record("axa", "death")).unwrap(), "h1");
        assert_eq!(dispatcher.dispatch(&record("axa", "loe")).unwrap(), "h2");
        assert_eq!(dispatcher.dispatch(&record("cf", "death")).unwrap(), "h3");
    }

    #[test]
    fn test_missing_field_invokes_no_handler() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = invocations.clone();
        let counting: SharedHandler<MapRecord, &'static str> =
            Arc::new(move |_record: &MapRecord| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok("h")
            });

        let mut registry: Registry<MapRecord, &'static str> = Registry::new(vec![
            DimensionSpec::exact("ceding_company"),
            DimensionSpec::exact("risk_class"),
        ])
        .unwrap();
        registry
            .insert(
                vec![DimValue::Wildcard, DimValue::Wildcard],
                counting,
                "catch_all",
            )
            .unwrap();
        let dispatcher = Dispatcher::snapshot(&registry);

        let incomplete = MapRecord::new("mp-7").with_field("ceding_company", "axa");
        let err = dispatcher.dispatch(&incomplete).unwrap_err();

        assert!(matches!(
            err,
            DispatchError::MissingField { ref record_id, ref field }
                if record_id == "mp-7" && field == "risk_class"
        ));
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_matching_rule_reports_attempted_values() {
        let mut registry: Registry<MapRecord, &'static str> =
            Registry::new(vec![DimensionSpec::exact("ceding_company")]).unwrap();
        registry
            .insert(vec![DimValue::exact("axa")], handler("h"), "axa_only")
            .unwrap();
        let dispatcher = Dispatcher::snapshot(&registry);

        let stranger = MapRecord::new("mp-9").with_field("ceding_company", "zz");
        let err = dispatcher.dispatch(&stranger).unwrap_err();

        match err {
            DispatchError::NoMatchingRule {
                record_id,
                attempted,
            } => {
                assert_eq!(record_id, "mp-9");
                assert_eq!(
                    attempted,
                    vec![("ceding_company".to_string(), DimScalar::from("zz"))]
                );
            }
            other => panic!("expected NoMatchingRule, got {other:?}"),
        }
    }

    #[test]
    fn test_handler_failure_propagates_with_identity() {
        let failing: SharedHandler<MapRecord, &'static str> = Arc::new(
            |_record: &MapRecord| Err(HandlerError::new("mortality table not loaded")),
        );
        let mut registry: Registry<MapRecord, &'static str> =
            Registry::new(vec![DimensionSpec::exact("ceding_company")]).unwrap();
        registry
            .insert(vec![DimValue::Wildcard], failing, "broken")
            .unwrap();
        let dispatcher = Dispatcher::snapshot(&registry);

        let record = MapRecord::new("mp-3").with_field("ceding_company", "axa");
        let err = dispatcher.dispatch(&record).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Handler { ref record_id, ref rule, .. }
                if record_id == "mp-3" && rule == "broken"
        ));
    }

    #[test]
    fn test_snapshot_is_frozen_against_later_inserts() {
        let mut registry = scenario_registry();
        let dispatcher: Disp = Dispatcher::snapshot(&registry);
        assert_eq!(dispatcher.len(), 3);

        // A later, higher-priority insert is invisible to the snapshot...
        registry
            .insert_with_priority(
                vec![DimValue::exact("axa"), DimValue::exact("death")],
                handler("late"),
                "late_override",
                200,
            )
            .unwrap();
        assert_eq!(dispatcher.dispatch(&record("axa", "death")).unwrap(), "h1");
        assert_eq!(dispatcher.len(), 3);

        // ...and visible to a fresh one.
        let fresh = Dispatcher::snapshot(&registry);
        assert_eq!(fresh.dispatch(&record("axa", "death")).unwrap(), "late");
    }

    #[test]
    fn test_build_then_freeze_pipeline() {
        use crate::catalog::{ParamSpec, TemplateCatalog, TemplateSpec};
        use crate::compile::RuleCompiler;
        use crate::config::{ParamKind, RuleConfig, Validator};
        use crate::error::CompileError;

        // Initialization: register the template, seal the catalog.
        let mut catalog: TemplateCatalog<MapRecord, f64> = TemplateCatalog::new();
        catalog
            .register(
                TemplateSpec::new("flat_rate")
                    .with_param(ParamSpec::required("rate", ParamKind::Float)),
                |config: &RuleConfig| -> Result<SharedHandler<MapRecord, f64>, CompileError> {
                    let rate = config
                        .float_param("rate")
                        .ok_or_else(|| CompileError::invalid(&config.name, "missing `rate`"))?;
                    Ok(Arc::new(move |_record: &MapRecord| Ok(rate)))
                },
            )
            .unwrap();
        catalog.seal();

        let specs = vec![
            DimensionSpec::exact("risk_class"),
            DimensionSpec::range("uw_year"),
        ];
        let configs = vec![
            RuleConfig::new("flat_rate", "recent_death")
                .with_dimension("risk_class", "death")
                .with_dimension("uw_year", DimValue::range_from(2023))
                .with_param("rate", 0.97),
            RuleConfig::new("flat_rate", "default")
                .with_dimension("risk_class", DimValue::Wildcard)
                .with_dimension("uw_year", DimValue::Range(None, None))
                .with_param("rate", 1.0),
        ];

        // Validate, compile, insert, freeze.
        Validator::new(&catalog, &specs)
            .validate_batch(&configs)
            .unwrap();
        let compiler = RuleCompiler::new(&catalog, &specs);
        let mut registry = Registry::new(specs.clone()).unwrap();
        for compiled in compiler.compile_batch(&configs).unwrap() {
            registry.insert_compiled(compiled).unwrap();
        }
        let dispatcher = Dispatcher::snapshot(&registry);

        let recent = MapRecord::new("mp-1")
            .with_field("risk_class", "death")
            .with_field("uw_year", 2024);
        let old = MapRecord::new("mp-2")
            .with_field("risk_class", "death")
            .with_field("uw_year", 2019);
        assert_eq!(dispatcher.dispatch(&recent).unwrap(), 0.97);
        assert_eq!(dispatcher.dispatch(&old).unwrap(), 1.0);
    }

    #[test]
    fn test_rules_lists_snapshot_in_order() {
        let dispatcher = Dispatcher::snapshot(&scenario_registry());
        let names: Vec<_> = dispatcher.rules().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["axa_death", "axa_any", "catch_all"]);
    }
}
