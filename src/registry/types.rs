//! Compiled rules and their listing view.

use crate::catalog::SharedHandler;
use crate::dimension::{DimScalar, DimValue};

/// A rule as stored inside a registry.
///
/// Carries the dimension-value tuple (one entry per dimension spec, in
/// spec order), the resolved priority, the shared handler, the
/// originating configuration's name for traceability, and the insertion
/// index used for the deterministic tie-break.
pub struct CompiledRule<R, O> {
    name: String,
    values: Vec<DimValue>,
    priority: i32,
    handler: SharedHandler<R, O>,
    index: usize,
}

impl<R, O> CompiledRule<R, O> {
    pub(crate) fn new(
        name: String,
        values: Vec<DimValue>,
        priority: i32,
        handler: SharedHandler<R, O>,
        index: usize,
    ) -> Self {
        Self {
            name,
            values,
            priority,
            handler,
            index,
        }
    }

    /// Name of the originating configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dimension-value tuple, in spec order.
    pub fn values(&self) -> &[DimValue] {
        &self.values
    }

    /// Resolved priority (computed or explicit).
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Insertion index within the registry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The bound handler.
    pub fn handler(&self) -> &SharedHandler<R, O> {
        &self.handler
    }

    /// Handler-free view for listing and diagnostics.
    pub fn descriptor(&self) -> RuleDescriptor {
        RuleDescriptor {
            name: self.name.clone(),
            values: self.values.clone(),
            priority: self.priority,
            index: self.index,
        }
    }

    /// Conjunction across all dimensions against a probed record.
    ///
    /// `probe` holds one record value per dimension spec, in spec order.
    pub(crate) fn matches(&self, probe: &[DimScalar]) -> bool {
        self.values
            .iter()
            .zip(probe)
            .all(|(value, actual)| value.matches(actual))
    }
}

// Manual impl: handlers are shared `Arc`s, so cloning a rule never
// requires `R: Clone` or `O: Clone`.
impl<R, O> Clone for CompiledRule<R, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            values: self.values.clone(),
            priority: self.priority,
            handler: self.handler.clone(),
            index: self.index,
        }
    }
}

impl<R, O> std::fmt::Debug for CompiledRule<R, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledRule")
            .field("name", &self.name)
            .field("values", &self.values)
            .field("priority", &self.priority)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Handler-free description of one compiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleDescriptor {
    /// Name of the originating configuration.
    pub name: String,
    /// Dimension-value tuple, in spec order.
    pub values: Vec<DimValue>,
    /// Resolved priority.
    pub priority: i32,
    /// Insertion index.
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn rule(values: Vec<DimValue>, priority: i32) -> CompiledRule<i64, i64> {
        CompiledRule::new(
            "r".into(),
            values,
            priority,
            Arc::new(|record: &i64| Ok(*record)),
            0,
        )
    }

    #[test]
    fn test_matches_is_a_conjunction() {
        let r = rule(
            vec![DimValue::exact("axa"), DimValue::Wildcard],
            90,
        );
        assert!(r.matches(&[DimScalar::from("axa"), DimScalar::from("death")]));
        assert!(!r.matches(&[DimScalar::from("cf"), DimScalar::from("death")]));
    }

    #[test]
    fn test_descriptor_reflects_rule() {
        let r = rule(vec![DimValue::Wildcard], 70);
        let d = r.descriptor();
        assert_eq!(d.name, "r");
        assert_eq!(d.priority, 70);
        assert_eq!(d.values, vec![DimValue::Wildcard]);
    }

    #[test]
    fn test_clone_shares_handler() {
        let r = rule(vec![DimValue::Wildcard], 70);
        let c = r.clone();
        assert!(Arc::ptr_eq(r.handler(), c.handler()));
    }
}
