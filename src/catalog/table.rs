//! The identifier → factory table.

use super::template::{HandlerFactory, TemplateSpec};
use crate::error::{RegistrationError, UnknownTemplate};
use std::collections::HashMap;
use tracing::debug;

struct TemplateEntry<R, O> {
    spec: TemplateSpec,
    factory: Box<dyn HandlerFactory<R, O>>,
}

/// Table of registered templates, generic over the record type `R` and
/// the handler output type `O`.
///
/// Populated once during an initialization phase (single-threaded by
/// convention), then [`sealed`](Self::seal) and passed by reference to
/// the validator and compiler. Registration after sealing fails with
/// [`RegistrationError::CatalogSealed`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_dispatch::catalog::{SharedHandler, TemplateCatalog, TemplateSpec};
/// use u_dispatch::config::RuleConfig;
/// use u_dispatch::record::MapRecord;
///
/// let mut catalog: TemplateCatalog<MapRecord, Vec<f64>> = TemplateCatalog::new();
/// catalog
///     .register(TemplateSpec::new("cqs"), |_config: &RuleConfig| {
///         let handler: SharedHandler<MapRecord, Vec<f64>> =
///             Arc::new(|_record: &MapRecord| Ok(vec![0.0]));
///         Ok(handler)
///     })
///     .unwrap();
/// catalog.seal();
///
/// assert!(catalog.contains("cqs"));
/// assert!(catalog.get("annuity").is_err());
/// ```
pub struct TemplateCatalog<R, O> {
    templates: HashMap<String, TemplateEntry<R, O>>,
    sealed: bool,
}

impl<R, O> TemplateCatalog<R, O> {
    /// Creates an empty, unsealed catalog.
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            sealed: false,
        }
    }

    /// Registers a template declaration together with its factory.
    ///
    /// Fails with [`RegistrationError::DuplicateTemplate`] if the
    /// identifier is taken, [`RegistrationError::InvalidFactory`] if the
    /// declaration is malformed, and [`RegistrationError::CatalogSealed`]
    /// after [`seal`](Self::seal).
    pub fn register(
        &mut self,
        spec: TemplateSpec,
        factory: impl HandlerFactory<R, O> + 'static,
    ) -> Result<(), RegistrationError> {
        if self.sealed {
            return Err(RegistrationError::CatalogSealed);
        }
        if let Some(reason) = spec.declaration_error() {
            return Err(RegistrationError::InvalidFactory {
                name: spec.name.clone(),
                reason,
            });
        }
        if self.templates.contains_key(&spec.name) {
            return Err(RegistrationError::DuplicateTemplate(spec.name.clone()));
        }
        debug!(template = %spec.name, params = spec.params.len(), "registered template");
        self.templates.insert(
            spec.name.clone(),
            TemplateEntry {
                spec,
                factory: Box::new(factory),
            },
        );
        Ok(())
    }

    /// Ends the registration phase; later `register` calls fail.
    pub fn seal(&mut self) {
        self.sealed = true;
        debug!(templates = self.templates.len(), "catalog sealed");
    }

    /// Whether the registration phase is over.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// The declaration registered under `name`.
    pub fn get(&self, name: &str) -> Result<&TemplateSpec, UnknownTemplate> {
        self.templates
            .get(name)
            .map(|entry| &entry.spec)
            .ok_or_else(|| UnknownTemplate(name.to_owned()))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// All registered identifiers, in unspecified order.
    pub fn list(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub(crate) fn factory(&self, name: &str) -> Option<&dyn HandlerFactory<R, O>> {
        self.templates.get(name).map(|entry| entry.factory.as_ref())
    }
}

impl<R, O> Default for TemplateCatalog<R, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SharedHandler;
    use crate::config::RuleConfig;
    use crate::error::CompileError;
    use std::sync::Arc;

    type Catalog = TemplateCatalog<i64, i64>;

    fn noop_factory(_config: &RuleConfig) -> Result<SharedHandler<i64, i64>, CompileError> {
        Ok(Arc::new(|record: &i64| Ok(*record)))
    }

    #[test]
    fn test_register_and_get() {
        let mut catalog = Catalog::new();
        catalog
            .register(TemplateSpec::new("cqs"), noop_factory)
            .unwrap();

        assert!(catalog.contains("cqs"));
        assert_eq!(catalog.get("cqs").unwrap().name, "cqs");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut catalog = Catalog::new();
        catalog
            .register(TemplateSpec::new("cqs"), noop_factory)
            .unwrap();

        let err = catalog
            .register(TemplateSpec::new("cqs"), noop_factory)
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateTemplate(name) if name == "cqs"));
    }

    #[test]
    fn test_unknown_template() {
        let catalog = Catalog::new();
        let err = catalog.get("annuity").unwrap_err();
        assert_eq!(err, UnknownTemplate("annuity".into()));
    }

    #[test]
    fn test_sealed_catalog_rejects_registration() {
        let mut catalog = Catalog::new();
        catalog.seal();
        let err = catalog
            .register(TemplateSpec::new("cqs"), noop_factory)
            .unwrap_err();
        assert!(matches!(err, RegistrationError::CatalogSealed));
        assert!(catalog.is_sealed());
    }

    #[test]
    fn test_malformed_declaration_rejected() {
        let mut catalog = Catalog::new();
        let err = catalog
            .register(TemplateSpec::new(""), noop_factory)
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidFactory { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_list_returns_all_names() {
        let mut catalog = Catalog::new();
        catalog
            .register(TemplateSpec::new("cqs"), noop_factory)
            .unwrap();
        catalog
            .register(TemplateSpec::new("surplus"), noop_factory)
            .unwrap();

        let mut names = catalog.list();
        names.sort_unstable();
        assert_eq!(names, vec!["cqs", "surplus"]);
    }
}
