//! The configuration → handler compiler.

use crate::catalog::{SharedHandler, TemplateCatalog};
use crate::config::RuleConfig;
use crate::dimension::{DimValue, DimensionSpec};
use crate::error::{CompileError, CompileErrors};
use tracing::debug;

/// A configuration compiled into registry-ready form.
///
/// Everything is owned: the tuple is cloned from the configuration in
/// dimension-spec order and the handler captured its parameters by
/// value inside the factory.
pub struct CompiledHandler<R, O> {
    /// Name of the originating configuration.
    pub name: String,
    /// Dimension-value tuple, in spec order.
    pub values: Vec<DimValue>,
    /// Explicit priority override, if the configuration carried one.
    pub priority: Option<i32>,
    /// The bound handler.
    pub handler: SharedHandler<R, O>,
}

impl<R, O> std::fmt::Debug for CompiledHandler<R, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledHandler")
            .field("name", &self.name)
            .field("values", &self.values)
            .field("priority", &self.priority)
            .field("handler", &"<handler>")
            .finish()
    }
}

/// Compiles validated configurations against a sealed catalog.
///
/// # Examples
///
/// ```ignore
/// let compiler = RuleCompiler::new(&catalog, &specs);
/// let compiled = compiler.compile_batch(&configs)?;
/// for rule in compiled {
///     registry.insert_compiled(rule)?;
/// }
/// ```
pub struct RuleCompiler<'a, R, O> {
    catalog: &'a TemplateCatalog<R, O>,
    specs: &'a [DimensionSpec],
}

impl<'a, R, O> RuleCompiler<'a, R, O> {
    /// Creates a compiler over `catalog` and `specs`.
    pub fn new(catalog: &'a TemplateCatalog<R, O>, specs: &'a [DimensionSpec]) -> Self {
        Self { catalog, specs }
    }

    /// Compiles one configuration.
    ///
    /// Fails with [`CompileError::UnknownTemplate`] if the template is
    /// not registered, or with whatever [`CompileError::InvalidConfiguration`]
    /// the factory raises; both carry the configuration's name. The
    /// missing-dimension guard here is a backstop — validation reports
    /// the same problem with full batch context first.
    pub fn compile(&self, config: &RuleConfig) -> Result<CompiledHandler<R, O>, CompileError> {
        let factory =
            self.catalog
                .factory(&config.template)
                .ok_or_else(|| CompileError::UnknownTemplate {
                    config: config.name.clone(),
                    template: config.template.clone(),
                })?;

        let values = self
            .specs
            .iter()
            .map(|spec| {
                config.dimension(&spec.name).cloned().ok_or_else(|| {
                    CompileError::invalid(
                        &config.name,
                        format!("no value for dimension `{}`", spec.name),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let handler = factory.build(config)?;
        debug!(rule = %config.name, template = %config.template, "compiled rule");

        Ok(CompiledHandler {
            name: config.name.clone(),
            values,
            priority: config.priority,
            handler,
        })
    }

    /// Compiles a whole batch, aggregating every failure.
    ///
    /// Returns all compiled rules in input order, or every
    /// [`CompileError`] the batch produced — never just the first.
    pub fn compile_batch(
        &self,
        configs: &[RuleConfig],
    ) -> Result<Vec<CompiledHandler<R, O>>, CompileErrors> {
        let mut compiled = Vec::with_capacity(configs.len());
        let mut errors = Vec::new();
        for config in configs {
            match self.compile(config) {
                Ok(rule) => compiled.push(rule),
                Err(err) => errors.push(err),
            }
        }
        if errors.is_empty() {
            Ok(compiled)
        } else {
            Err(CompileErrors(errors))
        }
    }
}
