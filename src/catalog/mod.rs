//! Template catalog: named handler factories and their parameter schemas.
//!
//! A *template* is a reusable computation shape; binding it to a
//! [`RuleConfig`](crate::config::RuleConfig) produces a concrete
//! [`RuleHandler`]. The catalog maps template identifiers to factories
//! and is an explicit object passed by reference into the compiler —
//! never ambient global state.
//!
//! The catalog follows a build-then-freeze discipline: it is populated
//! single-threaded during an initialization phase, then [`sealed`]
//! before dispatch begins, after which further registration fails.
//!
//! # Core Traits
//!
//! - [`RuleHandler`]: the compiled, parameter-bound computation;
//!   callable repeatedly, order-independent, side-effect-free
//! - [`HandlerFactory`]: turns a configuration into a handler
//!
//! # Key Types
//!
//! - [`TemplateSpec`] / [`ParamSpec`]: the declared parameter schema a
//!   configuration is validated against
//! - [`TemplateCatalog`]: identifier → factory table with [`sealed`]
//!   registration
//!
//! [`sealed`]: TemplateCatalog::seal

mod table;
mod template;

pub use table::TemplateCatalog;
pub use template::{HandlerFactory, ParamSpec, RuleHandler, SharedHandler, TemplateSpec};
