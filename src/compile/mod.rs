//! Rule compilation: binding configurations to template factories.
//!
//! The compiler resolves a configuration's template in the catalog,
//! invokes its factory, and produces a [`CompiledHandler`] — the handler
//! plus the config-derived metadata a registry needs. Compilation takes
//! full ownership of everything the handler will use: handlers are
//! `'static`, so they cannot borrow from the source configuration, and
//! the dimension tuple is cloned in spec order at compile time. Later
//! mutation of the caller-owned configuration is unobservable.
//!
//! Every compile failure is annotated with the originating
//! configuration's name; [`RuleCompiler::compile_batch`] aggregates all
//! failures instead of stopping at the first.

mod compiler;

pub use compiler::{CompiledHandler, RuleCompiler};
