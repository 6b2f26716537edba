//! Rule configurations and batch validation.
//!
//! A [`RuleConfig`] is the immutable description of one routing rule:
//! which template builds its handler, a unique rule name, one value per
//! declared dimension, and the template-specific parameter bag. It is
//! owned by the caller until compiled and is never stored inside the
//! registry — compilation clones everything the handler needs.
//!
//! [`Validator`] checks configurations against the template catalog and
//! the dimension-spec list *before* any compilation happens.
//! [`Validator::validate_batch`] never stops at the first failure: it
//! aggregates every issue across the whole batch so all problems are
//! visible in one pass, including cross-configuration problems
//! (duplicate rule names, ambiguous identical tuple/priority pairs).
//!
//! # Key Types
//!
//! - [`ParamValue`] / [`ParamKind`]: the typed parameter bag
//! - [`RuleConfig`]: one rule description, builder-style construction
//! - [`Validator`]: single and batch validation

mod types;
mod validate;

pub use types::{ParamKind, ParamValue, RuleConfig};
pub use validate::Validator;
