//! Guarded attribute access.
//!
//! A [`GuardedAccessor`] mediates attribute reads on objects reached through a
//! namespace, so an access-control policy can intercept them. When none is
//! installed, reads fall back to [`plain_getattr`].
//!
//! # Contract
//!
//! - A missing attribute is reported as `AttributeNotFound`; this is the only
//!   failure readers treat as a miss.
//! - A refusal is reported as `PolicyDenial` (or any other error) and is
//!   always surfaced to the caller.

use rustc_hash::FxHashSet;
use std::fmt;
use std::rc::Rc;

use crate::errors::{NamespaceError, NamespaceResult};
use crate::value::Value;

pub trait GuardedAccessor: fmt::Debug {
    fn access(&self, target: &Value, name: &str) -> NamespaceResult<Value>;
}

/// Accessor handle shared between a stack and the views it creates.
pub type SharedAccessor = Rc<dyn GuardedAccessor>;

/// Attribute read without any policy.
#[inline]
pub fn plain_getattr(target: &Value, name: &str) -> NamespaceResult<Value> {
    target.get_attr(name)
}

/// Read through `accessor` when present, else plainly.
pub fn guarded_getattr(
    accessor: Option<&SharedAccessor>,
    target: &Value,
    name: &str,
) -> NamespaceResult<Value> {
    match accessor {
        Some(accessor) => accessor.access(target, name),
        None => plain_getattr(target, name),
    }
}

/// Accessor backed by a closure.
pub struct FnAccessor<F>(F);

impl<F> FnAccessor<F>
where
    F: Fn(&Value, &str) -> NamespaceResult<Value>,
{
    pub fn new(f: F) -> Self {
        FnAccessor(f)
    }
}

impl<F> GuardedAccessor for FnAccessor<F>
where
    F: Fn(&Value, &str) -> NamespaceResult<Value>,
{
    fn access(&self, target: &Value, name: &str) -> NamespaceResult<Value> {
        (self.0)(target, name)
    }
}

impl<F> fmt::Debug for FnAccessor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnAccessor")
    }
}

/// Denies a fixed set of attribute names and reads everything else plainly.
#[derive(Clone, Debug, Default)]
pub struct DenyNames {
    denied: FxHashSet<String>,
}

impl DenyNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DenyNames {
            denied: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl GuardedAccessor for DenyNames {
    fn access(&self, target: &Value, name: &str) -> NamespaceResult<Value> {
        if self.denied.contains(name) {
            tracing::debug!(name, target = target.type_name(), "attribute access denied");
            return Err(NamespaceError::policy_denial(
                name,
                format!("'{name}' is not accessible on '{}'", target.type_name()),
            ));
        }
        plain_getattr(target, name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
