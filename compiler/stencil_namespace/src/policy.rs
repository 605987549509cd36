//! Call-on-access resolution.
//!
//! Template variables are often accessors or sub-templates. When a lookup
//! asks for invocation, the fetched value goes through [`resolve`]:
//!
//! 1. A render hook wins: the object renders itself against the namespace.
//! 2. One layer of wrapping is stripped to decide callability. The template
//!    marker is read from that unwrapped form only.
//! 3. Non-callables are returned unchanged.
//! 4. Templates are invoked with `(no client, namespace)`.
//! 5. Anything else callable is invoked with no arguments.
//!
//! Invocation always goes to the original (possibly wrapped) value, and its
//! errors propagate untouched: a `MissingKey` raised inside a callable is not
//! a miss of the outer lookup.

use crate::errors::NamespaceResult;
use crate::namespace::NamespaceStack;
use crate::value::Value;

/// How [`resolve`] will treat a value that has no render hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// Returned as-is.
    Inert,
    /// Called with `(no client, namespace)`.
    Template,
    /// Called with no arguments.
    Plain,
}

/// Classify a value by its unwrapped form.
pub fn classify(value: &Value) -> Invocation {
    let base = value.innermost();
    let subject = base.as_ref().unwrap_or(value);
    if !subject.is_callable() {
        Invocation::Inert
    } else if subject.is_template() {
        Invocation::Template
    } else {
        Invocation::Plain
    }
}

/// Apply call-on-access to a fetched value.
pub fn resolve(value: Value, namespace: &mut NamespaceStack) -> NamespaceResult<Value> {
    if let Value::Object(object) = &value {
        if let Some(rendered) = object.render_with_namespace(namespace) {
            tracing::trace!(type_name = object.type_name(), "render hook");
            return rendered;
        }
    }

    match classify(&value) {
        Invocation::Inert => Ok(value),
        Invocation::Template => {
            tracing::trace!(type_name = value.type_name(), "invoking template");
            value.call_template(None, namespace)
        }
        Invocation::Plain => {
            tracing::trace!(type_name = value.type_name(), "invoking callable");
            value.call()
        }
    }
}
