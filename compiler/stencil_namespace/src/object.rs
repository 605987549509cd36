//! The `Object` capability trait.
//!
//! Anything that is not a primitive, a mapping or a native function is an
//! `Object`. Every capability has a default, so an implementor only overrides
//! what it supports:
//!
//! - attribute reads (`get_attr`) for guarded and plain attribute access
//! - item reads (`get_item`) when the object is pushed as a scope source
//! - size and key enumeration for stack length and key listing
//! - invocation (`call`, `call_template`) and the markers the call-on-access
//!   policy consults (`is_callable`, `is_template`, `innermost`,
//!   `render_with_namespace`)
//!
//! Absence of a capability is a normal answer, not an error, except where an
//! operation requires it (e.g. calling a non-callable object).

use std::fmt;

use crate::errors::{NamespaceError, NamespaceResult};
use crate::namespace::NamespaceStack;
use crate::source::Fetch;
use crate::value::Value;

pub trait Object: fmt::Debug {
    /// Name used in diagnostics.
    fn type_name(&self) -> &str;

    /// Read a named attribute.
    ///
    /// A missing attribute must be reported as
    /// [`NamespaceError::AttributeNotFound`]; readers translate exactly that
    /// variant into a miss.
    fn get_attr(&self, name: &str) -> NamespaceResult<Value> {
        Err(NamespaceError::attribute_not_found(self.type_name(), name))
    }

    /// Item-style fetch, used when the object is pushed as a scope source.
    fn get_item(&self, _key: &str) -> Fetch {
        Fetch::Failed(NamespaceError::type_mismatch(
            "subscriptable object",
            self.type_name(),
        ))
    }

    /// Number of entries, or `None` if the object has no size.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Enumerable keys, or `None` if the object cannot list them.
    fn keys(&self) -> Option<Vec<String>> {
        None
    }

    fn is_callable(&self) -> bool {
        false
    }

    /// Invoke with no arguments.
    fn call(&self) -> NamespaceResult<Value> {
        Err(NamespaceError::type_mismatch("callable", self.type_name()))
    }

    /// Invoke as a nested template with `(client, namespace)`.
    fn call_template(
        &self,
        _client: Option<&Value>,
        _namespace: &mut NamespaceStack,
    ) -> NamespaceResult<Value> {
        Err(NamespaceError::type_mismatch("template", self.type_name()))
    }

    /// Marks a nested document template.
    ///
    /// The policy reads this from the innermost value only, so a wrapper
    /// cannot claim it for the value it wraps.
    fn is_template(&self) -> bool {
        false
    }

    /// The wrapped value, if this object is a transparent wrapper.
    fn innermost(&self) -> Option<Value> {
        None
    }

    /// Render hook; `Some` means the object handles its own rendering
    /// against the namespace and takes precedence over callability.
    fn render_with_namespace(
        &self,
        _namespace: &mut NamespaceStack,
    ) -> Option<NamespaceResult<Value>> {
        None
    }

    /// String form of the object.
    fn display_string(&self) -> String {
        format!("<{} object>", self.type_name())
    }

    fn is_truthy(&self) -> bool {
        self.size().map_or(true, |n| n > 0)
    }
}
