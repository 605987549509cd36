//! Error types for namespace resolution.
//!
//! `NamespaceError` is the single error type surfaced by the resolver. Each
//! variant is one failure category; callers match on the variant rather than
//! parsing messages.
//!
//! # Miss vs. failure
//!
//! Two variants describe absence: `MissingKey` (a key is not in a source or in
//! the whole stack) and `AttributeNotFound` (an attribute read found nothing).
//! Both are recoverable while searching layers. Every other variant aborts
//! the lookup that produced it.
//!
//! Constructor helpers (e.g. `NamespaceError::missing_key("x")`) are the
//! public way to build errors so messages stay uniform across crates.

use thiserror::Error;

/// Result of a namespace operation.
pub type NamespaceResult<T> = Result<T, NamespaceError>;

/// Failure categories surfaced by the resolver.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NamespaceError {
    /// The key is absent from a source, or from every source of a stack.
    #[error("key not found: {key}")]
    MissingKey { key: String },

    /// An attribute read found no attribute of that name.
    #[error("'{type_name}' object has no attribute '{name}'")]
    AttributeNotFound { type_name: String, name: String },

    /// `pop` asked for more sources than the stack holds.
    #[error("cannot pop {requested} scope(s) from a namespace holding {depth}")]
    Underflow { requested: usize, depth: usize },

    /// Mutation attempted through a read-only surface.
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// A guarded accessor refused the read.
    #[error("access to '{name}' denied: {reason}")]
    PolicyDenial { name: String, reason: String },

    /// A resolved callable or render hook failed while running.
    #[error("call to '{callee}' failed: {message}")]
    InvocationFailure { callee: String, message: String },

    /// Nested template rendering went deeper than the configured limit.
    #[error("template nesting exceeded {limit} levels")]
    RecursionLimit { limit: i64 },
}

impl NamespaceError {
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    pub fn attribute_not_found(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AttributeNotFound {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn underflow(requested: usize, depth: usize) -> Self {
        Self::Underflow { requested, depth }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn policy_denial(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PolicyDenial {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invocation_failure(callee: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvocationFailure {
            callee: callee.into(),
            message: message.into(),
        }
    }

    pub fn recursion_limit(limit: i64) -> Self {
        Self::RecursionLimit { limit }
    }

    /// Returns `true` for any `MissingKey`.
    #[inline]
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }

    /// Returns `true` only for a `MissingKey` carrying exactly `key`.
    ///
    /// A miss raised from deeper inside an invoked value names a different
    /// key and must not be mistaken for the caller's own miss.
    #[inline]
    pub fn is_missing(&self, key: &str) -> bool {
        matches!(self, Self::MissingKey { key: missing } if missing == key)
    }

    #[inline]
    pub fn is_attribute_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound { .. })
    }
}
