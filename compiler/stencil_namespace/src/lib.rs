//! Stencil Namespace - Layered variable resolution for document templates.
//!
//! A template renders against a [`NamespaceStack`]: an ordered stack of scope
//! sources searched from the most recently pushed to the oldest. Sources are
//! mappings, single-object views, or arbitrary objects; each decides for
//! itself whether a key is found, missing, or fails the lookup outright.
//!
//! # Architecture
//!
//! - `NamespaceStack`: the stack, its `level`, and its named fields
//! - `SingleScopeView`: one object exposed as a caching, read-only scope
//! - `policy`: call-on-access resolution of fetched values
//! - `GuardedAccessor`: pluggable attribute access policy
//! - `ScopedNamespace`: RAII guard that pops what it pushed
//!
//! # Errors
//!
//! Every fallible operation returns [`NamespaceResult`]. A
//! [`NamespaceError::MissingKey`] is the only error a lookup treats as a
//! miss; anything else raised by a source or an invoked value aborts the
//! lookup and propagates unchanged.

mod accessor;
mod attr_view;
mod builder;
pub mod errors;
mod mapping;
pub mod names;
mod namespace;
mod object;
pub mod policy;
mod scope_guard;
mod source;
mod value;
mod view;

#[cfg(test)]
mod test_helpers;

pub use accessor::{
    guarded_getattr, plain_getattr, DenyNames, FnAccessor, GuardedAccessor, SharedAccessor,
};
pub use attr_view::{AttributeView, ViewTarget};
pub use builder::NamespaceBuilder;
pub use errors::{NamespaceError, NamespaceResult};
pub use mapping::ScopeMap;
pub use names::{
    KeyClass, ViewConfig, DEFAULT_PRIVATE_PREFIX, DEPTH_FIELD, LEVEL_FIELD, STRING_FORM_KEY,
    THIS_FIELD,
};
pub use namespace::{NamespaceStack, PoppedScopes};
pub use object::Object;
pub use scope_guard::ScopedNamespace;
pub use source::{Fetch, ScopeSource};
pub use value::{NativeFn, NativeFunction, Value};
pub use view::SingleScopeView;
