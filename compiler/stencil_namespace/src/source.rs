//! Scope sources and the typed fetch result.
//!
//! A source's lookup protocol is chosen once, when it is converted into a
//! `ScopeSource`, rather than rediscovered on every lookup:
//!
//! - `Mapping`: direct key fetch; absence is a miss.
//! - `Object`: item-style fetch through [`Object::get_item`]; the object
//!   decides between found, missing and failed.
//! - `Opaque`: any other value. Pushing it is allowed; looking through it
//!   fails, which aborts the lookup that reached it.

use std::rc::Rc;

use crate::errors::{NamespaceError, NamespaceResult};
use crate::mapping::ScopeMap;
use crate::object::Object;
use crate::value::Value;
use crate::view::SingleScopeView;

/// Outcome of fetching one key from one source.
///
/// `Missing` means "try the next layer"; `Failed` aborts the whole lookup.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum Fetch {
    Found(Value),
    Missing,
    Failed(NamespaceError),
}

impl Fetch {
    /// Convert to a `Result`, turning a miss into `MissingKey { key }`.
    pub fn into_result(self, key: &str) -> NamespaceResult<Value> {
        match self {
            Fetch::Found(value) => Ok(value),
            Fetch::Missing => Err(NamespaceError::missing_key(key)),
            Fetch::Failed(err) => Err(err),
        }
    }

    /// Classify an attribute read: only `AttributeNotFound` counts as a miss.
    pub fn from_attribute(result: NamespaceResult<Value>) -> Self {
        match result {
            Ok(value) => Fetch::Found(value),
            Err(err) if err.is_attribute_not_found() => Fetch::Missing,
            Err(err) => Fetch::Failed(err),
        }
    }
}

/// One layer of a namespace stack.
#[derive(Clone, Debug)]
pub enum ScopeSource {
    Mapping(ScopeMap),
    Object(Rc<dyn Object>),
    Opaque(Value),
}

impl ScopeSource {
    pub fn fetch(&self, key: &str) -> Fetch {
        match self {
            ScopeSource::Mapping(map) => map.get(key).map_or(Fetch::Missing, Fetch::Found),
            ScopeSource::Object(object) => object.get_item(key),
            ScopeSource::Opaque(value) => Fetch::Failed(not_a_scope(value)),
        }
    }

    /// Number of entries this source contributes to the stack length.
    pub fn size(&self) -> NamespaceResult<usize> {
        match self {
            ScopeSource::Mapping(map) => Ok(map.len()),
            ScopeSource::Object(object) => object.size().ok_or_else(|| {
                NamespaceError::type_mismatch("sized scope", object.type_name())
            }),
            ScopeSource::Opaque(value) => Err(NamespaceError::type_mismatch(
                "sized scope",
                value.type_name(),
            )),
        }
    }

    pub fn keys(&self) -> NamespaceResult<Vec<String>> {
        match self {
            ScopeSource::Mapping(map) => Ok(map.keys()),
            ScopeSource::Object(object) => object.keys().ok_or_else(|| {
                NamespaceError::type_mismatch("enumerable scope", object.type_name())
            }),
            ScopeSource::Opaque(value) => Err(NamespaceError::type_mismatch(
                "enumerable scope",
                value.type_name(),
            )),
        }
    }

    pub fn as_mapping(&self) -> Option<&ScopeMap> {
        match self {
            ScopeSource::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

fn not_a_scope(value: &Value) -> NamespaceError {
    NamespaceError::type_mismatch("subscriptable object", value.type_name())
}

impl From<ScopeMap> for ScopeSource {
    fn from(map: ScopeMap) -> Self {
        ScopeSource::Mapping(map)
    }
}

impl From<SingleScopeView> for ScopeSource {
    fn from(view: SingleScopeView) -> Self {
        ScopeSource::Object(Rc::new(view))
    }
}

impl From<Rc<dyn Object>> for ScopeSource {
    fn from(object: Rc<dyn Object>) -> Self {
        ScopeSource::Object(object)
    }
}

impl From<Value> for ScopeSource {
    fn from(value: Value) -> Self {
        match value {
            Value::Map(map) => ScopeSource::Mapping(map),
            Value::Object(object) => ScopeSource::Object(object),
            other => ScopeSource::Opaque(other),
        }
    }
}
