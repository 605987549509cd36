//! Runtime values visible through a namespace.
//!
//! Primitive values are stored inline. Strings, lists, mappings, objects and
//! native functions are reference counted, so cloning a `Value` never copies
//! the payload. Mappings and objects compare by identity, everything else by
//! content.
//!
//! Values are single-threaded (`Rc`, not `Arc`): a namespace is confined to
//! the render that created it.

use std::fmt;
use std::rc::Rc;

use crate::errors::{NamespaceError, NamespaceResult};
use crate::mapping::ScopeMap;
use crate::namespace::NamespaceStack;
use crate::object::Object;

/// Signature of a zero-argument native callable.
pub type NativeFn = dyn Fn() -> NamespaceResult<Value>;

/// A named zero-argument callable.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn() -> NamespaceResult<Value> + 'static,
    {
        NativeFunction {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn call(&self) -> NamespaceResult<Value> {
        (self.func)()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.func), Rc::as_ptr(&other.func))
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeFunction").field(&self.name).finish()
    }
}

/// A value stored in, or resolved from, a namespace.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absence of a value.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<Vec<Value>>),
    /// Shared key/value mapping; also usable directly as a scope source.
    Map(ScopeMap),
    /// Attribute-bearing object with optional call and render capabilities.
    Object(Rc<dyn Object>),
    /// Zero-argument native callable.
    Function(NativeFunction),
}

// Factory methods

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn object<T: Object + 'static>(object: T) -> Self {
        Value::Object(Rc::new(object))
    }

    pub fn function<F>(name: &str, func: F) -> Self
    where
        F: Fn() -> NamespaceResult<Value> + 'static,
    {
        Value::Function(NativeFunction::new(name, func))
    }
}

// Inspection

impl Value {
    /// Name of the value's type, used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(object) => object.type_name(),
            Value::Function(_) => "function",
        }
    }

    /// Truthiness used by conditional blocks.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Object(object) => object.is_truthy(),
            Value::Function(_) => true,
        }
    }

    /// Integer interpretation: ints, and bools as 0/1.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ScopeMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Rc<dyn Object>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

// Capabilities consulted by the call-on-access policy

impl Value {
    /// One layer of wrapping stripped, if this value is a wrapper.
    pub fn innermost(&self) -> Option<Value> {
        match self {
            Value::Object(object) => object.innermost(),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Value::Function(_) => true,
            Value::Object(object) => object.is_callable(),
            _ => false,
        }
    }

    pub fn is_template(&self) -> bool {
        match self {
            Value::Object(object) => object.is_template(),
            _ => false,
        }
    }

    /// Invoke with no arguments.
    pub fn call(&self) -> NamespaceResult<Value> {
        match self {
            Value::Function(func) => func.call(),
            Value::Object(object) => object.call(),
            other => Err(NamespaceError::type_mismatch(
                "callable",
                other.type_name(),
            )),
        }
    }

    /// Invoke as a nested template with `(client, namespace)`.
    pub fn call_template(
        &self,
        client: Option<&Value>,
        namespace: &mut NamespaceStack,
    ) -> NamespaceResult<Value> {
        match self {
            Value::Object(object) => object.call_template(client, namespace),
            other => Err(NamespaceError::type_mismatch(
                "template",
                other.type_name(),
            )),
        }
    }

    /// Plain attribute read, used when no guarded accessor is installed.
    pub fn get_attr(&self, name: &str) -> NamespaceResult<Value> {
        match self {
            Value::Object(object) => object.get_attr(name),
            other => Err(NamespaceError::attribute_not_found(
                other.type_name(),
                name,
            )),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            #[allow(clippy::float_cmp, reason = "value equality is exact")]
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// String form of a value, as inserted into rendered output.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => map.fmt_guarded(f, |f| {
                let mut keys = map.keys();
                keys.sort_unstable();
                write!(f, "{{")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    let value = map.get(key).unwrap_or(Value::None);
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }),
            Value::Object(object) => write!(f, "{}", object.display_string()),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<ScopeMap> for Value {
    fn from(map: ScopeMap) -> Self {
        Value::Map(map)
    }
}

impl From<Rc<dyn Object>> for Value {
    fn from(object: Rc<dyn Object>) -> Self {
        Value::Object(object)
    }
}
