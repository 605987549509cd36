//! Attribute-style access to a mapping or a whole namespace.
//!
//! Produced by [`NamespaceStack::call`]: template machinery that expects a
//! single context object reads entries as attributes of an `AttributeView`.
//! Over a namespace, reads are full lookups with call-on-access.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::{NamespaceError, NamespaceResult};
use crate::mapping::ScopeMap;
use crate::namespace::NamespaceStack;
use crate::object::Object;
use crate::value::Value;

#[derive(Clone, Debug)]
pub enum ViewTarget {
    Mapping(ScopeMap),
    Namespace(Rc<RefCell<NamespaceStack>>),
}

#[derive(Debug)]
pub struct AttributeView {
    target: ViewTarget,
}

impl AttributeView {
    pub fn new(target: ViewTarget) -> Self {
        AttributeView { target }
    }
}

impl Object for AttributeView {
    fn type_name(&self) -> &str {
        "AttributeView"
    }

    fn get_attr(&self, name: &str) -> NamespaceResult<Value> {
        let result = match &self.target {
            ViewTarget::Mapping(map) => map
                .get(name)
                .ok_or_else(|| NamespaceError::missing_key(name)),
            ViewTarget::Namespace(stack) => {
                let mut stack = stack.try_borrow_mut().map_err(|_| {
                    NamespaceError::unsupported("re-entrant read through an AttributeView")
                })?;
                stack.lookup(name, true)
            }
        };
        match result {
            Err(err) if err.is_missing(name) => {
                Err(NamespaceError::attribute_not_found(self.type_name(), name))
            }
            other => other,
        }
    }

    fn display_string(&self) -> String {
        match &self.target {
            ViewTarget::Mapping(map) => format!("AttributeView({})", Value::Map(map.clone())),
            ViewTarget::Namespace(_) => "AttributeView(<namespace>)".to_owned(),
        }
    }
}
