//! Single-object scope views.
//!
//! A `SingleScopeView` presents one object (a loop item, the document being
//! rendered) as a read-only scope source. Keys are resolved as attributes of
//! the target, through the guarded accessor when one is installed.
//!
//! # Caching
//!
//! Every successful resolution is memoized for the life of the view: a
//! second lookup of the same key returns the first result without consulting
//! the accessor again, even if the target has changed since. Views are
//! created per scope and dropped when the scope closes, which is the only
//! invalidation.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::accessor::{guarded_getattr, SharedAccessor};
use crate::errors::{NamespaceError, NamespaceResult};
use crate::names::{KeyClass, ViewConfig};
use crate::object::Object;
use crate::source::Fetch;
use crate::value::Value;

pub struct SingleScopeView {
    target: Value,
    accessor: Option<SharedAccessor>,
    config: Rc<ViewConfig>,
    cache: RefCell<FxHashMap<String, Value>>,
}

impl SingleScopeView {
    /// View with plain attribute reads and the default reserved-name rules.
    pub fn new(target: Value) -> Self {
        Self::with_accessor(target, None, Rc::new(ViewConfig::default()))
    }

    pub fn with_accessor(
        target: Value,
        accessor: Option<SharedAccessor>,
        config: Rc<ViewConfig>,
    ) -> Self {
        SingleScopeView {
            target,
            accessor,
            config,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Resolve `key` against the target.
    pub fn get(&self, key: &str) -> Fetch {
        let cached = self.cache.borrow().get(key).cloned();
        if let Some(value) = cached {
            tracing::trace!(key, "view cache hit");
            return Fetch::Found(value);
        }

        match self.config.classify(key) {
            KeyClass::StringForm => return Fetch::Found(Value::string(self.target.to_string())),
            KeyClass::Private => return Fetch::Missing,
            KeyClass::Public => {}
        }

        match Fetch::from_attribute(guarded_getattr(self.accessor.as_ref(), &self.target, key)) {
            Fetch::Found(value) => {
                self.cache
                    .borrow_mut()
                    .insert(key.to_owned(), value.clone());
                Fetch::Found(value)
            }
            other => other,
        }
    }

    /// Views are read-only.
    pub fn set(&self, key: &str, _value: Value) -> NamespaceResult<()> {
        Err(NamespaceError::unsupported(format!(
            "item assignment of '{key}' on a SingleScopeView"
        )))
    }

    /// Number of memoized keys.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl Object for SingleScopeView {
    fn type_name(&self) -> &str {
        "SingleScopeView"
    }

    fn get_item(&self, key: &str) -> Fetch {
        self.get(key)
    }

    /// A view counts as one entry: its target.
    fn size(&self) -> Option<usize> {
        Some(1)
    }

    fn display_string(&self) -> String {
        format!("SingleScopeView({})", self.target)
    }
}

impl fmt::Debug for SingleScopeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleScopeView")
            .field("target", &self.target)
            .field("guarded", &self.accessor.is_some())
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}
