//! Test doubles shared by the unit tests of this crate.

use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{GuardedAccessor, NamespaceResult, NamespaceStack, Object, Value, plain_getattr};

/// Attribute-bearing object whose attributes can change between reads.
#[derive(Debug, Default)]
pub(crate) struct Record {
    name: String,
    attrs: RefCell<FxHashMap<String, Value>>,
    reads: Cell<usize>,
}

impl Record {
    pub(crate) fn new(name: &str) -> Self {
        Record {
            name: name.to_owned(),
            ..Record::default()
        }
    }

    pub(crate) fn with(self, attr: &str, value: impl Into<Value>) -> Self {
        self.set(attr, value);
        self
    }

    pub(crate) fn set(&self, attr: &str, value: impl Into<Value>) {
        self.attrs.borrow_mut().insert(attr.to_owned(), value.into());
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl Object for Record {
    fn type_name(&self) -> &str {
        "Record"
    }

    fn get_attr(&self, name: &str) -> NamespaceResult<Value> {
        self.reads.set(self.reads.get() + 1);
        self.attrs
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| crate::NamespaceError::attribute_not_found("Record", name))
    }

    fn display_string(&self) -> String {
        format!("Record({})", self.name)
    }
}

/// Accessor that counts how often it is consulted.
#[derive(Debug, Default)]
pub(crate) struct CountingAccessor {
    calls: Cell<usize>,
}

impl CountingAccessor {
    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl GuardedAccessor for CountingAccessor {
    fn access(&self, target: &Value, name: &str) -> NamespaceResult<Value> {
        self.calls.set(self.calls.get() + 1);
        plain_getattr(target, name)
    }
}

/// How a [`RecordingTemplate`] was invoked.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Invocation {
    NoArgs,
    /// `(client, namespace)`; the namespace is identified by its `level`.
    WithNamespace { client: Option<Value>, level: i64 },
}

/// Callable that logs each invocation and whether it carries the template
/// marker.
#[derive(Debug)]
pub(crate) struct RecordingTemplate {
    pub(crate) template: bool,
    pub(crate) log: Rc<RefCell<Vec<Invocation>>>,
}

impl RecordingTemplate {
    pub(crate) fn new(template: bool) -> (Self, Rc<RefCell<Vec<Invocation>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let double = RecordingTemplate {
            template,
            log: Rc::clone(&log),
        };
        (double, log)
    }
}

impl Object for RecordingTemplate {
    fn type_name(&self) -> &str {
        "RecordingTemplate"
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn is_template(&self) -> bool {
        self.template
    }

    fn call(&self) -> NamespaceResult<Value> {
        self.log.borrow_mut().push(Invocation::NoArgs);
        Ok(Value::from("called"))
    }

    fn call_template(
        &self,
        client: Option<&Value>,
        namespace: &mut NamespaceStack,
    ) -> NamespaceResult<Value> {
        self.log.borrow_mut().push(Invocation::WithNamespace {
            client: client.cloned(),
            level: namespace.level(),
        });
        Ok(Value::from("rendered"))
    }
}

/// Transparent wrapper; `claims_template` lets a test forge the marker on
/// the wrapper itself.
#[derive(Debug)]
pub(crate) struct Wrapper {
    pub(crate) inner: Value,
    pub(crate) claims_template: bool,
}

impl Object for Wrapper {
    fn type_name(&self) -> &str {
        "Wrapper"
    }

    fn innermost(&self) -> Option<Value> {
        Some(self.inner.clone())
    }

    fn is_callable(&self) -> bool {
        self.inner.is_callable()
    }

    fn is_template(&self) -> bool {
        self.claims_template
    }

    fn call(&self) -> NamespaceResult<Value> {
        self.inner.call()
    }

    fn call_template(
        &self,
        client: Option<&Value>,
        namespace: &mut NamespaceStack,
    ) -> NamespaceResult<Value> {
        self.inner.call_template(client, namespace)
    }
}

/// Object with a render hook; also callable and template-marked so tests
/// can check the hook wins.
#[derive(Debug)]
pub(crate) struct Hooked;

impl Object for Hooked {
    fn type_name(&self) -> &str {
        "Hooked"
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn is_template(&self) -> bool {
        true
    }

    fn call(&self) -> NamespaceResult<Value> {
        Ok(Value::from("plain call"))
    }

    fn render_with_namespace(
        &self,
        namespace: &mut NamespaceStack,
    ) -> Option<NamespaceResult<Value>> {
        Some(Ok(Value::string(format!("hook at depth {}", namespace.depth()))))
    }
}
