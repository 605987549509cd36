//! The layered namespace a template renders against.
//!
//! Uses a stack of scope sources (not merged maps): entering a scope pushes
//! a source, leaving it pops. Lookups walk from the most recent source to the
//! oldest, so inner scopes shadow outer ones without copying anything.
//!
//! Besides its sources the stack carries:
//! - `level`, the template nesting depth maintained by the render driver;
//! - an overflow mapping for ad hoc named fields (`this`, driver state),
//!   disjoint from `level`;
//! - the guarded accessor and view rules handed to every view it creates.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

use crate::accessor::{guarded_getattr, SharedAccessor};
use crate::attr_view::{AttributeView, ViewTarget};
use crate::builder::NamespaceBuilder;
use crate::errors::{NamespaceError, NamespaceResult};
use crate::mapping::ScopeMap;
use crate::names::{ViewConfig, DEPTH_FIELD, LEVEL_FIELD};
use crate::policy;
use crate::source::{Fetch, ScopeSource};
use crate::value::Value;
use crate::view::SingleScopeView;

/// Sources removed by one [`NamespaceStack::pop`], oldest first.
pub type PoppedScopes = SmallVec<[ScopeSource; 2]>;

#[derive(Debug)]
pub struct NamespaceStack {
    /// Scope sources, most recent last.
    sources: Vec<ScopeSource>,
    level: i64,
    /// Named fields other than `level`.
    fields: FxHashMap<String, Value>,
    accessor: Option<SharedAccessor>,
    view_config: Rc<ViewConfig>,
}

impl NamespaceStack {
    /// Empty stack with plain attribute access and default view rules.
    pub fn new() -> Self {
        Self::from_parts(None, Rc::new(ViewConfig::default()), 0)
    }

    pub fn builder() -> NamespaceBuilder {
        NamespaceBuilder::new()
    }

    pub(crate) fn from_parts(
        accessor: Option<SharedAccessor>,
        view_config: Rc<ViewConfig>,
        level: i64,
    ) -> Self {
        NamespaceStack {
            sources: Vec::new(),
            level,
            fields: FxHashMap::default(),
            accessor,
            view_config,
        }
    }

    /// A new, empty stack sharing this one's accessor and view rules.
    pub fn spawn_empty(&self) -> Self {
        Self::from_parts(self.accessor.clone(), Rc::clone(&self.view_config), 0)
    }

    /// Number of pushed sources.
    #[inline]
    pub fn depth(&self) -> usize {
        self.sources.len()
    }

    #[inline]
    pub fn level(&self) -> i64 {
        self.level
    }

    #[inline]
    pub fn set_level(&mut self, level: i64) {
        self.level = level;
    }

    pub fn view_config(&self) -> &Rc<ViewConfig> {
        &self.view_config
    }

    // Stack discipline

    /// Push a source. Its shape is only inspected when a lookup reaches it.
    pub fn push(&mut self, source: impl Into<ScopeSource>) {
        self.sources.push(source.into());
        tracing::debug!(depth = self.sources.len(), "pushed scope");
    }

    /// Remove the last `count` sources, returned oldest first.
    pub fn pop(&mut self, count: usize) -> NamespaceResult<PoppedScopes> {
        let depth = self.sources.len();
        if count > depth {
            return Err(NamespaceError::underflow(count, depth));
        }
        let popped: PoppedScopes = self.sources.drain(depth - count..).collect();
        tracing::debug!(count, depth = self.sources.len(), "popped scopes");
        Ok(popped)
    }

    /// Remove the most recent source.
    pub fn pop_one(&mut self) -> NamespaceResult<ScopeSource> {
        self.sources
            .pop()
            .ok_or_else(|| NamespaceError::underflow(1, 0))
    }

    // Lookup

    /// Find `key` without invoking it.
    pub fn fetch(&self, key: &str) -> NamespaceResult<Value> {
        for (layer, source) in self.sources.iter().enumerate().rev() {
            match source.fetch(key) {
                Fetch::Found(value) => {
                    tracing::trace!(key, layer, "resolved");
                    return Ok(value);
                }
                Fetch::Missing => {}
                Fetch::Failed(err) => {
                    tracing::trace!(key, layer, %err, "lookup aborted");
                    return Err(err);
                }
            }
        }
        Err(NamespaceError::missing_key(key))
    }

    /// Find `key`; with `invoke`, apply call-on-access to the result.
    pub fn lookup(&mut self, key: &str, invoke: bool) -> NamespaceResult<Value> {
        let value = self.fetch(key)?;
        if invoke {
            policy::resolve(value, self)
        } else {
            Ok(value)
        }
    }

    /// Whether `key` is visible. A miss is `Ok(false)`; a failing source
    /// still aborts with its error.
    pub fn contains(&self, key: &str) -> NamespaceResult<bool> {
        match self.fetch(key) {
            Ok(_) => Ok(true),
            Err(err) if err.is_missing_key() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Apply call-on-access to an arbitrary value.
    pub fn render(&mut self, value: Value) -> NamespaceResult<Value> {
        policy::resolve(value, self)
    }

    /// Total number of entries across all sources.
    pub fn len(&self) -> NamespaceResult<usize> {
        self.sources
            .iter()
            .try_fold(0usize, |total, source| Ok(total + source.size()?))
    }

    /// Whether no source contributes an entry. Fails like [`len`](Self::len).
    pub fn is_empty(&self) -> NamespaceResult<bool> {
        self.len().map(|len| len == 0)
    }

    /// Keys of every source, most recent source first. Keys shadowed by a
    /// more recent source are listed again for each source defining them.
    pub fn keys(&self) -> NamespaceResult<Vec<String>> {
        let mut keys = Vec::new();
        for source in self.sources.iter().rev() {
            keys.extend(source.keys()?);
        }
        Ok(keys)
    }

    // Named fields

    /// Read `level`, then an overflow field, then a read-only intrinsic
    /// field of the stack (`depth`).
    pub fn get_field(&self, name: &str) -> NamespaceResult<Value> {
        if name == LEVEL_FIELD {
            return Ok(Value::Int(self.level));
        }
        if let Some(value) = self.fields.get(name) {
            return Ok(value.clone());
        }
        if name == DEPTH_FIELD {
            let depth = i64::try_from(self.depth()).unwrap_or(i64::MAX);
            return Ok(Value::Int(depth));
        }
        Err(NamespaceError::attribute_not_found("NamespaceStack", name))
    }

    /// Write `level` (must be integer-like) or an overflow field.
    pub fn set_field(&mut self, name: &str, value: Value) -> NamespaceResult<()> {
        if name == LEVEL_FIELD {
            let level = value
                .as_int()
                .ok_or_else(|| NamespaceError::type_mismatch("int", value.type_name()))?;
            self.level = level;
            return Ok(());
        }
        self.fields.insert(name.to_owned(), value);
        Ok(())
    }

    pub fn delete_field(&mut self, name: &str) -> NamespaceResult<()> {
        if name == LEVEL_FIELD {
            return Err(NamespaceError::unsupported("deleting the level field"));
        }
        self.fields
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| NamespaceError::attribute_not_found("NamespaceStack", name))
    }

    // Construction helpers for template machinery

    /// Bundle arguments into a one-element sequence holding an attribute view.
    ///
    /// - no arguments: `Value::None`
    /// - keywords only: a view over the keyword mapping itself
    /// - otherwise: a view over a fresh stack with each positional argument
    ///   pushed as a source, then the keywords (if any)
    pub fn call(&self, positional: Vec<Value>, keywords: Option<ScopeMap>) -> Value {
        let keywords = keywords.filter(|k| !k.is_empty());
        let target = match (positional.is_empty(), keywords) {
            (true, None) => return Value::None,
            (true, Some(keywords)) => ViewTarget::Mapping(keywords),
            (false, keywords) => {
                let mut stack = self.spawn_empty();
                for arg in positional {
                    stack.push(arg);
                }
                if let Some(keywords) = keywords {
                    stack.push(keywords);
                }
                ViewTarget::Namespace(Rc::new(RefCell::new(stack)))
            }
        };
        Value::list(vec![Value::object(AttributeView::new(target))])
    }

    /// Keyword-only form of [`call`](Self::call).
    pub fn namespace(&self, keywords: ScopeMap) -> Value {
        self.call(Vec::new(), Some(keywords))
    }

    /// A view over `target` using this stack's accessor and view rules.
    pub fn view(&self, target: Value) -> SingleScopeView {
        SingleScopeView::with_accessor(target, self.accessor.clone(), Rc::clone(&self.view_config))
    }

    /// Attribute read through the stack's accessor; a missing attribute
    /// yields `default` when one is given.
    pub fn getattr(
        &self,
        target: &Value,
        name: &str,
        default: Option<Value>,
    ) -> NamespaceResult<Value> {
        match guarded_getattr(self.accessor.as_ref(), target, name) {
            Err(err) if err.is_attribute_not_found() => default.ok_or(err),
            other => other,
        }
    }

    /// Whether an attribute read would succeed. Misses and denials are
    /// `false`; other failures propagate.
    pub fn hasattr(&self, target: &Value, name: &str) -> NamespaceResult<bool> {
        match guarded_getattr(self.accessor.as_ref(), target, name) {
            Ok(_) => Ok(true),
            Err(
                NamespaceError::AttributeNotFound { .. }
                | NamespaceError::PolicyDenial { .. }
                | NamespaceError::MissingKey { .. },
            ) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

impl Default for NamespaceStack {
    fn default() -> Self {
        Self::new()
    }
}
