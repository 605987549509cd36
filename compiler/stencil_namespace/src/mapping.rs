//! Shared key/value mappings.
//!
//! A `ScopeMap` is the direct-mapping kind of scope source. It is reference
//! counted with interior mutability, so the same mapping can be pushed onto a
//! stack and still be filled in by its owner (the conditional-block cache
//! relies on this).
//!
//! # Thread Safety
//! `ScopeMap` is NOT thread-safe. It uses `Rc<RefCell<_>>` like every other
//! namespace structure; a namespace never leaves its render thread.

use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

thread_local! {
    /// Addresses of the mappings being formatted on this thread.
    static FORMATTING: RefCell<FxHashSet<usize>> = RefCell::new(FxHashSet::default());
}

/// Clears a mapping's formatting mark on drop.
struct FormattingMark(usize);

impl Drop for FormattingMark {
    fn drop(&mut self) {
        FORMATTING.with(|marks| {
            marks.borrow_mut().remove(&self.0);
        });
    }
}

#[derive(Clone, Default)]
pub struct ScopeMap(Rc<RefCell<FxHashMap<String, Value>>>);

impl ScopeMap {
    pub fn new() -> Self {
        ScopeMap::default()
    }

    /// Look up a key, cloning the value out so no borrow outlives the call.
    #[inline]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Keys in unspecified order.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Format with `body`, or write `{...}` if this mapping is already being
    /// formatted further up the call chain. A mapping may contain itself.
    pub(crate) fn fmt_guarded<F>(&self, f: &mut fmt::Formatter<'_>, body: F) -> fmt::Result
    where
        F: FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
    {
        let addr = Rc::as_ptr(&self.0).cast::<()>() as usize;
        if !FORMATTING.with(|marks| marks.borrow_mut().insert(addr)) {
            return f.write_str("{...}");
        }
        let _mark = FormattingMark(addr);
        body(f)
    }

    /// Whether both handles point at the same mapping.
    #[inline]
    pub fn ptr_eq(&self, other: &ScopeMap) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ScopeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<FxHashMap<_, _>>();
        ScopeMap(Rc::new(RefCell::new(map)))
    }
}

impl fmt::Debug for ScopeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_guarded(f, |f| {
            f.debug_tuple("ScopeMap").field(&self.0.borrow()).finish()
        })
    }
}
