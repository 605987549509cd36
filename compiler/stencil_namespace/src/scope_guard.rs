//! RAII scope guards for namespace stacks.
//!
//! A [`ScopedNamespace`] remembers how many sources it pushed and, when
//! entered with [`descend`](ScopedNamespace::descend), the `level` to restore.
//! Dropping the guard pops exactly those sources and restores the level, on
//! early returns and during unwinding alike.
//!
//! # Usage
//!
//! ```text
//! let mut scope = namespace.guard();
//! scope.enter(globals);
//! scope.descend();
//! render_blocks(blocks, &mut scope)?;
//! // sources popped, level restored
//! ```

use std::ops::{Deref, DerefMut};

use crate::namespace::NamespaceStack;
use crate::source::ScopeSource;

/// Guard returned by [`NamespaceStack::guard`] and [`NamespaceStack::scoped`].
///
/// Derefs to the stack, so lookups go through the guard directly.
pub struct ScopedNamespace<'a> {
    namespace: &'a mut NamespaceStack,
    pushed: usize,
    saved_level: Option<i64>,
}

impl ScopedNamespace<'_> {
    /// Push a source that will be popped when the guard drops.
    pub fn enter(&mut self, source: impl Into<ScopeSource>) {
        self.namespace.push(source);
        self.pushed += 1;
    }

    /// Increment `level`; the original value is restored on drop.
    pub fn descend(&mut self) {
        let level = self.namespace.level();
        self.saved_level.get_or_insert(level);
        self.namespace.set_level(level.saturating_add(1));
    }

    /// Number of sources this guard will pop.
    pub fn pushed(&self) -> usize {
        self.pushed
    }
}

impl Drop for ScopedNamespace<'_> {
    fn drop(&mut self) {
        if self.pushed > 0 {
            if let Err(err) = self.namespace.pop(self.pushed) {
                tracing::warn!(%err, pushed = self.pushed, "scope guard could not pop its sources");
            }
        }
        if let Some(level) = self.saved_level {
            self.namespace.set_level(level);
        }
    }
}

impl Deref for ScopedNamespace<'_> {
    type Target = NamespaceStack;

    fn deref(&self) -> &Self::Target {
        self.namespace
    }
}

impl DerefMut for ScopedNamespace<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.namespace
    }
}

impl NamespaceStack {
    /// A guard that has pushed nothing yet.
    pub fn guard(&mut self) -> ScopedNamespace<'_> {
        ScopedNamespace {
            namespace: self,
            pushed: 0,
            saved_level: None,
        }
    }

    /// Push `source` and return a guard that pops it on drop.
    pub fn scoped(&mut self, source: impl Into<ScopeSource>) -> ScopedNamespace<'_> {
        let mut guard = self.guard();
        guard.enter(source);
        guard
    }

    /// Run `f` with `source` pushed.
    pub fn with_scope<T, F>(&mut self, source: impl Into<ScopeSource>, f: F) -> T
    where
        F: FnOnce(&mut NamespaceStack) -> T,
    {
        let mut scoped = self.scoped(source);
        f(&mut scoped)
    }

    /// Run `f` with every source of `sources` pushed, in order.
    pub fn with_scopes<T, F, I>(&mut self, sources: I, f: F) -> T
    where
        F: FnOnce(&mut NamespaceStack) -> T,
        I: IntoIterator,
        I::Item: Into<ScopeSource>,
    {
        let mut scoped = self.guard();
        for source in sources {
            scoped.enter(source);
        }
        f(&mut scoped)
    }
}
