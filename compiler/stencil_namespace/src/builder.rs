//! `NamespaceBuilder` for creating stacks with a given configuration.

use std::rc::Rc;

use crate::accessor::SharedAccessor;
use crate::names::ViewConfig;
use crate::namespace::NamespaceStack;

/// Builder for [`NamespaceStack`].
///
/// Cheap to clone; a document template keeps one and builds a fresh stack
/// for every top-level render.
#[derive(Clone, Debug, Default)]
pub struct NamespaceBuilder {
    accessor: Option<SharedAccessor>,
    view_config: ViewConfig,
    level: i64,
}

impl NamespaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the guarded accessor used for attribute reads.
    #[must_use]
    pub fn accessor(mut self, accessor: SharedAccessor) -> Self {
        self.accessor = Some(accessor);
        self
    }

    #[must_use]
    pub fn view_config(mut self, config: ViewConfig) -> Self {
        self.view_config = config;
        self
    }

    /// Prefix of names views refuse to resolve; `None` disables the rule.
    #[must_use]
    pub fn private_prefix(mut self, prefix: Option<&str>) -> Self {
        self.view_config = self.view_config.with_private_prefix(prefix);
        self
    }

    #[must_use]
    pub fn string_form_key(mut self, key: &str) -> Self {
        self.view_config = self.view_config.with_string_form_key(key);
        self
    }

    /// Initial nesting level.
    #[must_use]
    pub fn level(mut self, level: i64) -> Self {
        self.level = level;
        self
    }

    pub fn build(&self) -> NamespaceStack {
        NamespaceStack::from_parts(
            self.accessor.clone(),
            Rc::new(self.view_config.clone()),
            self.level,
        )
    }
}
