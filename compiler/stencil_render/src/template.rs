//! Document templates: compiled blocks plus the scopes they render with.
//!
//! A template renders either at top level, against a namespace it builds
//! itself, or as a sub-template against the caller's namespace. Either way it
//! pushes its scopes through a guard, so the caller's namespace is left
//! exactly as it was found, `level` included, even when rendering fails.
//!
//! Scope order, oldest to newest:
//!
//! | Top level          | Sub-template       |
//! |--------------------|--------------------|
//! | globals            | (caller's scopes)  |
//! | mapping            | globals            |
//! | client view(s)     | client view(s)     |
//! | template vars      | template vars      |
//! | keywords           | keywords           |

use std::rc::Rc;

use stencil_namespace::{
    NamespaceBuilder, NamespaceError, NamespaceResult, NamespaceStack, Object, ScopeMap,
    ScopeSource, Value, THIS_FIELD,
};

use crate::block::Block;
use crate::render::render_blocks;
use crate::stack::ensure_sufficient_stack;

/// Default bound on template nesting.
pub const DEFAULT_MAX_NESTING: i64 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Rendering refuses to start once `level` exceeds this.
    pub max_nesting: i64,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_nesting(mut self, max_nesting: i64) -> Self {
        self.max_nesting = max_nesting;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DocumentTemplate {
    name: String,
    blocks: Rc<[Block]>,
    globals: ScopeMap,
    vars: ScopeMap,
    config: RenderConfig,
    namespace: NamespaceBuilder,
}

impl DocumentTemplate {
    pub fn new(name: impl Into<String>, blocks: Vec<Block>) -> Self {
        DocumentTemplate {
            name: name.into(),
            blocks: blocks.into(),
            globals: ScopeMap::new(),
            vars: ScopeMap::new(),
            config: RenderConfig::default(),
            namespace: NamespaceBuilder::new(),
        }
    }

    /// Replace the globals mapping, shared with every render.
    #[must_use]
    pub fn with_globals(mut self, globals: ScopeMap) -> Self {
        self.globals = globals;
        self
    }

    /// Add a default variable, pushed above the client views.
    #[must_use]
    pub fn with_var(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Settings for the namespace built by top-level renders.
    #[must_use]
    pub fn with_namespace(mut self, namespace: NamespaceBuilder) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level render against a fresh namespace.
    ///
    /// A given `client` becomes the `this` field (its last element when it
    /// is a list) and is exposed through attribute views. Without a client,
    /// `this` is left unset.
    pub fn render(
        &self,
        client: Option<&Value>,
        mapping: Option<ScopeSource>,
        keywords: Option<&ScopeMap>,
    ) -> NamespaceResult<String> {
        let mut namespace = self.namespace.build();
        let mut scope = namespace.guard();
        scope.enter(self.globals.clone());
        if let Some(mapping) = mapping {
            scope.enter(mapping);
        }
        if let Some(client) = client {
            let this = match client {
                Value::List(items) => items.last().cloned().unwrap_or(Value::None),
                other => other.clone(),
            };
            scope.set_field(THIS_FIELD, this)?;
        }
        self.render_body(client, keywords, &mut scope)
    }

    /// Render as a sub-template against the caller's namespace.
    pub fn render_in(
        &self,
        namespace: &mut NamespaceStack,
        client: Option<&Value>,
        keywords: Option<&ScopeMap>,
    ) -> NamespaceResult<String> {
        let mut scope = namespace.guard();
        scope.enter(self.globals.clone());
        self.render_body(client, keywords, &mut scope)
    }

    fn render_body(
        &self,
        client: Option<&Value>,
        keywords: Option<&ScopeMap>,
        namespace: &mut NamespaceStack,
    ) -> NamespaceResult<String> {
        let level = namespace.level();
        if level > self.config.max_nesting {
            tracing::warn!(
                template = %self.name,
                level,
                limit = self.config.max_nesting,
                "template nesting limit exceeded"
            );
            return Err(NamespaceError::recursion_limit(self.config.max_nesting));
        }

        let mut scope = namespace.guard();
        scope.descend();
        match client {
            Some(Value::List(items)) => {
                for item in items.iter() {
                    let view = scope.view(item.clone());
                    scope.enter(view);
                }
            }
            Some(client) => {
                let view = scope.view(client.clone());
                scope.enter(view);
            }
            None => {}
        }
        if !self.vars.is_empty() {
            scope.enter(self.vars.clone());
        }
        if let Some(keywords) = keywords {
            scope.enter(keywords.clone());
        }

        tracing::debug!(
            template = %self.name,
            level = scope.level(),
            depth = scope.depth(),
            "rendering template"
        );
        ensure_sufficient_stack(|| render_blocks(&self.blocks, &mut scope))
    }
}

impl Object for DocumentTemplate {
    fn type_name(&self) -> &str {
        "DocumentTemplate"
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn is_template(&self) -> bool {
        true
    }

    fn call(&self) -> NamespaceResult<Value> {
        self.render(None, None, None).map(Value::from)
    }

    fn call_template(
        &self,
        client: Option<&Value>,
        namespace: &mut NamespaceStack,
    ) -> NamespaceResult<Value> {
        self.render_in(namespace, client, None).map(Value::from)
    }

    fn display_string(&self) -> String {
        self.name.clone()
    }
}
