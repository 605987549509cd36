//! Stencil Render - Renders compiled document templates against a namespace.
//!
//! This crate drives [`stencil_namespace`]: it renders block streams
//! (`Text`, `Var`, `If`, `Eval`) and implements [`DocumentTemplate`], the
//! template object that sets up scopes, tracks nesting depth, and can itself
//! be looked up and invoked as a sub-template.
//!
//! # Re-exports
//!
//! The namespace types a caller needs to render are re-exported:
//! - `NamespaceStack`, `NamespaceBuilder`, `ScopeMap`, `Value`, `Object`
//! - `NamespaceError`, `NamespaceResult`

mod block;
mod render;
mod stack;
mod template;

use std::sync::Once;

pub use block::{Block, Branch, Evaluator, Expr};
pub use render::render_blocks;
pub use template::{DocumentTemplate, RenderConfig, DEFAULT_MAX_NESTING};

pub use stencil_namespace::{
    NamespaceBuilder, NamespaceError, NamespaceResult, NamespaceStack, Object, ScopeMap,
    ScopeSource, Value,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=stencil_namespace=trace,stencil_render=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
