//! Block rendering against a live namespace.
//!
//! Output fragments are appended to one buffer. Conditional blocks push a
//! fresh cache mapping for their duration: a named condition that resolves
//! is stored there, so the branch body sees the already-invoked value instead
//! of invoking the name a second time.

use stencil_namespace::{NamespaceResult, NamespaceStack, ScopeMap};

use crate::block::{Block, Branch, Expr};
use crate::stack::ensure_sufficient_stack;

/// Render `blocks` to a string.
pub fn render_blocks(blocks: &[Block], namespace: &mut NamespaceStack) -> NamespaceResult<String> {
    let mut out = String::new();
    render_into(blocks, namespace, &mut out)?;
    Ok(out)
}

fn render_into(
    blocks: &[Block],
    namespace: &mut NamespaceStack,
    out: &mut String,
) -> NamespaceResult<()> {
    for block in blocks {
        match block {
            Block::Text(text) => out.push_str(text),
            Block::Var(expr) => {
                let value = match expr {
                    Expr::Name(name) => namespace.lookup(name, true)?,
                    Expr::Eval(eval) => eval(namespace)?,
                };
                out.push_str(&value.to_string());
            }
            Block::If {
                branches,
                otherwise,
            } => ensure_sufficient_stack(|| {
                render_if(branches, otherwise.as_deref(), namespace, out)
            })?,
            Block::Eval(eval) => {
                let value = eval(namespace)?;
                if !value.is_none() {
                    out.push_str(&value.to_string());
                }
            }
        }
    }
    Ok(())
}

fn render_if(
    branches: &[Branch],
    otherwise: Option<&[Block]>,
    namespace: &mut NamespaceStack,
    out: &mut String,
) -> NamespaceResult<()> {
    let cache = ScopeMap::new();
    let mut scope = namespace.scoped(cache.clone());

    for (condition, body) in branches {
        if test_condition(condition, &mut scope, &cache)? {
            return render_into(body, &mut scope, out);
        }
    }
    match otherwise {
        Some(body) => render_into(body, &mut scope, out),
        None => Ok(()),
    }
}

/// Evaluate a branch condition. A name that is missing counts as false; a
/// `MissingKey` for any other key is a real failure.
fn test_condition(
    condition: &Expr,
    namespace: &mut NamespaceStack,
    cache: &ScopeMap,
) -> NamespaceResult<bool> {
    match condition {
        Expr::Name(name) => match namespace.lookup(name, true) {
            Ok(value) => {
                let truthy = value.is_truthy();
                cache.insert(name.as_str(), value);
                Ok(truthy)
            }
            Err(err) if err.is_missing(name) => {
                tracing::trace!(name = name.as_str(), "condition name missing, treated as false");
                Ok(false)
            }
            Err(err) => Err(err),
        },
        Expr::Eval(eval) => Ok(eval(namespace)?.is_truthy()),
    }
}
