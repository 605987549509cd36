//! The block instruction stream a template is compiled to.
//!
//! Blocks are produced by a template compiler outside this crate. Conditions
//! and variable references are either plain names, resolved against the
//! namespace with call-on-access, or evaluator closures.

use std::fmt;
use std::rc::Rc;

use stencil_namespace::{NamespaceResult, NamespaceStack, Value};

/// Compiled expression evaluated against the live namespace.
pub type Evaluator = Rc<dyn Fn(&mut NamespaceStack) -> NamespaceResult<Value>>;

#[derive(Clone)]
pub enum Expr {
    /// A name looked up with invocation.
    Name(String),
    Eval(Evaluator),
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn eval<F>(f: F) -> Self
    where
        F: Fn(&mut NamespaceStack) -> NamespaceResult<Value> + 'static,
    {
        Expr::Eval(Rc::new(f))
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Expr::Eval(_) => f.write_str("Eval(..)"),
        }
    }
}

/// Conditional arm: a condition and the blocks rendered when it holds.
pub type Branch = (Expr, Vec<Block>);

#[derive(Clone)]
pub enum Block {
    /// Literal text, appended verbatim.
    Text(String),
    /// Variable insertion; the value's string form is appended unescaped.
    Var(Expr),
    /// `if` / `elif` / `else`. The first truthy branch renders.
    If {
        branches: Vec<Branch>,
        otherwise: Option<Vec<Block>>,
    },
    /// Evaluated section; a `None` result renders nothing.
    Eval(Evaluator),
}

impl Block {
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text(text.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Block::Var(Expr::name(name))
    }

    pub fn eval<F>(f: F) -> Self
    where
        F: Fn(&mut NamespaceStack) -> NamespaceResult<Value> + 'static,
    {
        Block::Eval(Rc::new(f))
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Block::Var(expr) => f.debug_tuple("Var").field(expr).finish(),
            Block::If {
                branches,
                otherwise,
            } => f
                .debug_struct("If")
                .field("branches", branches)
                .field("otherwise", otherwise)
                .finish(),
            Block::Eval(_) => f.write_str("Eval(..)"),
        }
    }
}
