//! Templates rendering other templates through the namespace.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use std::rc::Rc;

use pretty_assertions::assert_eq;
use stencil_namespace::DenyNames;
use stencil_render::{
    init_tracing, Block, DocumentTemplate, Expr, NamespaceBuilder, NamespaceError,
    NamespaceResult, NamespaceStack, Object, RenderConfig, ScopeMap, Value,
};

#[derive(Debug)]
struct Article {
    title: &'static str,
    author: &'static str,
}

impl Object for Article {
    fn type_name(&self) -> &str {
        "Article"
    }

    fn get_attr(&self, name: &str) -> NamespaceResult<Value> {
        match name {
            "title" => Ok(Value::from(self.title)),
            "author" => Ok(Value::from(self.author)),
            _ => Err(NamespaceError::attribute_not_found("Article", name)),
        }
    }
}

fn article() -> Value {
    Value::object(Article {
        title: "Scopes",
        author: "ada",
    })
}

#[test]
fn sub_template_sees_callers_scopes() {
    init_tracing();
    let byline = DocumentTemplate::new(
        "byline",
        vec![Block::text("by "), Block::var("author")],
    );
    let page = DocumentTemplate::new(
        "page",
        vec![
            Block::var("title"),
            Block::text(" "),
            Block::var("byline"),
        ],
    )
    .with_globals(ScopeMap::new().with("byline", Value::object(byline)));

    assert_eq!(
        page.render(Some(&article()), None, None),
        Ok("Scopes by ada".to_owned())
    );
}

#[test]
fn sub_template_runs_one_level_deeper() {
    let inner = DocumentTemplate::new("inner", vec![Block::eval(|ns| ns.get_field("level"))]);
    let outer = DocumentTemplate::new(
        "outer",
        vec![
            Block::eval(|ns| ns.get_field("level")),
            Block::text("/"),
            Block::var("inner"),
            Block::text("/"),
            Block::eval(|ns| ns.get_field("level")),
        ],
    )
    .with_var("inner", Value::object(inner));

    assert_eq!(outer.render(None, None, None), Ok("1/2/1".to_owned()));
}

#[test]
fn self_reference_hits_nesting_limit() {
    let template = Rc::new(
        DocumentTemplate::new("loop", vec![Block::text("."), Block::var("again")])
            .with_config(RenderConfig::new().with_max_nesting(5)),
    );
    let as_value: Rc<dyn Object> = template.clone();
    let mapping = ScopeMap::new().with("again", as_value);

    assert_eq!(
        template.render(None, Some(mapping.into()), None),
        Err(NamespaceError::recursion_limit(5))
    );
}

#[test]
fn conditional_on_client_attribute() {
    let template = DocumentTemplate::new(
        "cond",
        vec![Block::If {
            branches: vec![
                (Expr::name("draft"), vec![Block::text("draft")]),
                (Expr::name("title"), vec![Block::text("titled "), Block::var("title")]),
            ],
            otherwise: Some(vec![Block::text("untitled")]),
        }],
    );
    assert_eq!(
        template.render(Some(&article()), None, None),
        Ok("titled Scopes".to_owned())
    );
    assert_eq!(template.render(None, None, None), Ok("untitled".to_owned()));
}

#[test]
fn namespace_settings_apply_to_client_views() {
    let template = DocumentTemplate::new("secret", vec![Block::var("author")]).with_namespace(
        NamespaceBuilder::new().accessor(Rc::new(DenyNames::new(["author"]))),
    );
    let result = template.render(Some(&article()), None, None);
    assert!(matches!(result, Err(NamespaceError::PolicyDenial { .. })));
}

#[test]
fn namespace_call_form_reaches_caller_values() {
    let template = DocumentTemplate::new(
        "call",
        vec![Block::eval(|ns| {
            let bundle = ns.call(vec![Value::Map(ScopeMap::new().with("x", 7))], None);
            let Value::List(items) = bundle else {
                return Ok(Value::None);
            };
            items[0].get_attr("x")
        })],
    );
    assert_eq!(template.render(None, None, None), Ok("7".to_owned()));
}

#[test]
fn caller_namespace_untouched_after_sub_render() {
    let template = DocumentTemplate::new("t", vec![Block::var("title")])
        .with_globals(ScopeMap::new().with("title", "global"));
    let mut ns = NamespaceStack::new();
    ns.push(ScopeMap::new().with("title", "caller"));

    assert_eq!(
        template.render_in(&mut ns, Some(&article()), None),
        Ok("Scopes".to_owned())
    );
    assert_eq!(ns.depth(), 1);
    assert_eq!(ns.level(), 0);
    assert_eq!(ns.lookup("title", true), Ok(Value::from("caller")));
}
