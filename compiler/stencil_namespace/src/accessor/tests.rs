use super::*;
use crate::test_helpers::Record;
use pretty_assertions::assert_eq;

#[test]
fn test_plain_getattr_reads_object_attribute() {
    let target = Value::object(Record::new("doc").with("title", "Hello"));
    assert_eq!(plain_getattr(&target, "title"), Ok(Value::from("Hello")));
}

#[test]
fn test_plain_getattr_on_primitive_is_not_found() {
    let err = plain_getattr(&Value::Int(1), "real").unwrap_err();
    assert!(err.is_attribute_not_found());
}

#[test]
fn test_deny_names_refuses_listed_names() {
    let accessor = DenyNames::new(["password"]);
    let target = Value::object(Record::new("user").with("password", "hunter2"));
    let err = accessor.access(&target, "password").unwrap_err();
    assert!(matches!(err, NamespaceError::PolicyDenial { .. }));
}

#[test]
fn test_deny_names_passes_other_names_through() {
    let accessor = DenyNames::new(["password"]);
    let target = Value::object(Record::new("user").with("login", "ada"));
    assert_eq!(accessor.access(&target, "login"), Ok(Value::from("ada")));
    assert!(accessor
        .access(&target, "email")
        .unwrap_err()
        .is_attribute_not_found());
}

#[test]
fn test_guarded_getattr_prefers_accessor() {
    let accessor: SharedAccessor = Rc::new(FnAccessor::new(|_: &Value, name: &str| {
        Ok(Value::string(format!("guarded {name}")))
    }));
    let target = Value::Int(0);
    assert_eq!(
        guarded_getattr(Some(&accessor), &target, "x"),
        Ok(Value::from("guarded x"))
    );
    assert!(guarded_getattr(None, &target, "x").is_err());
}
