// Shared fixtures for integration tests

use std::collections::HashMap;

use uristencil::{Substitutions, Value};

/// The substitution set used by the RFC 6570 section 3.2 examples.
pub fn rfc_values() -> Substitutions {
    let mut subs = HashMap::new();
    subs.insert("var".to_string(), Value::from("value"));
    subs.insert("hello".to_string(), Value::from("Hello World!"));
    subs.insert("empty".to_string(), Value::from(""));
    subs.insert("path".to_string(), Value::from("/foo/bar"));
    subs.insert("x".to_string(), Value::from("1024"));
    subs.insert("y".to_string(), Value::from("768"));
    subs.insert(
        "list".to_string(),
        Value::from(vec!["red", "green", "blue"]),
    );
    subs.insert(
        "keys".to_string(),
        Value::assoc(vec![("semi", ";"), ("dot", "."), ("comma", ",")]),
    );
    subs
}

/// Expands `template` against the RFC example values and asserts the
/// result.
pub fn check(template: &str, expected: &str) {
    let expanded = uristencil::expand(template, &rfc_values()).expect(template);
    assert_eq!(expanded, expected, "template: {template}");
}
