#![allow(missing_docs)]

use fount::{Error, Fount, Map, Pending, Value, function, invoke};

#[test]
fn it_invokes_with_static_values() {
    let fount = Fount::new();
    let a = Map::from_iter([("value", 1)]);
    fount.register("a", a.clone());
    fount.register("b", 2);
    fount.register("c", function!(|a, b| Ok(a.get("value").as_i64().unwrap_or_default() + b.as_i64().unwrap_or_default())));

    assert_eq!(invoke!(fount, |c| Ok(c)), Ok(Value::Int(3)));

    a.insert("value", 10);
    assert_eq!(invoke!(fount, |c| Ok(c)), Ok(Value::Int(3)));
}

#[test]
fn it_invokes_factories_with_current_state() {
    let fount = Fount::new();
    let a = Map::from_iter([("value", 1)]);
    fount.register_factory("a", a.clone());
    fount.register_factory("twice", function!(|a| Ok(a.get("value").as_i64().unwrap_or_default() * 2)));

    assert_eq!(invoke!(fount, |twice| Ok(twice)), Ok(Value::Int(2)));

    a.insert("value", 4);
    assert_eq!(invoke!(fount, |twice| Ok(twice)), Ok(Value::Int(8)));
}

#[test]
fn it_invokes_in_a_custom_scope() {
    let fount = Fount::new();
    let a = Map::from_iter([("value", 1)]);
    fount.register_scoped("a", a.clone());

    assert_eq!(invoke!(fount, |a| Ok(a.get("value"))), Ok(Value::Int(1)));

    a.insert("value", 2);
    let custom = fount.in_scope("custom");
    assert_eq!(invoke!(custom, |a| Ok(a.get("value"))), Ok(Value::Int(2)));
    assert_eq!(invoke!(fount, |a| Ok(a.get("value"))), Ok(Value::Int(1)));
}

#[tokio::test]
async fn it_passes_pending_values_through() {
    let fount = Fount::new();
    fount.register("later", Pending::ready(Ok(Value::from("done"))));

    let result = invoke!(fount, |later| Ok(later)).unwrap();

    assert!(result.is_pending());
    assert_eq!(result.settle().await, Ok(Value::from("done")));
}

#[test]
fn it_invokes_with_explicit_keys() {
    let fount = Fount::new();
    fount.container("one").register("x", 1);
    fount.register("y", 2);

    let result = invoke!(fount, ["one.x", "y"], |first, second| Ok(vec![first, second]));

    assert_eq!(result, Ok(Value::from(vec![1, 2])));
}

#[test]
fn it_fails_before_invoking_with_missing_keys() {
    let fount = Fount::new();
    fount.register("a", 1);

    let result = invoke!(fount, |a, missing| Ok(vec![a, missing]));

    assert_eq!(result, Err(Error::Unresolvable(vec!["missing".into()])));
}

#[test]
fn it_returns_producer_errors() {
    let fount = Fount::new();

    let result = invoke!(fount, || Err::<Value, _>(Error::producer("nope")));

    assert_eq!(result, Err(Error::producer("nope")));
}
