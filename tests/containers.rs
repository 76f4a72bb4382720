#![allow(missing_docs)]

use fount::{Fount, Options, Value, function};

#[tokio::test]
async fn it_resolves_the_same_key_per_container() {
    let fount = Fount::new();
    fount.register("x", 50);
    fount.container("one").register("x", 100);
    fount.container("two").register("x", 200);

    let values = [
        fount.resolve("x").unwrap().await.unwrap(),
        fount.container("one").resolve("x").unwrap().await.unwrap(),
        fount.container("two").resolve("x").unwrap().await.unwrap(),
    ];

    assert_eq!(values, [Value::Int(50), Value::Int(100), Value::Int(200)]);
}

#[tokio::test]
async fn it_resolves_a_list_across_containers() {
    let fount = Fount::new();
    fount.register("x", 50);
    fount.register("one.x", 100);
    fount.container("two").register("x", 200);

    let values = fount.resolve_all(["x", "one.x", "two_x"]).unwrap().await.unwrap();

    assert_eq!(values["x"], Value::Int(50));
    assert_eq!(values["one.x"], Value::Int(100));
    assert_eq!(values["two_x"], Value::Int(200));
}

#[test]
fn it_nests_paths_registered_from_a_container() {
    let fount = Fount::new();
    let one = fount.container("one");
    one.register("two.x", 1);

    assert_eq!(fount.containers(), ["one.two"]);
    assert_eq!(one.get("two.x"), Ok(Value::Int(1)));
    assert_eq!(fount.get("one.two.x"), Ok(Value::Int(1)));
}

#[test]
fn it_resolves_dependencies_relative_to_the_container() {
    let fount = Fount::new();
    let db = fount.container("db");
    db.register("host", "localhost");
    db.register("port", 5432);
    db.register("url", function!(|host, port| Ok(format!(
        "{}:{}",
        host.as_str().unwrap_or_default(),
        port.as_i64().unwrap_or_default()
    ))));

    assert_eq!(fount.get("db.url"), Ok(Value::from("localhost:5432")));
    assert!(!fount.can_resolve("host"));
}

#[test]
fn it_lists_keys_and_scopes() {
    let fount = Fount::new();
    fount.register("b", 1);
    fount.register_scoped("a", 2);
    fount.register("b", 3);
    fount.register("other.c", 4);

    assert_eq!(fount.keys(), ["b", "a"]);
    assert!(fount.scopes().is_empty());

    fount.get("a").unwrap();
    fount.in_scope("request").get("a").unwrap();
    assert_eq!(fount.scopes(), ["default", "request"]);

    fount.purge_scope("request");
    assert_eq!(fount.scopes(), ["default"]);
}

#[test]
fn it_drops_keys_without_routing() {
    let fount = Fount::new();
    fount.register("a", 1);
    fount.register("other.a", 2);

    fount.drop("other.a");
    assert_eq!(fount.get("other.a"), Ok(Value::Int(2)));

    fount.container("other").drop("a");
    assert!(fount.get("other.a").is_err());
    assert_eq!(fount.get("a"), Ok(Value::Int(1)));
}

#[test]
fn it_purges_a_single_container() {
    let fount = Fount::new();
    fount.register("a", 1);
    fount.container("other").register("b", 2);

    fount.purge("other");

    assert_eq!(fount.containers(), ["default"]);
    assert!(!fount.can_resolve("other.b"));
    assert!(fount.can_resolve("a"));
}

#[test]
fn it_uses_a_custom_default_scope() {
    let fount = Fount::with_options(Options::new().with_default_scope("app"));
    fount.register_scoped("a", 1);

    fount.get("a").unwrap();

    assert_eq!(fount.scope(), "app");
    assert_eq!(fount.scopes(), ["app"]);
}

#[test]
fn it_shares_registrations_between_clones() {
    let fount = Fount::new();
    let copy = fount.clone();

    copy.register("a", 1);

    assert_eq!(fount.get("a"), Ok(Value::Int(1)));
}
