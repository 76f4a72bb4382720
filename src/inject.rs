//! `inject!` and `invoke!` macros

/// An `inject!` macro that calls a closure with dependencies named after its parameters.
///
/// Expands to [`Container::inject`](crate::Container::inject) with a [`function!`](crate::function!)
/// built from the closure. Underscored parameter names route to other namespaces,
/// `db_host` resolves `host` from the `db` namespace.
///
/// # Macro Syntax
/// ```ignore
/// inject!(container, |dep1, dep2, …| body)
/// inject!(container, ["key1", "key2"], |arg1, arg2, …| body)
/// ```
///
/// # Example
/// ```
/// use fount::{Fount, inject};
///
/// # #[tokio::main]
/// # async fn main() {
/// let fount = Fount::new();
/// fount.container("db").register("host", "localhost");
/// fount.register("port", 5432);
///
/// let url = inject!(fount, |db_host, port| {
///     Ok(format!("{}:{}", db_host.as_str().unwrap_or_default(), port.as_i64().unwrap_or_default()))
/// })
/// .unwrap()
/// .await
/// .unwrap();
///
/// assert_eq!(url.as_str(), Some("localhost:5432"));
/// # }
/// ```
#[macro_export]
macro_rules! inject {
    ($container:expr, [$($key:expr),* $(,)?], |$($param:ident),* $(,)?| $body:expr) => {
        $container.inject_with(
            &[$($key),*] as &[&str],
            $crate::function!(|$($param),*| $body)
        )
    };
    ($container:expr, |$($param:ident),* $(,)?| $body:expr) => {
        $container.inject($crate::function!(|$($param),*| $body))
    };
    ($container:expr, || $body:expr) => {
        $container.inject($crate::function!(|| $body))
    };
}

/// An `invoke!` macro that calls a closure right away
/// with dependencies named after its parameters.
///
/// Expands to [`Container::invoke`](crate::Container::invoke).
/// Dependencies that settle later are passed as [`Value::Pending`](crate::Value::Pending).
///
/// # Example
/// ```
/// use fount::{Fount, invoke};
///
/// let fount = Fount::new();
/// fount.register("a", 2);
/// fount.register("b", 3);
///
/// let product = invoke!(fount, |a, b| {
///     Ok(a.as_i64().unwrap_or_default() * b.as_i64().unwrap_or_default())
/// });
///
/// assert_eq!(product.unwrap().as_i64(), Some(6));
/// ```
#[macro_export]
macro_rules! invoke {
    ($container:expr, [$($key:expr),* $(,)?], |$($param:ident),* $(,)?| $body:expr) => {
        $container.invoke_with(
            &[$($key),*] as &[&str],
            $crate::function!(|$($param),*| $body)
        )
    };
    ($container:expr, |$($param:ident),* $(,)?| $body:expr) => {
        $container.invoke($crate::function!(|$($param),*| $body))
    };
    ($container:expr, || $body:expr) => {
        $container.invoke($crate::function!(|| $body))
    };
}
