//! Callable values and the [`function!`](crate::function!) macro

use crate::{error::Error, pending::Pending, value::Value};
use std::{
    fmt::{Debug, Formatter},
    future::Future,
    sync::Arc
};

type Call = dyn Fn(Vec<Value>) -> Result<Value, Error>
    + Send
    + Sync;

/// A function that can be registered as a producer, injected or passed around as a value.
///
/// A function declares the names of its parameters. When it is registered without an explicit
/// dependency list, those names are the keys resolved and passed to it, in declared order.
#[derive(Clone)]
pub struct Function {
    params: Arc<[String]>,
    call: Arc<Call>,
    stub: bool,
    external: bool,
}

impl Function {
    /// Creates a function from a synchronous closure.
    ///
    /// Parameter names are trimmed, empty names are dropped.
    ///
    /// # Example
    /// ```
    /// use fount::{Function, Value};
    ///
    /// let add = Function::new(["a", "b"], |args: Vec<Value>| {
    ///     let a = args[0].as_i64().unwrap_or_default();
    ///     let b = args[1].as_i64().unwrap_or_default();
    ///     Ok(a + b)
    /// });
    ///
    /// assert_eq!(add.params(), ["a", "b"]);
    /// ```
    pub fn new<P, S, F, R>(params: P, f: F) -> Self
    where
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(Vec<Value>) -> Result<R, Error> + Send + Sync + 'static,
        R: Into<Value>
    {
        Self {
            params: parse_params(params),
            call: Arc::new(move |args: Vec<Value>| -> Result<Value, Error> {
                f(args).map(Into::into)
            }),
            stub: false,
            external: false,
        }
    }

    /// Creates a function whose result settles asynchronously.
    /// Calling it returns a [`Value::Pending`].
    pub fn from_async<P, S, F, Fut, R>(params: P, f: F) -> Self
    where
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Error>> + Send + 'static,
        R: Into<Value>
    {
        Self {
            params: parse_params(params),
            call: Arc::new(move |args: Vec<Value>| -> Result<Value, Error> {
                let fut = f(args);
                Ok(Value::Pending(Pending::new(async move {
                    fut.await.map(Into::<Value>::into)
                })))
            }),
            stub: false,
            external: false,
        }
    }

    /// Marks the function as a stand-in that is never invoked by the container.
    /// Every lifecycle returns it as a plain value.
    #[inline]
    pub fn stub(mut self) -> Self {
        self.stub = true;
        self
    }

    /// Marks the function as loaded from a [`ModuleSource`](crate::ModuleSource)
    #[inline]
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    #[inline]
    pub fn is_stub(&self) -> bool {
        self.stub
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Declared parameter names
    #[inline]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Calls the function with positional arguments
    #[inline]
    pub fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        (self.call)(args)
    }

    /// Returns `true` if both values wrap the same closure
    #[inline]
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("stub", &self.stub)
            .field("external", &self.external)
            .finish_non_exhaustive()
    }
}

fn parse_params<P, S>(params: P) -> Arc<[String]>
where
    P: IntoIterator<Item = S>,
    S: AsRef<str>
{
    params
        .into_iter()
        .map(|p| p.as_ref().trim().to_owned())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Creates a [`Function`] whose parameter names are taken from the closure's parameters.
///
/// The body must evaluate to `Result<T, fount::Error>` where `T: Into<Value>`.
/// Missing arguments are [`Value::Undefined`].
///
/// # Example
/// ```
/// use fount::{Fount, function};
///
/// let fount = Fount::new();
/// fount.register("a", 1);
/// fount.register("b", 2);
/// fount.register("sum", function!(|a, b| Ok(a.as_i64().unwrap_or_default() + b.as_i64().unwrap_or_default())));
///
/// assert_eq!(fount.get("sum").unwrap().as_i64(), Some(3));
/// ```
#[macro_export]
macro_rules! function {
    (|| $body:expr) => {
        $crate::function!(| | $body)
    };
    (|$($param:ident),* $(,)?| $body:expr) => {
        $crate::Function::new(
            &[$(stringify!($param)),*] as &[&str],
            move |args: ::std::vec::Vec<$crate::Value>| {
                #[allow(unused_mut, unused_variables)]
                let mut args = args.into_iter();
                $(
                #[allow(unused_variables)]
                let $param = args.next().unwrap_or_default();
                )*
                $body
            }
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_trims_parameter_names() {
        let f = Function::new([" a", "b ", "  ", ""], |_| Ok(()));

        assert_eq!(f.params(), ["a", "b"]);
    }

    #[test]
    fn it_takes_parameter_names_from_macro() {
        let f = crate::function!(|one, two, three| Ok(vec![one, two, three]));

        assert_eq!(f.params(), ["one", "two", "three"]);
    }

    #[test]
    fn it_passes_arguments_in_order() {
        let f = crate::function!(|x, y| Ok(format!("{}-{}", x.as_i64().unwrap(), y.as_i64().unwrap())));

        let result = f.call(vec![Value::from(1), Value::from(2)]).unwrap();

        assert_eq!(result, Value::from("1-2"));
    }

    #[test]
    fn it_fills_missing_arguments_with_undefined() {
        let f = crate::function!(|x| Ok(x.is_undefined()));

        assert_eq!(f.call(vec![]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn it_propagates_producer_errors() {
        let f = Function::new(&[] as &[&str], |_| Err::<Value, _>(Error::producer("boom")));

        assert_eq!(f.call(vec![]), Err(Error::producer("boom")));
    }

    #[test]
    fn it_keeps_identity_when_marked() {
        let f = Function::new(&[] as &[&str], |_| Ok(1));
        let stub = f.clone().stub();

        assert!(stub.is_stub());
        assert!(!f.is_stub());
        assert!(stub.ptr_eq(&f));
    }

    #[tokio::test]
    async fn it_returns_pending_from_async_functions() {
        let f = Function::from_async(["x"], |args: Vec<Value>| async move {
            Ok::<_, Error>(args[0].as_i64().unwrap_or_default() * 2)
        });

        let result = f.call(vec![Value::from(21)]).unwrap();

        assert!(result.is_pending());
        assert_eq!(result.settle().await.unwrap(), Value::Int(42));
    }
}
