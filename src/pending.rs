//! Pending values and their aggregation

use crate::{error::Error, function::Function, value::Value};
use futures_util::future::{BoxFuture, FutureExt, Shared, join_all};
use indexmap::IndexMap;
use std::{
    fmt::{Debug, Formatter},
    future::Future,
    pin::Pin,
    task::{Context, Poll}
};

type Inner = Shared<BoxFuture<'static, Result<Value, Error>>>;

/// A future of a named set of values, keyed in request order
pub type Aggregate = BoxFuture<'static, Result<IndexMap<String, Value>, Error>>;

/// A value that settles later.
///
/// Cloning a [`Pending`] shares the underlying computation:
/// every clone observes the same settled result.
#[derive(Clone)]
pub struct Pending(Inner);

impl Pending {
    /// Wraps a future
    #[inline]
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Result<Value, Error>> + Send + 'static
    {
        Self(fut.boxed().shared())
    }

    /// Creates a [`Pending`] that is already settled
    #[inline]
    pub fn ready(result: Result<Value, Error>) -> Self {
        Self::new(std::future::ready(result))
    }

    /// Returns the result if it has already been produced
    #[inline]
    pub fn peek(&self) -> Option<&Result<Value, Error>> {
        self.0.peek()
    }

    /// Returns `true` if both handles share the same computation
    #[inline]
    pub fn ptr_eq(&self, other: &Pending) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl Future for Pending {
    type Output = Result<Value, Error>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.0.poll_unpin(cx)
    }
}

impl Debug for Pending {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Pending")
            .field(&self.peek())
            .finish()
    }
}

/// Waits for every argument to settle, then calls `f` with the settled arguments
/// in their original order and settles its result.
pub(crate) fn apply_when(f: Function, args: Vec<Value>) -> Pending {
    Pending::new(async move {
        let args = join_all(args.into_iter().map(Value::settle))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        f.call(args)?.settle().await
    })
}

/// Waits for every entry to settle and collects them keyed in their original order
pub(crate) fn when_keys(entries: Vec<(String, Result<Value, Error>)>) -> Aggregate {
    async move {
        join_all(entries.into_iter().map(|(key, value)| async move {
            Ok::<_, Error>((key, value?.settle().await?))
        }))
        .await
        .into_iter()
        .collect::<Result<IndexMap<_, _>, _>>()
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn delayed(ms: u64, value: i64) -> Value {
        Value::Pending(Pending::new(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, Error>(Value::from(value))
        }))
    }

    #[tokio::test]
    async fn it_shares_the_settled_result() {
        let pending = Pending::new(async { Ok::<_, Error>(Value::from("once")) });
        let copy = pending.clone();

        assert_eq!(pending.await.unwrap(), Value::from("once"));
        assert!(copy.peek().is_some());
        assert_eq!(copy.await.unwrap(), Value::from("once"));
    }

    #[tokio::test]
    async fn it_applies_arguments_in_declared_order() {
        let f = crate::function!(|a, b, c| Ok(vec![a, b, c]));

        let result = apply_when(f, vec![delayed(30, 1), Value::from(2), delayed(5, 3)])
            .await
            .unwrap();

        assert_eq!(result, Value::from(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn it_rejects_when_an_argument_fails() {
        let f = crate::function!(|a| Ok(a));
        let failing = Value::Pending(Pending::ready(Err(Error::producer("nope"))));

        let result = apply_when(f, vec![failing]).await;

        assert_eq!(result, Err(Error::producer("nope")));
    }

    #[tokio::test]
    async fn it_keeps_key_order_regardless_of_settle_order() {
        let entries = vec![
            ("x".to_string(), Ok(Value::from(1))),
            ("y".to_string(), Ok(delayed(30, 2))),
            ("z".to_string(), Ok(delayed(1, 3))),
        ];

        let result = when_keys(entries).await.unwrap();

        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert_eq!(result["y"], Value::Int(2));
        assert_eq!(result["z"], Value::Int(3));
    }
}
