//! Describes dependency resolution errors

use std::{
    fmt::{Display, Formatter},
    sync::Arc
};

/// An error raised while registering or resolving dependencies
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// One or more requested keys are not registered.
    /// Keys are kept in the form they were requested, in first-seen order.
    Unresolvable(Vec<String>),
    /// A lifecycle name other than `static`, `scoped` or `factory`
    InvalidLifecycle(String),
    /// A producer function failed
    Producer(Arc<str>),
    /// An opaque value could not be downcast to the requested type
    ResolveFailed(&'static str),
    /// A bulk configuration could not be parsed
    Config(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Unresolvable(keys) => write!(
                f,
                "Fount could not resolve the following dependencies: {}",
                keys.join(", ")
            ),
            Error::InvalidLifecycle(name) => write!(f, "Fount does not support the lifecycle: {name}"),
            Error::Producer(msg) => write!(f, "{msg}"),
            Error::ResolveFailed(type_name) => write!(f, "Fount Error: unable to resolve the value as: {type_name}"),
            Error::Config(msg) => write!(f, "Fount Error: invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Creates an error for a failed producer function
    #[inline]
    pub fn producer(msg: impl Into<Arc<str>>) -> Self {
        Error::Producer(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    #[inline]
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn it_lists_missing_keys_in_order() {
        let err = Error::Unresolvable(vec!["lol".into(), "rofl".into()]);

        assert_eq!(err.to_string(), "Fount could not resolve the following dependencies: lol, rofl");
    }

    #[test]
    fn it_displays_producer_message_as_is() {
        let err = Error::producer("boom");

        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn it_converts_json_errors_into_config_errors() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();

        assert!(matches!(err, Error::Config(_)));
    }
}
