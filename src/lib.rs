//! # Fount
//!
//! > A dependency injection container with named namespaces, three lifecycles and
//! > first-class support for values that settle asynchronously.
//!
//! ## Features
//! * `static`, `scoped` and `factory` lifecycles
//! * Namespaces with `ns.key` and `ns_key` routing
//! * Dependencies named after function parameters
//! * Forward references that resolve once the dependency is registered
//! * Pending values aggregated in declared order
//! * Fallback to a module source for unregistered keys
//! * Bulk registration from JSON
//!
//! ## Example
//! ```
//! use fount::{Fount, function};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), fount::Error> {
//! let fount = Fount::new();
//!
//! fount.register("host", "localhost");
//! fount.container("db").register("port", 5432);
//! fount.register_factory("url", function!(|host, db_port| {
//!     Ok(format!("{}:{}", host.as_str().unwrap_or_default(), db_port.as_i64().unwrap_or_default()))
//! }));
//!
//! let url = fount.resolve("url")?.await?;
//! assert_eq!(url.as_str(), Some("localhost:5432"));
//! # Ok(())
//! # }
//! ```

mod container;
mod fount;
mod inject;
mod registry;
mod resolver;
mod store;

pub mod config;
pub mod error;
pub mod function;
pub mod key;
pub mod module;
pub mod options;
pub mod pending;
pub mod producer;
pub mod value;

pub use crate::{
    config::{Configuration, Entry},
    container::Container,
    error::Error,
    fount::Fount,
    function::Function,
    key::{DEFAULT_NAMESPACE, DEFAULT_SCOPE, KeyList},
    module::{ModuleMap, ModuleSource},
    options::Options,
    pending::{Aggregate, Pending},
    producer::{Lifecycle, Producer, Resolution},
    value::{List, Map, Value},
};
