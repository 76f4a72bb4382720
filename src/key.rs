//! Key paths and dependency key lists

use std::borrow::Cow;

/// Name of the namespace used when none is given
pub const DEFAULT_NAMESPACE: &str = "default";

/// Name of the scope used when none is given
pub const DEFAULT_SCOPE: &str = "default";

/// A key routed to the namespace that owns it.
///
/// `"ns.key"` and `"ns_key"` route to `key` inside `ns`. Outside the default namespace
/// the target is nested under the current one: `"b.key"` requested from `a` routes to `a.b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyPath<'a> {
    pub(crate) namespace: Cow<'a, str>,
    pub(crate) key: &'a str,
}

impl<'a> KeyPath<'a> {
    pub(crate) fn route(namespace: &'a str, key: &'a str) -> Self {
        match key.rsplit_once(['.', '_']) {
            None => Self { namespace: Cow::Borrowed(namespace), key },
            Some((lead, last)) => {
                let lead = lead.replace('_', ".");
                let namespace = if namespace == DEFAULT_NAMESPACE {
                    lead
                } else {
                    format!("{namespace}.{lead}")
                };
                Self { namespace: Cow::Owned(namespace), key: last }
            }
        }
    }

    /// Returns `true` if the key was requested without a namespace
    #[inline]
    pub(crate) fn is_bare(&self) -> bool {
        matches!(self.namespace, Cow::Borrowed(_))
    }
}

/// A single dependency key or a list of them.
///
/// Lists may nest, they are flattened in order.
///
/// # Example
/// ```
/// use fount::KeyList;
///
/// assert_eq!("a".to_keys(), ["a"]);
/// assert_eq!(["a", "b"].to_keys(), ["a", "b"]);
/// assert_eq!(vec![vec!["a"], vec!["b", "c"]].to_keys(), ["a", "b", "c"]);
/// ```
pub trait KeyList {
    /// Appends the keys to `keys`
    fn push_keys(&self, keys: &mut Vec<String>);

    /// Collects the keys into a vector
    fn to_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.push_keys(&mut keys);
        keys
    }
}

impl KeyList for str {
    #[inline]
    fn push_keys(&self, keys: &mut Vec<String>) {
        keys.push(self.to_owned());
    }
}

impl KeyList for String {
    #[inline]
    fn push_keys(&self, keys: &mut Vec<String>) {
        keys.push(self.clone());
    }
}

impl<T: KeyList + ?Sized> KeyList for &T {
    #[inline]
    fn push_keys(&self, keys: &mut Vec<String>) {
        (**self).push_keys(keys);
    }
}

impl<T: KeyList> KeyList for [T] {
    fn push_keys(&self, keys: &mut Vec<String>) {
        for item in self {
            item.push_keys(keys);
        }
    }
}

impl<T: KeyList, const N: usize> KeyList for [T; N] {
    #[inline]
    fn push_keys(&self, keys: &mut Vec<String>) {
        self.as_slice().push_keys(keys);
    }
}

impl<T: KeyList> KeyList for Vec<T> {
    #[inline]
    fn push_keys(&self, keys: &mut Vec<String>) {
        self.as_slice().push_keys(keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_keeps_bare_keys_in_the_current_namespace() {
        let path = KeyPath::route("default", "an value!");

        assert_eq!(path.namespace, "default");
        assert_eq!(path.key, "an value!");
        assert!(path.is_bare());
    }

    #[test]
    fn it_routes_dotted_keys() {
        let path = KeyPath::route("default", "one.x");

        assert_eq!(path.namespace, "one");
        assert_eq!(path.key, "x");
        assert!(!path.is_bare());
    }

    #[test]
    fn it_routes_underscored_keys() {
        let path = KeyPath::route("default", "other_c");

        assert_eq!(path.namespace, "other");
        assert_eq!(path.key, "c");
    }

    #[test]
    fn it_routes_deep_paths() {
        let path = KeyPath::route("default", "one.two_three");

        assert_eq!(path.namespace, "one.two");
        assert_eq!(path.key, "three");
    }

    #[test]
    fn it_nests_paths_under_a_custom_namespace() {
        let path = KeyPath::route("one", "one.x");

        assert_eq!(path.namespace, "one.one");
        assert_eq!(path.key, "x");
    }

    #[test]
    fn it_flattens_key_lists() {
        let nested: Vec<Vec<String>> = vec![vec!["a".into()], vec!["b".into(), "a".into()]];

        assert_eq!(nested.to_keys(), ["a", "b", "a"]);
        assert_eq!(String::from("x").to_keys(), ["x"]);
    }
}
