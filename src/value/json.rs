//! Conversions between [`Value`] and JSON

use super::{List, Map, Value, object::{CIRCULAR, Visit}};
use serde::{Serialize, Serializer, ser::{SerializeMap, SerializeSeq}};
use serde_json::Value as Json;
use std::cell::RefCell;

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN))
            },
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect::<List>()),
            Json::Object(fields) => Value::Map(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect::<Map>()),
        }
    }
}

impl Value {
    /// Renders plain data as JSON.
    ///
    /// Values without a JSON form (functions, pending and opaque values) become `null`.
    /// A list or map nested in itself is rendered as the string `"[Circular]"`.
    pub fn to_json(&self) -> Json {
        serde_json::to_value(self).unwrap_or(Json::Null)
    }
}

impl Serialize for Value {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Nested { value: self, path: &RefCell::default() }.serialize(serializer)
    }
}

/// A value serialized along with the lists and maps that enclose it
struct Nested<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<usize>>,
}

impl Nested<'_> {
    fn serialize_list<S: Serializer>(&self, list: &List, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(_visit) = Visit::enter(self.path, list.addr()) else {
            return serializer.serialize_str(CIRCULAR);
        };
        let items = list.to_vec();
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for value in &items {
            seq.serialize_element(&Nested { value, path: self.path })?;
        }
        seq.end()
    }

    fn serialize_map<S: Serializer>(&self, map: &Map, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(_visit) = Visit::enter(self.path, map.addr()) else {
            return serializer.serialize_str(CIRCULAR);
        };
        let fields = map.entries();
        let mut out = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in &fields {
            out.serialize_entry(key, &Nested { value, path: self.path })?;
        }
        out.end()
    }
}

impl Serialize for Nested<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(list) => self.serialize_list(list, serializer),
            Value::Map(map) => self.serialize_map(map, serializer),
            Value::Undefined
            | Value::Null
            | Value::Function(_)
            | Value::Pending(_)
            | Value::Opaque(_) => serializer.serialize_unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_converts_from_json() {
        let value = Value::from(json!({ "a": 1, "b": [true, "x"], "c": 1.5 }));

        assert_eq!(value.get("a"), Value::Int(1));
        assert_eq!(value.get("b"), Value::from(vec![Value::Bool(true), Value::from("x")]));
        assert_eq!(value.get("c"), Value::Float(1.5));
    }

    #[test]
    fn it_renders_plain_data_as_json() {
        let map = Map::from_iter([("x", Value::from(1)), ("y", Value::from("two"))]);

        assert_eq!(Value::from(map).to_json(), json!({ "x": 1, "y": "two" }));
    }

    #[test]
    fn it_renders_opaque_values_as_null() {
        assert_eq!(Value::opaque(42u64).to_json(), Json::Null);
    }

    #[test]
    fn it_renders_cycles_as_circular() {
        let map = Map::from_iter([("x", 1)]);
        map.insert("me", map.clone());
        let shared = List::from_iter([1]);
        map.insert("a", shared.clone());
        map.insert("b", shared);

        assert_eq!(
            Value::from(map).to_json(),
            json!({ "x": 1, "me": "[Circular]", "a": [1], "b": [1] })
        );
    }
}
