//! Default variables shared by every render.
//!
//! [`Attributes`] is a plain key-value store owned by a
//! [`ViewRenderer`](crate::ViewRenderer). It forms the bottom layer of the
//! variables a template sees: on each render the call's own variables are
//! laid over it, so a call value always wins over an attribute with the same
//! key. Nothing is global; two renderers never share attributes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ViewError};

/// Render-time default variables.
///
/// # Example
///
/// ```rust
/// use standout_views::Attributes;
/// use serde_json::json;
///
/// let mut attrs = Attributes::new();
/// attrs.set("site", "Example");
/// attrs.set("hello", "Hello");
///
/// let vars = attrs.merged(json!({ "hello": "Hi" })).unwrap();
/// assert_eq!(vars["hello"], "Hi");
/// assert_eq!(vars["site"], "Example");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: Map<String, Value>,
}

impl Attributes {
    /// Creates an empty attribute bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if set.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Sets `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Serializes `value` and sets it under `key`.
    pub fn try_set<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.values.insert(key.into(), value);
        Ok(())
    }

    /// Returns true if `key` is set.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds the variables for one render: these attributes with `vars`
    /// laid on top.
    ///
    /// `vars` must serialize to a map, or to unit/`null` for "no variables".
    pub fn merged<T: Serialize>(&self, vars: T) -> Result<Map<String, Value>> {
        let mut merged = self.values.clone();
        match serde_json::to_value(vars)? {
            Value::Object(map) => merged.extend(map),
            Value::Null => {}
            other => {
                return Err(ViewError::InvalidVariables {
                    kind: value_kind(&other),
                })
            }
        }
        Ok(merged)
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Attributes {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.values.insert(k.into(), v.into());
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        attrs.extend(iter);
        attrs
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a map",
    }
}
