//! Layered configuration.
//!
//! Every component starts from a list of defaults and has zero or more partial overlays merged
//! into it. Two merge modes exist:
//!
//!  - [`default_options`] merges silently. It is how a component extends the defaults of the
//!    component it builds upon.
//!  - [`user_options`] validates: an overlay key the base does not already have is an
//!    [`Error::UnknownOption`], unless the base object is marked [expandable](OptionList::expandable).
//!
//! An overlay value of the form `{"[+]": [...], "[-]": [...]}` on an array-valued key removes the
//! `[-]` items and then appends the `[+]` items, instead of replacing the array.
//!
//! Merged lists are turned into typed option structs with [`OptionList::typed`].

use std::collections::BTreeMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// Overlay key meaning "append these items"
pub const APPEND: &str = "[+]";
/// Overlay key meaning "remove these items"
pub const REMOVE: &str = "[-]";

/// One option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<OptionValue>),
    Object(OptionList),
}

/// An ordered key → value option map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionList {
    entries:    BTreeMap<String, OptionValue>,
    expandable: bool,
}

impl OptionList {
    /// An empty, non-expandable list
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the list as accepting keys it has no default for.
    pub fn expandable(mut self) -> Self {
        self.expandable = true;
        self
    }

    /// Whether unknown keys are accepted by [`user_options`]
    pub fn is_expandable(&self) -> bool {
        self.expandable
    }

    /// Builds a list from a JSON object. Anything other than an object gives an empty list.
    pub fn from_json(value: Value) -> Self {
        match OptionValue::from(value) {
            OptionValue::Object(list) => list,
            _ => OptionList::new(),
        }
    }

    /// The JSON form of the list, with nested lists as JSON objects.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries.iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect::<Map<String, Value>>()
        )
    }

    /// Deserialize the merged list into a typed option struct.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_json())?)
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut OptionValue> {
        self.entries.get_mut(key)
    }

    /// Nested list under `key`, if that key holds an object
    pub fn sublist(&self, key: &str) -> Option<&OptionList> {
        match self.entries.get(key) {
            Some(OptionValue::Object(list)) => Some(list),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OptionValue {
    /// The JSON form of the value
    pub fn to_json(&self) -> Value {
        match self {
            OptionValue::Null       => Value::Null,
            OptionValue::Bool(b)    => Value::Bool(*b),
            OptionValue::Number(n) if n.fract() == 0. && n.abs() < 1e15
                                    => Value::from(*n as i64),
            OptionValue::Number(n)  => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            OptionValue::String(s)  => Value::String(s.clone()),
            OptionValue::Array(v)   => Value::Array(v.iter().map(OptionValue::to_json).collect()),
            OptionValue::Object(o)  => o.to_json(),
        }
    }

    /// Is this an `{"[+]": [...], "[-]": [...]}` directive, and nothing else?
    fn as_array_directive(&self) -> Option<(Option<&[OptionValue]>, Option<&[OptionValue]>)> {
        let list = match self {
            OptionValue::Object(list) if !list.is_empty() && list.len() <= 2 => list,
            _ => return None,
        };
        let mut append = None;
        let mut remove = None;
        for (key, value) in &list.entries {
            match (key.as_str(), value) {
                (APPEND, OptionValue::Array(items)) => append = Some(items.as_slice()),
                (REMOVE, OptionValue::Array(items)) => remove = Some(items.as_slice()),
                _ => return None,
            }
        }
        Some((append, remove))
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null      => OptionValue::Null,
            Value::Bool(b)   => OptionValue::Bool(b),
            Value::Number(n) => OptionValue::Number(n.as_f64().unwrap_or(0.)),
            Value::String(s) => OptionValue::String(s),
            Value::Array(v)  => OptionValue::Array(v.into_iter().map(OptionValue::from).collect()),
            Value::Object(o) => {
                let mut list = OptionList::new();
                for (key, value) in o {
                    list.entries.insert(key, OptionValue::from(value));
                }
                OptionValue::Object(list)
            },
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self { OptionValue::Bool(b) }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self { OptionValue::Number(n) }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self { OptionValue::String(s.to_string()) }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self { OptionValue::String(s) }
}

impl From<OptionList> for OptionValue {
    fn from(list: OptionList) -> Self { OptionValue::Object(list) }
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(items: Vec<OptionValue>) -> Self { OptionValue::Array(items) }
}


/// Merge `overlays` into `base` in order, accepting keys `base` has no default for.
pub fn default_options(mut base: OptionList, overlays: &[OptionList]) -> OptionList {
    for overlay in overlays {
        // cannot fail: validation is off
        let _ = insert(&mut base, overlay, false, "");
    }
    base
}

/// Merge `overlays` into `base` in order, rejecting keys `base` has no default for.
pub fn user_options(mut base: OptionList, overlays: &[OptionList]) -> Result<OptionList> {
    for overlay in overlays {
        insert(&mut base, overlay, true, "")?;
    }
    Ok(base)
}

/// Same as [`default_options`] but merging in place
pub fn merge_defaults(base: &mut OptionList, overlay: &OptionList) {
    let _ = insert(base, overlay, false, "");
}

/// Same as [`user_options`] but merging in place
pub fn merge_user(base: &mut OptionList, overlay: &OptionList) -> Result<()> {
    insert(base, overlay, true, "")
}

fn insert(dst: &mut OptionList, src: &OptionList, warn: bool, path: &str) -> Result<()> {
    for (key, sval) in &src.entries {
        let key_path = if path.is_empty() { key.clone() } else { format!("{}.{}", path, key) };
        if warn && !dst.expandable && !dst.entries.contains_key(key) {
            return Err(Error::UnknownOption { path: key_path });
        }

        let directive = sval.as_array_directive();
        match (dst.entries.get_mut(key), sval) {
            (Some(OptionValue::Array(dval)), _) if directive.is_some() => {
                if let Some((append, remove)) = directive {
                    if let Some(remove) = remove {
                        dval.retain(|item| !remove.contains(item));
                    }
                    if let Some(append) = append {
                        dval.extend(append.iter().cloned());
                    }
                }
                continue;
            },
            (Some(OptionValue::Object(dval)), OptionValue::Object(sval)) => {
                insert(dval, sval, warn, &key_path)?;
                continue;
            },
            _ => (),
        }
        // arrays and objects are fresh deep copies, scalars are copied
        dst.entries.insert(key.clone(), sval.clone());
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(value: Value) -> OptionList {
        OptionList::from_json(value)
    }

    #[test]
    fn append_and_remove_directives() {
        let merged = user_options(
            list(json!({"list": [1, 2, 3]})),
            &[list(json!({"list": {"[+]": [4], "[-]": [2]}}))],
        ).unwrap();
        assert_eq!(merged.to_json(), json!({"list": [1, 3, 4]}));
    }

    #[test]
    fn unknown_keys() {
        let err = user_options(list(json!({"a": 1})), &[list(json!({"b": 2}))]).unwrap_err();
        assert!(matches!(err, Error::UnknownOption { ref path } if path == "b"));

        let merged = default_options(list(json!({"a": 1})), &[list(json!({"b": 2}))]);
        assert_eq!(merged.to_json(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn nested_unknown_keys_report_their_path() {
        let err = user_options(
            list(json!({"verify": {"checkArity": true}})),
            &[list(json!({"verify": {"typo": false}}))],
        ).unwrap_err();
        assert!(matches!(err, Error::UnknownOption { ref path } if path == "verify.typo"));
    }

    #[test]
    fn expandable_lists_take_new_keys() {
        let mut base = OptionList::new();
        base.set("macros", OptionList::new().expandable());
        let merged = user_options(base, &[list(json!({"macros": {"R": "\\mathbb{R}"}}))]).unwrap();
        assert_eq!(merged.to_json(), json!({"macros": {"R": "\\mathbb{R}"}}));
    }

    #[test]
    fn arrays_are_replaced_not_merged() {
        let merged = user_options(
            list(json!({"list": [1, 2, 3], "obj": {"x": 1, "y": 2}})),
            &[list(json!({"list": [5], "obj": {"y": 3}}))],
        ).unwrap();
        assert_eq!(merged.to_json(), json!({"list": [5], "obj": {"x": 1, "y": 3}}));
    }

    #[test]
    fn only_remove() {
        let merged = default_options(
            list(json!({"list": ["a", "b"]})),
            &[list(json!({"list": {"[-]": ["a"]}}))],
        );
        assert_eq!(merged.to_json(), json!({"list": ["b"]}));
    }
}
