//! Per-node attribute storage with four-level resolution.
//!
//! A lookup tries, in order:
//!
//!   1. the **explicit** attributes set on the node itself (from the markup);
//!   2. the **inherited** attributes pushed down from ancestors during inheritance;
//!   3. the **defaults** of the node's kind;
//!   4. the **global** defaults (those of the `<math>` element).
//!
//! [`Value::Inherit`] found along the way means "use the global value instead".

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// An attribute or property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Resolve through the global layer
    Inherit,
    Bool(bool),
    Number(f64),
    Str(Cow<'static, str>),
}

/// A static table of default values
pub type DefaultTable = &'static [(&'static str, Value)];
/// Default tables searched in order, most specific first
pub type Defaults = &'static [DefaultTable];

/// Shorthand for static string values in default tables
pub const fn string(value: &'static str) -> Value {
    Value::Str(Cow::Borrowed(value))
}

impl Value {
    /// Owned string value
    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(Cow::Owned(value.into()))
    }

    /// Truthiness: `true`, non-zero numbers and the string `"true"`
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b)   => *b,
            Value::Number(n) => *n != 0.,
            Value::Str(s)    => s == "true",
            Value::Inherit   => false,
        }
    }

    /// Numeric value; strings are parsed
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b)   => Some(if *b { 1. } else { 0. }),
            Value::Str(s)    => s.trim().parse().ok(),
            Value::Inherit   => None,
        }
    }

    /// String form of the value
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Value::Str(s)    => Cow::Borrowed(s.as_ref()),
            Value::Bool(b)   => Cow::Owned(b.to_string()),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Inherit   => Cow::Borrowed(""),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self { Value::Number(n as f64) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::str(s) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(Cow::Owned(s)) }
}

fn lookup(tables: Defaults, name: &str) -> Option<&'static Value> {
    tables.iter()
        .flat_map(|table| table.iter())
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// The four attribute layers of a node
#[derive(Debug, Clone)]
pub struct Attributes {
    explicit:  BTreeMap<String, Value>,
    inherited: BTreeMap<String, Value>,
    defaults:  Defaults,
    global:    Defaults,
}

impl Attributes {
    /// Attributes of a node whose kind has the given defaults
    pub fn new(defaults: Defaults, global: Defaults) -> Self {
        Self { explicit: BTreeMap::new(), inherited: BTreeMap::new(), defaults, global }
    }

    /// Set an explicit attribute
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.explicit.insert(name.into(), value.into());
    }

    /// Set an attribute in the inherited layer
    pub fn set_inherited(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.inherited.insert(name.into(), value.into());
    }

    /// Remove an explicit attribute
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.explicit.remove(name)
    }

    fn resolve(&self, name: &str) -> Option<&Value> {
        self.explicit.get(name)
            .or_else(|| self.inherited.get(name))
            .or_else(|| lookup(self.defaults, name))
            .or_else(|| lookup(self.global, name))
    }

    /// Resolved value of `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.resolve(name) {
            Some(Value::Inherit) => self.get_global(name),
            value => value,
        }
    }

    /// Value set on the node itself, if any
    pub fn get_explicit(&self, name: &str) -> Option<&Value> {
        self.explicit.get(name)
    }

    /// Value ignoring the explicit layer
    pub fn get_inherited(&self, name: &str) -> Option<&Value> {
        let value = self.inherited.get(name)
            .or_else(|| lookup(self.defaults, name))
            .or_else(|| lookup(self.global, name));
        match value {
            Some(Value::Inherit) => self.get_global(name),
            value => value,
        }
    }

    /// Default for the node's kind (falling back to the global one)
    pub fn get_default(&self, name: &str) -> Option<&Value> {
        match lookup(self.defaults, name) {
            Some(Value::Inherit) | None => self.get_global(name),
            value => value,
        }
    }

    pub fn get_global(&self, name: &str) -> Option<&Value> {
        lookup(self.global, name).filter(|v| **v != Value::Inherit)
    }

    /// Explicitly set or inherited (a default alone does not count)
    pub fn is_set(&self, name: &str) -> bool {
        self.explicit.contains_key(name) || self.inherited.contains_key(name)
    }

    /// Does the node's own kind have a default for `name`?
    pub fn has_default(&self, name: &str) -> bool {
        lookup(self.defaults, name).is_some()
    }

    /// Does any layer know about `name`?
    pub fn is_known(&self, name: &str) -> bool {
        self.has_default(name) || lookup(self.global, name).is_some()
    }

    /// Resolved boolean value (false when unknown)
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).map_or(false, Value::as_bool)
    }

    /// Resolved numeric value
    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    /// Resolved string value (empty when unknown)
    pub fn get_str(&self, name: &str) -> String {
        self.get(name).map(|v| v.as_str().into_owned()).unwrap_or_default()
    }

    /// The explicit layer
    pub fn get_all_attributes(&self) -> &BTreeMap<String, Value> {
        &self.explicit
    }

    /// The inherited layer
    pub fn get_all_inherited(&self) -> &BTreeMap<String, Value> {
        &self.inherited
    }

    /// Names having a default for this kind
    pub fn get_all_defaults(&self) -> impl Iterator<Item = &'static str> {
        self.defaults.iter().flat_map(|table| table.iter()).map(|(name, _)| *name)
    }

    /// Copy the explicit and inherited layers from another node's attributes
    pub(crate) fn copy_layers_from(&mut self, other: &Attributes) {
        self.explicit = other.explicit.clone();
        self.inherited = other.inherited.clone();
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: &[(&str, Value)] = &[
        ("form",      string("infix")),
        ("mathcolor", Value::Inherit),
        ("fence",     Value::Bool(false)),
    ];
    const GLOBAL: &[(&str, Value)] = &[
        ("mathcolor",   string("black")),
        ("form",        string("global-form")),
        ("scriptlevel", Value::Number(0.)),
    ];

    static DEFAULT_LAYERS: &[&[(&str, Value)]] = &[DEFAULTS];
    static GLOBAL_LAYERS: &[&[(&str, Value)]] = &[GLOBAL];

    fn attributes() -> Attributes {
        Attributes::new(DEFAULT_LAYERS, GLOBAL_LAYERS)
    }

    #[test]
    fn single_layer_values() {
        let attrs = attributes();
        assert_eq!(attrs.get("form"), Some(&string("infix")));
        assert_eq!(attrs.get("scriptlevel"), Some(&Value::Number(0.)));
        assert_eq!(attrs.get("mathcolor"), Some(&string("black")));
        assert_eq!(attrs.get("nope"), None);
    }

    #[test]
    fn layering_order() {
        let mut attrs = attributes();
        attrs.set_inherited("form", "prefix");
        assert_eq!(attrs.get_str("form"), "prefix");
        assert!(attrs.get_explicit("form").is_none());
        attrs.set("form", "postfix");
        assert_eq!(attrs.get_str("form"), "postfix");
        assert_eq!(attrs.get_inherited("form").map(|v| v.as_str().into_owned()), Some("prefix".to_string()));
    }

    #[test]
    fn explicit_inherit_means_global() {
        let mut attrs = attributes();
        attrs.set_inherited("form", "prefix");
        attrs.set("form", Value::Inherit);
        assert_eq!(attrs.get_str("form"), "global-form");
    }

    #[test]
    fn is_set_ignores_defaults() {
        let mut attrs = attributes();
        assert!(!attrs.is_set("fence"));
        attrs.set_inherited("fence", true);
        assert!(attrs.is_set("fence"));
        assert!(attrs.get_explicit("fence").is_none());
        assert!(attrs.get_bool("fence"));
    }
}
