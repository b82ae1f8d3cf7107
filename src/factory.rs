//! A registry of node classes keyed by their kind.
//!
//! Node and wrapper kinds are open-ended: an extension may register a new kind, or replace the class
//! of an existing one, at any time before rendering starts. A [`Factory`] maps each kind string to
//! a class value `C` (a static descriptor telling the tree how to build and treat nodes of that
//! kind). Lookups of unregistered kinds fall back to a designated default kind.
//!
//! Classes may declare the kind they extend, so that [`Factory::node_is_kind`] answers "is this
//! node an instance of that kind or of one derived from it", e.g. an `msub` is an `msubsup`.

use std::collections::HashMap;

/// Something a [`Factory`] can register
pub trait FactoryClass {
    /// The kind this class is registered under
    fn kind(&self) -> &str;
    /// The kind this class specialises, if any
    fn extends(&self) -> Option<&str> { None }
}

/// Kind → class registry
#[derive(Debug, Clone)]
pub struct Factory<C> {
    classes:      HashMap<String, C>,
    default_kind: String,
}

impl<C: FactoryClass + Clone> Factory<C> {
    /// An empty factory falling back to `default_kind`
    pub fn new(default_kind: &str) -> Self {
        Self { classes: HashMap::new(), default_kind: default_kind.to_string() }
    }

    /// A factory holding the given classes
    pub fn with_classes(default_kind: &str, classes: impl IntoIterator<Item = C>) -> Self {
        let mut factory = Self::new(default_kind);
        for class in classes {
            factory.set_node_class(class.kind().to_string(), class);
        }
        factory
    }

    /// The class to use for `kind`, or the default kind's class if `kind` is not registered.
    pub fn create(&self, kind: &str) -> Option<&C> {
        match self.classes.get(kind) {
            Some(class) => Some(class),
            None => {
                trace!("no class for \"{}\", using \"{}\"", kind, self.default_kind);
                self.classes.get(&self.default_kind)
            },
        }
    }

    /// Register (or replace) the class for `kind`
    pub fn set_node_class(&mut self, kind: impl Into<String>, class: C) {
        self.classes.insert(kind.into(), class);
    }

    /// The class registered for `kind`, with no fallback
    pub fn get_node_class(&self, kind: &str) -> Option<&C> {
        self.classes.get(kind)
    }

    /// Forget the class for `kind`
    pub fn delete_node_class(&mut self, kind: &str) -> Option<C> {
        self.classes.remove(kind)
    }

    /// Is `kind` registered?
    pub fn has_kind(&self, kind: &str) -> bool {
        self.classes.contains_key(kind)
    }

    pub fn default_kind(&self) -> &str {
        &self.default_kind
    }

    /// Every registered kind
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Does a node of class `class` count as a `kind` node? True if `kind` is the class's own kind
    /// or one of the kinds it (transitively) extends.
    pub fn node_is_kind(&self, class: &C, kind: &str) -> bool {
        if class.kind() == kind {
            return true;
        }
        let mut parent = class.extends().map(str::to_string);
        // a chain longer than the registry means a cycle
        let mut steps = self.classes.len();
        while let Some(name) = parent {
            if name == kind {
                return true;
            }
            if steps == 0 {
                break;
            }
            steps -= 1;
            parent = self.classes.get(&name).and_then(|c| c.extends().map(str::to_string));
        }
        false
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Class {
        kind:    &'static str,
        extends: Option<&'static str>,
        arity:   usize,
    }

    impl FactoryClass for Class {
        fn kind(&self) -> &str { self.kind }
        fn extends(&self) -> Option<&str> { self.extends }
    }

    fn factory() -> Factory<Class> {
        Factory::with_classes("mrow", [
            Class { kind: "mrow",    extends: None,            arity: 0 },
            Class { kind: "msubsup", extends: None,            arity: 3 },
            Class { kind: "msub",    extends: Some("msubsup"), arity: 2 },
        ])
    }

    #[test]
    fn falls_back_to_default() {
        let factory = factory();
        assert_eq!(factory.create("msub").map(|c| c.arity), Some(2));
        assert_eq!(factory.create("mblah").map(|c| c.kind), Some("mrow"));
        assert!(factory.get_node_class("mblah").is_none());
    }

    #[test]
    fn replace_and_delete() {
        let mut factory = factory();
        factory.set_node_class("msub", Class { kind: "msub", extends: Some("msubsup"), arity: 7 });
        assert_eq!(factory.create("msub").map(|c| c.arity), Some(7));
        assert!(factory.delete_node_class("msub").is_some());
        assert_eq!(factory.create("msub").map(|c| c.kind), Some("mrow"));
    }

    #[test]
    fn kinds_follow_extension_chain() {
        let factory = factory();
        let msub = factory.get_node_class("msub").cloned().unwrap();
        assert!(factory.node_is_kind(&msub, "msub"));
        assert!(factory.node_is_kind(&msub, "msubsup"));
        assert!(!factory.node_is_kind(&msub, "mrow"));
    }
}
