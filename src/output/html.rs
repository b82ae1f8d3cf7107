//! A small HTML element tree and stylesheet, enough to describe the CHTML output and serialize it.

use std::fmt::{self, Write};

/// An HTML element or a text node
#[derive(Debug, Clone, PartialEq)]
pub enum Html {
    Element(Element),
    Text(String),
}

impl From<Element> for Html {
    fn from(element: Element) -> Self {
        Html::Element(element)
    }
}

impl Html {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Html::Element(e) => Some(e),
            Html::Text(_)    => None,
        }
    }
}

/// An HTML element with its attributes, inline styles and children, in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub kind:       String,
    pub attributes: Vec<(String, String)>,
    pub styles:     Vec<(String, String)>,
    pub children:   Vec<Html>,
}

impl Element {
    pub fn new(kind: impl Into<String>) -> Self {
        Element { kind: kind.into(), ..Element::default() }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_style(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Html>) -> Self {
        self.append(child);
        self
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }

    /// Add a class, keeping those already there
    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() {
            return;
        }
        let classes = match self.attribute("class") {
            Some(current) if current.split(' ').any(|c| c == class) => return,
            Some(current) if !current.is_empty() => format!("{} {}", current, class),
            _ => class.to_string(),
        };
        self.set_attribute("class", classes);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class").map_or(false, |classes| classes.split(' ').any(|c| c == class))
    }

    /// Set an inline style; an empty value removes it
    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.styles.retain(|(n, _)| n != name);
            return;
        }
        match self.styles.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.styles.push((name.to_string(), value)),
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn append(&mut self, child: impl Into<Html>) {
        self.children.push(child.into());
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(Html::Text(text.into()));
    }

    pub fn first_element_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|child| match child {
            Html::Element(e) => Some(e),
            Html::Text(_)    => None,
        })
    }

    /// The last child element, to adjust what a child wrapper just appended
    pub fn last_element_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().rev().find_map(|child| match child {
            Html::Element(e) => Some(e),
            Html::Text(_)    => None,
        })
    }

    /// Child elements (text is skipped)
    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(Html::as_element)
    }

    /// The first element below this one (included) of the given kind, depth first
    pub fn find(&self, kind: &str) -> Option<&Element> {
        if self.kind == kind {
            return Some(self);
        }
        self.elements().find_map(|child| child.find(kind))
    }

    /// Every element below this one (included) of the given kind, depth first
    pub fn find_all<'a>(&'a self, kind: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(kind, &mut found);
        found
    }

    fn collect<'a>(&'a self, kind: &str, found: &mut Vec<&'a Element>) {
        if self.kind == kind {
            found.push(self);
        }
        for child in self.elements() {
            child.collect(kind, found);
        }
    }

    /// Concatenated text of the element
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                Html::Text(t)    => text.push_str(t),
                Html::Element(e) => text.push_str(&e.text_content()),
            }
        }
        text
    }

    /// The `style` attribute value
    pub fn style_string(&self) -> String {
        self.styles.iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.kind)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, escape(value, true))?;
        }
        if !self.styles.is_empty() {
            write!(f, " style=\"{}\"", escape(&self.style_string(), true))?;
        }
        f.write_char('>')?;
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.kind)
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Html::Element(e) => write!(f, "{}", e),
            Html::Text(t)    => f.write_str(&escape(t, false)),
        }
    }
}

/// Escape text for HTML
pub fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}


/// A stylesheet: selectors with their declarations, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CssStyles {
    rules: Vec<(String, Vec<(String, String)>)>,
}

impl CssStyles {
    pub fn new() -> Self {
        CssStyles::default()
    }

    /// Add declarations to a selector, replacing those already set for the same properties
    pub fn add(&mut self, selector: &str, declarations: &[(&str, &str)]) {
        let index = match self.rules.iter().position(|(s, _)| s == selector) {
            Some(index) => index,
            None => {
                self.rules.push((selector.to_string(), Vec::new()));
                self.rules.len() - 1
            },
        };
        let rule = &mut self.rules[index].1;
        for (name, value) in declarations {
            match rule.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => rule.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn has(&self, selector: &str) -> bool {
        self.rules.iter().any(|(s, _)| s == selector)
    }

    pub fn get(&self, selector: &str) -> Option<&[(String, String)]> {
        self.rules.iter().find(|(s, _)| s == selector).map(|(_, r)| r.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// The CSS text
    pub fn css(&self) -> String {
        let mut out = String::new();
        for (selector, declarations) in &self.rules {
            out.push_str(selector);
            out.push_str(" {\n");
            for (name, value) in declarations {
                out.push_str("  ");
                out.push_str(name);
                out.push_str(": ");
                out.push_str(value);
                out.push_str(";\n");
            }
            out.push_str("}\n\n");
        }
        out
    }
}
