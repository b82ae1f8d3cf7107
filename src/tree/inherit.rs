//! Attribute inheritance.
//!
//! [`MmlTree::set_inherited_attributes`] walks the tree top-down once the whole tree is built. Each
//! node takes over the inheritable attributes of its ancestors, records the display style and script
//! level it is rendered in, and passes them on to its children. Fractions, scripts, radicals and
//! limits change what their children see: this is where TeX's styles (display, text, script,
//! scriptscript, and their cramped "prime" variants) come from.

use std::collections::BTreeMap;

use super::{FenceParts, MmlTree, NodeId};
use super::attributes::Value;
use super::classes::{Arity, Role};

/// Attributes pushed down the tree: name → (kind of the node that set it, value)
pub type InheritedAttributes = BTreeMap<String, (&'static str, Value)>;

/// Inherited even by kinds without a default for them
const ALWAYS_INHERIT: &[&str] = &["scriptminsize", "scriptsizemultiplier"];

/// Attributes a kind does not take from an ancestor of the given kind
fn no_inherit(source: &str, kind: &str, name: &str) -> bool {
    match (source, kind) {
        ("mstyle", "mpadded") => matches!(name, "width" | "height" | "depth" | "lspace" | "voffset"),
        ("mstyle", "mtable")  => matches!(name, "width" | "height" | "depth" | "align"),
        ("maligngroup", "mrow") | ("maligngroup", "mtable") => name == "groupalign",
        _ => false,
    }
}

/// A copy of `attributes` with the given values added
fn add_inherited<'a>(
    attributes: &InheritedAttributes,
    source: &'static str,
    values: impl IntoIterator<Item = (&'a str, Value)>,
) -> InheritedAttributes {
    let mut updated = attributes.clone();
    for (name, value) in values {
        updated.insert(name.to_string(), (source, value));
    }
    updated
}

/// Space-separated list items
fn split(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

/// A single character, possibly followed by combining marks
fn is_single_character(text: &str) -> bool {
    let mut chars = text.chars();
    if chars.next().is_none() {
        return false;
    }
    chars.all(|c| matches!(c as u32, 0x0300 ..= 0x036F | 0x1AB0 ..= 0x1ABE | 0x1DC0 ..= 0x1DFF | 0x20D0 ..= 0x20EF))
}

impl MmlTree {
    /// Run inheritance from the root of a freshly built tree
    pub fn inherit_attributes(&mut self, root: NodeId) {
        self.set_inherited_attributes(root, &InheritedAttributes::new(), false, 0, false);
    }

    /// Take over inheritable `attributes`, record the style, and recurse into the children
    pub fn set_inherited_attributes(
        &mut self,
        id: NodeId,
        attributes: &InheritedAttributes,
        display: bool,
        level: i32,
        prime: bool,
    ) {
        let kind = self.kind(id);
        {
            let node = &mut self[id];
            for (name, (source, value)) in attributes {
                let inheritable = node.attributes.has_default(name) || ALWAYS_INHERIT.contains(&name.as_str());
                if inheritable && !no_inherit(source, kind, name) {
                    node.attributes.set_inherited(name.clone(), value.clone());
                }
            }
            if node.attributes.get_explicit("displaystyle").is_none() {
                node.attributes.set_inherited("displaystyle", display);
            }
            if node.attributes.get_explicit("scriptlevel").is_none() {
                node.attributes.set_inherited("scriptlevel", level as f64);
            }
            if prime {
                node.set_property("texprimestyle", true);
            }
        }
        self.fix_arity(id);
        self.set_child_inherited_attributes(id, attributes, display, level, prime);
    }

    /// Pad with empty rows, or truncate, to the declared arity
    fn fix_arity(&mut self, id: NodeId) {
        let Arity::Fixed(arity) = self[id].arity() else { return };
        let len = self[id].children().len();
        if (arity == 1 && len == 0) || (arity != 1 && len != arity) {
            if len > arity {
                debug!("{}: dropping {} extra children", self.kind(id), len - arity);
                self.truncate_children(id, arity);
            } else {
                for _ in len .. arity {
                    let row = self.create("mrow");
                    self.append_child(id, row);
                }
            }
        }
    }

    fn inherit_children(&mut self, id: NodeId, attributes: &InheritedAttributes, display: bool, level: i32, prime: bool) {
        for child in self[id].children().to_vec() {
            self.set_inherited_attributes(child, attributes, display, level, prime);
        }
    }

    fn set_child_inherited_attributes(
        &mut self,
        id: NodeId,
        attributes: &InheritedAttributes,
        display: bool,
        level: i32,
        prime: bool,
    ) {
        let children = self[id].children().to_vec();
        match self[id].role() {
            Role::Math => {
                let node = &mut self[id];
                if node.attributes.get_str("mode") == "display" {
                    node.attributes.set_inherited("display", "block");
                }
                let explicit: Vec<(String, Value)> = node.attributes.get_all_attributes().iter()
                    .filter(|(name, _)| !matches!(name.as_str(), "displaystyle" | "scriptlevel" | "style"))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                let attributes = add_inherited(attributes, "math",
                                               explicit.iter().map(|(n, v)| (n.as_str(), v.clone())));
                let displaystyle = node.attributes.get_bool("displaystyle");
                let display = displaystyle || node.attributes.get_str("display") == "block";
                node.attributes.set_inherited("displaystyle", display);
                let level = node.attributes.get_number("scriptlevel").unwrap_or(0.) as i32;
                self.inherit_children(id, &attributes, display, level, prime);
            },
            Role::Style => {
                let (mut display, mut level, mut prime) = (display, level, prime);
                let node = &self[id];
                if let Some(scriptlevel) = node.attributes.get_explicit("scriptlevel") {
                    let text = scriptlevel.as_str();
                    let text = text.trim();
                    let value = text.parse::<f64>().unwrap_or(0.) as i32;
                    if text.starts_with('+') || text.starts_with('-') {
                        level += value;
                    } else {
                        level = value;
                    }
                    prime = false;
                }
                if let Some(displaystyle) = node.attributes.get_explicit("displaystyle") {
                    display = displaystyle.as_bool();
                    prime = false;
                }
                if let Some(cramped) = node.attributes.get_explicit("data-cramped") {
                    prime = cramped.as_bool();
                }
                let explicit: Vec<(String, Value)> = node.attributes.get_all_attributes().iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                let attributes = add_inherited(attributes, "mstyle",
                                               explicit.iter().map(|(n, v)| (n.as_str(), v.clone())));
                self.inherit_children(id, &attributes, display, level, prime);
            },
            Role::Fraction => {
                let level = if !display || level > 0 { level + 1 } else { level };
                if let [num, den] = children[..] {
                    self.set_inherited_attributes(num, attributes, false, level, prime);
                    self.set_inherited_attributes(den, attributes, false, level, true);
                }
            },
            Role::Sqrt => self.inherit_children(id, attributes, display, level, true),
            Role::Root => {
                if let [base, index] = children[..] {
                    self.set_inherited_attributes(base, attributes, display, level, true);
                    self.set_inherited_attributes(index, attributes, false, level + 2, prime);
                }
            },
            Role::Scripts { sub, .. } => {
                for (i, &child) in children.iter().enumerate() {
                    if i == 0 {
                        self.set_inherited_attributes(child, attributes, display, level, prime);
                    } else {
                        self.set_inherited_attributes(child, attributes, false, level + 1, prime || i == sub);
                    }
                }
            },
            Role::UnderOver { under, over } => self.underover_inheritance(id, under, over, attributes, display, level, prime),
            Role::Multiscripts => self.multiscripts_inheritance(id, attributes, display, level, prime),
            Role::Table => self.table_inheritance(id, attributes, level),
            Role::TableRow | Role::LabeledRow => self.row_inheritance(id, attributes, display, level, prime),
            Role::Fenced => {
                self.add_fence_parts(id);
                let parts = self[id].fence_parts.clone().unwrap_or_default();
                for part in parts.open.into_iter().chain(parts.close).chain(parts.separators) {
                    self.set_inherited_attributes(part, attributes, display, level, prime);
                }
                self.inherit_children(id, attributes, display, level, prime);
            },
            Role::Operator => self.check_operator_table(id),
            Role::Identifier => {
                if is_single_character(self[id].text()) && !attributes.contains_key("mathvariant") {
                    self[id].attributes.set_inherited("mathvariant", "italic");
                }
            },
            _ => self.inherit_children(id, attributes, display, level, prime),
        }
    }

    fn underover_inheritance(
        &mut self,
        id: NodeId,
        under: usize,
        over: usize,
        attributes: &InheritedAttributes,
        display: bool,
        level: i32,
        prime: bool,
    ) {
        let children = self[id].children().to_vec();
        let Some(&base) = children.first() else { return };
        self.set_inherited_attributes(base, attributes, display, level, prime || children.get(over).is_some());
        let force = !display && {
            let core = self.core_mo(base);
            self[core].attributes.get_bool("movablelimits")
        };
        for (n, accent) in [(under, "accentunder"), (over, "accent")] {
            let Some(&script) = children.get(n) else { continue };
            if !self[id].attributes.is_set(accent) && self.is_embellished(script) {
                let core = self.core_mo(script);
                if self.is_kind(core, "mo") {
                    self.check_operator_table(core);
                }
                let value = self[core].attributes.get_bool("accent");
                self[id].attributes.set_inherited(accent, value);
                if value {
                    self[script].attributes.set_inherited("accent", value);
                }
            }
            let is_accent = self[id].attributes.get_bool(accent);
            let level = if force || !is_accent { level + 1 } else { level };
            self.set_inherited_attributes(script, attributes, false, level, prime || n == under);
        }
    }

    fn multiscripts_inheritance(
        &mut self,
        id: NodeId,
        attributes: &InheritedAttributes,
        display: bool,
        level: i32,
        prime: bool,
    ) {
        let Some(&base) = self[id].children().first() else { return };
        self.set_inherited_attributes(base, attributes, display, level, prime);
        let mut prescripts = false;
        let mut n = 0;
        let mut i = 1;
        while i < self[id].children().len() {
            let child = self[id].children()[i];
            if self.is_kind(child, "mprescripts") {
                if !prescripts {
                    prescripts = true;
                    if i % 2 == 0 {
                        // the postscripts lack a superscript
                        let row = self.create("mrow");
                        self.insert_child(id, i, row);
                        self.set_inherited_attributes(row, attributes, false, level + 1, prime);
                        n += 1;
                        i += 1;
                    }
                }
            } else {
                self.set_inherited_attributes(child, attributes, false, level + 1, prime || n % 2 == 0);
                n += 1;
            }
            i += 1;
        }
        if self[id].children().len() % 2 == usize::from(prescripts) {
            let row = self.create("mrow");
            self.append_child(id, row);
            self.set_inherited_attributes(row, attributes, false, level + 1, prime);
        }
    }

    fn table_inheritance(&mut self, id: NodeId, attributes: &InheritedAttributes, level: i32) {
        for child in self[id].children().to_vec() {
            if !self.is_kind(child, "mtr") {
                let row = self.create("mtr");
                self.replace_child(id, row, child);
                self.append_child(row, child);
            }
        }
        let node = &self[id];
        let display = node.attributes.get_explicit("displaystyle")
            .or_else(|| node.attributes.get_default("displaystyle"))
            .map_or(false, Value::as_bool);
        let cramped = node.attributes.get_explicit("data-cramped").map_or(false, Value::as_bool);
        let mut attributes = add_inherited(attributes, "mtable", [
            ("columnalign", Value::str(node.attributes.get_str("columnalign"))),
            ("rowalign",    Value::str("center")),
        ]);
        let mut rowalign = split(&node.attributes.get_str("rowalign")).into_iter();
        for row in self[id].children().to_vec() {
            if let Some(align) = rowalign.next() {
                attributes.insert("rowalign".to_string(), ("mtable", Value::str(align)));
            }
            self.set_inherited_attributes(row, &attributes, display, level, cramped);
        }
    }

    fn row_inheritance(&mut self, id: NodeId, attributes: &InheritedAttributes, display: bool, level: i32, prime: bool) {
        for child in self[id].children().to_vec() {
            if !self.is_kind(child, "mtd") {
                let cell = self.create("mtd");
                self.replace_child(id, cell, child);
                self.append_child(cell, child);
            }
        }
        let mut columnalign = split(&self[id].attributes.get_str("columnalign"));
        if self[id].role() == Role::LabeledRow {
            let side = self.parent(id).map(|table| self[table].attributes.get_str("side")).unwrap_or_default();
            columnalign.insert(0, side);
        }
        let mut attributes = add_inherited(attributes, "mtr", [
            ("rowalign",    Value::str(self[id].attributes.get_str("rowalign"))),
            ("columnalign", Value::str("center")),
        ]);
        let mut columnalign = columnalign.into_iter();
        for cell in self[id].children().to_vec() {
            if let Some(align) = columnalign.next() {
                attributes.insert("columnalign".to_string(), ("mtr", Value::str(align)));
            }
            self.set_inherited_attributes(cell, &attributes, display, level, prime);
        }
    }

    /// Create the operators an `mfenced` displays (once)
    fn add_fence_parts(&mut self, id: NodeId) {
        if self[id].fence_parts.is_some() {
            return;
        }
        let strip = |s: String| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        let open = strip(self[id].attributes.get_str("open"));
        let close = strip(self[id].attributes.get_str("close"));
        let separators: Vec<char> = strip(self[id].attributes.get_str("separators")).chars().collect();
        let mut parts = FenceParts::default();
        if !open.is_empty() {
            parts.open = Some(self.fake_operator(id, &open, Some("prefix")));
        }
        let count = self[id].children().len();
        if let Some(&last) = separators.last() {
            for i in 1 .. count {
                let c = separators.get(i - 1).copied().unwrap_or(last);
                parts.separators.push(self.fake_operator(id, &c.to_string(), None));
            }
        }
        if !close.is_empty() {
            parts.close = Some(self.fake_operator(id, &close, Some("postfix")));
        }
        self[id].fence_parts = Some(parts);
    }

    fn fake_operator(&mut self, parent: NodeId, text: &str, form: Option<&'static str>) -> NodeId {
        let mo = self.create_token("mo", text);
        if let Some(form) = form {
            let node = &mut self[mo];
            node.attributes.set("fence", true);
            node.attributes.set("form", form);
        }
        self[mo].parent = Some(parent);
        mo
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tex_class::TexClass;

    fn math(tree: &mut MmlTree, children: &[NodeId]) -> NodeId {
        let math = tree.create_node("math", children);
        tree.set_root(math);
        tree.inherit_attributes(math);
        math
    }

    #[test]
    fn fraction_children_shrink() {
        let mut tree = MmlTree::default();
        let one = tree.create_token("mn", "1");
        let two = tree.create_token("mn", "2");
        let frac = tree.create_node("mfrac", &[one, two]);
        math(&mut tree, &[frac]);
        for n in [one, two] {
            assert_eq!(tree.scriptlevel(n), 1);
            assert!(!tree[n].attributes.get_bool("displaystyle"));
        }
        assert!(tree[one].property("texprimestyle").is_none());
        assert_eq!(tree[two].property("texprimestyle"), Some(&Value::Bool(true)));
    }

    #[test]
    fn display_fraction_keeps_level() {
        let mut tree = MmlTree::default();
        let one = tree.create_token("mn", "1");
        let two = tree.create_token("mn", "2");
        let frac = tree.create_node("mfrac", &[one, two]);
        let root = tree.create_node("math", &[frac]);
        tree[root].attributes.set("display", "block");
        tree.inherit_attributes(root);
        assert_eq!(tree.scriptlevel(one), 0);
        assert!(tree[frac].attributes.get_bool("displaystyle"));
    }

    #[test]
    fn subscript_is_primed() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let two = tree.create_token("mn", "2");
        let msub = tree.create_node("msub", &[x, two]);
        math(&mut tree, &[msub]);
        assert_eq!(tree.scriptlevel(two), 1);
        assert_eq!(tree[two].property("texprimestyle"), Some(&Value::Bool(true)));
        assert_eq!(tree.scriptlevel(x), 0);
        assert_eq!(tree[x].attributes.get_str("mathvariant"), "italic");
    }

    #[test]
    fn arity_is_enforced() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let b = tree.create_token("mi", "b");
        let c = tree.create_token("mi", "c");
        let msub = tree.create_node("msub", &[a, b, c]);
        let frac = tree.create_node("mfrac", &[]);
        math(&mut tree, &[msub, frac]);
        assert_eq!(tree.children(msub), &[a, b]);
        assert_eq!(tree.children(frac).len(), 2);
        assert!(tree.children(frac).iter().all(|&c| tree.is_kind(c, "mrow")));
    }

    #[test]
    fn mstyle_pushes_attributes_down() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "xy");
        let pad = tree.create_node("mpadded", &[]);
        let style = tree.create_node("mstyle", &[x, pad]);
        tree[style].attributes.set("mathcolor", "red");
        tree[style].attributes.set("scriptlevel", "+1");
        tree[style].attributes.set("width", "3em");
        math(&mut tree, &[style]);
        assert_eq!(tree[x].attributes.get_str("mathcolor"), "red");
        assert!(tree[x].attributes.get_explicit("mathcolor").is_none());
        assert_eq!(tree.scriptlevel(x), 1);
        assert_eq!(tree[pad].attributes.get_str("width"), "");
    }

    #[test]
    fn underscript_accent_does_not_shrink() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let hat = tree.create_token("mo", "^");
        let mover = tree.create_node("mover", &[x, hat]);
        let y = tree.create_token("mi", "y");
        let bar = tree.create_token("mi", "n");
        let munder = tree.create_node("munder", &[y, bar]);
        math(&mut tree, &[mover, munder]);
        assert!(tree[mover].attributes.get_bool("accent"));
        assert_eq!(tree.scriptlevel(hat), 0);
        assert_eq!(tree.scriptlevel(bar), 1);
        assert_eq!(tree[bar].property("texprimestyle"), Some(&Value::Bool(true)));
    }

    #[test]
    fn multiscripts_are_padded() {
        let mut tree = MmlTree::default();
        let base = tree.create_token("mi", "X");
        let sub = tree.create_token("mi", "a");
        let pre = tree.create("mprescripts");
        let presub = tree.create_token("mi", "b");
        let multi = tree.create_node("mmultiscripts", &[base, sub, pre, presub]);
        math(&mut tree, &[multi]);
        let kinds: Vec<_> = tree.children(multi).iter().map(|&c| tree.kind(c)).collect();
        assert_eq!(kinds, ["mi", "mi", "mrow", "mprescripts", "mi", "mrow"]);
        assert_eq!(tree.scriptlevel(presub), 1);
    }

    #[test]
    fn table_cells_are_wrapped() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let y = tree.create_token("mi", "y");
        let row = tree.create_node("mtr", &[y]);
        let table = tree.create_node("mtable", &[x, row]);
        tree[table].attributes.set("columnalign", "left");
        tree[table].attributes.set("rowalign", "top bottom");
        math(&mut tree, &[table]);
        let first = tree.children(table)[0];
        assert!(tree.is_kind(first, "mtr"));
        let cell = tree.children(first)[0];
        assert!(tree.is_kind(cell, "mtd"));
        assert_eq!(tree.content(cell), &[x]);
        assert_eq!(tree[cell].attributes.get_str("columnalign"), "left");
        assert_eq!(tree[first].attributes.get_str("rowalign"), "top");
        assert_eq!(tree[row].attributes.get_str("rowalign"), "bottom");
    }

    #[test]
    fn mfenced_gets_operators() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let b = tree.create_token("mi", "b");
        let c = tree.create_token("mi", "c");
        let fenced = tree.create_node("mfenced", &[a, b, c]);
        tree[fenced].attributes.set("separators", ", ;");
        math(&mut tree, &[fenced]);
        let parts = tree[fenced].fence_parts.clone().unwrap();
        let open = parts.open.unwrap();
        assert_eq!(tree[open].text(), "(");
        assert_eq!(tree[open].tex_class, Some(TexClass::Open));
        let separators: Vec<_> = parts.separators.iter().map(|&s| tree[s].text().to_string()).collect();
        assert_eq!(separators, [",", ";"]);
        assert_eq!(tree.parent(open), Some(fenced));
        assert_eq!(tree.children(fenced).len(), 3);
    }
}
