//! The internal MathML tree.
//!
//! Nodes live in an arena owned by [`MmlTree`] and refer to each other by [`NodeId`]: every node
//! knows its parent and its children, so that the tree passes can climb up (to find the form of an
//! operator, say) as easily as they walk down.
//!
//! Kinds whose [`Arity`] is `Inferred` (`math`, `mstyle`, `msqrt`, ...) hold a single inferred row;
//! [`MmlTree::append_child`] puts their children into that row.

pub mod attributes;
pub mod classes;
pub mod inherit;
pub mod operators;
pub mod tex_class;

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use self::attributes::{Attributes, Value};
use self::classes::{Arity, MmlFactory, NodeClass, NodeFlags, Role, GLOBAL, INFERRED_CLASS};
use self::tex_class::TexClass;

pub use self::inherit::InheritedAttributes;

/// Index of a node in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The operator nodes an `mfenced` stands for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FenceParts {
    pub open:       Option<NodeId>,
    pub close:      Option<NodeId>,
    pub separators: Vec<NodeId>,
}

/// A node of the tree
#[derive(Debug, Clone)]
pub struct MmlNode {
    class:    &'static NodeClass,
    parent:   Option<NodeId>,
    children: Vec<NodeId>,
    text:     String,
    /// Internal annotations, as opposed to MathML attributes
    pub properties: BTreeMap<String, Value>,
    pub attributes: Attributes,
    pub tex_class:  Option<TexClass>,
    /// Class of the atom displayed before this one
    pub prev_class: Option<TexClass>,
    /// Script level of the atom displayed before this one
    pub prev_level: Option<i32>,
    pub fence_parts: Option<FenceParts>,
    /// Operator dictionary spacing, in em
    pub lspace: f64,
    pub rspace: f64,
}

impl MmlNode {
    fn new(class: &'static NodeClass) -> Self {
        MmlNode {
            class,
            parent:      None,
            children:    Vec::new(),
            text:        String::new(),
            properties:  BTreeMap::new(),
            attributes:  Attributes::new(class.defaults, GLOBAL),
            tex_class:   class.tex_class,
            prev_class:  None,
            prev_level:  None,
            fence_parts: None,
            lspace:      5. / 18.,
            rspace:      5. / 18.,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.class.kind
    }

    pub fn class(&self) -> &'static NodeClass {
        self.class
    }

    pub fn role(&self) -> Role {
        self.class.role
    }

    pub fn arity(&self) -> Arity {
        self.class.arity
    }

    pub fn is_token(&self) -> bool {
        self.class.is_token()
    }

    pub fn is_inferred(&self) -> bool {
        self.class.role == Role::InferredRow
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Text content of a token
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }
}

/// A MathML tree
#[derive(Debug, Clone)]
pub struct MmlTree {
    nodes:   Vec<MmlNode>,
    root:    Option<NodeId>,
    factory: Rc<MmlFactory>,
}

impl Index<NodeId> for MmlTree {
    type Output = MmlNode;
    fn index(&self, id: NodeId) -> &MmlNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for MmlTree {
    fn index_mut(&mut self, id: NodeId) -> &mut MmlNode {
        &mut self.nodes[id.0]
    }
}

impl Default for MmlTree {
    fn default() -> Self {
        MmlTree::new(Rc::new(MmlFactory::standard()))
    }
}

impl MmlTree {
    pub fn new(factory: Rc<MmlFactory>) -> Self {
        MmlTree { nodes: Vec::new(), root: None, factory }
    }

    pub fn factory(&self) -> &MmlFactory {
        &self.factory
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Number of nodes ever created
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn create_from_class(&mut self, class: &'static NodeClass) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MmlNode::new(class));
        if class.arity == Arity::Inferred {
            let inferred = self.factory.get_node_class("inferredMrow").copied().unwrap_or(&INFERRED_CLASS);
            let row = NodeId(self.nodes.len());
            self.nodes.push(MmlNode::new(inferred));
            self[row].parent = Some(id);
            self[id].children.push(row);
        }
        id
    }

    /// A new node of the given kind (an `mrow`, or the factory's default, if the kind is unknown)
    pub fn create(&mut self, kind: &str) -> NodeId {
        let class = self.factory.create(kind).copied().unwrap_or(&classes::MROW_CLASS);
        self.create_from_class(class)
    }

    /// A new node with the given children
    pub fn create_node(&mut self, kind: &str, children: &[NodeId]) -> NodeId {
        let id = self.create(kind);
        for &child in children {
            self.append_child(id, child);
        }
        id
    }

    /// A new token holding `text`
    pub fn create_token(&mut self, kind: &str, text: &str) -> NodeId {
        let id = self.create(kind);
        self[id].text.push_str(text);
        id
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self[id].text = text.into();
    }

    pub fn append_text(&mut self, id: NodeId, text: &str) {
        self[id].text.push_str(text);
    }

    pub fn kind(&self, id: NodeId) -> &'static str {
        self[id].kind()
    }

    /// Is the node of the given kind, or of a kind derived from it?
    pub fn is_kind(&self, id: NodeId, kind: &str) -> bool {
        self.factory.node_is_kind(&self[id].class, kind)
    }

    pub fn is_inferred(&self, id: NodeId) -> bool {
        self[id].is_inferred()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// The parent, skipping over inferred rows
    pub fn real_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut parent = self[id].parent;
        while let Some(p) = parent {
            if !self.is_inferred(p) {
                break;
            }
            parent = self[p].parent;
        }
        parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self[id].children.get(index).copied()
    }

    /// The children, looking through an inferred row
    pub fn content(&self, id: NodeId) -> &[NodeId] {
        match self[id].children.first() {
            Some(&row) if self[id].arity() == Arity::Inferred => &self[row].children,
            _ => &self[id].children,
        }
    }

    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self[parent].children.iter().position(|&c| c == child)
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old) = self[child].parent.take() {
            self[old].children.retain(|&c| c != child);
        }
    }

    /// Append `child` to `parent`. An inferred row given to a node that is not an inferred parent
    /// has its children spliced in (or becomes a real row where the arity is fixed).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self[parent].arity() == Arity::Inferred {
            if let Some(&row) = self[parent].children.first() {
                return self.append_child(row, child);
            }
        }
        if self.is_inferred(child) {
            if self[parent].arity() == Arity::Unbounded {
                for grandchild in self[child].children.clone() {
                    self.append_child(parent, grandchild);
                }
                return;
            }
            let row = self.create("mrow");
            for grandchild in self[child].children.clone() {
                self.append_child(row, grandchild);
            }
            let attributes = self[child].attributes.clone();
            self[row].attributes.copy_layers_from(&attributes);
            return self.append_child(parent, row);
        }
        self.detach(child);
        self[child].parent = Some(parent);
        self[parent].children.push(child);
    }

    /// Put `child` at `index` among the children of `parent` (no inferred-row redirection)
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        self[child].parent = Some(parent);
        let index = index.min(self[parent].children.len());
        self[parent].children.insert(index, child);
    }

    /// Replace `old` by `new` among the children of `parent`. Returns `new` if `old` was found.
    pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> Option<NodeId> {
        self.child_index(parent, old)?;
        self.detach(new);
        let index = self.child_index(parent, old)?;
        self[parent].children[index] = new;
        self[new].parent = Some(parent);
        self[old].parent = None;
        Some(new)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.child_index(parent, child) {
            Some(index) => {
                self[parent].children.remove(index);
                self[child].parent = None;
                true
            },
            None => false,
        }
    }

    pub(crate) fn truncate_children(&mut self, id: NodeId, len: usize) {
        let removed: Vec<NodeId> = self[id].children.drain(len ..).collect();
        for child in removed {
            self[child].parent = None;
        }
    }

    /// Resolved script level
    pub fn scriptlevel(&self, id: NodeId) -> i32 {
        self[id].attributes.get_number("scriptlevel").unwrap_or(0.) as i32
    }

    /// The child an `maction` shows
    pub fn selected(&self, id: NodeId) -> Option<NodeId> {
        let children = &self[id].children;
        if children.is_empty() {
            return None;
        }
        let selection = self[id].attributes.get_number("selection").unwrap_or(1.) as usize;
        let index = selection.clamp(1, children.len()) - 1;
        Some(children[index])
    }

    /// Is the node an embellished operator (an `mo`, possibly decorated)?
    pub fn is_embellished(&self, id: NodeId) -> bool {
        let node = &self[id];
        match node.role() {
            Role::Operator => true,
            Role::Scripts { .. } | Role::UnderOver { .. } | Role::Multiscripts | Role::Fraction
            | Role::TexAtom | Role::Semantics | Role::Style | Role::Padded | Role::Phantom => {
                node.children.first().map_or(false, |&c| self.is_embellished(c))
            },
            Role::Row | Role::InferredRow => {
                let mut found = false;
                for &child in &node.children {
                    if self.is_embellished(child) {
                        if found {
                            return false;
                        }
                        found = true;
                    } else if !self.is_spacelike(child) {
                        return false;
                    }
                }
                found
            },
            Role::Action => self.selected(id).map_or(false, |c| self.is_embellished(c)),
            _ => false,
        }
    }

    /// The node that determines this node's operator behaviour
    pub fn core(&self, id: NodeId) -> NodeId {
        let node = &self[id];
        match node.role() {
            Role::Row | Role::InferredRow => {
                if !self.is_embellished(id) {
                    return id;
                }
                node.children.iter().copied().find(|&c| self.is_embellished(c)).unwrap_or(id)
            },
            Role::Scripts { .. } | Role::UnderOver { .. } | Role::Multiscripts | Role::Fraction
            | Role::TexAtom | Role::Semantics | Role::Style | Role::Padded | Role::Phantom => {
                node.children.first().copied().unwrap_or(id)
            },
            Role::Action => self.selected(id).unwrap_or(id),
            _ => id,
        }
    }

    /// The innermost core: the `mo` of an embellished operator
    pub fn core_mo(&self, id: NodeId) -> NodeId {
        let mut node = id;
        loop {
            let core = self.core(node);
            if core == node {
                return node;
            }
            node = core;
        }
    }

    /// Does the node count as space?
    pub fn is_spacelike(&self, id: NodeId) -> bool {
        let node = &self[id];
        if node.class.flags.contains(NodeFlags::SPACELIKE) {
            return true;
        }
        match node.role() {
            Role::Row | Role::InferredRow => node.children.iter().all(|&c| self.is_spacelike(c)),
            Role::Style | Role::Padded | Role::Phantom | Role::Semantics => {
                node.children.first().map_or(false, |&c| self.is_spacelike(c))
            },
            Role::Action => self.selected(id).map_or(false, |c| self.is_spacelike(c)),
            _ => false,
        }
    }

    /// Children that are not spacelike
    pub fn non_space_children(&self, id: NodeId) -> Vec<NodeId> {
        self[id].children.iter().copied().filter(|&c| !self.is_spacelike(c)).collect()
    }

    pub fn first_non_space(&self, id: NodeId) -> Option<NodeId> {
        self[id].children.iter().copied().find(|&c| !self.is_spacelike(c))
    }

    pub fn last_non_space(&self, id: NodeId) -> Option<NodeId> {
        self[id].children.iter().rev().copied().find(|&c| !self.is_spacelike(c))
    }

    /// The text of all the tokens below `id`
    pub fn get_text(&self, id: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(id, &mut text);
        text
    }

    fn collect_text(&self, id: NodeId, text: &mut String) {
        let node = &self[id];
        text.push_str(&node.text);
        for &child in &node.children {
            self.collect_text(child, text);
        }
    }

    /// Call `f` on `id` and every node below it, parents first
    pub fn walk_tree(&mut self, id: NodeId, f: &mut impl FnMut(&mut MmlTree, NodeId)) {
        f(self, id);
        for child in self[id].children.clone() {
            self.walk_tree(child, f);
        }
    }

    /// Every node below `id` (included), parents first
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut list = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            list.push(node);
            stack.extend(self[node].children.iter().rev());
        }
        list
    }

    /// MathML serialization of the subtree at `id` (inferred rows are left out)
    pub fn serialize(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_into(id, &mut out);
        out
    }

    fn serialize_into(&self, id: NodeId, out: &mut String) {
        let node = &self[id];
        if node.is_inferred() {
            for &child in &node.children {
                self.serialize_into(child, out);
            }
            return;
        }
        out.push('<');
        out.push_str(node.kind());
        for (name, value) in node.attributes.get_all_attributes() {
            out.push_str(&format!(" {}=\"{}\"", name, escape(&value.as_str())));
        }
        out.push('>');
        out.push_str(&escape(&node.text));
        for &child in &node.children {
            self.serialize_into(child, out);
        }
        out.push_str("</");
        out.push_str(node.kind());
        out.push('>');
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inferred_rows() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let y = tree.create_token("mi", "y");
        let sqrt = tree.create_node("msqrt", &[x, y]);
        assert_eq!(tree.children(sqrt).len(), 1);
        let row = tree.children(sqrt)[0];
        assert!(tree.is_inferred(row));
        assert!(tree.is_kind(row, "mrow"));
        assert_eq!(tree.content(sqrt), &[x, y]);
        assert_eq!(tree.parent(x), Some(row));
        assert_eq!(tree.real_parent(x), Some(sqrt));
        assert_eq!(tree.serialize(sqrt), "<msqrt><mi>x</mi><mi>y</mi></msqrt>");
    }

    #[test]
    fn inferred_row_spliced_into_mrow() {
        let mut tree = MmlTree::default();
        let style = tree.create("mstyle");
        let x = tree.create_token("mi", "x");
        tree.append_child(style, x);
        let row = tree.children(style)[0];
        let mrow = tree.create_node("mrow", &[row]);
        assert_eq!(tree.children(mrow), &[x]);
        assert_eq!(tree.parent(x), Some(mrow));
    }

    #[test]
    fn replace_and_remove() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let b = tree.create_token("mi", "b");
        let row = tree.create_node("mrow", &[a]);
        assert_eq!(tree.replace_child(row, b, a), Some(b));
        assert_eq!(tree.children(row), &[b]);
        assert_eq!(tree.parent(a), None);
        assert!(tree.remove_child(row, b));
        assert!(tree.children(row).is_empty());
    }

    #[test]
    fn embellished_operators() {
        let mut tree = MmlTree::default();
        let plus = tree.create_token("mo", "+");
        let two = tree.create_token("mn", "2");
        let msup = tree.create_node("msup", &[plus, two]);
        let space = tree.create("mspace");
        let row = tree.create_node("mrow", &[space, msup]);
        assert!(tree.is_embellished(msup));
        assert!(tree.is_embellished(row));
        assert_eq!(tree.core(row), msup);
        assert_eq!(tree.core_mo(row), plus);

        let x = tree.create_token("mi", "x");
        let other = tree.create_node("mrow", &[x, row]);
        assert!(!tree.is_embellished(other));
        assert_eq!(tree.core_mo(other), other);
    }

    #[test]
    fn spacelike_nodes() {
        let mut tree = MmlTree::default();
        let text = tree.create_token("mtext", "and");
        let space = tree.create("mspace");
        let row = tree.create_node("mrow", &[text, space]);
        assert!(tree.is_spacelike(row));
        let x = tree.create_token("mi", "x");
        tree.append_child(row, x);
        assert!(!tree.is_spacelike(row));
        assert_eq!(tree.non_space_children(row), vec![x]);
        assert_eq!(tree.first_non_space(row), Some(x));
    }

    #[test]
    fn unknown_kind_is_a_row() {
        let mut tree = MmlTree::default();
        let node = tree.create("mblah");
        assert_eq!(tree.kind(node), "mrow");
    }

    #[test]
    fn text_and_walk() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let b = tree.create_token("mo", "+");
        let row = tree.create_node("mrow", &[a, b]);
        assert_eq!(tree.get_text(row), "a+");
        assert_eq!(tree.descendants(row), vec![row, a, b]);
        let mut count = 0;
        tree.walk_tree(row, &mut |_, _| count += 1);
        assert_eq!(count, 3);
    }
}
