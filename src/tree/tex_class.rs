//! TeX classes and the spacing between them.
//!
//! After inheritance has run over the whole tree, [`MmlTree::set_tex_class`] walks it once from left
//! to right, giving every atom its TeX class and recording the class (and script level) of the atom
//! displayed just before it. [`MmlTree::tex_spacing`] then reads the TeXBook's inter-atom spacing
//! table for that pair: this is what decides that "f" is followed by less space in "f(" than in "f +".
//!
//! Each node's walk returns the last node actually displayed, which the caller threads into the next
//! sibling. Fractions, tables, radicals and the like start fresh math lists for their children.

use super::{MmlTree, NodeId};
use super::attributes::Value;
use super::classes::Role;

/// The TeX class of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TexClass {
    Ord,
    Op,
    Bin,
    Rel,
    Open,
    Close,
    Punct,
    Inner,
    VCenter,
    /// Takes no part in spacing
    None,
}

impl TexClass {
    /// Row/column of [`TEXSPACE`], with `VCENTER` counting as `ORD`
    fn index(self) -> Option<usize> {
        match self {
            TexClass::Ord | TexClass::VCenter => Some(0),
            TexClass::Op    => Some(1),
            TexClass::Bin   => Some(2),
            TexClass::Rel   => Some(3),
            TexClass::Open  => Some(4),
            TexClass::Close => Some(5),
            TexClass::Punct => Some(6),
            TexClass::Inner => Some(7),
            TexClass::None  => None,
        }
    }

    /// Class named in a `MJX-TeXAtom-<NAME>` marker
    pub fn from_name(name: &str) -> Option<TexClass> {
        let class = match name {
            "ORD"     => TexClass::Ord,
            "OP"      => TexClass::Op,
            "BIN"     => TexClass::Bin,
            "REL"     => TexClass::Rel,
            "OPEN"    => TexClass::Open,
            "CLOSE"   => TexClass::Close,
            "PUNCT"   => TexClass::Punct,
            "INNER"   => TexClass::Inner,
            "VCENTER" => TexClass::VCenter,
            "NONE"    => TexClass::None,
            _ => return None,
        };
        Some(class)
    }

    pub fn name(self) -> &'static str {
        match self {
            TexClass::Ord     => "ORD",
            TexClass::Op      => "OP",
            TexClass::Bin     => "BIN",
            TexClass::Rel     => "REL",
            TexClass::Open    => "OPEN",
            TexClass::Close   => "CLOSE",
            TexClass::Punct   => "PUNCT",
            TexClass::Inner   => "INNER",
            TexClass::VCenter => "VCENTER",
            TexClass::None    => "NONE",
        }
    }
}

/// Spacing category between a left atom (row) and a right atom (column).
/// 0–3 index [`TEXSPACELENGTH`]; a negative entry also applies inside scripts.
pub const TEXSPACE: [[i8; 8]; 8] = [
    //ORD  OP  BIN  REL OPEN CLOSE PUNCT INNER
    [  0,  -1,   2,   3,   0,   0,   0,   1],  // ORD
    [ -1,  -1,   0,   3,   0,   0,   0,   1],  // OP
    [  2,   2,   0,   0,   2,   0,   0,   2],  // BIN
    [  3,   3,   0,   0,   3,   0,   0,   3],  // REL
    [  0,   0,   0,   0,   0,   0,   0,   0],  // OPEN
    [  0,  -1,   2,   3,   0,   0,   0,   1],  // CLOSE
    [  1,   1,   0,   1,   1,   1,   1,   1],  // PUNCT
    [  1,  -1,   2,   3,   1,   0,   1,   1],  // INNER
];

/// Named lengths of the spacing categories
pub const TEXSPACELENGTH: [&str; 4] = ["", "thinmathspace", "mediummathspace", "thickmathspace"];

/// Spacing between a `left` atom and a `right` atom, given whether either sits in a script.
pub fn atom_space(left: TexClass, right: TexClass, in_script: bool) -> &'static str {
    let (Some(l), Some(r)) = (left.index(), right.index()) else { return "" };
    let space = TEXSPACE[l][r];
    if in_script && space >= 0 {
        return "";
    }
    TEXSPACELENGTH[space.unsigned_abs() as usize]
}

impl MmlTree {
    /// Record the class and level of the previous atom on `id`
    fn get_prev_class(&mut self, id: NodeId, prev: Option<NodeId>) {
        if let Some(prev) = prev {
            let class = self[prev].tex_class;
            let level = self.scriptlevel(prev);
            let node = &mut self[id];
            node.prev_class = class;
            node.prev_level = Some(level);
        }
    }

    /// Take over the class information of `core`, which gives up its own spacing
    pub(crate) fn update_tex_class(&mut self, id: NodeId, core: NodeId) {
        if id == core {
            return;
        }
        let (prev_class, prev_level, tex_class) = {
            let core = &mut self[core];
            (core.prev_class.take(), core.prev_level.take(), core.tex_class)
        };
        let node = &mut self[id];
        node.prev_class = prev_class;
        node.prev_level = prev_level;
        node.tex_class = tex_class;
    }

    /// Assign TeX classes to `id` and its descendants. Returns the last displayed node.
    pub fn set_tex_class(&mut self, id: NodeId, prev: Option<NodeId>) -> Option<NodeId> {
        let children = self[id].children().to_vec();
        match self[id].class().role {
            Role::Operator     => self.operator_tex_class(id, prev),
            Role::Identifier   => {
                self.get_prev_class(id, prev);
                let name = self[id].text();
                if name.chars().count() > 1
                    && name.chars().next().map_or(false, |c| c.is_ascii_alphabetic())
                    && name.chars().all(|c| c.is_ascii_alphanumeric())
                    && self[id].tex_class == Some(TexClass::Ord)
                    && self[id].property("texClass").is_none()
                    && self[id].property("autoOP").map_or(true, Value::as_bool)
                {
                    self[id].tex_class = Some(TexClass::Op);
                    self[id].set_property("autoOP", true);
                }
                Some(id)
            },
            Role::Row | Role::InferredRow => {
                let mut prev = prev;
                if self[id].property("open").is_some() || self[id].property("close").is_some() {
                    self.get_prev_class(id, prev);
                    prev = None;
                    for &child in &children {
                        prev = self.set_tex_class(child, prev);
                    }
                    if self[id].tex_class.is_none() {
                        self[id].tex_class = Some(TexClass::Inner);
                    }
                    // the fenced row counts as the last atom itself
                    Some(id)
                } else {
                    for &child in &children {
                        prev = self.set_tex_class(child, prev);
                    }
                    if let Some(&first) = children.first() {
                        self.update_tex_class(id, first);
                    }
                    prev
                }
            },
            Role::Fraction | Role::Sqrt | Role::Root | Role::Enclose | Role::Error
            | Role::Table | Role::TableRow | Role::LabeledRow | Role::TableCell => {
                self.get_prev_class(id, prev);
                for &child in &children {
                    self.set_tex_class(child, None);
                }
                Some(id)
            },
            Role::Scripts { .. } | Role::UnderOver { .. } | Role::Multiscripts => {
                self.base_tex_class(id, prev)
            },
            Role::Math | Role::Style | Role::Padded | Role::Phantom | Role::Semantics => {
                let mut prev = prev;
                if let Some(&first) = children.first() {
                    prev = self.set_tex_class(first, prev);
                    self.update_tex_class(id, first);
                }
                for &child in children.iter().skip(1) {
                    self.set_tex_class(child, None);
                }
                prev
            },
            Role::Action => {
                let mut prev = prev;
                let selected = self.selected(id);
                for &child in &children {
                    if Some(child) == selected {
                        prev = self.set_tex_class(child, prev);
                        self.update_tex_class(id, child);
                    } else {
                        self.set_tex_class(child, None);
                    }
                }
                prev
            },
            Role::TexAtom => {
                if let Some(&first) = children.first() {
                    self.set_tex_class(first, None);
                }
                self.adjust_tex_class(id, prev)
            },
            Role::Fenced => self.fenced_tex_class(id, prev),
            _ => {
                self.get_prev_class(id, prev);
                if self[id].tex_class.is_some() { Some(id) } else { prev }
            },
        }
    }

    /// Scripted nodes behave like their base
    fn base_tex_class(&mut self, id: NodeId, prev: Option<NodeId>) -> Option<NodeId> {
        self.get_prev_class(id, prev);
        self[id].tex_class = Some(TexClass::Ord);
        let children = self[id].children().to_vec();
        let mut prev = prev;
        match children.first() {
            Some(&base) if self.is_embellished(id) || self.is_kind(base, "mi") => {
                prev = self.set_tex_class(base, prev);
                let core = self.core(id);
                self.update_tex_class(id, core);
            },
            Some(&base) => {
                self.set_tex_class(base, None);
                prev = Some(id);
            },
            None => prev = Some(id),
        }
        for &child in children.iter().skip(1) {
            self.set_tex_class(child, None);
        }
        prev
    }

    fn fenced_tex_class(&mut self, id: NodeId, prev: Option<NodeId>) -> Option<NodeId> {
        self.get_prev_class(id, prev);
        let parts = self[id].fence_parts.clone().unwrap_or_default();
        let children = self[id].children().to_vec();
        let mut prev = prev;
        if let Some(open) = parts.open {
            prev = self.set_tex_class(open, prev);
        }
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                if let Some(&sep) = parts.separators.get(i - 1) {
                    prev = self.set_tex_class(sep, prev);
                }
            }
            prev = self.set_tex_class(child, prev);
        }
        if let Some(close) = parts.close {
            prev = self.set_tex_class(close, prev);
        }
        if let Some(open) = parts.open {
            self.update_tex_class(id, open);
        }
        self[id].tex_class = Some(TexClass::Inner);
        prev
    }

    fn operator_tex_class(&mut self, id: NodeId, prev: Option<NodeId>) -> Option<NodeId> {
        if self[id].text() == "\u{2061}" {
            // function application: the previous atom is a function name
            if let Some(prev) = prev {
                self[prev].tex_class = Some(TexClass::Op);
                self[prev].set_property("fnOP", true);
            }
            let node = &mut self[id];
            node.tex_class = Some(TexClass::None);
            node.prev_class = Some(TexClass::None);
            return prev;
        }
        let attributes = &self[id].attributes;
        let form = attributes.get_str("form");
        let fence = attributes.get_bool("fence");
        if self[id].property("texClass").is_none()
            && (attributes.is_set("lspace") || attributes.is_set("rspace"))
        {
            // explicit spacing replaces the TeX spacing
            return None;
        }
        if fence && self[id].tex_class == Some(TexClass::Rel) {
            match form.as_str() {
                "prefix"  => self[id].tex_class = Some(TexClass::Open),
                "postfix" => self[id].tex_class = Some(TexClass::Close),
                _ => (),
            }
        }
        self.adjust_tex_class(id, prev)
    }

    /// Apply the TeXBook adjustments for binary operators
    pub(crate) fn adjust_tex_class(&mut self, id: NodeId, prev: Option<NodeId>) -> Option<NodeId> {
        let Some(tex_class) = self[id].tex_class else { return prev };
        if tex_class == TexClass::None {
            return prev;
        }
        let prev_class = match prev {
            Some(p) => {
                if self[p].property("autoOP").map_or(false, Value::as_bool) && matches!(tex_class, TexClass::Bin | TexClass::Rel) {
                    self[p].tex_class = Some(TexClass::Ord);
                }
                let class = self[p].tex_class.unwrap_or(TexClass::Ord);
                let level = self.scriptlevel(id);
                self[id].prev_class = Some(class);
                self[id].prev_level = Some(level);
                class
            },
            None => {
                self[id].prev_class = Some(TexClass::None);
                TexClass::None
            },
        };
        use self::TexClass as TC;
        if tex_class == TC::Bin && matches!(prev_class, TC::None | TC::Bin | TC::Op | TC::Rel | TC::Open | TC::Punct) {
            self[id].tex_class = Some(TC::Ord);
        } else if prev_class == TC::Bin && matches!(tex_class, TC::Rel | TC::Close | TC::Punct) {
            if let Some(p) = prev {
                self[p].tex_class = Some(TC::Ord);
            }
            self[id].prev_class = Some(TC::Ord);
        } else if tex_class == TC::Bin {
            let mut child = id;
            let mut parent = self.parent(id);
            while let Some(p) = parent {
                let climb = self.parent(p).is_some()
                    && self.is_embellished(p)
                    && (self[p].children().len() == 1 || (!self.is_kind(p, "mrow") && self.core(p) == child));
                if !climb {
                    break;
                }
                child = p;
                parent = self.parent(p);
            }
            if let Some(p) = parent {
                if self[p].children().last() == Some(&child) {
                    self[id].tex_class = Some(TC::Ord);
                }
            }
        }
        Some(id)
    }

    /// The named space to put before `id`, from its class and that of the previous atom
    pub fn tex_spacing(&self, id: NodeId) -> &'static str {
        let node = &self[id];
        let prev_class = node.prev_class.unwrap_or(TexClass::None);
        let tex_class = node.tex_class.unwrap_or(TexClass::Ord);
        if prev_class == TexClass::None || tex_class == TexClass::None {
            return "";
        }
        let in_script = node.prev_level.unwrap_or(0) > 0 || self.scriptlevel(id) > 0;
        atom_space(prev_class, tex_class, in_script)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const CLASSES: [TexClass; 8] = [
        TexClass::Ord, TexClass::Op, TexClass::Bin, TexClass::Rel,
        TexClass::Open, TexClass::Close, TexClass::Punct, TexClass::Inner,
    ];

    #[test]
    fn spacing_follows_table() {
        for (i, &left) in CLASSES.iter().enumerate() {
            for (j, &right) in CLASSES.iter().enumerate() {
                let entry = TEXSPACE[i][j];
                let expected = TEXSPACELENGTH[entry.unsigned_abs() as usize];
                assert_eq!(atom_space(left, right, false), expected, "{:?} {:?}", left, right);
                let scripted = if entry >= 0 { "" } else { expected };
                assert_eq!(atom_space(left, right, true), scripted, "{:?} {:?} in script", left, right);
            }
        }
    }

    fn classify(tree: &mut MmlTree, children: &[NodeId]) -> NodeId {
        let math = tree.create_node("math", children);
        tree.inherit_attributes(math);
        tree.set_tex_class(math, None);
        math
    }

    #[test]
    fn binary_operator_between_atoms() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let plus = tree.create_token("mo", "+");
        let b = tree.create_token("mi", "b");
        classify(&mut tree, &[a, plus, b]);
        assert_eq!(tree[plus].tex_class, Some(TexClass::Bin));
        assert_eq!(tree.tex_spacing(plus), "mediummathspace");
        assert_eq!(tree.tex_spacing(b), "mediummathspace");
        assert_eq!(tree.tex_spacing(a), "");
    }

    #[test]
    fn leading_binary_operator_is_ordinary() {
        let mut tree = MmlTree::default();
        let plus = tree.create_token("mo", "+");
        let eq = tree.create_token("mo", "=");
        let row = tree.create_node("mrow", &[plus, eq]);
        classify(&mut tree, &[row]);
        assert_eq!(tree[plus].tex_class, Some(TexClass::Ord));
        assert_eq!(tree[eq].tex_class, Some(TexClass::Rel));
    }

    #[test]
    fn binary_operator_before_relation_is_ordinary() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let plus = tree.create_token("mo", "+");
        let eq = tree.create_token("mo", "=");
        let b = tree.create_token("mi", "b");
        classify(&mut tree, &[a, plus, eq, b]);
        assert_eq!(tree[plus].tex_class, Some(TexClass::Ord));
        assert_eq!(tree[eq].prev_class, Some(TexClass::Ord));
        assert_eq!(tree.tex_spacing(eq), "thickmathspace");
    }

    #[test]
    fn trailing_binary_operator_is_ordinary() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let plus = tree.create_token("mo", "+");
        classify(&mut tree, &[a, plus]);
        assert_eq!(tree[plus].tex_class, Some(TexClass::Ord));
    }

    #[test]
    fn function_application() {
        let mut tree = MmlTree::default();
        let sin = tree.create_token("mi", "sin");
        let apply = tree.create_token("mo", "\u{2061}");
        let x = tree.create_token("mi", "x");
        classify(&mut tree, &[sin, apply, x]);
        assert_eq!(tree[sin].tex_class, Some(TexClass::Op));
        assert_eq!(tree[sin].property("autoOP"), Some(&crate::tree::attributes::Value::Bool(true)));
        assert_eq!(tree[apply].tex_class, Some(TexClass::None));
        assert_eq!(tree[x].prev_class, Some(TexClass::Op));
        assert_eq!(tree.tex_spacing(x), "thinmathspace");
    }

    #[test]
    fn scripts_take_class_of_base() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let sum = tree.create_token("mo", "\u{2211}");
        let i = tree.create_token("mi", "i");
        let msub = tree.create_node("msub", &[sum, i]);
        classify(&mut tree, &[x, msub]);
        assert_eq!(tree[msub].tex_class, Some(TexClass::Op));
        assert_eq!(tree[msub].prev_class, Some(TexClass::Ord));
        assert_eq!(tree[sum].prev_class, None);
        assert_eq!(tree.tex_spacing(msub), "thinmathspace");
    }

    #[test]
    fn no_spacing_in_scripts() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let eq = tree.create_token("mo", "=");
        let b = tree.create_token("mi", "b");
        let row = tree.create_node("mrow", &[a, eq, b]);
        let x = tree.create_token("mi", "x");
        let msup = tree.create_node("msup", &[x, row]);
        classify(&mut tree, &[msup]);
        assert_eq!(tree[eq].tex_class, Some(TexClass::Rel));
        assert_eq!(tree.tex_spacing(eq), "");
    }

    #[test]
    fn fenced_row_is_inner() {
        let mut tree = MmlTree::default();
        let open = tree.create_token("mo", "(");
        let x = tree.create_token("mi", "x");
        let close = tree.create_token("mo", ")");
        let row = tree.create_node("mrow", &[open, x, close]);
        tree[row].set_property("open", "(");
        tree[row].set_property("close", ")");
        let a = tree.create_token("mi", "a");
        classify(&mut tree, &[a, row]);
        assert_eq!(tree[row].tex_class, Some(TexClass::Inner));
        assert_eq!(tree[row].prev_class, Some(TexClass::Ord));
        assert_eq!(tree[open].prev_class, Some(TexClass::None));
        assert_eq!(tree.tex_spacing(row), "thinmathspace");
    }

    #[test]
    fn familiar_pairs() {
        assert_eq!(atom_space(TexClass::Ord, TexClass::Rel, false), "thickmathspace");
        assert_eq!(atom_space(TexClass::Ord, TexClass::Bin, false), "mediummathspace");
        assert_eq!(atom_space(TexClass::Op, TexClass::Ord, false), "thinmathspace");
        assert_eq!(atom_space(TexClass::Op, TexClass::Ord, true), "thinmathspace");
        assert_eq!(atom_space(TexClass::Open, TexClass::Bin, false), "");
        assert_eq!(atom_space(TexClass::VCenter, TexClass::Rel, false), "thickmathspace");
        assert_eq!(atom_space(TexClass::None, TexClass::Rel, false), "");
    }
}
