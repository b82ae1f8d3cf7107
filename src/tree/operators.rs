//! The operator dictionary.
//!
//! An `mo` gets its TeX class, its spacing and properties such as `stretchy` or `largeop` from the
//! entry for its text in the form it is used in (prefix, infix or postfix). Operators missing from
//! the dictionary fall back to the class of the Unicode block they belong to.

use bitflags::bitflags;
use phf::phf_map;

use super::{MmlTree, NodeId};
use super::tex_class::TexClass;

bitflags! {
    /// Boolean operator properties set by a dictionary entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpProps: u8 {
        const FENCE         = 1 << 0;
        const STRETCHY      = 1 << 1;
        const SYMMETRIC     = 1 << 2;
        const LARGEOP       = 1 << 3;
        const MOVABLELIMITS = 1 << 4;
        const ACCENT        = 1 << 5;
        const SEPARATOR     = 1 << 6;
    }
}

impl OpProps {
    /// Attribute names of the set properties
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        const NAMES: [(OpProps, &str); 7] = [
            (OpProps::FENCE,         "fence"),
            (OpProps::STRETCHY,      "stretchy"),
            (OpProps::SYMMETRIC,     "symmetric"),
            (OpProps::LARGEOP,       "largeop"),
            (OpProps::MOVABLELIMITS, "movablelimits"),
            (OpProps::ACCENT,        "accent"),
            (OpProps::SEPARATOR,     "separator"),
        ];
        NAMES.into_iter().filter(move |(flag, _)| self.contains(*flag)).map(|(_, name)| name)
    }
}

/// A dictionary entry. Spaces are in eighteenths of an em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpDef {
    pub lspace: u8,
    pub rspace: u8,
    pub class:  TexClass,
    pub props:  OpProps,
}

const fn op(lspace: u8, rspace: u8, class: TexClass, props: OpProps) -> OpDef {
    OpDef { lspace, rspace, class, props }
}

const NO_PROPS: OpProps = OpProps::empty();
const FENCE: OpProps = OpProps::FENCE.union(OpProps::STRETCHY).union(OpProps::SYMMETRIC);
const LIMITS: OpProps = OpProps::LARGEOP.union(OpProps::MOVABLELIMITS);

const ORD:        OpDef = op(0, 0, TexClass::Ord, NO_PROPS);
const ORD11:      OpDef = op(1, 1, TexClass::Ord, NO_PROPS);
const ORD21:      OpDef = op(2, 1, TexClass::Ord, NO_PROPS);
const ORD02:      OpDef = op(0, 2, TexClass::Ord, NO_PROPS);
const ORD55:      OpDef = op(5, 5, TexClass::Ord, NO_PROPS);
const NONE:       OpDef = op(0, 0, TexClass::None, NO_PROPS);
const OP:         OpDef = op(1, 2, TexClass::Op, LIMITS.union(OpProps::SYMMETRIC));
const OPFIXED:    OpDef = op(1, 2, TexClass::Op, LIMITS);
const INTEGRAL:   OpDef = op(0, 1, TexClass::Op, OpProps::LARGEOP.union(OpProps::SYMMETRIC));
const BIN3:       OpDef = op(3, 3, TexClass::Bin, NO_PROPS);
const BIN4:       OpDef = op(4, 4, TexClass::Bin, NO_PROPS);
const REL:        OpDef = op(5, 5, TexClass::Rel, NO_PROPS);
const REL4:       OpDef = op(4, 4, TexClass::Rel, NO_PROPS);
const RELSTRETCH: OpDef = op(5, 5, TexClass::Rel, OpProps::STRETCHY);
const WIDEREL:    OpDef = op(5, 5, TexClass::Rel, OpProps::ACCENT.union(OpProps::STRETCHY));
const OPEN:       OpDef = op(0, 0, TexClass::Open, FENCE);
const CLOSE:      OpDef = op(0, 0, TexClass::Close, FENCE);
const FENCEORD:   OpDef = op(2, 2, TexClass::Ord, FENCE);
const INNER:      OpDef = op(0, 0, TexClass::Inner, NO_PROPS);
const PUNCT:      OpDef = op(0, 3, TexClass::Punct, OpProps::SEPARATOR);
const ACCENT:     OpDef = op(0, 0, TexClass::Ord, OpProps::ACCENT);
const WIDEACCENT: OpDef = op(0, 0, TexClass::Ord, OpProps::ACCENT.union(OpProps::STRETCHY));
const FACTORIAL:  OpDef = op(1, 0, TexClass::Close, NO_PROPS);
const ROOT:       OpDef = op(1, 1, TexClass::Ord, OpProps::STRETCHY);

static PREFIX: phf::Map<&'static str, OpDef> = phf_map! {
    "(" => OPEN,
    "[" => OPEN,
    "{" => OPEN,
    "|" => OPEN,
    "\u{2016}" => OPEN,
    "\u{2308}" => OPEN,
    "\u{230A}" => OPEN,
    "\u{27E8}" => OPEN,
    "\u{27E6}" => OPEN,
    "\u{00AC}" => ORD21,
    "\u{2200}" => ORD21,
    "\u{2202}" => ORD21,
    "\u{2203}" => ORD21,
    "\u{2204}" => ORD21,
    "\u{2207}" => ORD21,
    "\u{2220}" => ORD,
    "+" => ORD21,
    "-" => ORD21,
    "\u{2212}" => ORD21,
    "\u{00B1}" => ORD21,
    "\u{2213}" => ORD21,
    "\u{221A}" => ROOT,
    "\u{2211}" => OP,
    "\u{220F}" => OP,
    "\u{2210}" => OP,
    "\u{22C0}" => OP,
    "\u{22C1}" => OP,
    "\u{22C2}" => OP,
    "\u{22C3}" => OP,
    "\u{2A00}" => OP,
    "\u{2A01}" => OP,
    "\u{2A02}" => OP,
    "\u{2A04}" => OP,
    "\u{2A06}" => OP,
    "\u{222B}" => INTEGRAL,
    "\u{222C}" => INTEGRAL,
    "\u{222D}" => INTEGRAL,
    "\u{222E}" => INTEGRAL,
    "\u{222F}" => INTEGRAL,
    "\u{2230}" => INTEGRAL,
    "lim" => OPFIXED,
    "limsup" => OPFIXED,
    "liminf" => OPFIXED,
    "max" => OPFIXED,
    "min" => OPFIXED,
    "sup" => OPFIXED,
    "inf" => OPFIXED,
    "det" => OPFIXED,
    "gcd" => OPFIXED,
    "Pr" => OPFIXED,
};

static INFIX: phf::Map<&'static str, OpDef> = phf_map! {
    "+" => BIN4,
    "-" => BIN4,
    "\u{2212}" => BIN4,
    "*" => BIN3,
    "\u{00B1}" => BIN4,
    "\u{2213}" => BIN4,
    "\u{00D7}" => BIN4,
    "\u{00F7}" => BIN4,
    "\u{22C5}" => BIN4,
    "\u{2217}" => BIN4,
    "\u{2218}" => BIN4,
    "\u{2219}" => BIN4,
    "\u{2216}" => BIN4,
    "\u{2227}" => BIN4,
    "\u{2228}" => BIN4,
    "\u{2229}" => BIN4,
    "\u{222A}" => BIN4,
    "\u{2295}" => BIN4,
    "\u{2296}" => BIN4,
    "\u{2297}" => BIN4,
    "\u{2298}" => BIN4,
    "\u{2299}" => BIN4,
    "\u{22C6}" => BIN4,
    "/" => ORD11,
    "\\" => ORD,
    "," => PUNCT,
    ";" => PUNCT,
    "." => PUNCT,
    ":" => REL,
    "?" => op(1, 1, TexClass::Close, NO_PROPS),
    "=" => REL,
    "<" => REL,
    ">" => REL,
    "\u{2260}" => REL,
    "\u{2264}" => REL,
    "\u{2265}" => REL,
    "\u{226A}" => REL,
    "\u{226B}" => REL,
    "\u{2261}" => REL,
    "\u{2248}" => REL,
    "\u{223C}" => REL,
    "\u{2243}" => REL,
    "\u{2245}" => REL,
    "\u{221D}" => REL,
    "\u{2208}" => REL,
    "\u{2209}" => REL,
    "\u{220B}" => REL,
    "\u{2282}" => REL,
    "\u{2283}" => REL,
    "\u{2286}" => REL,
    "\u{2287}" => REL,
    "\u{22A2}" => REL,
    "\u{22A8}" => REL,
    "\u{22A5}" => REL,
    "\u{2223}" => REL,
    "\u{2225}" => REL,
    "\u{2190}" => WIDEREL,
    "\u{2192}" => WIDEREL,
    "\u{2194}" => WIDEREL,
    "\u{21A6}" => WIDEREL,
    "\u{21D0}" => WIDEREL,
    "\u{21D2}" => WIDEREL,
    "\u{21D4}" => WIDEREL,
    "\u{27F5}" => WIDEREL,
    "\u{27F6}" => WIDEREL,
    "\u{27F7}" => WIDEREL,
    "\u{27F9}" => WIDEREL,
    "\u{2191}" => RELSTRETCH,
    "\u{2193}" => RELSTRETCH,
    "\u{21D1}" => RELSTRETCH,
    "\u{21D3}" => RELSTRETCH,
    "\u{2261}\u{0338}" => REL,
    "|" => FENCEORD,
    "\u{2016}" => FENCEORD,
    "\u{2022}" => BIN4,
    "\u{2026}" => INNER,
    "\u{22EF}" => INNER,
    "\u{22F1}" => INNER,
    "\u{22EE}" => ORD55,
    "\u{2061}" => NONE,
    "\u{2062}" => NONE,
    "\u{2063}" => op(0, 0, TexClass::None, OpProps::SEPARATOR),
    "\u{2064}" => REL4,
};

static POSTFIX: phf::Map<&'static str, OpDef> = phf_map! {
    ")" => CLOSE,
    "]" => CLOSE,
    "}" => CLOSE,
    "|" => CLOSE,
    "\u{2016}" => CLOSE,
    "\u{2309}" => CLOSE,
    "\u{230B}" => CLOSE,
    "\u{27E9}" => CLOSE,
    "\u{27E7}" => CLOSE,
    "!" => FACTORIAL,
    "!!" => FACTORIAL,
    "\u{2032}" => ORD02,
    "\u{2033}" => ORD02,
    "\u{2034}" => ORD02,
    "'" => ORD02,
    "\u{00B0}" => ORD,
    "&" => ORD,
    "^" => WIDEACCENT,
    "~" => WIDEACCENT,
    "_" => WIDEACCENT,
    "\u{00AF}" => WIDEACCENT,
    "\u{203E}" => WIDEACCENT,
    "\u{02C6}" => WIDEACCENT,
    "\u{02C7}" => WIDEACCENT,
    "\u{02DC}" => WIDEACCENT,
    "\u{23DC}" => WIDEACCENT,
    "\u{23DD}" => WIDEACCENT,
    "\u{23DE}" => WIDEACCENT,
    "\u{23DF}" => WIDEACCENT,
    "\u{2192}" => WIDEACCENT,
    "\u{2190}" => WIDEACCENT,
    "\u{00A8}" => ACCENT,
    "\u{00B4}" => ACCENT,
    "`" => ACCENT,
    "\u{02D8}" => ACCENT,
    "\u{02D9}" => ACCENT,
    "\u{02DA}" => ACCENT,
    "\u{20D7}" => ACCENT,
};

/// The dictionary entry of `text` in `form`
pub fn lookup(text: &str, form: &str) -> Option<&'static OpDef> {
    match form {
        "prefix"  => PREFIX.get(text),
        "infix"   => INFIX.get(text),
        "postfix" => POSTFIX.get(text),
        _ => None,
    }
}

/// A block of Unicode characters with a common class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharRange {
    pub start: u32,
    pub end:   u32,
    pub class: TexClass,
    /// The token kind characters of the block are usually in
    pub kind:  &'static str,
}

const fn range(start: u32, end: u32, class: TexClass, kind: &'static str) -> CharRange {
    CharRange { start, end, class, kind }
}

/// Classes by Unicode block, sorted by start
pub static RANGES: &[CharRange] = &[
    range(0x0020, 0x007F, TexClass::Rel,   "mo"),
    range(0x00A0, 0x00FF, TexClass::Ord,   "mi"),
    range(0x0100, 0x017F, TexClass::Ord,   "mi"),
    range(0x0180, 0x024F, TexClass::Ord,   "mi"),
    range(0x02B0, 0x02FF, TexClass::Ord,   "mi"),
    range(0x0300, 0x036F, TexClass::Ord,   "mi"),
    range(0x0370, 0x03FF, TexClass::Ord,   "mi"),
    range(0x1E00, 0x1EFF, TexClass::Ord,   "mi"),
    range(0x2000, 0x206F, TexClass::Punct, "mo"),
    range(0x2070, 0x209F, TexClass::Ord,   "mo"),
    range(0x20A0, 0x20CF, TexClass::Ord,   "mo"),
    range(0x20D0, 0x20FF, TexClass::Ord,   "mo"),
    range(0x2100, 0x214F, TexClass::Ord,   "mi"),
    range(0x2150, 0x218F, TexClass::Ord,   "mn"),
    range(0x2190, 0x21FF, TexClass::Rel,   "mo"),
    range(0x2200, 0x22FF, TexClass::Bin,   "mo"),
    range(0x2300, 0x23FF, TexClass::Ord,   "mo"),
    range(0x2460, 0x24FF, TexClass::Ord,   "mn"),
    range(0x2500, 0x259F, TexClass::Ord,   "mo"),
    range(0x25A0, 0x25FF, TexClass::Ord,   "mo"),
    range(0x2600, 0x26FF, TexClass::Ord,   "mo"),
    range(0x2700, 0x27BF, TexClass::Ord,   "mo"),
    range(0x27C0, 0x27EF, TexClass::Ord,   "mo"),
    range(0x27F0, 0x27FF, TexClass::Rel,   "mo"),
    range(0x2900, 0x297F, TexClass::Rel,   "mo"),
    range(0x2980, 0x29FF, TexClass::Ord,   "mo"),
    range(0x2A00, 0x2AFF, TexClass::Bin,   "mo"),
    range(0x2B00, 0x2BFF, TexClass::Ord,   "mo"),
    range(0x1D400, 0x1D7FF, TexClass::Ord, "mi"),
];

/// The block of the first character of `text`
pub fn get_range(text: &str) -> Option<&'static CharRange> {
    let n = text.chars().next()? as u32;
    RANGES.iter().find(|r| r.start <= n && n <= r.end)
}

/// Spacing (in eighteenths of an em) of the fallback classes, indexed by class
pub const MMLSPACING: [(u8, u8); 7] = [(0, 0), (1, 2), (3, 3), (4, 4), (0, 0), (0, 0), (0, 3)];

fn mml_spacing(class: TexClass) -> (u8, u8) {
    let index = match class {
        TexClass::Ord   => 0,
        TexClass::Op    => 1,
        TexClass::Bin   => 2,
        TexClass::Rel   => 3,
        TexClass::Open  => 4,
        TexClass::Close => 5,
        TexClass::Punct => 6,
        _ => return (0, 0),
    };
    MMLSPACING[index]
}

impl MmlTree {
    /// The forms to try for the operator `id`, most likely first. The outermost node of an
    /// embellished operator is prefix when first in its row and postfix when last.
    pub fn operator_forms(&self, id: NodeId) -> [&'static str; 3] {
        let mut core = id;
        let mut parent = self.parent(id);
        while let Some(p) = parent {
            let outer = if self.is_inferred(p) { self.parent(p) } else { Some(p) };
            match outer {
                Some(o) if self.is_embellished(o) => {
                    core = o;
                    parent = self.parent(o);
                },
                _ => break,
            }
        }
        let mut forms = ["infix", "prefix", "postfix"];
        if let Some(p) = parent {
            if self.is_kind(p, "mrow") && self.non_space_children(p).len() != 1 {
                if self.first_non_space(p) == Some(core) {
                    forms = ["prefix", "infix", "postfix"];
                } else if self.last_non_space(p) == Some(core) {
                    forms = ["postfix", "infix", "prefix"];
                }
            }
        }
        if let Some(explicit) = self[id].attributes.get_explicit("form") {
            let explicit = explicit.as_str();
            if let Some(i) = forms.iter().position(|f| *f == explicit) {
                forms[.. i + 1].rotate_right(1);
            }
        }
        forms
    }

    /// Look the operator `id` up in the dictionary and take on its class, spacing and properties
    pub fn check_operator_table(&mut self, id: NodeId) {
        let text = self[id].text().to_string();
        let forms = self.operator_forms(id);
        self[id].attributes.set_inherited("form", forms[0]);
        let has_class = self[id].property("texClass").is_some();
        let def = forms.iter().find_map(|form| lookup(&text, form));
        let node = &mut self[id];
        if let Some(def) = def {
            if !has_class {
                node.tex_class = Some(def.class);
            }
            for name in def.props.names() {
                node.attributes.set_inherited(name, true);
            }
            node.lspace = def.lspace as f64 / 18.;
            node.rspace = def.rspace as f64 / 18.;
        } else if let Some(range) = get_range(&text) {
            trace!("operator {:?} not in dictionary, using block class {:?}", text, range.class);
            if !has_class {
                node.tex_class = Some(range.class);
            }
            let (lspace, rspace) = mml_spacing(range.class);
            node.lspace = lspace as f64 / 18.;
            node.rspace = rspace as f64 / 18.;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_entries() {
        let plus = lookup("+", "infix").unwrap();
        assert_eq!(plus.class, TexClass::Bin);
        assert_eq!((plus.lspace, plus.rspace), (4, 4));
        let open = lookup("(", "prefix").unwrap();
        assert_eq!(open.class, TexClass::Open);
        assert!(open.props.contains(OpProps::FENCE | OpProps::STRETCHY));
        assert!(lookup("(", "infix").is_none());
        assert_eq!(lookup("\u{2211}", "prefix").unwrap().props.names().collect::<Vec<_>>(),
                   vec!["symmetric", "largeop", "movablelimits"]);
        assert_eq!(lookup("\u{2061}", "infix").unwrap().class, TexClass::None);
    }

    #[test]
    fn ranges() {
        assert_eq!(get_range("\u{2A7D}").map(|r| r.class), Some(TexClass::Bin));
        assert_eq!(get_range("\u{21AA}").map(|r| r.class), Some(TexClass::Rel));
        assert_eq!(get_range("\u{03B1}").map(|r| r.kind), Some("mi"));
        assert_eq!(get_range("\u{1D400}").map(|r| r.kind), Some("mi"));
        assert!(get_range("\u{4E00}").is_none());
        assert!(get_range("").is_none());
        assert!(RANGES.windows(2).all(|w| w[0].end < w[1].start));
    }

    #[test]
    fn forms_from_position() {
        let mut tree = MmlTree::default();
        let minus = tree.create_token("mo", "-");
        let x = tree.create_token("mi", "x");
        let bang = tree.create_token("mo", "!");
        let plus = tree.create_token("mo", "+");
        let y = tree.create_token("mi", "y");
        let row = tree.create_node("mrow", &[minus, x, plus, y, bang]);
        assert_eq!(tree.operator_forms(minus)[0], "prefix");
        assert_eq!(tree.operator_forms(plus)[0], "infix");
        assert_eq!(tree.operator_forms(bang)[0], "postfix");

        tree[plus].attributes.set("form", "postfix");
        assert_eq!(tree.operator_forms(plus), ["postfix", "infix", "prefix"]);
        let _ = row;
    }

    #[test]
    fn embellished_operator_takes_form_of_outer_node() {
        let mut tree = MmlTree::default();
        let open = tree.create_token("mo", "(");
        let two = tree.create_token("mn", "2");
        let msup = tree.create_node("msup", &[open, two]);
        let x = tree.create_token("mi", "x");
        tree.create_node("mrow", &[msup, x]);
        assert_eq!(tree.operator_forms(open)[0], "prefix");
    }

    #[test]
    fn table_and_fallback() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let op = tree.create_token("mo", "\u{2A7D}");
        let b = tree.create_token("mi", "b");
        tree.create_node("mrow", &[a, op, b]);
        tree.check_operator_table(op);
        assert_eq!(tree[op].tex_class, Some(TexClass::Bin));
        assert!((tree[op].lspace - 3. / 18.).abs() < 1e-9);

        let sum = tree.create_token("mo", "\u{2211}");
        tree.create_node("mrow", &[sum, a]);
        tree.check_operator_table(sum);
        assert_eq!(tree[sum].tex_class, Some(TexClass::Op));
        assert!(tree[sum].attributes.get_bool("largeop"));
        assert!(!tree[sum].attributes.is_set("stretchy"));
        assert_eq!(tree[sum].attributes.get_str("form"), "prefix");
    }
}
