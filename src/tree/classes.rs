//! Node classes: the static description of each MathML node kind.
//!
//! A [`NodeClass`] tells the tree how many children a kind takes, which TeX class it starts with,
//! which attribute defaults it has and, through its [`Role`], which inheritance and TeX-class
//! rules apply to it. The built-in classes are registered in [`MmlFactory::standard`]; an
//! extension registers its own `&'static NodeClass` under a new kind, picking the role whose
//! behaviour it wants.

use std::f64::consts::FRAC_1_SQRT_2;
use bitflags::bitflags;

use crate::factory::{Factory, FactoryClass};
use super::attributes::{string, Defaults, DefaultTable, Value};
use super::tex_class::TexClass;

/// How many children a node kind takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many after inheritance (padded with empty rows, or truncated).
    /// An arity of 1 only pads when there are no children at all.
    Fixed(usize),
    /// Any number
    Unbounded,
    /// A single inferred row holding the real children
    Inferred,
}

/// The behaviour a node kind follows in the tree passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Math,
    Identifier,
    Number,
    Operator,
    Text,
    StringLiteral,
    Space,
    Glyph,
    Row,
    InferredRow,
    Fraction,
    Sqrt,
    Root,
    Style,
    Error,
    Padded,
    Phantom,
    Fenced,
    Enclose,
    Action,
    /// Base with scripts; the indices of the subscript and superscript children
    Scripts { sub: usize, sup: usize },
    /// Base with limits; the indices of the underscript and overscript children
    UnderOver { under: usize, over: usize },
    Multiscripts,
    Prescripts,
    NoneNode,
    Table,
    TableRow,
    LabeledRow,
    TableCell,
    AlignGroup,
    AlignMark,
    Semantics,
    Annotation,
    TexAtom,
}

bitflags! {
    /// Static capabilities of a node kind
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Holds text
        const TOKEN               = 1 << 0;
        /// Counts as space for embellished-operator and fence detection
        const SPACELIKE           = 1 << 1;
        /// A line may be broken inside it
        const LINEBREAK_CONTAINER = 1 << 2;
        /// Produces no output of its own (e.g. `none`, `mprescripts`)
        const EMPTY               = 1 << 3;
    }
}

/// Static description of a node kind
#[derive(Debug)]
pub struct NodeClass {
    pub kind:      &'static str,
    pub extends:   Option<&'static str>,
    pub role:      Role,
    pub arity:     Arity,
    pub tex_class: Option<TexClass>,
    pub defaults:  Defaults,
    pub flags:     NodeFlags,
}

impl FactoryClass for &'static NodeClass {
    fn kind(&self) -> &str { self.kind }
    fn extends(&self) -> Option<&str> { self.extends }
}

impl NodeClass {
    pub fn is_token(&self) -> bool {
        self.flags.contains(NodeFlags::TOKEN)
    }

    /// Does this kind wrap its children in an inferred row?
    pub fn is_inferred_parent(&self) -> bool {
        self.arity == Arity::Inferred
    }
}

/// The factory for MathML nodes
pub type MmlFactory = Factory<&'static NodeClass>;

impl MmlFactory {
    /// A factory holding every MathML kind, falling back to `mrow`
    pub fn standard() -> MmlFactory {
        Factory::with_classes("mrow", BUILTIN_CLASSES.iter().copied())
    }
}


// ------------------------- DEFAULT ATTRIBUTES --------------------------------

const NODE: DefaultTable = &[
    ("mathbackground", Value::Inherit),
    ("mathcolor",      Value::Inherit),
    ("mathsize",       Value::Inherit),
    ("dir",            Value::Inherit),
];

const TOKEN: DefaultTable = &[
    ("mathvariant", string("normal")),
    ("mathsize",    Value::Inherit),
];

/// The attributes of `<math>`, which double as the global layer of every node
pub const MATH: DefaultTable = &[
    ("mathvariant",          string("normal")),
    ("mathsize",             string("normal")),
    ("mathcolor",            string("")),
    ("mathbackground",       string("transparent")),
    ("dir",                  string("ltr")),
    ("scriptlevel",          Value::Number(0.)),
    ("displaystyle",         Value::Bool(false)),
    ("display",              string("inline")),
    ("maxwidth",             string("")),
    ("overflow",             string("linebreak")),
    ("altimg",               string("")),
    ("altimg-width",         string("")),
    ("altimg-height",        string("")),
    ("altimg-valign",        string("")),
    ("alttext",              string("")),
    ("cdgroup",              string("")),
    ("scriptsizemultiplier", Value::Number(FRAC_1_SQRT_2)),
    ("scriptminsize",        string("8px")),
    ("infixlinebreakstyle",  string("before")),
    ("lineleading",          string("1ex")),
    ("linebreakmultchar",    string("\u{2062}")),
    ("indentshift",          string("auto")),
    ("indentalign",          string("auto")),
    ("indenttarget",         string("")),
    ("indentalignfirst",     string("indentalign")),
    ("indentshiftfirst",     string("indentshift")),
    ("indentalignlast",      string("indentalign")),
    ("indentshiftlast",      string("indentshift")),
    ("decimalseparator",     string(".")),
    ("mode",                 string("inline")),
];

/// The global layer used by every node
pub const GLOBAL: Defaults = &[MATH];

const MO: DefaultTable = &[
    ("form",              string("infix")),
    ("fence",             Value::Bool(false)),
    ("separator",         Value::Bool(false)),
    ("lspace",            string("thickmathspace")),
    ("rspace",            string("thickmathspace")),
    ("stretchy",          Value::Bool(false)),
    ("symmetric",         Value::Bool(false)),
    ("maxsize",           string("infinity")),
    ("minsize",           string("0em")),
    ("largeop",           Value::Bool(false)),
    ("movablelimits",     Value::Bool(false)),
    ("accent",            Value::Bool(false)),
    ("linebreak",         string("auto")),
    ("lineleading",       string("1ex")),
    ("linebreakstyle",    string("before")),
    ("indentalign",       string("auto")),
    ("indentshift",       string("0")),
    ("indenttarget",      string("")),
    ("indentalignfirst",  string("indentalign")),
    ("indentshiftfirst",  string("indentshift")),
    ("indentalignlast",   string("indentalign")),
    ("indentshiftlast",   string("indentshift")),
];

const MSPACE: DefaultTable = &[
    ("width",     string("0em")),
    ("height",    string("0ex")),
    ("depth",     string("0ex")),
    ("linebreak", string("auto")),
];

const MS: DefaultTable = &[
    ("lquote", string("\"")),
    ("rquote", string("\"")),
];

const MGLYPH: DefaultTable = &[
    ("alt",    string("")),
    ("src",    string("")),
    ("width",  string("auto")),
    ("height", string("auto")),
    ("valign", string("0em")),
];

const MFRAC: DefaultTable = &[
    ("linethickness", string("medium")),
    ("numalign",      string("center")),
    ("denomalign",    string("center")),
    ("bevelled",      Value::Bool(false)),
];

const MSTYLE: DefaultTable = &[
    ("scriptlevel",          Value::Inherit),
    ("displaystyle",         Value::Inherit),
    ("scriptsizemultiplier", Value::Number(FRAC_1_SQRT_2)),
    ("scriptminsize",        string("8px")),
    ("mathbackground",       Value::Inherit),
    ("mathcolor",            Value::Inherit),
    ("dir",                  Value::Inherit),
    ("infixlinebreakstyle",  string("before")),
];

const MPADDED: DefaultTable = &[
    ("width",   string("")),
    ("height",  string("")),
    ("depth",   string("")),
    ("lspace",  Value::Number(0.)),
    ("voffset", Value::Number(0.)),
];

const MFENCED: DefaultTable = &[
    ("open",       string("(")),
    ("close",      string(")")),
    ("separators", string(",")),
];

const MENCLOSE: DefaultTable = &[
    ("notation", string("longdiv")),
];

const MACTION: DefaultTable = &[
    ("actiontype", string("toggle")),
    ("selection",  Value::Number(1.)),
];

const MSUBSUP: DefaultTable = &[
    ("subscriptshift",   string("")),
    ("superscriptshift", string("")),
];

const MUNDEROVER: DefaultTable = &[
    ("accent",      Value::Bool(false)),
    ("accentunder", Value::Bool(false)),
    ("align",       string("center")),
];

const MTABLE: DefaultTable = &[
    ("align",           string("axis")),
    ("rowalign",        string("baseline")),
    ("columnalign",     string("center")),
    ("groupalign",      string("{left}")),
    ("alignmentscope",  Value::Bool(true)),
    ("columnwidth",     string("auto")),
    ("width",           string("auto")),
    ("rowspacing",      string("1ex")),
    ("columnspacing",   string(".8em")),
    ("rowlines",        string("none")),
    ("columnlines",     string("none")),
    ("frame",           string("none")),
    ("framespacing",    string("0.4em 0.5ex")),
    ("equalrows",       Value::Bool(false)),
    ("equalcolumns",    Value::Bool(false)),
    ("displaystyle",    Value::Bool(false)),
    ("side",            string("right")),
    ("minlabelspacing", string("0.8em")),
];

const MTR: DefaultTable = &[
    ("rowalign",    Value::Inherit),
    ("columnalign", Value::Inherit),
    ("groupalign",  Value::Inherit),
];

const MTD: DefaultTable = &[
    ("rowspan",     Value::Number(1.)),
    ("columnspan",  Value::Number(1.)),
    ("rowalign",    Value::Inherit),
    ("columnalign", Value::Inherit),
    ("groupalign",  Value::Inherit),
];

const MALIGNGROUP: DefaultTable = &[
    ("groupalign", Value::Inherit),
];

const MALIGNMARK: DefaultTable = &[
    ("edge", string("left")),
];

const SEMANTICS: DefaultTable = &[
    ("definitionURL", string("")),
    ("encoding",      string("")),
];

const ANNOTATION: DefaultTable = &[
    ("definitionURL", string("")),
    ("encoding",      string("")),
    ("cd",            string("mathmlkeys")),
    ("name",          string("")),
    ("src",           string("")),
];


// ------------------------- BUILT-IN CLASSES --------------------------------

macro_rules! node_class {
    ($name:ident, $kind:expr, $role:expr, $arity:expr, $class:expr, [$($defaults:expr),*], $flags:expr) => {
        node_class!($name, $kind, None, $role, $arity, $class, [$($defaults),*], $flags);
    };
    ($name:ident, $kind:expr, $extends:expr, $role:expr, $arity:expr, $class:expr, [$($defaults:expr),*], $flags:expr) => {
        pub static $name: NodeClass = NodeClass {
            kind:      $kind,
            extends:   $extends,
            role:      $role,
            arity:     $arity,
            tex_class: $class,
            defaults:  &[$($defaults),*],
            flags:     $flags,
        };
    };
}

use self::Arity::*;
use self::TexClass as TC;

const NO_FLAGS: NodeFlags = NodeFlags::empty();
const TOKEN_FLAGS: NodeFlags = NodeFlags::TOKEN;

node_class!(MATH_CLASS,       "math",       Role::Math,          Inferred,   None,            [MATH, NODE], NodeFlags::LINEBREAK_CONTAINER);
node_class!(MI_CLASS,         "mi",         Role::Identifier,    Fixed(0),   Some(TC::Ord),   [TOKEN, NODE], TOKEN_FLAGS);
node_class!(MN_CLASS,         "mn",         Role::Number,        Fixed(0),   Some(TC::Ord),   [TOKEN, NODE], TOKEN_FLAGS);
node_class!(MO_CLASS,         "mo",         Role::Operator,      Fixed(0),   Some(TC::Rel),   [MO, TOKEN, NODE], TOKEN_FLAGS);
node_class!(MTEXT_CLASS,      "mtext",      Role::Text,          Fixed(0),   Some(TC::None),  [TOKEN, NODE], NodeFlags::TOKEN.union(NodeFlags::SPACELIKE));
node_class!(MS_CLASS,         "ms",         Role::StringLiteral, Fixed(0),   Some(TC::Ord),   [MS, TOKEN, NODE], TOKEN_FLAGS);
node_class!(MSPACE_CLASS,     "mspace",     Role::Space,         Fixed(0),   Some(TC::None),  [MSPACE, TOKEN, NODE], NodeFlags::TOKEN.union(NodeFlags::SPACELIKE));
node_class!(MGLYPH_CLASS,     "mglyph",     Role::Glyph,         Fixed(0),   Some(TC::Ord),   [MGLYPH, TOKEN, NODE], TOKEN_FLAGS);
node_class!(MROW_CLASS,       "mrow",       Role::Row,           Unbounded,  None,            [NODE], NodeFlags::LINEBREAK_CONTAINER);
node_class!(INFERRED_CLASS,   "inferredMrow", Some("mrow"), Role::InferredRow, Unbounded, None, [NODE], NodeFlags::LINEBREAK_CONTAINER);
node_class!(MFRAC_CLASS,      "mfrac",      Role::Fraction,      Fixed(2),   Some(TC::Ord),   [MFRAC, NODE], NO_FLAGS);
node_class!(MSQRT_CLASS,      "msqrt",      Role::Sqrt,          Inferred,   Some(TC::Ord),   [NODE], NO_FLAGS);
node_class!(MROOT_CLASS,      "mroot",      Role::Root,          Fixed(2),   Some(TC::Ord),   [NODE], NO_FLAGS);
node_class!(MSTYLE_CLASS,     "mstyle",     Role::Style,         Inferred,   None,            [MSTYLE, NODE], NO_FLAGS);
node_class!(MERROR_CLASS,     "merror",     Role::Error,         Inferred,   Some(TC::Ord),   [NODE], NO_FLAGS);
node_class!(MPADDED_CLASS,    "mpadded",    Role::Padded,        Inferred,   None,            [MPADDED, NODE], NO_FLAGS);
node_class!(MPHANTOM_CLASS,   "mphantom",   Role::Phantom,       Inferred,   None,            [NODE], NO_FLAGS);
node_class!(MFENCED_CLASS,    "mfenced",    Role::Fenced,        Unbounded,  Some(TC::Inner), [MFENCED, NODE], NO_FLAGS);
node_class!(MENCLOSE_CLASS,   "menclose",   Role::Enclose,       Inferred,   Some(TC::Ord),   [MENCLOSE, NODE], NO_FLAGS);
node_class!(MACTION_CLASS,    "maction",    Role::Action,        Unbounded,  None,            [MACTION, NODE], NO_FLAGS);
node_class!(MSUBSUP_CLASS,    "msubsup",    Role::Scripts { sub: 1, sup: 2 }, Fixed(3), Some(TC::Ord), [MSUBSUP, NODE], NO_FLAGS);
node_class!(MSUB_CLASS,       "msub",       Some("msubsup"), Role::Scripts { sub: 1, sup: 2 }, Fixed(2), Some(TC::Ord), [MSUBSUP, NODE], NO_FLAGS);
node_class!(MSUP_CLASS,       "msup",       Some("msubsup"), Role::Scripts { sub: 2, sup: 1 }, Fixed(2), Some(TC::Ord), [MSUBSUP, NODE], NO_FLAGS);
node_class!(MUNDEROVER_CLASS, "munderover", Role::UnderOver { under: 1, over: 2 }, Fixed(3), Some(TC::Ord), [MUNDEROVER, NODE], NO_FLAGS);
node_class!(MUNDER_CLASS,     "munder",     Some("munderover"), Role::UnderOver { under: 1, over: 2 }, Fixed(2), Some(TC::Ord), [MUNDEROVER, NODE], NO_FLAGS);
node_class!(MOVER_CLASS,      "mover",      Some("munderover"), Role::UnderOver { under: 2, over: 1 }, Fixed(2), Some(TC::Ord), [MUNDEROVER, NODE], NO_FLAGS);
node_class!(MMULTI_CLASS,     "mmultiscripts", Some("msubsup"), Role::Multiscripts, Fixed(1), Some(TC::Ord), [MSUBSUP, NODE], NO_FLAGS);
node_class!(MPRESCRIPTS_CLASS,"mprescripts", Role::Prescripts,   Fixed(0),   None,            [NODE], NodeFlags::EMPTY);
node_class!(NONE_CLASS,       "none",       Role::NoneNode,      Fixed(0),   None,            [NODE], NodeFlags::EMPTY);
node_class!(MTABLE_CLASS,     "mtable",     Role::Table,         Unbounded,  Some(TC::Ord),   [MTABLE, NODE], NodeFlags::LINEBREAK_CONTAINER);
node_class!(MTR_CLASS,        "mtr",        Role::TableRow,      Unbounded,  None,            [MTR, NODE], NodeFlags::LINEBREAK_CONTAINER);
node_class!(MLABELEDTR_CLASS, "mlabeledtr", Some("mtr"), Role::LabeledRow, Unbounded, None,  [MTR, NODE], NodeFlags::LINEBREAK_CONTAINER);
node_class!(MTD_CLASS,        "mtd",        Role::TableCell,     Inferred,   None,            [MTD, NODE], NodeFlags::LINEBREAK_CONTAINER);
node_class!(MALIGNGROUP_CLASS,"maligngroup", Role::AlignGroup,   Fixed(0),   None,            [MALIGNGROUP, NODE], NodeFlags::SPACELIKE);
node_class!(MALIGNMARK_CLASS, "malignmark", Role::AlignMark,     Fixed(0),   None,            [MALIGNMARK, NODE], NodeFlags::SPACELIKE);
node_class!(SEMANTICS_CLASS,  "semantics",  Role::Semantics,     Unbounded,  None,            [SEMANTICS, NODE], NO_FLAGS);
node_class!(ANNOTATION_CLASS, "annotation", Role::Annotation,    Unbounded,  None,            [ANNOTATION, NODE], NodeFlags::TOKEN);
node_class!(ANNOTATION_XML_CLASS, "annotation-xml", Some("annotation"), Role::Annotation, Unbounded, None, [ANNOTATION, NODE], NO_FLAGS);
node_class!(TEXATOM_CLASS,    "TeXAtom",    Role::TexAtom,       Inferred,   Some(TC::Ord),   [NODE], NO_FLAGS);

/// Every built-in class
pub static BUILTIN_CLASSES: &[&NodeClass] = &[
    &MATH_CLASS, &MI_CLASS, &MN_CLASS, &MO_CLASS, &MTEXT_CLASS, &MS_CLASS, &MSPACE_CLASS,
    &MGLYPH_CLASS, &MROW_CLASS, &INFERRED_CLASS, &MFRAC_CLASS, &MSQRT_CLASS, &MROOT_CLASS,
    &MSTYLE_CLASS, &MERROR_CLASS, &MPADDED_CLASS, &MPHANTOM_CLASS, &MFENCED_CLASS,
    &MENCLOSE_CLASS, &MACTION_CLASS, &MSUBSUP_CLASS, &MSUB_CLASS, &MSUP_CLASS,
    &MUNDEROVER_CLASS, &MUNDER_CLASS, &MOVER_CLASS, &MMULTI_CLASS, &MPRESCRIPTS_CLASS,
    &NONE_CLASS, &MTABLE_CLASS, &MTR_CLASS, &MLABELEDTR_CLASS, &MTD_CLASS,
    &MALIGNGROUP_CLASS, &MALIGNMARK_CLASS, &SEMANTICS_CLASS, &ANNOTATION_CLASS,
    &ANNOTATION_XML_CLASS, &TEXATOM_CLASS,
];
