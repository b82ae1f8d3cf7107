//! The MathML input jax: markup in, [`MmlTree`] out.
//!
//! Compiling an expression goes through these steps:
//!
//!   1. the pre-filters run over the source text (entity translation is one of them);
//!   2. the text is parsed with `roxmltree` and its root must be a `<math>` element;
//!   3. [`MathMlCompiler`] turns the elements into nodes, copies their attributes and text, and
//!      verifies the result, replacing malformed parts by `merror` nodes;
//!   4. attributes are inherited down the tree and rows delimited by fences are marked;
//!   5. the mml-filters run over the finished tree.
//!
//! Malformed markup that can be shown (a wrong number of children, unknown attributes) becomes an
//! `merror` in place. Markup that cannot (an unknown element, stray text) fails the compilation
//! with a [`CompileError`].

use std::rc::Rc;

use roxmltree::{Document, Node};

use crate::error::{CompileError, Error, Result};
use crate::options::OptionList;
use crate::tree::{MmlTree, NodeId};
use crate::tree::classes::{Arity, MmlFactory, Role};
use crate::tree::tex_class::TexClass;
use crate::util::function_list::{Execution, FilterResult, FunctionList};
use super::entities::EntityTable;

/// How the markup is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseAs {
    /// Element and attribute names are matched case-insensitively
    Html,
    Xml,
}

/// Checks run over the compiled tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyOptions {
    /// Replace nodes with the wrong number of children by an `merror`
    pub check_arity: bool,
    /// Replace nodes with unknown attributes by an `merror`
    pub check_attributes: bool,
    /// Show the full message in `merror` nodes instead of the element name
    pub full_errors: bool,
    /// Pad `mmultiscripts` with empty rows instead of reporting them
    pub fix_mmultiscripts: bool,
    /// Wrap misplaced table content in rows and cells instead of reporting it
    pub fix_mtables: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        VerifyOptions {
            check_arity:       true,
            check_attributes:  false,
            full_errors:       false,
            fix_mmultiscripts: true,
            fix_mtables:       true,
        }
    }
}

/// Options of the MathML input jax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MathMlOptions {
    pub parse_as: ParseAs,
    /// Compile items again even when they already have a tree
    pub force_reparse: bool,
    /// Move the children of empty elements up to their parent
    pub fix_misplaced_children: bool,
    /// Translate named entities before parsing
    pub translate_entities: bool,
    pub verify: VerifyOptions,
}

impl Default for MathMlOptions {
    fn default() -> Self {
        MathMlOptions {
            parse_as:               ParseAs::Html,
            force_reparse:          false,
            fix_misplaced_children: true,
            translate_entities:     true,
            verify:                 VerifyOptions::default(),
        }
    }
}

impl MathMlOptions {
    /// The defaults as an option list, for validating user options against
    pub fn defaults() -> OptionList {
        serde_json::to_value(Self::default()).map(OptionList::from_json).unwrap_or_default()
    }
}

/// Source text handed to the pre-filters
#[derive(Debug, Clone)]
pub struct MathSource {
    pub text:     String,
    pub display:  bool,
    pub entities: Rc<EntityTable>,
    /// Whether missing entity definitions may be requested
    pub can_load: bool,
}

/// The MathML input jax
#[derive(Debug)]
pub struct MathMl {
    options:  MathMlOptions,
    compiler: MathMlCompiler,
    /// Run over the source text before parsing
    pub pre_filters: FunctionList<MathSource>,
    /// Run over the compiled tree
    pub mml_filters: FunctionList<MmlTree>,
}

impl MathMl {
    pub fn new(options: MathMlOptions, factory: Rc<MmlFactory>) -> Self {
        let mut pre_filters = FunctionList::new();
        if options.translate_entities {
            pre_filters.add(translate_entities, -1);
        }
        MathMl {
            compiler: MathMlCompiler::new(options.clone(), factory),
            options,
            pre_filters,
            mml_filters: FunctionList::new(),
        }
    }

    pub fn options(&self) -> &MathMlOptions {
        &self.options
    }

    pub fn factory(&self) -> &Rc<MmlFactory> {
        &self.compiler.factory
    }

    /// Compile one expression. A missing resource is reported as [`Error::Retry`].
    pub fn compile(&self, text: &str, display: bool, entities: &Rc<EntityTable>, can_load: bool) -> Result<MmlTree> {
        if text.trim().is_empty() {
            return Err(CompileError::Empty.into());
        }
        let mut source = MathSource {
            text: text.to_string(),
            display,
            entities: entities.clone(),
            can_load,
        };
        if let Execution::Pending { request, .. } = self.pre_filters.async_execute(&mut source) {
            return Err(Error::Retry(request));
        }
        let document = Document::parse(&source.text)?;
        let root = document.root_element();
        let kind = self.compiler.kind_of(root);
        if kind != "math" {
            return Err(CompileError::NotMath(kind).into());
        }
        let mut tree = self.compiler.compile(root, source.display, &source.entities, can_load)?;
        self.mml_filters.execute(&mut tree);
        Ok(tree)
    }

    /// A tree showing `message` as an error, used in place of math that failed to compile
    pub fn format_error(&self, message: &str) -> MmlTree {
        let message = message.lines().next().unwrap_or_default();
        let mut tree = MmlTree::new(self.compiler.factory.clone());
        let mtext = tree.create_token("mtext", message);
        let merror = tree.create_node("merror", &[mtext]);
        tree[merror].attributes.set("data-mjx-error", message);
        tree[merror].attributes.set("title", message);
        let math = tree.create_node("math", &[merror]);
        tree.set_root(math);
        tree.inherit_attributes(math);
        tree
    }
}

fn translate_entities(source: &mut MathSource) -> FilterResult {
    match source.entities.translate_markup(&source.text, source.can_load) {
        Ok(text) => {
            source.text = text;
            FilterResult::Continue
        },
        Err(request) => FilterResult::Pending(request),
    }
}

/// Turns parsed MathML elements into a tree
#[derive(Debug, Clone)]
pub struct MathMlCompiler {
    options: MathMlOptions,
    factory: Rc<MmlFactory>,
}

/// State of one compilation
struct Context<'a> {
    options:  &'a MathMlOptions,
    entities: &'a EntityTable,
    can_load: bool,
    tree:     MmlTree,
}

impl MathMlCompiler {
    pub fn new(options: MathMlOptions, factory: Rc<MmlFactory>) -> Self {
        MathMlCompiler { options, factory }
    }

    /// The node kind of an element: its local name, matched case-insensitively when parsing HTML
    fn kind_of(&self, node: Node) -> String {
        let name = node.tag_name().name();
        let name = name.rsplit(':').next().unwrap_or(name);
        if self.options.parse_as == ParseAs::Html && !self.factory.has_kind(name) {
            return name.to_lowercase();
        }
        name.to_string()
    }

    /// Compile the `<math>` element `root`
    pub fn compile(&self, root: Node, display: bool, entities: &EntityTable, can_load: bool) -> Result<MmlTree> {
        let mut cx = Context {
            options: &self.options,
            entities,
            can_load,
            tree: MmlTree::new(self.factory.clone()),
        };
        let math = self.make_node(&mut cx, root)?;
        cx.tree.set_root(math);
        if display && cx.tree[math].attributes.get_explicit("display").is_none() {
            cx.tree[math].attributes.set("display", "block");
        }
        cx.verify_tree(math);
        cx.tree.inherit_attributes(math);
        cx.tree.walk_tree(math, &mut mark_mrow);
        debug!("compiled {} nodes", cx.tree.len());
        Ok(cx.tree)
    }

    fn make_node(&self, cx: &mut Context, node: Node) -> Result<NodeId> {
        let mut kind = self.kind_of(node);
        let mut tex_class = None;
        let mut limits = false;
        for name in node.attribute("class").unwrap_or("").split_whitespace() {
            if let Some(class) = name.strip_prefix("MJX-TeXAtom-") {
                if kind == "mrow" {
                    tex_class = TexClass::from_name(class);
                    kind = "TeXAtom".to_string();
                }
            } else if name == "MJX-fixedlimits" {
                limits = true;
            }
        }
        if !self.factory.has_kind(&kind) {
            return Err(CompileError::UnknownNodeKind(kind).into());
        }
        let id = cx.tree.create(&kind);
        if kind == "TeXAtom" && tex_class == Some(TexClass::Op) && !limits {
            cx.tree[id].set_property("movesupsub", true);
            cx.tree[id].attributes.set_inherited("movablelimits", true);
        }
        if let Some(class) = tex_class {
            cx.tree[id].tex_class = Some(class);
            cx.tree[id].set_property("texClass", class.name());
        }
        self.add_attributes(cx, id, node);
        check_class(cx, id, node);
        self.add_children(cx, id, node)?;
        Ok(id)
    }

    fn add_attributes(&self, cx: &mut Context, id: NodeId, node: Node) {
        let mut ignore_variant = false;
        let html = self.options.parse_as == ParseAs::Html;
        for attr in node.attributes() {
            let name = if html { attr.name().to_lowercase() } else { attr.name().to_string() };
            let value = attr.value();
            if name == "xmlns" || name == "class" {
                continue;
            }
            let mml = &mut cx.tree[id];
            if let Some(key) = name.strip_prefix("data-mjx-") {
                match key {
                    "alternate"    => mml.set_property("variantForm", true),
                    "variant"      => {
                        mml.attributes.set("mathvariant", value);
                        ignore_variant = true;
                    },
                    "smallmatrix"  => {
                        mml.set_property("scriptlevel", 1i64);
                        mml.set_property("useHeight", false);
                    },
                    "accent"       => mml.set_property("mathaccent", value == "true"),
                    "auto-op"      => mml.set_property("autoOP", value == "true"),
                    "script-align" => mml.set_property("scriptalign", value),
                    _              => mml.attributes.set(name.as_str(), value),
                }
                continue;
            }
            match value.to_lowercase().as_str() {
                "true"  => mml.attributes.set(name, true),
                "false" => mml.attributes.set(name, false),
                _ if ignore_variant && name == "mathvariant" => (),
                _ => mml.attributes.set(name, value),
            }
        }
    }

    fn add_children(&self, cx: &mut Context, id: NodeId, node: Node) -> Result<()> {
        let is_token = cx.tree[id].is_token();
        if !is_token && cx.tree[id].arity() == Arity::Fixed(0) {
            return Ok(());
        }
        let is_xml = cx.tree.is_kind(id, "annotation-xml");
        for child in node.children() {
            if child.is_text() {
                add_text(cx, id, child.text().unwrap_or_default())?;
            } else if child.is_element() && is_xml {
                debug!("Dropping <{}> inside annotation-xml", child.tag_name().name());
            } else if child.is_element() {
                let mml = self.make_node(cx, child)?;
                cx.tree.append_child(id, mml);
                let empty = !cx.tree[mml].is_token() && cx.tree[mml].arity() == Arity::Fixed(0);
                if empty && child.children().any(|c| c.is_element() || c.is_text()) {
                    if self.options.fix_misplaced_children {
                        self.add_children(cx, id, child)?;
                    } else {
                        let message = format!("There should not be children for {} nodes", cx.tree.kind(mml));
                        cx.merror(mml, &message, true);
                    }
                }
            }
        }
        Ok(())
    }
}

fn add_text(cx: &mut Context, id: NodeId, text: &str) -> Result<()> {
    let node = &cx.tree[id];
    if node.is_token() {
        let text = if cx.options.translate_entities {
            cx.entities.translate(text, cx.can_load).map_err(Error::Retry)?
        } else {
            text.to_string()
        };
        cx.tree.append_text(id, &trim_space(&text));
    } else if !text.trim().is_empty() {
        return Err(CompileError::UnexpectedText {
            kind: node.kind().to_string(),
            text: text.to_string(),
        }.into());
    }
    Ok(())
}

/// Classes starting with `MJX-` carry variants; the others are kept as the `class` attribute
fn check_class(cx: &mut Context, id: NodeId, node: Node) {
    let mut classes = Vec::new();
    for name in node.attribute("class").unwrap_or("").split_whitespace() {
        match name.strip_prefix("MJX-") {
            Some("variant") => cx.tree[id].set_property("variantForm", true),
            Some("fixedlimits") => (),
            Some(variant) if !variant.starts_with("TeXAtom") => {
                let variant = format!("-{}", variant.replace("caligraphic", "calligraphic"));
                cx.tree[id].attributes.set("mathvariant", variant);
            },
            Some(_) => (),
            None => classes.push(name),
        }
    }
    if !classes.is_empty() {
        cx.tree[id].attributes.set("class", classes.join(" "));
    }
}

/// Collapse runs of white space and trim the ends
fn trim_space(text: &str) -> String {
    text.split(|c: char| c == ' ' || c == '\t' || c == '\n' || c == '\r')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Note the delimiters of a row bracketed by stretchy fences
fn mark_mrow(tree: &mut MmlTree, id: NodeId) {
    if tree[id].role() != Role::Row || tree.children(id).len() < 2 {
        return;
    }
    let children = tree.children(id);
    let (first, last) = (children[0], children[children.len() - 1]);
    let is_fence = |tree: &MmlTree, op: NodeId| {
        tree.is_kind(op, "mo")
            && tree[op].attributes.get_bool("fence")
            && tree[op].attributes.get_bool("stretchy")
    };
    if is_fence(tree, first) && is_fence(tree, last) {
        let open = tree.get_text(first);
        let close = tree.get_text(last);
        if !open.is_empty() {
            tree[id].set_property("open", open);
        }
        if !close.is_empty() {
            tree[id].set_property("close", close);
        }
    }
}

/// Attribute names every element accepts
fn is_global_attribute(name: &str) -> bool {
    matches!(name, "class" | "style" | "id" | "href" | "xlink:href") || name.starts_with("data-")
}

impl<'a> Context<'a> {
    fn merror(&mut self, id: NodeId, message: &str, short: bool) -> Option<NodeId> {
        let full = self.options.verify.full_errors;
        self.tree.merror(id, message, full, short)
    }

    fn verify_tree(&mut self, id: NodeId) {
        if self.options.verify.check_attributes {
            self.verify_attributes(id);
        }
        match self.tree[id].role() {
            Role::Table => self.verify_table(id),
            Role::TableRow | Role::LabeledRow => self.verify_row(id),
            Role::Multiscripts => self.verify_multiscripts(id),
            _ => (),
        }
        self.verify_children(id);
    }

    fn verify_attributes(&mut self, id: NodeId) {
        let attributes = &self.tree[id].attributes;
        let bad: Vec<String> = attributes.get_all_attributes().keys()
            .filter(|name| !is_global_attribute(name) && !attributes.is_known(name))
            .cloned()
            .collect();
        if !bad.is_empty() {
            let error = CompileError::UnknownAttributes { kind: self.tree.kind(id).to_string(), names: bad };
            self.merror(id, &error.to_string(), false);
        }
    }

    fn verify_children(&mut self, id: NodeId) {
        let node = &self.tree[id];
        if self.options.verify.check_arity && !node.is_token() {
            if let Arity::Fixed(arity) = node.arity() {
                let found = node.children().len();
                if (arity == 1 && found == 0) || (arity != 1 && found != arity) {
                    let error = CompileError::WrongChildCount {
                        kind: node.kind().to_string(),
                        expected: arity,
                        found,
                    };
                    self.merror(id, &error.to_string(), true);
                    return;
                }
            }
        }
        for child in self.tree.children(id).to_vec() {
            self.verify_tree(child);
        }
    }

    /// Put table content that is not in a row into one
    fn verify_table(&mut self, id: NodeId) {
        let fix = self.options.verify.fix_mtables;
        let mut row: Option<NodeId> = None;
        for child in self.tree.children(id).to_vec() {
            if self.tree.is_kind(child, "mtr") {
                row = None;
                continue;
            }
            let target = match row {
                Some(row) => {
                    self.tree.remove_child(id, child);
                    row
                },
                None => {
                    let new = self.tree.create("mtr");
                    self.tree.replace_child(id, new, child);
                    row = Some(new);
                    new
                },
            };
            let is_cell = self.tree.is_kind(child, "mtd");
            let cell = if is_cell { child } else { self.tree.create("mtd") };
            if !is_cell {
                self.tree.append_child(cell, child);
            }
            self.tree.append_child(target, cell);
            if !fix {
                let error = CompileError::MisplacedChild {
                    kind: "mtr or mlabeledtr".to_string(),
                    parent: self.tree.kind(id).to_string(),
                };
                self.merror(child, &error.to_string(), is_cell);
            }
        }
    }

    /// Put row content that is not in a cell into one
    fn verify_row(&mut self, id: NodeId) {
        for child in self.tree.children(id).to_vec() {
            if self.tree.is_kind(child, "mtd") {
                continue;
            }
            let cell = self.tree.create("mtd");
            self.tree.replace_child(id, cell, child);
            self.tree.append_child(cell, child);
            if !self.options.verify.fix_mtables {
                let error = CompileError::MisplacedChild {
                    kind: "mtd".to_string(),
                    parent: self.tree.kind(id).to_string(),
                };
                self.merror(child, &error.to_string(), false);
            }
        }
    }

    /// Report a second `mprescripts`; pad the scripts when they are not fixed during inheritance
    fn verify_multiscripts(&mut self, id: NodeId) {
        let fix = self.options.verify.fix_mmultiscripts;
        let mut prescripts = false;
        let mut i = 0;
        while let Some(child) = self.tree.child(id, i) {
            if self.tree.is_kind(child, "mprescripts") {
                if prescripts {
                    let message = format!("mprescripts can only appear once in {}", self.tree.kind(id));
                    self.merror(child, &message, true);
                } else {
                    prescripts = true;
                    if i % 2 == 0 && !fix {
                        let row = self.tree.create("mrow");
                        self.tree.insert_child(id, i, row);
                        i += 1;
                    }
                }
            }
            i += 1;
        }
        let odd = if prescripts { 1 } else { 0 };
        if self.tree.children(id).len() % 2 == odd && !fix {
            let row = self.tree.create("mrow");
            self.tree.append_child(id, row);
        }
    }
}

impl MmlTree {
    /// Replace `id` by an `merror` node. With `full` errors or a `short` error the `merror` shows
    /// the message (or the node's kind); otherwise it wraps the node itself.
    /// Nothing happens to nodes already inside an `merror`.
    pub fn merror(&mut self, id: NodeId, message: &str, full: bool, short: bool) -> Option<NodeId> {
        let parent = self.parent(id)?;
        if self.real_parent(id).map_or(false, |p| self.is_kind(p, "merror")) {
            return None;
        }
        warn!("{}", message);
        let merror = self.create("merror");
        self[merror].attributes.set("data-mjx-message", message);
        self.replace_child(parent, merror, id)?;
        if full || short {
            let text = if full { message } else { self.kind(id) };
            let mtext = self.create_token("mtext", text);
            self.append_child(merror, mtext);
        } else {
            self.append_child(merror, id);
        }
        Some(merror)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceRequest;
    use crate::tree::attributes::Value;
    use crate::tree::tex_class::TexClass;

    fn compile_with(options: MathMlOptions, text: &str) -> Result<MmlTree> {
        let mathml = MathMl::new(options, Rc::new(MmlFactory::standard()));
        mathml.compile(text, false, &Rc::new(EntityTable::new()), false)
    }

    fn compile(text: &str) -> MmlTree {
        compile_with(MathMlOptions::default(), text).unwrap()
    }

    fn content(tree: &MmlTree) -> Vec<NodeId> {
        tree.content(tree.root().unwrap()).to_vec()
    }

    #[test]
    fn fraction_levels() {
        let tree = compile("<math><mfrac><mn>1</mn><mn>2</mn></mfrac></math>");
        let frac = content(&tree)[0];
        assert_eq!(tree.kind(frac), "mfrac");
        for &child in tree.children(frac) {
            assert_eq!(tree.kind(child), "mn");
            assert_eq!(tree.scriptlevel(child), 1);
            assert!(!tree[child].attributes.get_bool("displaystyle"));
        }
    }

    #[test]
    fn subscript_prime_style() {
        let tree = compile("<math><msub><mi>x</mi><mn>2</mn></msub></math>");
        let msub = content(&tree)[0];
        let sub = tree.children(msub)[1];
        assert_eq!(tree.scriptlevel(sub), 1);
        assert_eq!(tree[sub].property("texprimestyle"), Some(&Value::Bool(true)));
    }

    #[test]
    fn unknown_operator_gets_block_class() {
        let tree = compile("<math><mo>@</mo></math>");
        let mo = content(&tree)[0];
        assert_eq!(tree[mo].tex_class, Some(TexClass::Rel));
    }

    #[test]
    fn attributes_and_text() {
        let tree = compile("<math display=\"block\"><mi mathvariant=\"bold\">  x \n </mi><mo stretchy=\"TRUE\">|</mo></math>");
        let root = tree.root().unwrap();
        assert_eq!(tree[root].attributes.get_str("display"), "block");
        let children = content(&tree);
        assert_eq!(tree[children[0]].text(), "x");
        assert_eq!(tree[children[0]].attributes.get_str("mathvariant"), "bold");
        assert_eq!(tree[children[1]].attributes.get_explicit("stretchy"), Some(&Value::Bool(true)));
    }

    #[test]
    fn display_flag_sets_block() {
        let mathml = MathMl::new(MathMlOptions::default(), Rc::new(MmlFactory::standard()));
        let tree = mathml.compile("<math><mi>x</mi></math>", true, &Rc::new(EntityTable::new()), false).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree[root].attributes.get_str("display"), "block");
        assert!(tree[root].attributes.get_bool("displaystyle"));
    }

    #[test]
    fn texatom_classes() {
        let tree = compile("<math><mrow class=\"MJX-TeXAtom-OP\"><mi>lim</mi></mrow>\
                            <mrow class=\"MJX-TeXAtom-REL other\"><mo>x</mo></mrow></math>");
        let children = content(&tree);
        assert_eq!(tree.kind(children[0]), "TeXAtom");
        assert_eq!(tree[children[0]].tex_class, Some(TexClass::Op));
        assert_eq!(tree[children[0]].property("movesupsub"), Some(&Value::Bool(true)));
        assert_eq!(tree[children[1]].property("texClass"), Some(&Value::str("REL")));
        assert_eq!(tree[children[1]].attributes.get_str("class"), "other");
    }

    #[test]
    fn variant_classes_and_data_attributes() {
        let tree = compile("<math><mi class=\"MJX-caligraphic\">A</mi>\
                            <mi data-mjx-variant=\"bold\" mathvariant=\"italic\">B</mi>\
                            <mi data-mjx-alternate=\"1\">C</mi></math>");
        let children = content(&tree);
        assert_eq!(tree[children[0]].attributes.get_str("mathvariant"), "-calligraphic");
        assert_eq!(tree[children[1]].attributes.get_str("mathvariant"), "bold");
        assert_eq!(tree[children[2]].property("variantForm"), Some(&Value::Bool(true)));
    }

    #[test]
    fn hard_errors() {
        let err = compile_with(MathMlOptions::default(), "<math><mfoo/></math>").unwrap_err();
        assert!(matches!(err, Error::Compile(CompileError::UnknownNodeKind(ref kind)) if kind == "mfoo"));

        let err = compile_with(MathMlOptions::default(), "<math><mrow>x</mrow></math>").unwrap_err();
        assert!(matches!(err, Error::Compile(CompileError::UnexpectedText { .. })));

        let err = compile_with(MathMlOptions::default(), "<mrow><mi>x</mi></mrow>").unwrap_err();
        assert!(matches!(err, Error::Compile(CompileError::NotMath(ref kind)) if kind == "mrow"));

        let err = compile_with(MathMlOptions::default(), "<math><mi>x</mi>").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));

        let err = compile_with(MathMlOptions::default(), "  ").unwrap_err();
        assert!(matches!(err, Error::Compile(CompileError::Empty)));
    }

    #[test]
    fn wrong_arity_becomes_merror() {
        let tree = compile("<math><mfrac><mn>1</mn><mn>2</mn><mn>3</mn></mfrac></math>");
        let merror = content(&tree)[0];
        assert_eq!(tree.kind(merror), "merror");
        let mtext = tree.content(merror)[0];
        assert_eq!(tree[mtext].text(), "mfrac");
        assert_eq!(tree[merror].attributes.get_str("data-mjx-message"),
                   "Wrong number of children for \"mfrac\" node: expected 2, found 3");

        let mut options = MathMlOptions::default();
        options.verify.full_errors = true;
        let tree = compile_with(options, "<math><msub><mi>x</mi></msub></math>").unwrap();
        let mtext = tree.content(content(&tree)[0])[0];
        assert!(tree[mtext].text().starts_with("Wrong number of children for \"msub\""));
    }

    #[test]
    fn arity_is_enforced_when_unchecked() {
        let mut options = MathMlOptions::default();
        options.verify.check_arity = false;
        let source = "<math><msub><mi>x</mi><mn>1</mn><mn>2</mn></msub></math>";
        let first = compile_with(options.clone(), source).unwrap();
        let second = compile_with(options, source).unwrap();
        let msub = content(&first)[0];
        assert_eq!(first.children(msub).len(), 2);
        assert_eq!(first.serialize(first.root().unwrap()), second.serialize(second.root().unwrap()));
    }

    #[test]
    fn unknown_attributes() {
        let mut options = MathMlOptions::default();
        options.verify.check_attributes = true;
        let tree = compile_with(options, "<math><mi foo=\"1\" data-x=\"2\" id=\"a\">x</mi></math>").unwrap();
        let merror = content(&tree)[0];
        assert_eq!(tree.kind(merror), "merror");
        let mi = tree.content(merror)[0];
        assert_eq!(tree.kind(mi), "mi");
        assert_eq!(tree[merror].attributes.get_str("data-mjx-message"), "Unknown attributes for mi node: foo");
    }

    #[test]
    fn misplaced_children_move_up() {
        let tree = compile("<math><none><mi>x</mi></none></math>");
        let kinds: Vec<_> = content(&tree).iter().map(|&c| tree.kind(c)).collect();
        assert_eq!(kinds, vec!["none", "mi"]);

        let mut options = MathMlOptions::default();
        options.fix_misplaced_children = false;
        let tree = compile_with(options, "<math><mprescripts><mi>x</mi></mprescripts></math>").unwrap();
        assert_eq!(tree.kind(content(&tree)[0]), "merror");
    }

    #[test]
    fn table_content_is_wrapped() {
        let tree = compile("<math><mtable><mi>x</mi><mtd><mn>1</mn></mtd><mtr><mi>y</mi></mtr></mtable></math>");
        let table = content(&tree)[0];
        let rows = tree.children(table).to_vec();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|&r| tree.kind(r) == "mtr"));
        let cells = tree.children(rows[0]);
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|&c| tree.kind(c) == "mtd"));
        assert_eq!(tree.kind(tree.children(rows[1])[0]), "mtd");
    }

    #[test]
    fn fenced_rows_are_marked() {
        let tree = compile("<math><mrow><mo>(</mo><mi>x</mi><mo>)</mo></mrow>\
                            <mrow><mo>+</mo><mi>x</mi><mo>-</mo></mrow></math>");
        let rows = content(&tree);
        assert_eq!(tree[rows[0]].property("open"), Some(&Value::str("(")));
        assert_eq!(tree[rows[0]].property("close"), Some(&Value::str(")")));
        assert!(tree[rows[1]].property("open").is_none());
    }

    #[test]
    fn entities() {
        let tree = compile("<math><mi>&alpha;</mi><mo>&lt;</mo><mi>&#x3B2;</mi></math>");
        let texts: Vec<_> = content(&tree).iter().map(|&c| tree[c].text().to_string()).collect();
        assert_eq!(texts, vec!["\u{03B1}", "<", "\u{03B2}"]);

        let mathml = MathMl::new(MathMlOptions::default(), Rc::new(MmlFactory::standard()));
        let err = mathml.compile("<math><mi>&Zopf;</mi></math>", false, &Rc::new(EntityTable::new()), true).unwrap_err();
        assert!(matches!(err, Error::Retry(ResourceRequest::Entities('Z'))));
    }

    #[test]
    fn html_names_are_case_insensitive() {
        let tree = compile("<MATH><MI MathVariant=\"bold\">x</MI></MATH>");
        let mi = content(&tree)[0];
        assert_eq!(tree.kind(mi), "mi");
        assert_eq!(tree[mi].attributes.get_str("mathvariant"), "bold");

        let options = MathMlOptions { parse_as: ParseAs::Xml, ..MathMlOptions::default() };
        assert!(compile_with(options, "<math><MI>x</MI></math>").is_err());
    }

    #[test]
    fn filters_run() {
        let mut mathml = MathMl::new(MathMlOptions::default(), Rc::new(MmlFactory::standard()));
        mathml.pre_filters.push(|source: &mut MathSource| {
            source.text = source.text.replace("y", "z");
        });
        mathml.mml_filters.push(|tree: &mut MmlTree| {
            let root = tree.root().unwrap();
            tree[root].set_property("filtered", true);
        });
        let tree = mathml.compile("<math><mi>y</mi></math>", false, &Rc::new(EntityTable::new()), false).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree[tree.content(root)[0]].text(), "z");
        assert_eq!(tree[root].property("filtered"), Some(&Value::Bool(true)));
    }

    #[test]
    fn annotation_xml_content_is_dropped() {
        let tree = compile_with(
            MathMlOptions::default(),
            "<math><semantics><mi>x</mi><annotation-xml encoding=\"MathML-Content\"><ci>x</ci></annotation-xml></semantics></math>",
        ).unwrap();
        let root = tree.root().unwrap();
        let kinds: Vec<_> = tree.descendants(root).into_iter().map(|id| tree.kind(id)).collect();
        assert!(kinds.contains(&"annotation-xml"));
        assert!(!kinds.contains(&"ci"));
        assert!(!kinds.contains(&"merror"));
    }

    #[test]
    fn error_tree() {
        let mathml = MathMl::new(MathMlOptions::default(), Rc::new(MmlFactory::standard()));
        let tree = mathml.format_error("bad thing\nsecond line");
        let root = tree.root().unwrap();
        let merror = tree.content(root)[0];
        assert_eq!(tree[merror].attributes.get_str("data-mjx-error"), "bad thing");
        assert_eq!(tree.get_text(merror), "bad thing");
    }

    #[test]
    fn options_round_trip_through_json() {
        let defaults = MathMlOptions::defaults();
        assert!(defaults.contains_key("parseAs"));
        assert!(defaults.sublist("verify").map_or(false, |v| v.contains_key("checkArity")));
        let options: MathMlOptions = defaults.typed().unwrap();
        assert_eq!(options, MathMlOptions::default());
    }
}
