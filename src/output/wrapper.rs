//! The wrapper tree: the output-side twin of the MathML tree.
//!
//! Every displayed node gets a [`Wrapper`] holding its bounding box, its scale and spacing, its
//! font variant and, for stretchy operators, the size it was stretched to. Wrappers live in an
//! arena owned by a [`WrapperTree`] and point back to the [`NodeId`] they display. Boxes are
//! computed bottom-up on first use and cached until [`WrapperTree::invalidate_bbox`] drops them
//! (for the wrapper and every ancestor).
//!
//! Wrapping happens top-down: a wrapper knows its scale and its spacing before its children are
//! wrapped, and stretchy children are sized as soon as all their siblings exist. The rules
//! specific to each kind of node live in [`wrappers`](super::wrappers).

use std::collections::{BTreeSet, HashMap};
use std::ops::{Index, IndexMut};

use crate::lengths::{self, em, percent};
use crate::tree::{MmlNode, MmlTree, NodeId};
use crate::tree::attributes::Value;
use crate::tree::classes::Role;
use crate::tree::tex_class::TexClass;
use super::bbox::BBox;
use super::chtml::{ChtmlOptions, Metrics};
use super::font::{CharData, Delimiter, Direction, FontData, TexParams, VariantData};
use super::html::Element;

/// Index of a wrapper in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WrapperId(usize);

impl WrapperId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Size picked for a stretchy operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StretchSize {
    /// Ready-made version `i` of the character
    Fixed(usize),
    /// Built from the delimiter's pieces, with the given dimensions
    Assembled { h: f64, d: f64, w: f64 },
}

impl StretchSize {
    /// Ordering key: ready-made versions by index, assemblies after all of them
    pub fn rank(self) -> usize {
        match self {
            StretchSize::Fixed(i)         => i,
            StretchSize::Assembled { .. } => usize::MAX,
        }
    }
}

/// Output data of one displayed node
#[derive(Debug, Clone)]
pub struct Wrapper {
    pub node:     NodeId,
    pub parent:   Option<WrapperId>,
    pub children: Vec<WrapperId>,
    /// Character shown by a wrapper standing for an operator the tree does not hold
    /// (the surd of a root, the slash of a bevelled fraction)
    pub glyph:    Option<char>,
    /// The wrapper of such an operator, on the node drawing it
    pub aux:      Option<WrapperId>,
    pub variant:  Option<&'static VariantData>,
    /// How the operator stretches, once it is known that it does
    pub stretch:  Option<&'static Delimiter>,
    pub size:     Option<StretchSize>,
    /// A percentage width resolved against the container, in em
    pub resolved_width: Option<f64>,
    pub bbox:     BBox,
    computed:     bool,
}

impl Wrapper {
    fn new(node: NodeId, parent: Option<WrapperId>) -> Self {
        Wrapper {
            node,
            parent,
            children: Vec::new(),
            glyph: None,
            aux: None,
            variant: None,
            stretch: None,
            size: None,
            resolved_width: None,
            bbox: BBox::empty(),
            computed: false,
        }
    }
}

/// Named spaces given as attributes rather than margins
const SPACE_NAMES: [(f64, &str); 5] = [
    (2. / 18., "1"), (3. / 18., "2"), (4. / 18., "3"), (5. / 18., "4"), (6. / 18., "5"),
];

/// Operators displayed with another character
fn remap_operator(c: char) -> char {
    match c {
        '-'  => '\u{2212}',
        '*'  => '\u{2217}',
        '\'' => '\u{2032}',
        '`'  => '\u{2035}',
        c    => c,
    }
}

/// Spacing of operators in scripts when the operator dictionary spacing is used
fn mathml_space(in_script: bool, size: f64) -> f64 {
    const SMALLSIZE: f64 = 2. / 18.;
    if !in_script {
        size
    } else if size < SMALLSIZE {
        0.
    } else {
        SMALLSIZE
    }
}

/// The wrappers of one expression
pub struct WrapperTree<'a, F: FontData> {
    pub mml:     &'a MmlTree,
    pub font:    &'a F,
    pub options: &'a ChtmlOptions,
    pub metrics: Metrics,
    wrappers:    Vec<Wrapper>,
    node_map:    HashMap<NodeId, WrapperId>,
    /// Characters drawn so far, with the variant they were found in
    pub used:    BTreeSet<(&'static str, char)>,
    /// Kinds of the elements created so far
    pub kinds:   BTreeSet<String>,
}

impl<'a, F: FontData> Index<WrapperId> for WrapperTree<'a, F> {
    type Output = Wrapper;
    fn index(&self, id: WrapperId) -> &Wrapper {
        &self.wrappers[id.0]
    }
}

impl<'a, F: FontData> IndexMut<WrapperId> for WrapperTree<'a, F> {
    fn index_mut(&mut self, id: WrapperId) -> &mut Wrapper {
        &mut self.wrappers[id.0]
    }
}

impl<'a, F: FontData> WrapperTree<'a, F> {
    pub fn new(mml: &'a MmlTree, font: &'a F, options: &'a ChtmlOptions, metrics: Metrics) -> Self {
        WrapperTree {
            mml,
            font,
            options,
            metrics,
            wrappers: Vec::new(),
            node_map: HashMap::new(),
            used:     BTreeSet::new(),
            kinds:    BTreeSet::new(),
        }
    }

    /// Wrap the subtree at `root`
    pub fn wrap(&mut self, root: NodeId) -> WrapperId {
        self.wrap_node(root, None)
    }

    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// The wrapper displaying `node`, if it has one
    pub fn wrapper_for(&self, node: NodeId) -> Option<WrapperId> {
        self.node_map.get(&node).copied()
    }

    pub fn node(&self, id: WrapperId) -> &'a MmlNode {
        let mml: &'a MmlTree = self.mml;
        &mml[self[id].node]
    }

    /// Role of the wrapper; operators standing in for the tree have the operator role
    pub fn role(&self, id: WrapperId) -> Role {
        if self[id].glyph.is_some() {
            Role::Operator
        } else {
            self.node(id).role()
        }
    }

    pub fn children(&self, id: WrapperId) -> Vec<WrapperId> {
        self[id].children.clone()
    }

    pub fn child(&self, id: WrapperId, index: usize) -> Option<WrapperId> {
        self[id].children.get(index).copied()
    }

    pub fn params(&self) -> &'a TexParams {
        let font: &'a F = self.font;
        font.params()
    }

    /// Convert a length attribute to em, in the wrapper's own font size
    pub fn length2em(&self, id: WrapperId, length: &str, size: f64) -> f64 {
        self.length2em_scaled(length, size, self[id].bbox.scale)
    }

    pub fn length2em_scaled(&self, length: &str, size: f64, scale: f64) -> f64 {
        lengths::length2em(length, size, scale, self.metrics.em * self.metrics.scale)
    }

    /// Resolved attribute of a wrapper's node, as a string (empty for synthetic operators)
    pub fn attr_str(&self, id: WrapperId, name: &str) -> String {
        if self[id].glyph.is_some() {
            return String::new();
        }
        self.node(id).attributes.get_str(name)
    }

    pub fn attr_bool(&self, id: WrapperId, name: &str) -> bool {
        self[id].glyph.is_none() && self.node(id).attributes.get_bool(name)
    }

    pub fn property_bool(&self, id: WrapperId, name: &str) -> bool {
        self[id].glyph.is_none() && self.node(id).property(name).map_or(false, Value::as_bool)
    }

    pub fn is_display(&self, id: WrapperId) -> bool {
        self.attr_bool(id, "displaystyle")
    }


    // ------------------------- CONSTRUCTION --------------------------------

    fn wrap_node(&mut self, node: NodeId, parent: Option<WrapperId>) -> WrapperId {
        let id = WrapperId(self.wrappers.len());
        self.wrappers.push(Wrapper::new(node, parent));
        self.node_map.insert(node, id);
        self.get_scale(id);
        self.get_space(id);
        self.get_variant(id);

        let mml = self.mml;
        let role = mml[node].role();
        let child_nodes = match role {
            Role::Fenced => fenced_children(mml, node),
            _ => mml.children(node).to_vec(),
        };
        let children = child_nodes.into_iter().map(|child| self.wrap_node(child, Some(id))).collect();
        self[id].children = children;

        let glyph = match role {
            Role::Sqrt | Role::Root => Some('\u{221A}'),
            Role::Fraction if mml[node].attributes.get_bool("bevelled") => Some('/'),
            Role::Enclose if self.has_notation(id, "radical") => Some('\u{221A}'),
            _ => None,
        };
        if let Some(c) = glyph {
            let aux = self.glyph_wrapper(id, c);
            self[id].aux = Some(aux);
        }

        match role {
            Role::Row | Role::InferredRow | Role::Fenced => self.stretch_children(id),
            Role::UnderOver { .. } => self.stretch_children_horizontally(id),
            Role::Sqrt | Role::Root | Role::Enclose => self.stretch_surd(id),
            Role::Fraction => self.stretch_bevel(id),
            _ => {},
        }
        trace!("wrapped {} as {:?}", mml[node].kind(), id);
        id
    }

    /// A wrapper for an operator drawn by `parent` but absent from the tree
    fn glyph_wrapper(&mut self, parent: WrapperId, c: char) -> WrapperId {
        let id = WrapperId(self.wrappers.len());
        let mut wrapper = Wrapper::new(self[parent].node, Some(parent));
        wrapper.glyph = Some(c);
        wrapper.variant = self.font.variant("normal");
        wrapper.bbox.scale = self[parent].bbox.scale;
        self.wrappers.push(wrapper);
        id
    }

    /// Font size relative to the top level: script level, minimum script size and `mathsize`
    fn get_scale(&mut self, id: WrapperId) {
        let node = self.node(id);
        let attributes = &node.attributes;
        let pscale = self[id].parent.map_or(1., |p| self[p].bbox.scale);
        let level = attributes.get_number("scriptlevel").unwrap_or(0.).min(2.);
        let mut scale = 1.;
        if level != 0. {
            let multiplier = attributes.get_number("scriptsizemultiplier")
                .unwrap_or(std::f64::consts::FRAC_1_SQRT_2);
            scale = multiplier.powf(level);
            let min = self.length2em_scaled(&attributes.get_str("scriptminsize"), 0.8, 1.);
            if scale < min {
                scale = min;
            }
        }
        let mathsize = if node.is_token() || node.role() == Role::Style {
            attributes.get("mathsize")
        } else {
            attributes.get_inherited("mathsize")
        };
        let mathsize = mathsize.map(|v| v.as_str().into_owned()).unwrap_or_default();
        if !mathsize.is_empty() && mathsize != "1" {
            scale *= self.length2em_scaled(&mathsize, 1., 1.);
        }
        if !scale.is_finite() || scale <= 0. {
            warn!("Font scale {} out of range for <{}>, using the parent's", scale, node.kind());
            scale = pscale;
        }
        let bbox = &mut self[id].bbox;
        bbox.scale = scale;
        bbox.rscale = scale / pscale;
    }

    /// Space around the wrapper: TeX spacing between atoms, or the operator's own `lspace` and
    /// `rspace` when they are set (or when MathML spacing is asked for)
    fn get_space(&mut self, id: WrapperId) {
        let mml = self.mml;
        let node = self[id].node;
        let embellished = mml.is_embellished(node);
        let is_top = embellished
            && !mml.parent(node).map_or(false, |p| mml.is_embellished(p));
        let core = mml.core_mo(node);
        let has_spacing = embellished && mml[core].role() == Role::Operator && {
            let attributes = &mml[core].attributes;
            attributes.is_set("lspace") || attributes.is_set("rspace")
        };
        if self.options.mathml_spacing || has_spacing {
            if is_top {
                self.get_mathml_spacing(id);
            }
            return;
        }
        let space = mml.tex_spacing(node);
        if !space.is_empty() {
            self[id].bbox.l = self.length2em(id, space, 0.);
        }
    }

    fn get_mathml_spacing(&mut self, id: WrapperId) {
        let mml = self.mml;
        let node = self[id].node;
        let core = mml.core_mo(node);
        let Some(parent) = mml.parent(node) else { return };
        if !matches!(mml[parent].role(), Role::Row | Role::InferredRow) || mml.children(parent).len() == 1 {
            return;
        }
        let attributes = &mml[core].attributes;
        let in_script = attributes.get_number("scriptlevel").unwrap_or(0.) > 0.;
        let space = |name: &str, dictionary: f64| {
            if attributes.is_set(name) {
                self.length2em(id, &attributes.get_str(name), 0.).max(0.)
            } else {
                mathml_space(in_script, dictionary)
            }
        };
        let l = space("lspace", mml[core].lspace);
        let r = space("rspace", mml[core].rspace);
        let bbox = &mut self[id].bbox;
        bbox.l = l;
        bbox.r = r;

        let Some(n) = mml.child_index(parent, node) else { return };
        if n == 0 {
            return;
        }
        let prev = mml.children(parent)[n - 1];
        if !mml.is_embellished(prev) {
            return;
        }
        if let Some(prev) = self.wrapper_for(prev) {
            let pr = self[prev].bbox.r;
            if pr != 0. {
                self[id].bbox.l = (self[id].bbox.l - pr).max(0.);
            }
        }
    }

    /// Font variant of a token
    fn get_variant(&mut self, id: WrapperId) {
        let node = self.node(id);
        if !node.is_token() {
            return;
        }
        let attributes = &node.attributes;
        let mut name = attributes.get_str("mathvariant");
        if attributes.get_explicit("mathvariant").is_none() {
            let weight = attributes.get_explicit("fontweight").map(|v| v.as_str().into_owned());
            let style = attributes.get_explicit("fontstyle").map(|v| v.as_str().into_owned());
            if weight.is_some() || style.is_some() {
                let bold = weight.as_deref() == Some("bold");
                let italic = style.as_deref() == Some("italic");
                name = match (bold, italic) {
                    (true, true)   => "bold-italic",
                    (true, false)  => "bold",
                    (false, true)  => "italic",
                    (false, false) => "normal",
                }.to_string();
            }
        }
        if node.role() == Role::Operator && attributes.get_bool("largeop") {
            name = if attributes.get_bool("displaystyle") { "-largeop" } else { "-smallop" }.to_string();
        } else if name == "normal" && node.property("variantForm").map_or(false, Value::as_bool) {
            name = "-tex-variant".to_string();
        }
        self[id].variant = self.font.variant(&name).or_else(|| self.font.variant("normal"));
    }

    /// Name of the wrapper's variant
    pub fn variant_name(&self, id: WrapperId) -> &'static str {
        self[id].variant.map_or("normal", |v| v.name)
    }

    pub(crate) fn has_notation(&self, id: WrapperId, name: &str) -> bool {
        self.node(id).attributes.get_str("notation").split_whitespace().any(|n| n == name)
    }


    // ------------------------- BOUNDING BOXES --------------------------------

    /// Bounding box of a wrapper, computed on first use
    pub fn bbox(&mut self, id: WrapperId) -> BBox {
        if !self[id].computed {
            let mut bbox = self[id].bbox.clone();
            bbox.clear();
            bbox.ic = 0.;
            bbox.sk = 0.;
            bbox.dx = 0.;
            bbox.pwidth = None;
            self.compute_bbox(id, &mut bbox);
            let wrapper = &mut self[id];
            wrapper.bbox = bbox;
            wrapper.computed = true;
        }
        self[id].bbox.clone()
    }

    /// Drop the cached box of the wrapper and of all its ancestors
    pub fn invalidate_bbox(&mut self, id: WrapperId) {
        let mut current = Some(id);
        while let Some(wrapper) = current {
            if !self[wrapper].computed && wrapper != id {
                break;
            }
            self[wrapper].computed = false;
            current = self[wrapper].parent;
        }
    }

    fn compute_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        match self.role(id) {
            Role::Identifier | Role::Number | Role::Text | Role::StringLiteral => self.token_bbox(id, bbox),
            Role::Operator => self.mo_bbox(id, bbox),
            Role::Space => self.mspace_bbox(id, bbox),
            Role::Glyph => self.mglyph_bbox(id, bbox),
            Role::Math | Role::Row | Role::InferredRow | Role::Style | Role::Error | Role::Phantom
            | Role::Fenced | Role::TableCell | Role::TableRow | Role::LabeledRow => self.row_bbox(id, bbox),
            Role::TexAtom => self.texatom_bbox(id, bbox),
            Role::Fraction => self.frac_bbox(id, bbox),
            Role::Sqrt | Role::Root => self.root_bbox(id, bbox),
            Role::Padded => self.padded_bbox(id, bbox),
            Role::Enclose => self.enclose_bbox(id, bbox),
            Role::Action | Role::Semantics => self.shown_child_bbox(id, bbox),
            Role::Scripts { .. } => self.scripts_bbox(id, bbox),
            Role::UnderOver { .. } => self.underover_bbox(id, bbox),
            Role::Multiscripts => self.multiscripts_bbox(id, bbox),
            Role::Table => self.table_bbox(id, bbox),
            Role::Prescripts | Role::NoneNode | Role::AlignGroup | Role::AlignMark | Role::Annotation => bbox.clean(),
        }
    }

    /// Children side by side
    pub(crate) fn row_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        for child in self.children(id) {
            let cbox = self.bbox(child);
            bbox.append(&cbox);
            if cbox.pwidth.is_some() {
                bbox.pwidth = Some("100%".to_string());
            }
        }
        bbox.clean();
    }

    /// The one child shown: the selected one of an `maction`, the first one of a `semantics`
    fn shown_child_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        if let Some(child) = self.shown_child(id) {
            let cbox = self.bbox(child);
            bbox.append(&cbox);
            bbox.pwidth = cbox.pwidth;
        }
        bbox.clean();
    }

    pub(crate) fn shown_child(&self, id: WrapperId) -> Option<WrapperId> {
        match self.role(id) {
            Role::Action => self.mml.selected(self[id].node).and_then(|n| self.wrapper_for(n)),
            _ => self.child(id, 0),
        }
    }

    /// `TeXAtom`: a row, centered on the axis for the `VCENTER` class
    fn texatom_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        self.row_bbox(id, bbox);
        if let Some(child) = self.child(id, 0) {
            bbox.ic = self[child].bbox.ic;
        }
        if self.node(id).tex_class == Some(TexClass::VCenter) {
            let dh = self.vcenter_offset(bbox);
            bbox.set_h(bbox.h() + dh);
            bbox.set_d(bbox.d() - dh);
        }
    }

    pub(crate) fn vcenter_offset(&self, bbox: &BBox) -> f64 {
        bbox.total() / 2. + self.params().axis_height - bbox.h()
    }

    /// Resolve percentage widths below `id` against `width` (in em). Returns whether anything
    /// changed, in which case the boxes above are recomputed on next use.
    pub fn resolve_percent_widths(&mut self, id: WrapperId, width: f64) -> bool {
        let mut changed = false;
        for child in self.children(id) {
            let cbox = self.bbox(child);
            let Some(pwidth) = cbox.pwidth else { continue };
            if self.role(child) == Role::Table {
                let resolved = self.length2em(child, &pwidth, width);
                if self[child].resolved_width != Some(resolved) {
                    self[child].resolved_width = Some(resolved);
                    self.invalidate_bbox(child);
                    changed = true;
                }
            } else if self.resolve_percent_widths(child, width) {
                changed = true;
            }
        }
        changed
    }


    // ------------------------- STRETCHY OPERATORS --------------------------------

    /// The wrapper of the node that determines this one's operator behaviour
    pub fn core(&self, id: WrapperId) -> Option<WrapperId> {
        if self[id].glyph.is_some() {
            return Some(id);
        }
        self.wrapper_for(self.mml.core(self[id].node))
    }

    /// The wrapper of the innermost `mo` of an embellished operator (or of the wrapper itself)
    pub fn core_mo(&self, id: WrapperId) -> WrapperId {
        if self[id].glyph.is_some() {
            return id;
        }
        self.wrapper_for(self.mml.core_mo(self[id].node)).unwrap_or(id)
    }

    /// Can the wrapper (an operator, possibly embellished) stretch in `dir`?
    pub fn can_stretch(&mut self, id: WrapperId, dir: Direction) -> bool {
        if let Some(delim) = self[id].stretch {
            return delim.dir == dir;
        }
        let delim = if self.role(id) == Role::Operator {
            self.operator_delimiter(id)
        } else if self.mml.is_embellished(self[id].node) {
            match self.core(id) {
                Some(core) if core != id && self.can_stretch(core, dir) => self[core].stretch,
                _ => None,
            }
        } else {
            None
        };
        let delim = delim.filter(|d| d.dir == dir);
        self[id].stretch = delim;
        delim.is_some()
    }

    fn operator_delimiter(&self, id: WrapperId) -> Option<&'static Delimiter> {
        if self[id].glyph.is_none() && !self.attr_bool(id, "stretchy") {
            return None;
        }
        let text = self.text(id);
        let mut chars = text.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        self.font.delimiter(c)
    }

    /// Stretch the stretchy children of a row to the height and depth of the others
    fn stretch_children(&mut self, id: WrapperId) {
        let children = self.children(id);
        let stretchy: Vec<WrapperId> = children.iter().copied()
            .filter(|&child| self.can_stretch(child, Direction::Vertical))
            .collect();
        if stretchy.is_empty() || children.len() < 2 {
            return;
        }
        let all = stretchy.len() > 1 && stretchy.len() == children.len();
        let (mut h, mut d) = (0f64, 0f64);
        for &child in &children {
            if all || self[child].stretch.is_none() {
                let cbox = self.bbox(child);
                h = h.max(cbox.h() * cbox.rscale);
                d = d.max(cbox.d() * cbox.rscale);
            }
        }
        for child in stretchy {
            let rscale = self[child].bbox.rscale;
            let mo = self.core_mo(child);
            self.stretch_to(mo, &[h / rscale, d / rscale], false);
            self.invalidate_bbox(child);
        }
    }

    /// Stretch the stretchy children of an under/over construct to the width of the others
    fn stretch_children_horizontally(&mut self, id: WrapperId) {
        let children = self.children(id);
        let stretchy: Vec<WrapperId> = children.iter().copied()
            .filter(|&child| self.can_stretch(child, Direction::Horizontal))
            .collect();
        if stretchy.is_empty() || children.len() < 2 {
            return;
        }
        let all = stretchy.len() > 1 && stretchy.len() == children.len();
        let mut w = 0f64;
        for &child in &children {
            if all || self[child].stretch.is_none() {
                let cbox = self.bbox(child);
                w = w.max(cbox.w * cbox.rscale);
            }
        }
        for child in stretchy {
            let rscale = self[child].bbox.rscale;
            let mo = self.core_mo(child);
            self.stretch_to(mo, &[w / rscale], false);
            self.invalidate_bbox(child);
        }
    }

    /// Pick the version of a stretchy operator covering `target`: `[w]` for horizontal
    /// stretching, `[h, d]` (or a total `[hd]`) for vertical stretching. With `exact`, the TeX
    /// delimiter factor and shortfall are not applied.
    pub fn stretch_to(&mut self, id: WrapperId, target: &[f64], exact: bool) {
        let Some(delim) = self[id].stretch else { return };
        let params = self.params();
        let symmetric = self.attr_bool(id, "symmetric");
        let mut size = self.stretch_target(target, symmetric);
        let min = self.stretch_limit(id, "minsize", 0.);
        let max = self.stretch_limit(id, "maxsize", f64::INFINITY);
        let mathaccent = self.property_bool(id, "mathaccent");
        size = size.min(max).max(min);
        let df = params.delimiterfactor / 1000.;
        let ds = params.delimitershortfall;
        let m = if min != 0. || exact {
            size
        } else if mathaccent {
            (size / df).min(size + ds)
        } else {
            (size * df).max(size - ds)
        };

        let fixed = delim.sizes.iter().position(|&s| s >= m)
            .map(|i| if mathaccent && i > 0 { i - 1 } else { i });
        let chosen = match (fixed, delim.stretch) {
            (Some(i), _) => self.fixed_size(id, i),
            (None, Some(_)) => {
                let (h, d, w) = self.stretch_dimensions(target, size, delim, symmetric);
                StretchSize::Assembled { h, d, w }
            },
            (None, None) => self.fixed_size(id, delim.sizes.len().saturating_sub(1)),
        };
        trace!("stretched {:?} to {:?} for {:?}", self.text(id), chosen, target);
        self[id].size = Some(chosen);
        self.invalidate_bbox(id);
    }

    fn fixed_size(&mut self, id: WrapperId, i: usize) -> StretchSize {
        let font: &'a F = self.font;
        self[id].variant = font.variant(font.size_variant(i));
        StretchSize::Fixed(i)
    }

    /// The single size a target asks for
    fn stretch_target(&self, target: &[f64], symmetric: bool) -> f64 {
        match *target {
            [] => 0.,
            [size] => size,
            [h, d, ..] if symmetric => {
                let a = self.params().axis_height;
                2. * (h - a).max(d + a)
            },
            [h, d, ..] => h + d,
        }
    }

    /// `minsize` or `maxsize`, when set
    fn stretch_limit(&self, id: WrapperId, name: &str, default: f64) -> f64 {
        if self[id].glyph.is_some() || !self.node(id).attributes.is_set(name) {
            return default;
        }
        self.length2em_scaled(&self.attr_str(id, name), 1., 1.)
    }

    /// Height, depth and width of an assembled delimiter of the given size
    fn stretch_dimensions(&self, target: &[f64], size: f64, delim: &Delimiter, symmetric: bool) -> (f64, f64, f64) {
        let size = size.max(delim.min);
        let [h, d, w] = delim.hdw;
        match delim.dir {
            Direction::Vertical => {
                let (h, d) = self.stretch_baseline(target, size, delim, symmetric);
                (h, d, w)
            },
            Direction::Horizontal => (h, d, size),
        }
    }

    /// Split the total size of a vertical delimiter into height and depth
    fn stretch_baseline(&self, target: &[f64], hd: f64, delim: &Delimiter, symmetric: bool) -> (f64, f64) {
        let has_whd = target.len() == 2 && (target[0] + target[1] - hd).abs() < 1e-9;
        let (th, td) = if has_whd { (target[0], target[1]) } else { (hd, 0.) };
        let mut h = th + td;
        let d;
        if symmetric {
            let a = self.params().axis_height;
            if has_whd {
                h = 2. * (th - a).max(td + a);
            }
            d = h / 2. - a;
        } else if has_whd {
            d = td;
        } else {
            let [ch, cd, _] = delim.hdw;
            d = cd * (h / (ch + cd));
        }
        (h - d, d)
    }

    /// Stretch the surd of a root (or of a radical enclosure) to its base
    fn stretch_surd(&mut self, id: WrapperId) {
        let Some(surd) = self[id].aux else { return };
        let Some(base) = self.child(id, 0) else { return };
        if !self.can_stretch(surd, Direction::Vertical) {
            return;
        }
        let bbox = self.bbox(base);
        let surd_h = self.surd_height(id, &bbox);
        self.stretch_to(surd, &[surd_h - bbox.d(), bbox.d()], true);
    }

    /// Height the surd has to cover for a base of the given size
    pub(crate) fn surd_height(&self, id: WrapperId, base: &BBox) -> f64 {
        let params = self.params();
        let t = params.rule_thickness;
        let p = if self.is_display(id) { params.x_height } else { t };
        base.h() + base.d() + 2. * t + p / 4.
    }


    // ------------------------- TEXT --------------------------------

    /// Text displayed by a token wrapper
    pub fn text(&self, id: WrapperId) -> String {
        if let Some(c) = self[id].glyph {
            return c.to_string();
        }
        let node = self.node(id);
        match node.role() {
            Role::Operator => {
                let text = node.text();
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => remap_operator(c).to_string(),
                    _ => text.to_string(),
                }
            },
            Role::StringLiteral => {
                let attributes = &node.attributes;
                let monospace = self.variant_name(id) == "monospace";
                let quote = |name: &str, curly: &str| {
                    let value = attributes.get_str(name);
                    if !monospace && !attributes.is_set(name) && value == "\"" { curly.to_string() } else { value }
                };
                format!("{}{}{}", quote("lquote", "\u{201C}"), node.text(), quote("rquote", "\u{201D}"))
            },
            _ => node.text().to_string(),
        }
    }

    /// Metrics of a character in a variant, guessed when the font lacks it
    pub fn char_data(&self, variant: &str, c: char) -> CharData {
        self.font.char_data(variant, c).map_or_else(|| CharData::unknown(c), |(data, _)| data)
    }

    /// Box of the wrapper's text, character by character
    pub(crate) fn text_bbox(&self, id: WrapperId, bbox: &mut BBox) {
        let variant = self.variant_name(id);
        let text = self.text(id);
        let (mut h, mut d): (Option<f64>, Option<f64>) = (None, None);
        let mut count = 0;
        for c in text.chars() {
            let data = self.char_data(variant, c);
            bbox.w += data.w;
            h = Some(h.map_or(data.h, |h| h.max(data.h)));
            d = Some(d.map_or(data.d, |d| d.max(data.d)));
            bbox.ic = data.ic;
            bbox.sk = data.sk;
            count += 1;
        }
        if count > 1 {
            bbox.sk = 0.;
        }
        bbox.set_h(h.unwrap_or(0.));
        bbox.set_d(d.unwrap_or(0.));
    }

    /// Append the characters of `text` to `element`: font characters as `mjx-c` elements, runs of
    /// unknown characters as text
    pub(crate) fn add_text(&mut self, element: &mut Element, text: &str, variant: &'static str) {
        let mut unknown = String::new();
        for c in text.chars() {
            match self.font.char_data(variant, c) {
                Some((_, found)) => {
                    if !unknown.is_empty() {
                        element.append(self.unknown_text(&unknown, variant));
                        unknown.clear();
                    }
                    element.append(self.char_element(c, found));
                },
                None => unknown.push(c),
            }
        }
        if !unknown.is_empty() {
            element.append(self.unknown_text(&unknown, variant));
        }
    }

    /// An `mjx-c` element showing `c` from `variant`, recorded for the stylesheet
    pub(crate) fn char_element(&mut self, c: char, variant: &'static VariantData) -> Element {
        self.used.insert((variant.name, c));
        let mut element = Element::new("mjx-c").with_attribute("class", char_class(c));
        if let Some(class) = variant.font_class() {
            element.add_class(&class);
        }
        element
    }

    fn unknown_text(&self, text: &str, variant: &str) -> Element {
        let mut element = Element::new("mjx-utext")
            .with_attribute("variant", variant)
            .with_style("padding", format!("{} 0 {} 0", em(0.75), em(0.2)));
        if variant.contains("bold") {
            element.set_style("font-weight", "bold");
        }
        if variant.contains("italic") {
            element.set_style("font-style", "italic");
        }
        element.append_text(text);
        element
    }


    // ------------------------- OUTPUT --------------------------------

    /// Append the output of the wrapper to `parent`
    pub fn to_chtml(&mut self, id: WrapperId, parent: &mut Element) {
        if self.role(id) == Role::InferredRow {
            for child in self.children(id) {
                self.to_chtml(child, parent);
            }
            return;
        }
        let element = match self.role(id) {
            Role::Identifier | Role::Number | Role::Text | Role::StringLiteral => self.token_html(id),
            Role::Operator => self.mo_html(id),
            Role::Space => self.mspace_html(id),
            Role::Glyph => self.mglyph_html(id),
            Role::Math | Role::Row | Role::Style | Role::Error | Role::Phantom | Role::Fenced
            | Role::TableCell | Role::TableRow | Role::LabeledRow => self.row_html(id),
            Role::TexAtom => self.texatom_html(id),
            Role::Fraction => self.frac_html(id),
            Role::Sqrt | Role::Root => self.root_html(id),
            Role::Padded => self.padded_html(id),
            Role::Enclose => self.enclose_html(id),
            Role::Action | Role::Semantics => self.shown_child_html(id),
            Role::Scripts { .. } => self.scripts_html(id),
            Role::UnderOver { .. } => self.underover_html(id),
            Role::Multiscripts => self.multiscripts_html(id),
            Role::Table => self.table_html(id),
            Role::Prescripts | Role::NoneNode | Role::AlignGroup | Role::AlignMark | Role::Annotation => {
                self.standard_node(id)
            },
            Role::InferredRow => return,
        };
        let href = self.attr_str(id, "href");
        if href.is_empty() {
            parent.append(element);
        } else {
            parent.append(Element::new("a").with_attribute("href", href).with_child(element));
        }
    }

    /// The element of a wrapper with the styles every kind shares: variant classes, scale,
    /// colors, spacing, attributes copied from the markup and percentage width
    pub(crate) fn standard_node(&mut self, id: WrapperId) -> Element {
        let kind = if self[id].glyph.is_some() { "mo" } else { self.node(id).kind() };
        let tag = match kind {
            "TeXAtom" => "mjx-texatom".to_string(),
            _ => format!("mjx-{}", kind),
        };
        self.kinds.insert(tag.clone());
        let mut element = Element::new(tag);
        self.handle_styles(id, &mut element);
        self.handle_variant(id, &mut element);
        self.handle_scale(id, &mut element);
        self.handle_color(id, &mut element);
        self.handle_space(id, &mut element);
        self.handle_attributes(id, &mut element);
        self.handle_pwidth(id, &mut element);
        element
    }

    fn handle_styles(&self, id: WrapperId, element: &mut Element) {
        let style = self.attr_str(id, "style");
        for declaration in style.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                let (name, value) = (name.trim(), value.trim());
                if !name.is_empty() && !value.is_empty() {
                    element.set_style(name, value);
                }
            }
        }
    }

    fn handle_variant(&self, id: WrapperId, element: &mut Element) {
        if self[id].glyph.is_some() || !self.node(id).is_token() {
            return;
        }
        if let Some(variant) = self[id].variant {
            for class in variant.classes.split_whitespace() {
                element.add_class(class);
            }
        }
    }

    fn handle_scale(&self, id: WrapperId, element: &mut Element) {
        let rscale = self[id].bbox.rscale;
        if (rscale - 1.).abs() >= 0.001 {
            element.set_style("font-size", percent(rscale));
        }
    }

    fn handle_color(&self, id: WrapperId, element: &mut Element) {
        if self[id].glyph.is_some() {
            return;
        }
        let attributes = &self.node(id).attributes;
        let explicit = |names: [&str; 2]| {
            names.iter().find_map(|name| attributes.get_explicit(name)).map(|v| v.as_str().into_owned())
        };
        if let Some(color) = explicit(["mathcolor", "color"]) {
            element.set_style("color", color);
        }
        if let Some(background) = explicit(["mathbackground", "background"]) {
            element.set_style("background-color", background);
        }
    }

    fn handle_space(&self, id: WrapperId, element: &mut Element) {
        let bbox = &self[id].bbox;
        for (dimen, name, margin) in [(bbox.l, "space", "margin-left"), (bbox.r, "rspace", "margin-right")] {
            if dimen == 0. {
                continue;
            }
            let space = em(dimen);
            match SPACE_NAMES.iter().find(|(size, _)| em(*size) == space) {
                Some((_, value)) => element.set_attribute(name, *value),
                None => element.set_style(margin, space),
            }
        }
    }

    /// Copy the attributes MathML does not know about (`id`, `data-*`, ...), and the classes
    fn handle_attributes(&self, id: WrapperId, element: &mut Element) {
        if self[id].glyph.is_some() {
            return;
        }
        const SKIP: &[&str] = &["fontfamily", "fontsize", "fontweight", "fontstyle", "color",
                                "background", "class", "href", "style", "xmlns"];
        let attributes = &self.node(id).attributes;
        for (name, value) in attributes.get_all_attributes() {
            if SKIP.contains(&name.as_str()) || attributes.is_known(name) || element.attribute(name).is_some() {
                continue;
            }
            element.set_attribute(name, value.as_str());
        }
        if let Some(classes) = attributes.get_explicit("class") {
            for class in classes.as_str().split_whitespace() {
                element.add_class(class);
            }
        }
    }

    fn handle_pwidth(&self, id: WrapperId, element: &mut Element) {
        if let Some(pwidth) = &self[id].bbox.pwidth {
            if pwidth == "100%" {
                element.set_attribute("width", "full");
            } else {
                element.set_style("width", pwidth.as_str());
            }
        }
    }

    /// Children side by side
    pub(crate) fn row_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let mut negative = false;
        for child in self.children(id) {
            self.to_chtml(child, &mut element);
            if self[child].bbox.w < 0. {
                negative = true;
            }
        }
        if negative {
            let w = self.bbox(id).w;
            if w != 0. {
                element.set_style("width", em(w.max(0.)));
                if w < 0. {
                    element.set_style("margin-right", em(w));
                }
            }
        }
        element
    }

    fn shown_child_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        if let Some(child) = self.shown_child(id) {
            self.to_chtml(child, &mut element);
        }
        element
    }

    fn texatom_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.row_html(id);
        let node = self.node(id);
        if let Some(class) = node.tex_class {
            element.set_attribute("texclass", class.name());
        }
        if node.tex_class == Some(TexClass::VCenter) {
            let mut bbox = BBox::empty();
            self.row_bbox(id, &mut bbox);
            let dh = self.vcenter_offset(&bbox);
            element.set_style("vertical-align", em(dh));
        }
        element
    }
}

/// CSS class of a character
pub fn char_class(c: char) -> String {
    format!("mjx-c{:X}", c as u32)
}

/// The nodes an `mfenced` displays: its fences, its children and the separators between them
fn fenced_children(mml: &MmlTree, node: NodeId) -> Vec<NodeId> {
    let parts = mml[node].fence_parts.clone().unwrap_or_default();
    let mut children = Vec::new();
    children.extend(parts.open);
    for (i, &child) in mml.children(node).iter().enumerate() {
        if i > 0 {
            if let Some(&separator) = parts.separators.get(i - 1) {
                children.push(separator);
            }
        }
        children.push(child);
    }
    children.extend(parts.close);
    children
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::font::TexFont;

    fn math(tree: &mut MmlTree, children: &[NodeId]) -> NodeId {
        let math = tree.create_node("math", children);
        tree.set_root(math);
        tree.inherit_attributes(math);
        tree.set_tex_class(math, None);
        math
    }

    fn with_wrappers<R>(tree: &MmlTree, root: NodeId, f: impl FnOnce(&mut WrapperTree<TexFont>, WrapperId) -> R) -> R {
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let metrics = Metrics::from_options(&options);
        let mut wrappers = WrapperTree::new(tree, &font, &options, metrics);
        let id = wrappers.wrap(root);
        f(&mut wrappers, id)
    }

    #[test]
    fn binary_operator_gets_medium_space() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let plus = tree.create_token("mo", "+");
        let b = tree.create_token("mi", "b");
        let root = math(&mut tree, &[a, plus, b]);
        with_wrappers(&tree, root, |wrappers, _| {
            let plus = wrappers.wrapper_for(plus).unwrap();
            let b = wrappers.wrapper_for(b).unwrap();
            assert!((wrappers[plus].bbox.l - 4. / 18.).abs() < 1e-9);
            assert!((wrappers[b].bbox.l - 4. / 18.).abs() < 1e-9);
        });
    }

    #[test]
    fn scripts_are_scaled() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let two = tree.create_token("mn", "2");
        let msup = tree.create_node("msup", &[x, two]);
        let root = math(&mut tree, &[msup]);
        with_wrappers(&tree, root, |wrappers, _| {
            let two = wrappers.wrapper_for(two).unwrap();
            assert!((wrappers[two].bbox.scale - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
            assert!((wrappers[two].bbox.rscale - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
        });
    }

    #[test]
    fn script_size_has_a_minimum() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let style = tree.create_node("mstyle", &[x]);
        tree[style].attributes.set("scriptlevel", "5");
        let root = math(&mut tree, &[style]);
        with_wrappers(&tree, root, |wrappers, _| {
            let x = wrappers.wrapper_for(x).unwrap();
            assert!((wrappers[x].bbox.scale - 0.5).abs() < 1e-9);
        });
    }

    #[test]
    fn row_accumulates_children() {
        let mut tree = MmlTree::default();
        let a = tree.create_token("mi", "a");
        let b = tree.create_token("mi", "b");
        let row = tree.create_node("mrow", &[a, b]);
        let root = math(&mut tree, &[row]);
        with_wrappers(&tree, root, |wrappers, _| {
            let row = wrappers.wrapper_for(row).unwrap();
            let a = wrappers.wrapper_for(a).unwrap();
            let b = wrappers.wrapper_for(b).unwrap();
            let (abox, bbox) = (wrappers.bbox(a), wrappers.bbox(b));
            let rbox = wrappers.bbox(row);
            assert!((rbox.w - abox.w - bbox.w).abs() < 1e-9);
            assert_eq!(rbox.h(), abox.h().max(bbox.h()));
        });
    }

    #[test]
    fn stretched_sizes_grow_with_the_target() {
        let mut tree = MmlTree::default();
        let paren = tree.create_token("mo", "(");
        tree[paren].attributes.set("stretchy", true);
        let root = math(&mut tree, &[paren]);
        with_wrappers(&tree, root, |wrappers, _| {
            let paren = wrappers.wrapper_for(paren).unwrap();
            assert!(wrappers.can_stretch(paren, Direction::Vertical));
            let mut previous = 0;
            let mut target = 0.5;
            while target < 8. {
                wrappers.stretch_to(paren, &[target / 2., target / 2.], false);
                let rank = wrappers[paren].size.unwrap().rank();
                assert!(rank >= previous, "size shrank at {}", target);
                previous = rank;
                let bbox = wrappers.bbox(paren);
                if rank == usize::MAX {
                    assert!(bbox.total() >= target - 1e-9);
                }
                target += 0.25;
            }
            assert_eq!(previous, usize::MAX);
        });
    }

    #[test]
    fn parentheses_stretch_around_a_fraction() {
        let mut tree = MmlTree::default();
        let open = tree.create_token("mo", "(");
        let one = tree.create_token("mn", "1");
        let two = tree.create_token("mn", "2");
        let frac = tree.create_node("mfrac", &[one, two]);
        let close = tree.create_token("mo", ")");
        let root = tree.create_node("math", &[open, frac, close]);
        tree[root].attributes.set("display", "block");
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        with_wrappers(&tree, root, |wrappers, _| {
            let open = wrappers.wrapper_for(open).unwrap();
            let frac = wrappers.wrapper_for(frac).unwrap();
            let size = wrappers[open].size;
            assert!(matches!(size, Some(StretchSize::Fixed(i)) if i > 0), "{:?}", size);
            let pbox = wrappers.bbox(open);
            let fbox = wrappers.bbox(frac);
            assert!(pbox.total() >= 0.9 * fbox.total());
        });
    }
}
