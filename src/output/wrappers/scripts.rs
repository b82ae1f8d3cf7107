//! Scripts and limits: `msub`, `msup`, `msubsup`, `munder`, `mover`, `munderover` and
//! `mmultiscripts`.
//!
//! Placement follows the rules of appendix G of the TeXbook (rules 18a to 18f for scripts, 13a
//! for limits). Under and over scripts of an operator with movable limits are set as sub and
//! superscripts outside display style.

use crate::lengths::em;
use crate::output::bbox::BBox;
use crate::output::font::FontData;
use crate::output::html::Element;
use crate::output::wrapper::{WrapperId, WrapperTree};
use crate::tree::classes::Role;
use crate::tree::tex_class::TexClass;

/// Vertical placement of scripts: `u` raises the superscript, `v` lowers the subscript and `q`
/// is the gap left between them
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Shifts {
    pub u: f64,
    pub v: f64,
    pub q: f64,
}

/// Placement of the parts of an under/over construct
#[derive(Debug, Clone, Copy, Default)]
struct Limits {
    /// Horizontal offsets of the base, the underscript and the overscript
    dw:    [f64; 3],
    /// Gap under the base and drop of the underscript's baseline
    under: Option<(f64, f64)>,
    /// Gap over the base and raise of the overscript's baseline
    over:  Option<(f64, f64)>,
}

/// Scripts of an `mmultiscripts`, as (subscript, superscript) columns
#[derive(Debug, Clone, Default)]
struct Columns {
    post: Vec<(WrapperId, WrapperId)>,
    pre:  Vec<(WrapperId, WrapperId)>,
}

/// Characters that draw a line when used as an accent
const LINES: &[char] = &['\u{00AF}', '\u{2015}', '\u{2014}', '\u{203E}', '_', '\u{0332}'];

impl<'a, F: FontData> WrapperTree<'a, F> {
    /// The subscript and superscript of a wrapper (underscript and overscript for limits)
    fn script_children(&self, id: WrapperId) -> (Option<WrapperId>, Option<WrapperId>) {
        match self.role(id) {
            Role::Scripts { sub, sup }       => (self.child(id, sub), self.child(id, sup)),
            Role::UnderOver { under, over } => (self.child(id, under), self.child(id, over)),
            _ => (None, None),
        }
    }

    /// Limits of an operator with movable limits become scripts outside display style
    pub(crate) fn has_movable_limits(&self, id: WrapperId) -> bool {
        if self.is_display(id) {
            return false;
        }
        self.child(id, 0).map_or(false, |base| {
            let core = self.core_mo(base);
            self.attr_bool(core, "movablelimits")
        })
    }

    /// The innermost wrapper of the base that decides where scripts go
    fn base_core(&self, id: WrapperId) -> Option<WrapperId> {
        let mut core = self.child(id, 0)?;
        loop {
            let children = &self[core].children;
            let transparent = children.len() == 1 && match self.role(core) {
                Role::Row | Role::InferredRow | Role::Style | Role::Padded | Role::Phantom | Role::Semantics => true,
                Role::TexAtom => self.node(core).tex_class != Some(TexClass::VCenter),
                _ => false,
            };
            if !transparent {
                return Some(core);
            }
            core = children[0];
        }
    }

    /// Scale of the base's core relative to the scripted wrapper
    fn base_scale(&self, id: WrapperId, core: WrapperId) -> f64 {
        let mut scale = 1.;
        let mut current = Some(core);
        while let Some(wrapper) = current {
            if wrapper == id {
                break;
            }
            scale *= self[wrapper].bbox.rscale;
            current = self[wrapper].parent;
        }
        scale
    }

    /// Is the base a single character at full size? Scripts then hug it more closely.
    fn base_is_char(&self, id: WrapperId) -> bool {
        let Some(core) = self.base_core(id) else { return false };
        matches!(self.role(core), Role::Identifier | Role::Number | Role::Operator)
            && self.base_scale(id, core) == 1.
            && self.text(core).chars().count() == 1
            && !self.attr_bool(core, "largeop")
    }

    fn base_char_zero(&self, id: WrapperId, n: f64) -> f64 {
        if self.base_is_char(id) { 0. } else { n }
    }

    /// Height and depth of the base's core, in the size of the scripted wrapper
    fn core_extent(&mut self, id: WrapperId) -> (f64, f64) {
        let Some(core) = self.base_core(id) else { return (0., 0.) };
        let scale = self.base_scale(id, core);
        let cbox = self.bbox(core);
        (cbox.h() * scale, cbox.d() * scale)
    }

    /// Italic correction of the base: the subscript tucks under it
    fn base_ic(&mut self, id: WrapperId) -> f64 {
        let Some(core) = self.base_core(id) else { return 0. };
        let scale = self.base_scale(id, core);
        self.bbox(core).ic * scale
    }

    fn sup_shift(&mut self, id: WrapperId, sup: &BBox) -> f64 {
        let params = self.params();
        let p = if self.property_bool(id, "texprimestyle") {
            params.sup3
        } else if self.is_display(id) {
            params.sup1
        } else {
            params.sup2
        };
        let shift = self.length2em(id, &self.attr_str(id, "superscriptshift"), p);
        let (h, _) = self.core_extent(id);
        let drop = self.base_char_zero(id, h - params.sup_drop * sup.rscale);
        max!(drop, shift, sup.d() * sup.rscale + params.x_height / 4.)
    }

    fn sub_shift(&mut self, id: WrapperId, sub: &BBox) -> f64 {
        let params = self.params();
        let shift = self.length2em(id, &self.attr_str(id, "subscriptshift"), params.sub1);
        let (_, d) = self.core_extent(id);
        let drop = self.base_char_zero(id, d + params.sub_drop * sub.rscale);
        max!(drop, shift, sub.h() * sub.rscale - 0.8 * params.x_height)
    }

    /// Both scripts at once: they are pushed apart to leave at least three rule thicknesses
    /// between them, the superscript's bottom staying above 4/5 of the x-height
    fn sub_sup_shifts(&mut self, id: WrapperId, sub: &BBox, sup: &BBox) -> Shifts {
        let params = self.params();
        let t = 3. * params.rule_thickness;
        let subscriptshift = self.length2em(id, &self.attr_str(id, "subscriptshift"), params.sub2);
        let (_, d) = self.core_extent(id);
        let drop = self.base_char_zero(id, d + params.sub_drop * sub.rscale);
        let mut u = self.sup_shift(id, sup);
        let mut v = drop.max(subscriptshift);
        let gap = |u: f64, v: f64| (u - sup.d() * sup.rscale) - (sub.h() * sub.rscale - v);
        let q = gap(u, v);
        if q < t {
            v += t - q;
            let p = 0.8 * params.x_height - (u - sup.d() * sup.rscale);
            if p > 0. {
                u += p;
                v -= p;
            }
        }
        let u = u.max(self.length2em(id, &self.attr_str(id, "superscriptshift"), u));
        let v = v.max(self.length2em(id, &self.attr_str(id, "subscriptshift"), v));
        Shifts { u, v, q: gap(u, v) }
    }

    pub(crate) fn script_shifts(&mut self, id: WrapperId) -> Shifts {
        let (sub, sup) = self.script_children(id);
        let subbox = sub.map(|sub| self.bbox(sub));
        let supbox = sup.map(|sup| self.bbox(sup));
        match (subbox, supbox) {
            (Some(sub), Some(sup)) => self.sub_sup_shifts(id, &sub, &sup),
            (Some(sub), None) => Shifts { v: self.sub_shift(id, &sub), ..Shifts::default() },
            (None, Some(sup)) => Shifts { u: self.sup_shift(id, &sup), ..Shifts::default() },
            (None, None) => Shifts::default(),
        }
    }


    // ------------------------- SUB AND SUPERSCRIPTS --------------------------------

    pub(crate) fn scripts_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let Some(base) = self.child(id, 0) else { return bbox.clean() };
        let basebox = self.bbox(base);
        bbox.append(&basebox);
        let (sub, sup) = self.script_children(id);
        if sub.is_none() && sup.is_none() {
            return bbox.clean();
        }
        let params = self.params();
        let x = bbox.w + params.extra_ic;
        let ic = self.base_ic(id);
        let shifts = self.script_shifts(id);
        if let Some(sub) = sub {
            let subbox = self.bbox(sub);
            bbox.combine(&subbox, x - ic, -shifts.v);
        }
        if let Some(sup) = sup {
            let supbox = self.bbox(sup);
            bbox.combine(&supbox, x, shifts.u);
        }
        bbox.w += params.scriptspace;
        bbox.clean();
    }

    pub(crate) fn scripts_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        if matches!(self.role(id), Role::UnderOver { .. }) {
            element.set_attribute("limits", "false");
        }
        let Some(base) = self.child(id, 0) else { return element };
        self.to_chtml(base, &mut element);
        let (sub, sup) = self.script_children(id);
        if sub.is_none() && sup.is_none() {
            return element;
        }
        let shifts = self.script_shifts(id);
        let ic = self.base_ic(id);
        self.kinds.insert("mjx-script".to_string());
        let mut script = Element::new("mjx-script");
        match (sub, sup) {
            (Some(sub), Some(sup)) => {
                script.set_style("vertical-align", em(-shifts.v));
                self.to_chtml(sup, &mut script);
                script.append(Element::new("mjx-spacer").with_style("margin-top", em(shifts.q)));
                self.to_chtml(sub, &mut script);
                if ic != 0. {
                    script.set_style("margin-left", em(-ic));
                    let rscale = self[sup].bbox.rscale;
                    if let Some(first) = script.first_element_mut() {
                        first.set_style("margin-left", em(ic / rscale));
                    }
                }
                self.kinds.insert("mjx-spacer".to_string());
            },
            (Some(sub), None) => {
                script.set_style("vertical-align", em(-shifts.v));
                if ic != 0. {
                    script.set_style("margin-left", em(-ic));
                }
                self.to_chtml(sub, &mut script);
            },
            (None, Some(sup)) => {
                script.set_style("vertical-align", em(shifts.u));
                self.to_chtml(sup, &mut script);
            },
            (None, None) => {},
        }
        element.append(script);
        element
    }


    // ------------------------- LIMITS --------------------------------

    /// Does the script draw a line (an overbar or an underline)?
    fn is_line(&self, script: WrapperId) -> bool {
        let core = self.core_mo(script);
        if self.role(core) != Role::Operator {
            return false;
        }
        let text = self.text(core);
        let mut chars = text.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if LINES.contains(&c))
    }

    fn over_ku(&self, id: WrapperId, over: WrapperId, basebox: &BBox, overbox: &BBox) -> (f64, f64) {
        let params = self.params();
        let d = overbox.d() * overbox.rscale;
        let k = if self.attr_bool(id, "accent") {
            if self.is_line(over) { 3. * params.rule_thickness } else { params.rule_thickness * params.separation_factor }
        } else {
            params.big_op_spacing1.max(params.big_op_spacing3 - d.max(0.))
        };
        (k, basebox.h() * basebox.rscale + k + d)
    }

    fn under_kv(&self, id: WrapperId, under: WrapperId, basebox: &BBox, underbox: &BBox) -> (f64, f64) {
        let params = self.params();
        let h = underbox.h() * underbox.rscale;
        let k = if self.attr_bool(id, "accentunder") {
            if self.is_line(under) { 3. * params.rule_thickness } else { params.rule_thickness * params.separation_factor }
        } else {
            params.big_op_spacing2.max(params.big_op_spacing4 - h)
        };
        (k, basebox.d() * basebox.rscale + k + h)
    }

    /// Horizontal shift of the limits from the base's italic correction (and its skew, for an
    /// accent over it)
    fn limits_delta(&mut self, id: WrapperId, noskew: bool) -> f64 {
        let Some(core) = self.base_core(id) else { return 0. };
        let cbox = self.bbox(core);
        let sk = if !noskew && self.attr_bool(id, "accent") { cbox.sk } else { 0. };
        sk + self.font.skew_ic_factor() * cbox.ic / 2.
    }

    /// Offsets aligning the parts according to `align`, shifted so that none is negative
    fn delta_widths(&self, id: WrapperId, boxes: [Option<&BBox>; 3], delta: [f64; 3]) -> [f64; 3] {
        let align = self.attr_str(id, "align");
        let widths = boxes.map(|b| b.map(|b| b.outer_width() * b.rscale));
        let w = widths.iter().flatten().fold(0f64, |w, &b| w.max(b));
        let mut dw = [0.; 3];
        for i in 0..3 {
            if let Some(width) = widths[i] {
                dw[i] = match align.as_str() {
                    "left"  => 0.,
                    "right" => w - width,
                    _       => (w - width) / 2.,
                } + delta[i];
            }
        }
        let m = dw.iter().fold(0f64, |m, &d| m.min(d));
        dw.map(|d| d - m)
    }

    fn limits(&mut self, id: WrapperId) -> Limits {
        let Some(base) = self.child(id, 0) else { return Limits::default() };
        let basebox = self.bbox(base);
        let (under, over) = self.script_children(id);
        let underbox = under.map(|under| self.bbox(under));
        let overbox = over.map(|over| self.bbox(over));
        let under_kv = under.zip(underbox.as_ref()).map(|(under, ubox)| self.under_kv(id, under, &basebox, ubox));
        let over_ku = over.zip(overbox.as_ref()).map(|(over, obox)| self.over_ku(id, over, &basebox, obox));
        let delta_over = self.limits_delta(id, false);
        let delta_under = self.limits_delta(id, true);
        let dw = self.delta_widths(
            id,
            [Some(&basebox), underbox.as_ref(), overbox.as_ref()],
            [0., -delta_under, delta_over],
        );
        Limits { dw, under: under_kv, over: over_ku }
    }

    pub(crate) fn underover_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        if self.has_movable_limits(id) {
            return self.scripts_bbox(id, bbox);
        }
        let Some(base) = self.child(id, 0) else { return bbox.clean() };
        let limits = self.limits(id);
        let (under, over) = self.script_children(id);
        let basebox = self.bbox(base);
        bbox.combine(&basebox, limits.dw[0], 0.);
        let z = self.params().big_op_spacing5;
        if let (Some(over), Some((_, u))) = (over, limits.over) {
            let overbox = self.bbox(over);
            bbox.combine(&overbox, limits.dw[2], u);
            bbox.set_h(bbox.h() + z);
        }
        if let (Some(under), Some((_, v))) = (under, limits.under) {
            let underbox = self.bbox(under);
            bbox.combine(&underbox, limits.dw[1], -v);
            bbox.set_d(bbox.d() + z);
        }
        bbox.clean();
    }

    pub(crate) fn underover_html(&mut self, id: WrapperId) -> Element {
        if self.has_movable_limits(id) {
            return self.scripts_html(id);
        }
        let mut element = self.standard_node(id);
        let Some(base) = self.child(id, 0) else { return element };
        let limits = self.limits(id);
        let (under, over) = self.script_children(id);

        let mut base_element = Element::new("mjx-base");
        self.to_chtml(base, &mut base_element);
        pad_left(&mut base_element, limits.dw[0]);

        let over_element = over.zip(limits.over).map(|(over, (k, _))| {
            let mut part = Element::new("mjx-over").with_style("padding-bottom", em(k));
            self.to_chtml(over, &mut part);
            pad_left(&mut part, limits.dw[2]);
            part
        });
        let under_element = under.zip(limits.under).map(|(under, (k, _))| {
            let mut part = Element::new("mjx-under").with_style("padding-top", em(k));
            self.to_chtml(under, &mut part);
            pad_left(&mut part, limits.dw[1]);
            part
        });

        match (over_element, under_element) {
            (Some(over), Some(under)) => {
                let table = Element::new("mjx-munder")
                    .with_child(Element::new("mjx-row").with_child(base_element))
                    .with_child(Element::new("mjx-row").with_child(under));
                element.append(over);
                element.append(Element::new("mjx-box").with_child(table));
                self.kinds.insert("mjx-munder".to_string());
            },
            (Some(over), None) => {
                element.append(over);
                element.append(base_element);
            },
            (None, Some(under)) => {
                element.append(Element::new("mjx-row").with_child(base_element));
                element.append(Element::new("mjx-row").with_child(under));
            },
            (None, None) => element.append(base_element),
        }
        element
    }


    // ------------------------- MULTISCRIPTS --------------------------------

    fn columns(&self, id: WrapperId) -> Columns {
        let mut columns = Columns::default();
        let mut prescripts = false;
        let mut pending = None;
        for child in self.children(id).into_iter().skip(1) {
            if self.role(child) == Role::Prescripts {
                prescripts = true;
                pending = None;
                continue;
            }
            match pending.take() {
                None => pending = Some(child),
                Some(sub) if prescripts => columns.pre.push((sub, child)),
                Some(sub) => columns.post.push((sub, child)),
            }
        }
        columns
    }

    /// The subscripts and the superscripts of the columns, side by side
    fn column_boxes(&mut self, pairs: &[(WrapperId, WrapperId)]) -> (BBox, BBox) {
        let (mut subs, mut sups) = (BBox::empty(), BBox::empty());
        let mut x = 0.;
        for &(sub, sup) in pairs {
            let subbox = self.bbox(sub);
            let supbox = self.bbox(sup);
            subs.combine(&subbox, x, 0.);
            sups.combine(&supbox, x, 0.);
            x += (subbox.outer_width() * subbox.rscale).max(supbox.outer_width() * supbox.rscale);
        }
        subs.w = x;
        sups.w = x;
        subs.clean();
        sups.clean();
        (subs, sups)
    }

    /// Columns of both sides, with the shifts shared by all of them
    fn multiscripts_layout(&mut self, id: WrapperId) -> (Columns, [BBox; 4], Shifts) {
        let columns = self.columns(id);
        let (sub, sup) = self.column_boxes(&columns.post);
        let (psub, psup) = self.column_boxes(&columns.pre);
        let mut all_sub = psub.clone();
        all_sub.combine(&sub, 0., 0.);
        let mut all_sup = psup.clone();
        all_sup.combine(&sup, 0., 0.);
        let shifts = self.sub_sup_shifts(id, &all_sub, &all_sup);
        (columns, [sub, sup, psub, psup], shifts)
    }

    pub(crate) fn multiscripts_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let Some(base) = self.child(id, 0) else { return bbox.clean() };
        let (columns, [sub, sup, psub, psup], Shifts { u, v, .. }) = self.multiscripts_layout(id);
        let scriptspace = self.params().scriptspace;
        if !columns.pre.is_empty() {
            bbox.combine(&psup, scriptspace, u);
            bbox.combine(&psub, scriptspace, -v);
        }
        let basebox = self.bbox(base);
        bbox.append(&basebox);
        if !columns.post.is_empty() {
            let w = bbox.w;
            bbox.combine(&sup, w, u);
            bbox.combine(&sub, w, -v);
            bbox.w += scriptspace;
        }
        bbox.clean();
    }

    pub(crate) fn multiscripts_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let Some(base) = self.child(id, 0) else { return element };
        let (columns, [sub, sup, psub, psup], shifts) = self.multiscripts_layout(id);
        let scriptalign = self.node(id).property("scriptalign")
            .map(|v| v.as_str().into_owned())
            .unwrap_or_else(|| "right left".to_string());
        let both = format!("{} {}", scriptalign, scriptalign);
        let mut aligns = both.split_whitespace();
        let pre_align = aligns.next().unwrap_or("right");
        let post_align = aligns.next().unwrap_or("left");

        if !columns.pre.is_empty() {
            let mut scripts = self.script_table("mjx-prescripts", &columns.pre, shifts, &psub, &psup);
            if pre_align != "right" {
                scripts.set_attribute("script-align", pre_align);
            }
            element.append(scripts);
        }
        self.to_chtml(base, &mut element);
        if !columns.post.is_empty() {
            let mut scripts = self.script_table("mjx-scripts", &columns.post, shifts, &sub, &sup);
            if post_align != "left" {
                scripts.set_attribute("script-align", post_align);
            }
            element.append(scripts);
        }
        element
    }

    /// Rows of superscripts and subscripts with a spacer between them, raised so that the
    /// superscripts sit at `u`
    fn script_table(&mut self, kind: &'static str, pairs: &[(WrapperId, WrapperId)], shifts: Shifts, sub: &BBox, sup: &BBox) -> Element {
        let Shifts { u, v, .. } = shifts;
        let q = (u - sup.d()) - (sub.h() - v);
        let mut sup_row = Element::new("mjx-row");
        let mut sep_row = Element::new("mjx-row");
        let mut sub_row = Element::new("mjx-row");
        if q > 0. {
            sep_row.set_style("height", em(q));
        }
        for &(subscript, superscript) in pairs {
            let mut cell = Element::new("mjx-cell");
            self.to_chtml(subscript, &mut cell);
            sub_row.append(cell);
            let mut cell = Element::new("mjx-cell");
            self.to_chtml(superscript, &mut cell);
            sup_row.append(cell);
        }
        self.kinds.insert(kind.to_string());
        let mut table = Element::new(kind).with_child(sup_row).with_child(sep_row).with_child(sub_row);
        if u != 0. {
            table.set_style("vertical-align", em(u));
        }
        table
    }
}

fn pad_left(element: &mut Element, dx: f64) {
    if dx != 0. {
        element.set_style("padding-left", em(dx));
    }
}


#[cfg(test)]
mod tests {
    use crate::lengths::em;
    use crate::output::bbox::BBox;
    use crate::output::chtml::{ChtmlOptions, Metrics};
    use crate::output::font::{FontData, TexFont};
    use crate::output::html::Element;
    use crate::output::wrapper::WrapperTree;
    use crate::tree::{MmlTree, NodeId};

    fn layout(tree: &mut MmlTree, children: &[NodeId], display: bool, node: NodeId) -> (BBox, Element, super::Shifts) {
        let root = tree.create_node("math", children);
        if display {
            tree[root].attributes.set("display", "block");
        }
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let mut wrappers = WrapperTree::new(tree, &font, &options, Metrics::from_options(&options));
        let top = wrappers.wrap(root);
        let id = wrappers.wrapper_for(node).unwrap();
        let bbox = wrappers.bbox(id);
        let shifts = wrappers.script_shifts(id);
        let mut parent = Element::new("mjx-container");
        wrappers.to_chtml(top, &mut parent);
        (bbox, parent, shifts)
    }

    #[test]
    fn superscript_of_a_letter() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let two = tree.create_token("mn", "2");
        let msup = tree.create_node("msup", &[x, two]);
        let (bbox, html, shifts) = layout(&mut tree, &[msup], false, msup);
        let params = TexFont::new().params().clone();
        assert!((shifts.u - params.sup2).abs() < 1e-9);
        assert!(bbox.h() > params.sup2);
        let script = html.find("mjx-script").unwrap();
        assert_eq!(script.style("vertical-align"), Some(em(shifts.u).as_str()));
    }

    #[test]
    fn scripts_keep_apart() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let i = tree.create_token("mi", "i");
        let big = tree.create_token("mi", "T");
        let msubsup = tree.create_node("msubsup", &[x, i, big]);
        let (_, html, shifts) = layout(&mut tree, &[msubsup], false, msubsup);
        let t = TexFont::new().params().rule_thickness;
        assert!(shifts.q >= 3. * t - 1e-9);
        let script = html.find("mjx-script").unwrap();
        let kinds: Vec<_> = script.elements().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, ["mjx-mi", "mjx-spacer", "mjx-mi"]);
    }

    #[test]
    fn display_limits_are_stacked() {
        let mut tree = MmlTree::default();
        let sum = tree.create_token("mo", "\u{2211}");
        let i = tree.create_token("mi", "i");
        let n = tree.create_token("mi", "n");
        let op = tree.create_node("munderover", &[sum, i, n]);
        let (bbox, html, _) = layout(&mut tree, &[op], true, op);
        assert!(bbox.h() > 0.95 + 0.1);
        assert!(bbox.d() > 0.45 + 0.1);
        let munderover = html.find("mjx-munderover").unwrap();
        assert!(munderover.attribute("limits").is_none());
        assert!(munderover.find("mjx-over").is_some());
        assert!(munderover.find("mjx-under").is_some());
        assert!(munderover.find("mjx-base").is_some());
    }

    #[test]
    fn inline_limits_become_scripts() {
        let mut tree = MmlTree::default();
        let sum = tree.create_token("mo", "\u{2211}");
        let i = tree.create_token("mi", "i");
        let n = tree.create_token("mi", "n");
        let op = tree.create_node("munderover", &[sum, i, n]);
        let (_, html, _) = layout(&mut tree, &[op], false, op);
        let munderover = html.find("mjx-munderover").unwrap();
        assert_eq!(munderover.attribute("limits"), Some("false"));
        assert!(munderover.find("mjx-script").is_some());
        assert!(munderover.find("mjx-over").is_none());
    }

    #[test]
    fn prescripts_come_before_the_base() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let a = tree.create_token("mi", "a");
        let b = tree.create_token("mi", "b");
        let pre = tree.create("mprescripts");
        let c = tree.create_token("mi", "c");
        let d = tree.create_token("mi", "d");
        let multi = tree.create_node("mmultiscripts", &[x, a, b, pre, c, d]);
        let (bbox, html, _) = layout(&mut tree, &[multi], false, multi);
        assert!(bbox.w > 0.572 * 3.);
        let multi = html.find("mjx-mmultiscripts").unwrap();
        let kinds: Vec<_> = multi.elements().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, ["mjx-prescripts", "mjx-mi", "mjx-scripts"]);
        let scripts = multi.find("mjx-scripts").unwrap();
        assert_eq!(scripts.elements().count(), 3);
    }
}
